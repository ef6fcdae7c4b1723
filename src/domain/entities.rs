//! Domain entities: menu nodes and their persisted shape

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Identifier of a navigation menu node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

/// Identifier of a page or landing page owning a content document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

macro_rules! id_impls {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $ty {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map($ty)
            }
        }

        impl From<u64> for $ty {
            fn from(value: u64) -> Self {
                $ty(value)
            }
        }
    };
}

id_impls!(NodeId);
id_impls!(PageId);

/// Where a menu node navigates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuTarget {
    /// External or free-form URL
    Url(String),
    /// Internal page reference
    Page(PageId),
    /// Pure grouping label without a link
    Label,
}

impl MenuTarget {
    /// Build a target from the persisted `url` / `page_id` pair.
    ///
    /// Blank URLs count as unset. Setting both is rejected; setting neither
    /// yields a label-only node.
    pub fn from_parts(url: Option<String>, page: Option<PageId>) -> DomainResult<Self> {
        let url = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        match (url, page) {
            (Some(url), Some(page)) => Err(DomainError::validation(format!(
                "menu target must be either a url or a page, got url {url:?} and page {page}"
            ))),
            (Some(url), None) => Ok(Self::Url(url)),
            (None, Some(page)) => Ok(Self::Page(page)),
            (None, None) => Ok(Self::Label),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            _ => None,
        }
    }

    pub fn page(&self) -> Option<PageId> {
        match self {
            Self::Page(page) => Some(*page),
            _ => None,
        }
    }
}

impl fmt::Display for MenuTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Page(page) => write!(f, "page:{page}"),
            Self::Label => write!(f, "(label)"),
        }
    }
}

/// A navigation menu node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNode {
    pub id: NodeId,
    pub title: String,
    pub target: MenuTarget,
    /// Parent node, None for roots
    pub parent: Option<NodeId>,
    /// Position among siblings, ascending
    pub order: u32,
    pub published: bool,
}

impl MenuNode {
    pub fn to_record(&self) -> MenuRecord {
        MenuRecord {
            id: self.id,
            title: self.title.clone(),
            url: self.target.url().map(str::to_string),
            page_id: self.target.page(),
            parent_id: self.parent,
            order: self.order,
            is_published: self.published,
        }
    }
}

impl fmt::Display for MenuNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} -> {}", self.id, self.title, self.target)?;
        if !self.published {
            write!(f, " (draft)")?;
        }
        Ok(())
    }
}

impl TryFrom<MenuRecord> for MenuNode {
    type Error = DomainError;

    fn try_from(record: MenuRecord) -> Result<Self, Self::Error> {
        let target = MenuTarget::from_parts(record.url, record.page_id)
            .map_err(|e| DomainError::validation(format!("menu node {}: {e}", record.id)))?;
        Ok(Self {
            id: record.id,
            title: normalize_title(&record.title)?,
            target,
            parent: record.parent_id,
            order: record.order,
            published: record.is_published,
        })
    }
}

/// Flat persisted row of a menu node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuRecord {
    pub id: NodeId,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub page_id: Option<PageId>,
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_published")]
    pub is_published: bool,
}

fn default_published() -> bool {
    true
}

/// Input for creating a menu node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenuNode {
    pub title: String,
    pub target: MenuTarget,
    pub parent: Option<NodeId>,
    pub published: bool,
}

/// Partial update of a menu node. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuPatch {
    pub title: Option<String>,
    pub target: Option<MenuTarget>,
    /// `Some(None)` moves the node to the root level
    pub parent: Option<Option<NodeId>>,
    pub published: Option<bool>,
}

impl MenuPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.target.is_none()
            && self.parent.is_none()
            && self.published.is_none()
    }
}

/// What happens to the children of a deleted menu node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Children take the deleted node's slot under its parent
    #[default]
    Reparent,
    /// The whole subtree is removed
    Cascade,
}

impl FromStr for DeletePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reparent" => Ok(Self::Reparent),
            "cascade" => Ok(Self::Cascade),
            other => Err(DomainError::validation(format!(
                "unknown delete policy: {other} (expected reparent or cascade)"
            ))),
        }
    }
}

/// Trim a title and reject blank ones.
pub fn normalize_title(title: &str) -> DomainResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::validation("menu title must not be empty"));
    }
    Ok(title.to_string())
}
