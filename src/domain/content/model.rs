//! Typed content document consumed by the rendering layer.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::content::schema::{ElementKind, MAX_WIDTH};
use crate::domain::content::validate::validate;
use crate::domain::error::{DomainError, DomainResult};

pub type Style = Map<String, Value>;

/// Optional list fields accept `null` as an empty list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A page or landing-page body: ordered rows of columns of elements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentDocument {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Grid width 1-12, full width when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u8>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub elements: Vec<Element>,
    #[serde(
        default,
        rename = "columns",
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub nested_columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

impl Column {
    pub fn width(&self) -> u8 {
        self.width.unwrap_or(MAX_WIDTH as u8)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub block: Block,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

/// Kind-specific element payload, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Text {
        content: String,
    },
    Heading {
        text: String,
        level: u8,
    },
    Image {
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        caption: Option<String>,
    },
    Button {
        label: String,
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant: Option<String>,
        #[serde(default, rename = "newTab", skip_serializing_if = "Option::is_none")]
        new_tab: Option<bool>,
    },
    Link {
        label: String,
        url: String,
        #[serde(default, rename = "newTab", skip_serializing_if = "Option::is_none")]
        new_tab: Option<bool>,
    },
    Video {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        autoplay: Option<bool>,
    },
    Spacer {
        height: u32,
    },
    Gallery {
        #[serde(rename = "galleryColumns")]
        gallery_columns: u8,
        #[serde(
            default,
            deserialize_with = "null_as_empty",
            skip_serializing_if = "Vec::is_empty"
        )]
        images: Vec<Value>,
    },
    Card {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    List {
        items: Vec<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ordered: Option<bool>,
    },
    Accordion {
        items: Vec<Value>,
    },
    Carousel {
        slides: Vec<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        interval: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        autoplay: Option<bool>,
    },
    Tabs {
        tabs: Vec<Value>,
    },
    Form {
        fields: Vec<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<String>,
        #[serde(default, rename = "submitLabel", skip_serializing_if = "Option::is_none")]
        submit_label: Option<String>,
    },
}

impl Block {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Text { .. } => ElementKind::Text,
            Self::Heading { .. } => ElementKind::Heading,
            Self::Image { .. } => ElementKind::Image,
            Self::Button { .. } => ElementKind::Button,
            Self::Link { .. } => ElementKind::Link,
            Self::Video { .. } => ElementKind::Video,
            Self::Spacer { .. } => ElementKind::Spacer,
            Self::Gallery { .. } => ElementKind::Gallery,
            Self::Card { .. } => ElementKind::Card,
            Self::List { .. } => ElementKind::List,
            Self::Accordion { .. } => ElementKind::Accordion,
            Self::Carousel { .. } => ElementKind::Carousel,
            Self::Tabs { .. } => ElementKind::Tabs,
            Self::Form { .. } => ElementKind::Form,
        }
    }
}

impl ContentDocument {
    /// Validate a raw document and convert it into the typed model.
    ///
    /// Fails with `InvalidDocument` listing every violation.
    pub fn from_value(value: &Value) -> DomainResult<Self> {
        let violations = validate(value);
        if !violations.is_empty() {
            return Err(DomainError::InvalidDocument(violations));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| DomainError::validation(format!("content document: {e}")))
    }

    pub fn to_value(&self) -> DomainResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| DomainError::validation(format!("serialize content document: {e}")))
    }

    /// All elements in traversal order (rows, columns, elements, nested columns).
    pub fn elements(&self) -> Vec<&Element> {
        fn collect<'a>(column: &'a Column, out: &mut Vec<&'a Element>) {
            out.extend(column.elements.iter());
            for nested in &column.nested_columns {
                collect(nested, out);
            }
        }

        let mut out = Vec::new();
        for row in &self.rows {
            for column in &row.columns {
                collect(column, &mut out);
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
