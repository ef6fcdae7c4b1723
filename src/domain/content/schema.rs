//! Element kinds and their payload schema

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use FieldType::{Array, Bool, Integer, Str};

/// Closed set of content element kinds, keyed by the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Heading,
    Image,
    Button,
    Link,
    Video,
    Spacer,
    Gallery,
    Card,
    List,
    Accordion,
    Carousel,
    Tabs,
    Form,
}

impl ElementKind {
    pub const ALL: [ElementKind; 14] = [
        Self::Text,
        Self::Heading,
        Self::Image,
        Self::Button,
        Self::Link,
        Self::Video,
        Self::Spacer,
        Self::Gallery,
        Self::Card,
        Self::List,
        Self::Accordion,
        Self::Carousel,
        Self::Tabs,
        Self::Form,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Heading => "heading",
            Self::Image => "image",
            Self::Button => "button",
            Self::Link => "link",
            Self::Video => "video",
            Self::Spacer => "spacer",
            Self::Gallery => "gallery",
            Self::Card => "card",
            Self::List => "list",
            Self::Accordion => "accordion",
            Self::Carousel => "carousel",
            Self::Tabs => "tabs",
            Self::Form => "form",
        }
    }

    /// Kind-specific payload fields.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            Self::Text => TEXT_FIELDS,
            Self::Heading => HEADING_FIELDS,
            Self::Image => IMAGE_FIELDS,
            Self::Button => BUTTON_FIELDS,
            Self::Link => LINK_FIELDS,
            Self::Video => VIDEO_FIELDS,
            Self::Spacer => SPACER_FIELDS,
            Self::Gallery => GALLERY_FIELDS,
            Self::Card => CARD_FIELDS,
            Self::List => LIST_FIELDS,
            Self::Accordion => ACCORDION_FIELDS,
            Self::Carousel => CAROUSEL_FIELDS,
            Self::Tabs => TABS_FIELDS,
            Self::Form => FORM_FIELDS,
        }
    }
}

/// Spacer heights and carousel intervals, typed as `u32`.
const UNSIGNED: FieldType = Integer { min: 0, max: Some(u32::MAX as i64) };

const TEXT_FIELDS: &[FieldSpec] = &[FieldSpec::required("content", Str)];
const HEADING_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("text", Str),
    FieldSpec::required("level", Integer { min: 1, max: Some(6) }),
];
const IMAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("src", Str),
    FieldSpec::optional("alt", Str),
    FieldSpec::optional("caption", Str),
];
const BUTTON_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("label", Str),
    FieldSpec::required("url", Str),
    FieldSpec::optional("variant", Str),
    FieldSpec::optional("newTab", Bool),
];
const LINK_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("label", Str),
    FieldSpec::required("url", Str),
    FieldSpec::optional("newTab", Bool),
];
const VIDEO_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("url", Str),
    FieldSpec::optional("autoplay", Bool),
];
const SPACER_FIELDS: &[FieldSpec] = &[FieldSpec::required("height", UNSIGNED)];
const GALLERY_FIELDS: &[FieldSpec] = &[
    FieldSpec::required(GALLERY_COLUMNS, Integer { min: 1, max: Some(12) }),
    FieldSpec::optional("images", Array),
];
const CARD_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("title", Str),
    FieldSpec::optional("body", Str),
    FieldSpec::optional("image", Str),
    FieldSpec::optional("url", Str),
];
const LIST_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("items", Array),
    FieldSpec::optional("ordered", Bool),
];
const ACCORDION_FIELDS: &[FieldSpec] = &[FieldSpec::required("items", Array)];
const CAROUSEL_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("slides", Array),
    FieldSpec::optional("interval", UNSIGNED),
    FieldSpec::optional("autoplay", Bool),
];
const TABS_FIELDS: &[FieldSpec] = &[FieldSpec::required("tabs", Array)];
const FORM_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("fields", Array),
    FieldSpec::optional("action", Str),
    FieldSpec::optional("submitLabel", Str),
];

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|k| k.as_str() == s).ok_or(())
    }
}

/// Name of the gallery column-count field.
pub const GALLERY_COLUMNS: &str = "galleryColumns";

/// Smallest and largest column width on the 12-column grid.
pub const MIN_WIDTH: i64 = 1;
pub const MAX_WIDTH: i64 = 12;

/// Semantic type of a document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Str,
    Bool,
    Array,
    Object,
    /// Integral JSON number within the inclusive range
    Integer { min: i64, max: Option<i64> },
    /// One of the known element kinds
    Kind,
    /// Field must not be present
    Absent,
}

impl FieldType {
    /// Whether `value` satisfies this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Str => value.is_string(),
            Self::Bool => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Integer { min, max } => match value.as_i64() {
                Some(n) => n >= *min && max.map_or(true, |max| n <= max),
                None => false,
            },
            Self::Kind => value
                .as_str()
                .map(|s| s.parse::<ElementKind>().is_ok())
                .unwrap_or(false),
            Self::Absent => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("string"),
            Self::Bool => f.write_str("boolean"),
            Self::Array => f.write_str("array"),
            Self::Object => f.write_str("object"),
            Self::Integer { min, max: Some(max) } => write!(f, "integer in {min}..={max}"),
            Self::Integer { min, max: None } => write!(f, "integer >= {min}"),
            Self::Kind => {
                let kinds: Vec<&str> = ElementKind::ALL.iter().map(|k| k.as_str()).collect();
                write!(f, "one of {}", kinds.join(", "))
            }
            Self::Absent => f.write_str("absent"),
        }
    }
}

/// One payload field of an element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub required: bool,
}

impl FieldSpec {
    const fn required(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, required: true }
    }

    const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, required: false }
    }
}
