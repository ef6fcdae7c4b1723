//! Block content model: rows → columns → [nested columns →] elements.
//!
//! Raw documents (`serde_json::Value`) are what gets persisted and what the
//! validator and migrations operate on, since stored documents may predate
//! the current schema. `ContentDocument` is the typed view of a document that
//! passed validation.

pub mod migrate;
pub mod model;
pub mod schema;
pub mod validate;
pub mod walk;

pub use migrate::migrate_gallery_column_count;
pub use model::{Block, Column, ContentDocument, Element, Row};
pub use schema::{ElementKind, FieldSpec, FieldType, GALLERY_COLUMNS};
pub use validate::{validate, SchemaViolation};
pub use walk::{walk, DocPath, Visitor};
