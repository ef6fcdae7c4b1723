//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod content;
pub mod entities;
pub mod error;
pub mod menu;

pub use arena::{ForestNode, MenuForest};
pub use content::{
    migrate_gallery_column_count, validate, ContentDocument, ElementKind, SchemaViolation,
};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use menu::MenuTree;
