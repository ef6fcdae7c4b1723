//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (MenuStore, ContentStore, AccessPolicy)
//! but are themselves concrete structs, not traits.

mod content;
mod menu;

pub use content::{ContentService, MigrationReport};
pub use menu::MenuService;
