//! I/O boundary traits for testability
//!
//! These traits abstract persistence and the access layer, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::Path;

use serde_json::Value;

use crate::domain::{MenuRecord, PageId};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Rename/move a file.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Persistence of content documents, one per page.
///
/// Documents are exchanged raw: stored documents may predate the current
/// schema and must still be loadable for migration.
pub trait ContentStore: Send + Sync {
    /// Load the stored document, None if the page has none.
    fn load(&self, page: PageId) -> io::Result<Option<Value>>;

    /// Replace the stored document in one atomic write.
    fn save(&self, page: PageId, document: &Value) -> io::Result<()>;

    /// All pages with a stored document, ascending.
    fn pages(&self) -> io::Result<Vec<PageId>>;
}

/// Persistence of the flat menu table.
pub trait MenuStore: Send + Sync {
    /// Load all rows; an absent table is empty.
    fn load_all(&self) -> io::Result<Vec<MenuRecord>>;

    /// Replace all rows in one atomic write.
    fn save_all(&self, records: &[MenuRecord]) -> io::Result<()>;
}

/// Operations guarded by the access layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    ReadMenu,
    ManageMenu,
    ReadContent,
    EditContent,
    MigrateContent,
}

impl Capability {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::ManageMenu | Self::EditContent | Self::MigrateContent
        )
    }
}

/// Role/permission check wrapping each operation.
pub trait AccessPolicy: Send + Sync {
    fn allows(&self, capability: Capability) -> bool;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Grants every capability (single-operator CLI use).
#[derive(Debug, Default)]
pub struct AllowAll;

impl AccessPolicy for AllowAll {
    fn allows(&self, _capability: Capability) -> bool {
        true
    }
}

/// Grants read capabilities only.
#[derive(Debug, Default)]
pub struct ReadOnly;

impl AccessPolicy for ReadOnly {
    fn allows(&self, capability: Capability) -> bool {
        !capability.is_write()
    }
}
