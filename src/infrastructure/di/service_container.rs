//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ContentService, MenuService};
use crate::config::Settings;
use crate::infrastructure::store::JsonFileStore;
use crate::infrastructure::traits::{AccessPolicy, AllowAll, FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Capability check applied by every service
    pub access: Arc<dyn AccessPolicy>,

    store: Arc<JsonFileStore>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(AllowAll))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        access: Arc<dyn AccessPolicy>,
    ) -> Self {
        let store = Arc::new(JsonFileStore::new(fs.clone(), settings.data_dir.clone()));
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            access,
            store,
        }
    }

    pub fn store(&self) -> &JsonFileStore {
        &self.store
    }

    pub fn menu_service(&self) -> MenuService {
        MenuService::new(
            self.store.clone(),
            self.access.clone(),
            self.settings.menu.delete_policy,
        )
    }

    pub fn content_service(&self) -> ContentService {
        ContentService::new(self.store.clone(), self.access.clone())
    }
}
