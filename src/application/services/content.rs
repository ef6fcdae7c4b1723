//! Page content service
//!
//! Loads, replaces and migrates the block documents of pages.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    migrate_gallery_column_count, validate, ContentDocument, DomainError, PageId, SchemaViolation,
};
use crate::infrastructure::traits::{AccessPolicy, Capability, ContentStore};

/// Outcome of a corpus-wide migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Number of stored documents examined
    pub scanned: usize,
    /// Pages whose document was (or, on a dry run, would be) rewritten
    pub changed: Vec<PageId>,
    pub dry_run: bool,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Service for page content documents.
pub struct ContentService {
    store: Arc<dyn ContentStore>,
    access: Arc<dyn AccessPolicy>,
}

impl ContentService {
    /// Create a new content service.
    pub fn new(store: Arc<dyn ContentStore>, access: Arc<dyn AccessPolicy>) -> Self {
        Self { store, access }
    }

    /// Typed document of a page.
    ///
    /// A stored document that no longer matches the schema fails with
    /// `InvalidDocument`; run the migration first.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, page: PageId) -> ApplicationResult<ContentDocument> {
        let raw = self.load_raw(page)?;
        Ok(ContentDocument::from_value(&raw)?)
    }

    /// Stored document of a page as-is, without schema checks.
    pub fn load_raw(&self, page: PageId) -> ApplicationResult<Value> {
        self.authorize(Capability::ReadContent)?;
        self.store
            .load(page)
            .with_context(|| format!("load page {page}"))?
            .ok_or_else(|| page_not_found(page))
    }

    /// Check a document without storing it.
    pub fn validate(&self, document: &Value) -> Vec<SchemaViolation> {
        validate(document)
    }

    /// Validate and store a whole document; nothing is written on violations.
    #[instrument(level = "debug", skip(self, document))]
    pub fn replace_document(
        &self,
        page: PageId,
        document: Value,
    ) -> ApplicationResult<ContentDocument> {
        self.authorize(Capability::EditContent)?;
        let typed = ContentDocument::from_value(&document)?;
        self.store
            .save(page, &document)
            .with_context(|| format!("save page {page}"))?;
        info!("Replaced content of page {}", page);
        Ok(typed)
    }

    /// Coerce numeric-string gallery column counts in every stored document.
    ///
    /// Only documents that changed are rewritten; with `dry_run` nothing is.
    #[instrument(level = "debug", skip(self))]
    pub fn migrate_all(&self, dry_run: bool) -> ApplicationResult<MigrationReport> {
        self.authorize(Capability::MigrateContent)?;
        let pages = self
            .store
            .pages()
            .with_context(|| "list pages".to_string())?;

        let mut report = MigrationReport {
            dry_run,
            ..Default::default()
        };
        for page in pages {
            let Some(document) = self
                .store
                .load(page)
                .with_context(|| format!("load page {page}"))?
            else {
                warn!("page {} disappeared during migration", page);
                continue;
            };
            report.scanned += 1;

            let (migrated, changed) = migrate_gallery_column_count(document);
            if !changed {
                continue;
            }
            if dry_run {
                debug!("page {} would change", page);
            } else {
                self.store
                    .save(page, &migrated)
                    .with_context(|| format!("save page {page}"))?;
                debug!("page {} migrated", page);
            }
            report.changed.push(page);
        }

        info!(
            "Migration scanned {} page(s), {} changed{}",
            report.scanned,
            report.changed.len(),
            if dry_run { " (dry run)" } else { "" }
        );
        Ok(report)
    }

    fn authorize(&self, capability: Capability) -> ApplicationResult<()> {
        if self.access.allows(capability) {
            Ok(())
        } else {
            Err(ApplicationError::Forbidden(capability))
        }
    }
}

fn page_not_found(page: PageId) -> ApplicationError {
    DomainError::NotFound {
        entity: "page",
        id: page.to_string(),
    }
    .into()
}
