//! Menu management service
//!
//! Every operation runs: capability check → load rows → mutate in memory →
//! persist all rows in one write.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{DeletePolicy, MenuForest, MenuNode, MenuPatch, MenuTree, NewMenuNode, NodeId};
use crate::infrastructure::traits::{AccessPolicy, Capability, MenuStore};

/// Service for reading and editing the navigation menu.
pub struct MenuService {
    store: Arc<dyn MenuStore>,
    access: Arc<dyn AccessPolicy>,
    delete_policy: DeletePolicy,
}

impl MenuService {
    /// Create a new menu service.
    ///
    /// `delete_policy` applies to `delete` calls that do not name one.
    pub fn new(
        store: Arc<dyn MenuStore>,
        access: Arc<dyn AccessPolicy>,
        delete_policy: DeletePolicy,
    ) -> Self {
        Self {
            store,
            access,
            delete_policy,
        }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    /// Forest of menu nodes; `published_only` hides unpublished subtrees.
    #[instrument(level = "debug", skip(self))]
    pub fn list_tree(&self, published_only: bool) -> ApplicationResult<MenuForest> {
        self.authorize(Capability::ReadMenu)?;
        Ok(self.load()?.list_tree(published_only))
    }

    /// A single node by id.
    pub fn get(&self, id: NodeId) -> ApplicationResult<MenuNode> {
        self.authorize(Capability::ReadMenu)?;
        Ok(self.load()?.get(id)?.clone())
    }

    #[instrument(level = "debug", skip(self, new), fields(title = %new.title))]
    pub fn create(&self, new: NewMenuNode) -> ApplicationResult<MenuNode> {
        self.authorize(Capability::ManageMenu)?;
        let mut tree = self.load()?;
        let id = tree.create(new)?;
        self.persist(&tree)?;

        let node = tree.get(id)?.clone();
        info!("Created menu node {}", node);
        Ok(node)
    }

    #[instrument(level = "debug", skip(self, patch))]
    pub fn update(&self, id: NodeId, patch: MenuPatch) -> ApplicationResult<MenuNode> {
        self.authorize(Capability::ManageMenu)?;
        let mut tree = self.load()?;
        if patch.is_empty() {
            debug!("empty patch for node {}, nothing to write", id);
            return Ok(tree.get(id)?.clone());
        }
        tree.update(id, patch)?;
        self.persist(&tree)?;

        let node = tree.get(id)?.clone();
        info!("Updated menu node {}", node);
        Ok(node)
    }

    /// Remove a node; `policy` overrides the configured delete policy.
    ///
    /// Returns the ids removed from the menu.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&self, id: NodeId, policy: Option<DeletePolicy>) -> ApplicationResult<Vec<NodeId>> {
        self.authorize(Capability::ManageMenu)?;
        let policy = policy.unwrap_or(self.delete_policy);
        let mut tree = self.load()?;
        let removed = tree.delete(id, policy)?;
        self.persist(&tree)?;

        info!("Deleted {} menu node(s) ({:?})", removed.len(), policy);
        Ok(removed)
    }

    /// Set sibling order to the position in `ids`.
    #[instrument(level = "debug", skip(self))]
    pub fn reorder(&self, ids: &[NodeId]) -> ApplicationResult<()> {
        self.authorize(Capability::ManageMenu)?;
        let mut tree = self.load()?;
        tree.reorder(ids)?;
        self.persist(&tree)
    }

    fn authorize(&self, capability: Capability) -> ApplicationResult<()> {
        if self.access.allows(capability) {
            Ok(())
        } else {
            Err(ApplicationError::Forbidden(capability))
        }
    }

    fn load(&self) -> ApplicationResult<MenuTree> {
        let records = self
            .store
            .load_all()
            .with_context(|| "load menu".to_string())?;
        Ok(MenuTree::from_records(records)?)
    }

    fn persist(&self, tree: &MenuTree) -> ApplicationResult<()> {
        let records = tree.to_records();
        debug!("persisting {} menu row(s)", records.len());
        self.store
            .save_all(&records)
            .with_context(|| "save menu".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, MenuRecord, MenuTarget};
    use crate::infrastructure::traits::{AllowAll, ReadOnly};
    use std::io;
    use std::sync::Mutex;

    /// In-memory store counting writes.
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<MenuRecord>>,
        saves: Mutex<usize>,
    }

    impl MenuStore for MemoryStore {
        fn load_all(&self) -> io::Result<Vec<MenuRecord>> {
            Ok(self.rows.lock().unwrap().clone())
        }

        fn save_all(&self, records: &[MenuRecord]) -> io::Result<()> {
            *self.rows.lock().unwrap() = records.to_vec();
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn service(store: Arc<MemoryStore>, access: Arc<dyn AccessPolicy>) -> MenuService {
        MenuService::new(store, access, DeletePolicy::Reparent)
    }

    fn new_node(title: &str, parent: Option<NodeId>) -> NewMenuNode {
        NewMenuNode {
            title: title.to_string(),
            target: MenuTarget::Label,
            parent,
            published: true,
        }
    }

    #[test]
    fn given_allowed_when_creating_then_persists_once() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store.clone(), Arc::new(AllowAll));

        let node = svc.create(new_node("Profil", None)).unwrap();

        assert_eq!(node.id, NodeId(1));
        assert_eq!(*store.saves.lock().unwrap(), 1);
        assert_eq!(store.rows.lock().unwrap().len(), 1);
    }

    #[test]
    fn given_read_only_access_when_creating_then_forbidden_without_write() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store.clone(), Arc::new(ReadOnly));

        let err = svc.create(new_node("Profil", None)).unwrap_err();

        assert!(matches!(err, ApplicationError::Forbidden(Capability::ManageMenu)));
        assert_eq!(*store.saves.lock().unwrap(), 0);
        assert!(svc.list_tree(false).unwrap().is_empty());
    }

    #[test]
    fn given_failing_mutation_when_updating_then_nothing_written() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store.clone(), Arc::new(AllowAll));
        let a = svc.create(new_node("A", None)).unwrap().id;
        let b = svc.create(new_node("B", Some(a))).unwrap().id;
        let saves = *store.saves.lock().unwrap();

        let err = svc
            .update(
                a,
                MenuPatch {
                    parent: Some(Some(b)),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert!(matches!(
            err.as_domain(),
            Some(DomainError::Cycle { .. })
        ));
        assert_eq!(*store.saves.lock().unwrap(), saves);
    }

    #[test]
    fn given_empty_patch_when_updating_then_returns_node_without_write() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store.clone(), Arc::new(AllowAll));
        let a = svc.create(new_node("A", None)).unwrap().id;

        let node = svc.update(a, MenuPatch::default()).unwrap();

        assert_eq!(node.title, "A");
        assert_eq!(*store.saves.lock().unwrap(), 1);
    }

    #[test]
    fn given_configured_policy_when_deleting_without_override_then_uses_it() {
        let store = Arc::new(MemoryStore::default());
        let svc = MenuService::new(store.clone(), Arc::new(AllowAll), DeletePolicy::Cascade);
        let a = svc.create(new_node("A", None)).unwrap().id;
        svc.create(new_node("A1", Some(a))).unwrap();

        let removed = svc.delete(a, None).unwrap();

        assert_eq!(removed.len(), 2);
        assert!(store.rows.lock().unwrap().is_empty());
    }
}
