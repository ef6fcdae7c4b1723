//! Integration tests for MenuService over the JSON file store

use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use amisite::application::services::MenuService;
use amisite::application::ApplicationError;
use amisite::domain::{
    DeletePolicy, DomainError, MenuPatch, MenuRecord, MenuTarget, NewMenuNode, NodeId, PageId,
};
use amisite::infrastructure::store::JsonFileStore;
use amisite::infrastructure::traits::{AllowAll, MenuStore, RealFileSystem};
use amisite::util::testing;

struct Site {
    temp: TempDir,
    service: MenuService,
}

impl Site {
    fn store(&self) -> JsonFileStore {
        JsonFileStore::new(Arc::new(RealFileSystem), self.temp.path())
    }

    fn add(&self, title: &str, parent: Option<NodeId>) -> NodeId {
        self.service
            .create(NewMenuNode {
                title: title.to_string(),
                target: MenuTarget::Label,
                parent,
                published: true,
            })
            .unwrap()
            .id
    }

    fn order_of(&self, id: NodeId) -> u32 {
        self.service.get(id).unwrap().order
    }

    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.service.get(id).unwrap().parent
    }
}

#[fixture]
fn site() -> Site {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let store = Arc::new(JsonFileStore::new(Arc::new(RealFileSystem), temp.path()));
    let service = MenuService::new(store, Arc::new(AllowAll), DeletePolicy::Reparent);
    Site { temp, service }
}

fn domain_error(err: ApplicationError) -> DomainError {
    match err {
        ApplicationError::Domain(e) => e,
        other => panic!("expected domain error, got {other:?}"),
    }
}

#[rstest]
fn given_three_siblings_when_reordering_then_orders_follow_input(site: Site) {
    // Arrange
    let a = site.add("A", None);
    let b = site.add("B", None);
    let c = site.add("C", None);

    // Act
    site.service.reorder(&[c, a, b]).unwrap();

    // Assert
    assert_eq!(site.order_of(c), 0);
    assert_eq!(site.order_of(a), 1);
    assert_eq!(site.order_of(b), 2);
    let roots = site.service.list_tree(false).unwrap().child_ids(None);
    assert_eq!(roots, vec![c, a, b]);
}

#[rstest]
fn given_child_as_new_parent_when_updating_then_cycle_error(site: Site) {
    let a = site.add("A", None);
    let b = site.add("B", Some(a));

    let err = site
        .service
        .update(
            a,
            MenuPatch {
                parent: Some(Some(b)),
                ..Default::default()
            },
        )
        .unwrap_err();

    assert_eq!(domain_error(err), DomainError::Cycle { node: a, parent: b });
    assert_eq!(site.parent_of(a), None);
    assert_eq!(site.parent_of(b), Some(a));
}

#[rstest]
fn given_node_moved_when_updating_then_subtree_follows_and_is_appended(site: Site) {
    let profile = site.add("Profil", None);
    let docs = site.add("Dokumen", None);
    let sop = site.add("SOP", Some(docs));
    let _visi = site.add("Visi", Some(profile));

    let moved = site
        .service
        .update(
            docs,
            MenuPatch {
                parent: Some(Some(profile)),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(moved.parent, Some(profile));
    assert_eq!(moved.order, 1);
    assert_eq!(site.parent_of(sop), Some(docs));
    let forest = site.service.list_tree(false).unwrap();
    assert_eq!(forest.depth(), 3);
}

#[rstest]
fn given_parent_with_children_when_deleting_with_reparent_then_children_take_its_slot(
    site: Site,
) {
    let first = site.add("First", None);
    let middle = site.add("Middle", None);
    let last = site.add("Last", None);
    let x = site.add("X", Some(middle));
    let y = site.add("Y", Some(middle));

    let removed = site.service.delete(middle, None).unwrap();

    assert_eq!(removed, vec![middle]);
    let roots = site.service.list_tree(false).unwrap().child_ids(None);
    assert_eq!(roots, vec![first, x, y, last]);
    for (position, id) in roots.iter().enumerate() {
        assert_eq!(site.order_of(*id), position as u32);
    }
}

#[rstest]
fn given_parent_with_children_when_deleting_with_cascade_then_subtree_removed(site: Site) {
    let a = site.add("A", None);
    let a1 = site.add("A1", Some(a));
    let a11 = site.add("A11", Some(a1));
    let b = site.add("B", None);

    let mut removed = site.service.delete(a, Some(DeletePolicy::Cascade)).unwrap();
    removed.sort();

    assert_eq!(removed, vec![a, a1, a11]);
    let rows = site.store().load_all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, b);
    assert_eq!(rows[0].order, 0);
    assert!(rows.iter().all(|r| r.parent_id.is_none()));
}

#[rstest]
#[case::empty(vec![])]
#[case::duplicates(vec![1, 1, 2])]
#[case::subset(vec![2, 1])]
#[case::mixed_parents(vec![1, 4])]
fn given_bad_sibling_list_when_reordering_then_validation_error(
    site: Site,
    #[case] ids: Vec<u64>,
) {
    site.add("A", None);
    site.add("B", None);
    site.add("C", None);
    site.add("A1", Some(NodeId(1)));
    let ids: Vec<NodeId> = ids.into_iter().map(NodeId).collect();

    let err = site.service.reorder(&ids).unwrap_err();

    assert!(matches!(domain_error(err), DomainError::Validation(_)));
}

#[rstest]
fn given_unknown_id_when_reordering_then_not_found(site: Site) {
    site.add("A", None);

    let err = site.service.reorder(&[NodeId(1), NodeId(42)]).unwrap_err();

    assert!(matches!(domain_error(err), DomainError::NotFound { .. }));
}

#[rstest]
fn given_missing_parent_when_creating_then_not_found(site: Site) {
    let err = site
        .service
        .create(NewMenuNode {
            title: "Orphan".into(),
            target: MenuTarget::Label,
            parent: Some(NodeId(7)),
            published: true,
        })
        .unwrap_err();

    assert!(matches!(domain_error(err), DomainError::NotFound { .. }));
    assert!(!site.temp.path().join("menu.json").exists());
}

#[rstest]
fn given_draft_subtree_when_listing_published_then_hidden(site: Site) {
    let home = site.add("Beranda", None);
    let draft = site
        .service
        .create(NewMenuNode {
            title: "Agenda".into(),
            target: MenuTarget::Page(PageId(3)),
            parent: None,
            published: false,
        })
        .unwrap()
        .id;
    let below = site.add("Agenda 2024", Some(draft));

    let public = site.service.list_tree(true).unwrap();
    let admin = site.service.list_tree(false).unwrap();

    assert_eq!(public.ids(), vec![home]);
    assert_eq!(admin.ids(), vec![home, draft, below]);
}

#[rstest]
fn given_persisted_rows_when_reloading_then_targets_survive(site: Site) {
    let page = site
        .service
        .create(NewMenuNode {
            title: "  Profil  ".into(),
            target: MenuTarget::Page(PageId(12)),
            parent: None,
            published: true,
        })
        .unwrap();

    let rows = site.store().load_all().unwrap();

    assert_eq!(
        rows,
        vec![MenuRecord {
            id: page.id,
            title: "Profil".into(),
            url: None,
            page_id: Some(PageId(12)),
            parent_id: None,
            order: 0,
            is_published: true,
        }]
    );
}

#[rstest]
fn given_corrupt_rows_on_disk_when_loading_then_validation_error(site: Site) {
    let rows = vec![
        MenuRecord {
            id: NodeId(1),
            title: "A".into(),
            url: None,
            page_id: None,
            parent_id: Some(NodeId(2)),
            order: 0,
            is_published: true,
        },
        MenuRecord {
            id: NodeId(2),
            title: "B".into(),
            url: None,
            page_id: None,
            parent_id: Some(NodeId(1)),
            order: 0,
            is_published: true,
        },
    ];
    site.store().save_all(&rows).unwrap();

    let err = site.service.list_tree(false).unwrap_err();

    assert!(matches!(domain_error(err), DomainError::Cycle { .. }));
}

#[rstest]
fn given_stored_row_at_max_order_when_creating_sibling_then_validation_error(site: Site) {
    let rows = vec![MenuRecord {
        id: NodeId(1),
        title: "Beranda".into(),
        url: Some("/".into()),
        page_id: None,
        parent_id: None,
        order: u32::MAX,
        is_published: true,
    }];
    site.store().save_all(&rows).unwrap();

    let err = site
        .service
        .create(NewMenuNode {
            title: "Profil".into(),
            target: MenuTarget::Label,
            parent: None,
            published: true,
        })
        .unwrap_err();

    assert!(matches!(domain_error(err), DomainError::Validation(_)));
    assert_eq!(site.store().load_all().unwrap(), rows);
}
