//! Navigation menu tree: node table plus parent → ordered children index.
//!
//! Nodes reference their parent by id only. The sibling index is kept sorted
//! by `order` so listing never has to re-sort, and every mutation re-checks
//! the invariants it could break (dangling parents, cycles, sibling order).

use std::collections::{BTreeMap, HashSet};

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::domain::arena::MenuForest;
use crate::domain::entities::{
    normalize_title, DeletePolicy, MenuNode, MenuPatch, MenuRecord, NewMenuNode, NodeId,
};
use crate::domain::error::{DomainError, DomainResult};

/// Menu forest stored as an id-keyed node table with a sibling index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuTree {
    nodes: BTreeMap<NodeId, MenuNode>,
    /// Children per parent (None = roots), sorted by (order, id)
    children: BTreeMap<Option<NodeId>, Vec<NodeId>>,
}

impl MenuTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble the tree from flat persisted rows.
    ///
    /// Rejects duplicate ids, dangling parents, duplicate sibling orders and
    /// parent cycles.
    #[instrument(level = "debug", skip(records), fields(count = records.len()))]
    pub fn from_records(records: Vec<MenuRecord>) -> DomainResult<Self> {
        let mut tree = Self::new();
        for record in records {
            let node = MenuNode::try_from(record)?;
            if tree.nodes.contains_key(&node.id) {
                return Err(DomainError::validation(format!(
                    "duplicate menu node id: {}",
                    node.id
                )));
            }
            tree.nodes.insert(node.id, node);
        }

        for node in tree.nodes.values() {
            if let Some(parent) = node.parent {
                if !tree.nodes.contains_key(&parent) {
                    return Err(DomainError::validation(format!(
                        "menu node {} references missing parent {}",
                        node.id, parent
                    )));
                }
            }
            tree.children.entry(node.parent).or_default().push(node.id);
        }

        let parents: Vec<Option<NodeId>> = tree.children.keys().copied().collect();
        for parent in parents {
            tree.sort_siblings(parent);
            let siblings = tree.siblings(parent);
            if let Some(order) = siblings
                .iter()
                .filter_map(|id| tree.nodes.get(id))
                .map(|n| n.order)
                .duplicates()
                .next()
            {
                return Err(DomainError::validation(format!(
                    "duplicate order {} among children of {}",
                    order,
                    describe_parent(parent)
                )));
            }
        }

        // Every node must be reachable from the roots, anything else sits on a cycle
        let reachable: HashSet<NodeId> = tree.subtree_ids(None).into_iter().collect();
        if let Some(node) = tree.nodes.values().find(|n| !reachable.contains(&n.id)) {
            return Err(DomainError::Cycle {
                node: node.id,
                parent: node.parent.unwrap_or(node.id),
            });
        }

        debug!("assembled menu tree with {} nodes", tree.nodes.len());
        Ok(tree)
    }

    /// Flat rows for persistence, ordered by id.
    pub fn to_records(&self) -> Vec<MenuRecord> {
        self.nodes.values().map(MenuNode::to_record).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> DomainResult<&MenuNode> {
        self.nodes.get(&id).ok_or_else(|| DomainError::node_not_found(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// All nodes ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = &MenuNode> {
        self.nodes.values()
    }

    /// Children of `parent` (roots for `None`) in display order.
    pub fn siblings(&self, parent: Option<NodeId>) -> &[NodeId] {
        self.children.get(&parent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True if `ancestor` appears on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        // Bounded walk: a chain longer than the table would mean a cycle
        for _ in 0..self.nodes.len() {
            match current {
                Some(id) if id == ancestor => return true,
                Some(id) => current = self.nodes.get(&id).and_then(|n| n.parent),
                None => return false,
            }
        }
        false
    }

    /// Ids below `root` in pre-order (excluding `root` itself; all nodes for `None`).
    pub fn subtree_ids(&self, root: Option<NodeId>) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<NodeId> = self.siblings(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            result.push(id);
            stack.extend(self.siblings(Some(id)).iter().rev().copied());
        }
        result
    }

    fn next_id(&self) -> DomainResult<NodeId> {
        match self.nodes.keys().next_back() {
            None => Ok(NodeId(1)),
            Some(last) => last
                .0
                .checked_add(1)
                .map(NodeId)
                .ok_or_else(|| DomainError::validation(format!("no node id left after {last}"))),
        }
    }

    fn next_order(&self, parent: Option<NodeId>) -> DomainResult<u32> {
        let last = self
            .siblings(parent)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|n| n.order)
            .max();
        match last {
            None => Ok(0),
            Some(order) => order.checked_add(1).ok_or_else(|| {
                DomainError::validation(format!(
                    "no sibling order left after {order} under {}",
                    describe_parent(parent)
                ))
            }),
        }
    }

    fn ensure_parent_exists(&self, parent: Option<NodeId>) -> DomainResult<()> {
        match parent {
            Some(id) if !self.nodes.contains_key(&id) => Err(DomainError::node_not_found(id)),
            _ => Ok(()),
        }
    }

    fn sort_siblings(&mut self, parent: Option<NodeId>) {
        if let Some(mut ids) = self.children.remove(&parent) {
            ids.sort_by_key(|id| (self.nodes.get(id).map(|n| n.order).unwrap_or(u32::MAX), *id));
            self.children.insert(parent, ids);
        }
    }

    fn detach(&mut self, id: NodeId, parent: Option<NodeId>) -> Option<usize> {
        let siblings = self.children.get_mut(&parent)?;
        let position = siblings.iter().position(|&s| s == id)?;
        siblings.remove(position);
        if siblings.is_empty() {
            self.children.remove(&parent);
        }
        Some(position)
    }

    /// Assign orders 0..n-1 following the current sibling sequence.
    fn renumber(&mut self, parent: Option<NodeId>) {
        let ids = self.siblings(parent).to_vec();
        for (position, id) in ids.iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(id) {
                node.order = position as u32;
            }
        }
    }

    /// Create a node appended after its last sibling.
    #[instrument(level = "debug", skip(self, new), fields(title = %new.title))]
    pub fn create(&mut self, new: NewMenuNode) -> DomainResult<NodeId> {
        let title = normalize_title(&new.title)?;
        self.ensure_parent_exists(new.parent)?;

        let id = self.next_id()?;
        let order = self.next_order(new.parent)?;
        self.nodes.insert(
            id,
            MenuNode {
                id,
                title,
                target: new.target,
                parent: new.parent,
                order,
                published: new.published,
            },
        );
        self.children.entry(new.parent).or_default().push(id);
        debug!("created menu node {} at order {}", id, order);
        Ok(id)
    }

    /// Apply a partial update; a parent change moves the whole subtree.
    #[instrument(level = "debug", skip(self, patch))]
    pub fn update(&mut self, id: NodeId, patch: MenuPatch) -> DomainResult<()> {
        let current_parent = self.get(id)?.parent;
        let title = patch.title.as_deref().map(normalize_title).transpose()?;

        let new_parent = patch.parent.filter(|p| *p != current_parent);
        if let Some(parent) = new_parent {
            self.ensure_parent_exists(parent)?;
            if let Some(parent) = parent {
                if parent == id || self.is_ancestor(id, parent) {
                    return Err(DomainError::Cycle { node: id, parent });
                }
            }
        }

        if let Some(parent) = new_parent {
            let order = self.next_order(parent)?;
            self.detach(id, current_parent);
            self.children.entry(parent).or_default().push(id);
            if let Some(node) = self.nodes.get_mut(&id) {
                node.parent = parent;
                node.order = order;
            }
            debug!("moved menu node {} under {}", id, describe_parent(parent));
        }

        if let Some(node) = self.nodes.get_mut(&id) {
            if let Some(title) = title {
                node.title = title;
            }
            if let Some(target) = patch.target {
                node.target = target;
            }
            if let Some(published) = patch.published {
                node.published = published;
            }
        }
        Ok(())
    }

    /// Remove a node; returns the ids that were removed.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: NodeId, policy: DeletePolicy) -> DomainResult<Vec<NodeId>> {
        let parent = self.get(id)?.parent;
        let position = self.detach(id, parent).unwrap_or(0);

        let removed = match policy {
            DeletePolicy::Reparent => {
                let orphans = self.children.remove(&Some(id)).unwrap_or_default();
                for orphan in &orphans {
                    if let Some(node) = self.nodes.get_mut(orphan) {
                        node.parent = parent;
                    }
                }
                if !orphans.is_empty() {
                    let siblings = self.children.entry(parent).or_default();
                    let at = position.min(siblings.len());
                    for (offset, orphan) in orphans.iter().enumerate() {
                        siblings.insert(at + offset, *orphan);
                    }
                    debug!("reparented {} children of {}", orphans.len(), id);
                }
                self.nodes.remove(&id);
                vec![id]
            }
            DeletePolicy::Cascade => {
                let mut removed = vec![id];
                removed.extend(self.subtree_ids(Some(id)));
                for node in &removed {
                    self.nodes.remove(node);
                    self.children.remove(&Some(*node));
                }
                removed
            }
        };

        self.renumber(parent);
        debug!("deleted {} menu node(s)", removed.len());
        Ok(removed)
    }

    /// Assign orders 0..n-1 following the position in `ids`.
    ///
    /// `ids` must be exactly the children of one parent.
    #[instrument(level = "debug", skip(self))]
    pub fn reorder(&mut self, ids: &[NodeId]) -> DomainResult<()> {
        let first = ids
            .first()
            .ok_or_else(|| DomainError::validation("reorder needs at least one node"))?;
        if let Some(dup) = ids.iter().duplicates().next() {
            return Err(DomainError::validation(format!(
                "node {dup} appears more than once in reorder list"
            )));
        }
        let parent = self.get(*first)?.parent;
        for id in ids {
            if self.get(*id)?.parent != parent {
                return Err(DomainError::validation(format!(
                    "node {} is not a child of {}",
                    id,
                    describe_parent(parent)
                )));
            }
        }
        let siblings = self.siblings(parent);
        if siblings.len() != ids.len() {
            return Err(DomainError::validation(format!(
                "reorder list has {} node(s) but {} has {} children",
                ids.len(),
                describe_parent(parent),
                siblings.len()
            )));
        }

        for (position, id) in ids.iter().enumerate() {
            if let Some(node) = self.nodes.get_mut(id) {
                node.order = position as u32;
            }
        }
        self.children.insert(parent, ids.to_vec());
        Ok(())
    }

    /// Build the display forest, children ordered by `order`.
    ///
    /// With `published_only`, an unpublished node hides its whole subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn list_tree(&self, published_only: bool) -> MenuForest {
        let mut forest = MenuForest::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<_> = self
            .siblings(None)
            .iter()
            .rev()
            .map(|&id| (id, None))
            .collect();

        while let Some((id, parent_idx)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if published_only && !node.published {
                continue;
            }
            if !visited.insert(id) {
                warn!("menu node {} reached twice while listing, skipping", id);
                continue;
            }
            let idx = forest.insert_node(node.clone(), parent_idx);
            for &child in self.siblings(Some(id)).iter().rev() {
                stack.push((child, Some(idx)));
            }
        }
        forest
    }
}

fn describe_parent(parent: Option<NodeId>) -> String {
    match parent {
        Some(id) => format!("node {id}"),
        None => "the root level".to_string(),
    }
}
