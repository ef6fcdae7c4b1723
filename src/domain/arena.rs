use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{MenuNode, NodeId};

/// Node of the rendered menu forest.
#[derive(Debug)]
pub struct ForestNode {
    /// Menu node payload
    pub data: MenuNode,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in display order
    pub children: Vec<Index>,
}

/// Arena-based forest of menu nodes, as produced by `MenuTree::list_tree`.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Roots and children are kept in display order.
#[derive(Debug, Default)]
pub struct MenuForest {
    arena: Arena<ForestNode>,
    roots: Vec<Index>,
}

impl MenuForest {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self, data), fields(id = %data.id))]
    pub fn insert_node(&mut self, data: MenuNode, parent: Option<Index>) -> Index {
        let node_idx = self.arena.insert(ForestNode {
            data,
            parent,
            children: Vec::new(),
        });

        match parent.and_then(|p| self.arena.get_mut(p)) {
            Some(parent) => parent.children.push(node_idx),
            None => self.roots.push(node_idx),
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ForestNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal, roots and siblings in display order.
    pub fn iter(&self) -> ForestIterator<'_> {
        ForestIterator::new(self)
    }

    /// Ids in pre-order traversal.
    pub fn ids(&self) -> Vec<NodeId> {
        self.iter().map(|(_, node)| node.data.id).collect()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.iter().any(|(_, node)| node.data.id == id)
    }

    /// Ids of the direct children of `id`, in display order. Roots for `None`.
    pub fn child_ids(&self, id: Option<NodeId>) -> Vec<NodeId> {
        let indices = match id {
            None => self.roots.as_slice(),
            Some(id) => match self.iter().find(|(_, n)| n.data.id == id) {
                Some((_, node)) => node.children.as_slice(),
                None => return Vec::new(),
            },
        };
        indices
            .iter()
            .filter_map(|&idx| self.get_node(idx))
            .map(|n| n.data.id)
            .collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.roots
            .iter()
            .map(|&root| self.calculate_depth(root))
            .max()
            .unwrap_or(0)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects all leaf nodes (nodes with no children) in display order.
    pub fn leaf_nodes(&self) -> Vec<&MenuNode> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| &node.data)
            .collect()
    }

    /// Render the forest as a text tree below a single label.
    pub fn to_tree(&self, label: &str) -> Tree<String> {
        fn build(forest: &MenuForest, idx: Index) -> Option<Tree<String>> {
            let node = forest.get_node(idx)?;
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&child| build(forest, child))
                .collect();
            Some(Tree::new(node.data.to_string()).with_leaves(leaves))
        }

        let leaves: Vec<_> = self
            .roots
            .iter()
            .filter_map(|&root| build(self, root))
            .collect();
        Tree::new(label.to_string()).with_leaves(leaves)
    }
}

pub struct ForestIterator<'a> {
    forest: &'a MenuForest,
    stack: Vec<Index>,
}

impl<'a> ForestIterator<'a> {
    fn new(forest: &'a MenuForest) -> Self {
        // Push roots in reverse order for left-to-right traversal
        let stack = forest.roots.iter().rev().copied().collect();
        Self { forest, stack }
    }
}

impl<'a> Iterator for ForestIterator<'a> {
    type Item = (Index, &'a ForestNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MenuTarget;

    fn node(id: u64, title: &str) -> MenuNode {
        MenuNode {
            id: NodeId(id),
            title: title.to_string(),
            target: MenuTarget::Label,
            parent: None,
            order: 0,
            published: true,
        }
    }

    fn sample() -> MenuForest {
        let mut forest = MenuForest::new();
        let home = forest.insert_node(node(1, "Home"), None);
        let profile = forest.insert_node(node(2, "Profil"), None);
        forest.insert_node(node(3, "Visi"), Some(profile));
        let docs = forest.insert_node(node(4, "Dokumen"), Some(profile));
        forest.insert_node(node(5, "SOP"), Some(docs));
        let _ = home;
        forest
    }

    #[test]
    fn given_forest_when_iterating_then_visits_in_preorder() {
        let forest = sample();
        let ids: Vec<u64> = forest.ids().into_iter().map(|id| id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn given_forest_when_computing_depth_then_counts_longest_path() {
        assert_eq!(sample().depth(), 3);
        assert_eq!(MenuForest::new().depth(), 0);
    }

    #[test]
    fn given_forest_when_collecting_leaves_then_returns_childless_nodes() {
        let forest = sample();
        let leaves: Vec<&str> = forest.leaf_nodes().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(leaves, vec!["Home", "Visi", "SOP"]);
    }

    #[test]
    fn given_forest_when_asking_children_then_returns_display_order() {
        let forest = sample();
        assert_eq!(forest.child_ids(None), vec![NodeId(1), NodeId(2)]);
        assert_eq!(forest.child_ids(Some(NodeId(2))), vec![NodeId(3), NodeId(4)]);
        assert!(forest.child_ids(Some(NodeId(99))).is_empty());
    }

    #[test]
    fn given_forest_when_rendering_then_contains_all_titles() {
        let rendered = sample().to_tree("menu").to_string();
        for title in ["menu", "Home", "Profil", "Visi", "Dokumen", "SOP"] {
            assert!(rendered.contains(title), "missing {title} in:\n{rendered}");
        }
    }
}
