//! Parent-to-children adjacency of a skeleton.
//!
//! A [ChildIndex] maps each node id to the ordered list of its children.
//! Key order and sibling order follow the input record order, so every
//! traversal over a child index is reproducible.

use crate::model::node::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =#========================================================================#=
// CHILD INDEX
// =#========================================================================#=
/// Ordered mapping `NodeId -> [child NodeId]`.
///
/// Built once by inverting parent references
/// (see [NodeTable](crate::model::NodeTable)) and never mutated afterwards;
/// the [resampler](crate::skeleton::resample) produces a new index instead.
///
/// Nodes without children may or may not have an (empty) entry;
/// [children](ChildIndex::children) returns an empty slice either way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildIndex {
    entries: IndexMap<NodeId, Vec<NodeId>>,
}

impl ChildIndex {
    /// Creates an empty child index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty child index with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        ChildIndex {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Ensures `node` has an entry, keeping existing children.
    pub fn insert_node(&mut self, node: NodeId) {
        self.entries.entry(node).or_default();
    }

    /// Appends `child` to the children of `parent`, creating the entry if needed.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        self.entries.entry(parent).or_default().push(child);
    }

    /// Returns the ordered children of `node` (empty if none or unknown).
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.entries.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns whether `node` has an entry.
    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    /// Returns the ids of all entries in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.keys().copied()
    }

    /// Returns all `(parent, child)` links, grouped by parent in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.entries
            .iter()
            .flat_map(|(&parent, children)| children.iter().map(move |&child| (parent, child)))
    }

    /// Returns the number of entries.
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of parent-to-child links.
    pub fn num_edges(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns an iterator over the subtree of `root` in pre-order
    /// (parents before children, siblings in index order).
    pub fn pre_order_iter(&self, root: NodeId) -> PreOrderIter<'_> {
        PreOrderIter {
            index: self,
            stack: vec![root],
        }
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each node is visited before any of its descendants.
///
/// Cycles are not detected here; the iterator is only used on indices whose
/// reachable part is known to be a tree (or by callers that bound the
/// number of items they take).
pub struct PreOrderIter<'a> {
    index: &'a ChildIndex,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrderIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Push children in reverse, so first child is processed first
        self.stack
            .extend(self.index.children(node).iter().rev().copied());

        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> ChildIndex {
        let mut index = ChildIndex::new();
        index.push_child(1, 2);
        index.push_child(2, 3);
        index.push_child(2, 4);
        index.push_child(1, 5);
        index.insert_node(3);
        index
    }

    #[test]
    fn test_children_and_counts() {
        let index = sample_index();
        assert_eq!(index.children(1), &[2, 5]);
        assert_eq!(index.children(3), &[] as &[NodeId]);
        assert_eq!(index.children(99), &[] as &[NodeId]);
        assert_eq!(index.num_entries(), 3);
        assert_eq!(index.num_edges(), 4);
    }

    #[test]
    fn test_pre_order_follows_sibling_order() {
        let index = sample_index();
        let order: Vec<_> = index.pre_order_iter(1).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_edges_grouped_by_parent() {
        let index = sample_index();
        let edges: Vec<_> = index.edges().collect();
        assert_eq!(edges, vec![(1, 2), (1, 5), (2, 3), (2, 4)]);
    }
}
