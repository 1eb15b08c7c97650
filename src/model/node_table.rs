//! Indexed representation of one skeleton.
//!
//! The [NodeTable] is built once from a flat list of [RawNodeRecord]s and
//! holds the nodes in an arena (input order), an id lookup, the
//! [ChildIndex] obtained by inverting parent references, and the root id.

use crate::error::{SkeletonError, SkeletonResult};
use crate::model::child_index::ChildIndex;
use crate::model::node::{NodeId, NodeRole, RawNodeRecord, TreeNode};
use crate::model::point::Point3;
use ahash::AHashMap;
use tracing::debug;

/// Position of a node in the arena of a [NodeTable].
type NodeIndex = usize;

// =#========================================================================#=
// NODE POSITIONS (trait)
// =#========================================================================#=
/// Lookup of node positions by id.
///
/// Implemented by [NodeTable] and by plain maps, so connectors can be
/// resolved against whichever id-to-position map the caller holds.
pub trait NodePositions {
    /// Returns the position of `node`, or `None` if unknown.
    fn position_of(&self, node: NodeId) -> Option<Point3>;
}

impl NodePositions for AHashMap<NodeId, Point3> {
    fn position_of(&self, node: NodeId) -> Option<Point3> {
        self.get(&node).copied()
    }
}

impl NodePositions for std::collections::HashMap<NodeId, Point3> {
    fn position_of(&self, node: NodeId) -> Option<Point3> {
        self.get(&node).copied()
    }
}

// =#========================================================================#=
// NODE TABLE
// =#========================================================================#=
/// Skeleton as arena of [TreeNode]s with child index and root.
///
/// # Structure
/// - Nodes are stored in input order; the arena index is internal,
///   all public accessors are keyed by [NodeId].
/// - The [ChildIndex] has an entry for every node (empty for leaves),
///   children in input order.
/// - Exactly one root; every node is reachable from it.
///
/// # Construction
/// Use [NodeTable::build], which validates the records and fails with
/// a [SkeletonError] naming the offending node otherwise.
///
/// # Example
/// ```
/// use neuroskel::model::{NodeTable, NodeRole, RawNodeRecord};
///
/// let records = vec![
///     RawNodeRecord::new(1, None, 0.0, 0.0, 0.0),
///     RawNodeRecord::new(2, Some(1), 10.0, 0.0, 0.0),
///     RawNodeRecord::new(3, Some(2), 20.0, 0.0, 0.0),
///     RawNodeRecord::new(4, Some(2), 20.0, 10.0, 0.0),
/// ];
/// let table = NodeTable::build(&records, 10.0)?;
///
/// assert_eq!(table.root(), 1);
/// assert_eq!(table.children(2), &[3, 4]);
/// assert_eq!(table.role(2), Some(NodeRole::Branch));
/// # Ok::<(), neuroskel::SkeletonError>(())
/// ```
#[derive(Debug, Clone)]
pub struct NodeTable {
    /// Nodes of this skeleton (arena pattern), in input order
    nodes: Vec<TreeNode>,

    /// Lookup from node id to arena index
    lookup: AHashMap<NodeId, NodeIndex>,

    /// Children per node, built by inverting parent references
    children: ChildIndex,

    /// Id of the single parentless node
    root: NodeId,
}

// ============================================================================
// Building (pub)
// ============================================================================
impl NodeTable {
    /// Builds a node table from raw records.
    ///
    /// # Arguments
    /// * `records` - Node records in source order (order determines sibling order)
    /// * `scale` - Coordinate divisor, see [Point3::from_raw]
    ///
    /// # Errors
    /// * [SkeletonError::DuplicateNode] - an id occurs twice
    /// * [SkeletonError::MalformedTree] - zero or more than one parentless node
    /// * [SkeletonError::UnknownParentReference] - a parent id is not in the record set
    /// * [SkeletonError::TreeTooDeepOrCyclic] - some nodes are not reachable
    ///   from the root (they form a detached parent cycle)
    pub fn build<'a, I>(records: I, scale: f64) -> SkeletonResult<NodeTable>
    where
        I: IntoIterator<Item = &'a RawNodeRecord>,
    {
        let records = records.into_iter();
        let mut nodes = Vec::with_capacity(records.size_hint().0);
        let mut lookup = AHashMap::with_capacity(records.size_hint().0);
        let mut roots = Vec::new();

        for record in records {
            if lookup.insert(record.id, nodes.len()).is_some() {
                return Err(SkeletonError::DuplicateNode(record.id));
            }
            if record.parent.is_none() {
                roots.push(record.id);
            }
            nodes.push(TreeNode::from_record(record, scale));
        }

        if roots.len() != 1 {
            return Err(SkeletonError::MalformedTree { roots });
        }
        let root = roots[0];

        // Invert parent references; one entry per node keeps leaves visible
        let mut children = ChildIndex::with_capacity(nodes.len());
        for node in &nodes {
            children.insert_node(node.id);
        }
        for node in &nodes {
            if let Some(parent) = node.parent {
                if !lookup.contains_key(&parent) {
                    return Err(SkeletonError::UnknownParentReference {
                        node: node.id,
                        parent,
                    });
                }
                children.push_child(parent, node.id);
            }
        }

        let table = NodeTable {
            nodes,
            lookup,
            children,
            root,
        };
        table.check_connected()?;

        debug!(
            nodes = table.len(),
            root = table.root,
            "Built node table"
        );

        Ok(table)
    }

    /// Checks that every node is reachable from the root.
    ///
    /// With a single root and resolvable parents, unreachable nodes can only
    /// sit on a parent cycle, which the pre-order walk from the root never enters.
    fn check_connected(&self) -> SkeletonResult<()> {
        let reached = self.children.pre_order_iter(self.root).count();
        if reached == self.nodes.len() {
            return Ok(());
        }

        let mut seen = vec![false; self.nodes.len()];
        for id in self.children.pre_order_iter(self.root) {
            seen[self.lookup[&id]] = true;
        }
        let detached = self
            .nodes
            .iter()
            .zip(&seen)
            .find(|(_, seen)| !**seen)
            .map_or(self.root, |(node, _)| node.id);

        Err(SkeletonError::TreeTooDeepOrCyclic {
            node: detached,
            steps: reached,
        })
    }
}

// ============================================================================
// Getters / Accessors (pub)
// ============================================================================
impl NodeTable {
    /// Returns the id of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given id, or `None` if unknown.
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.lookup.get(&id).map(|&index| &self.nodes[index])
    }

    /// Returns whether a node with the given id exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.lookup.contains_key(&id)
    }

    /// Returns the scene position of a node, or `None` if unknown.
    pub fn position(&self, id: NodeId) -> Option<Point3> {
        self.node(id).map(|node| node.position)
    }

    /// Returns the radius of a node, or `None` if unknown.
    pub fn radius(&self, id: NodeId) -> Option<f64> {
        self.node(id).map(|node| node.radius)
    }

    /// Returns the parent of a node, or `None` for the root or unknown ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Returns the children of a node in input order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.children(id)
    }

    /// Returns the full (not resampled) child index.
    pub fn child_index(&self) -> &ChildIndex {
        &self.children
    }

    /// Returns the topological role of a node, or `None` if unknown.
    pub fn role(&self, id: NodeId) -> Option<NodeRole> {
        self.node(id)
            .map(|node| NodeRole::classify(node.parent.is_some(), self.children(id).len()))
    }

    /// Returns `true` if the node is root, branch or leaf.
    ///
    /// Unknown ids are reported as not fixed.
    pub fn is_fixed(&self, id: NodeId) -> bool {
        self.role(id).is_some_and(|role| role.is_fixed())
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; a valid table has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all nodes in input order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Returns an iterator over `(id, position)` pairs in input order.
    pub fn positions(&self) -> impl Iterator<Item = (NodeId, Point3)> + '_ {
        self.nodes.iter().map(|node| (node.id, node.position))
    }

    /// Returns an owned id-to-position map, e.g. to hand to a renderer.
    pub fn position_map(&self) -> AHashMap<NodeId, Point3> {
        self.positions().collect()
    }
}

impl NodePositions for NodeTable {
    fn position_of(&self, node: NodeId) -> Option<Point3> {
        self.position(node)
    }
}

// ============================================================================
// Statistics (pub)
// ============================================================================
/// Number of nodes per [NodeRole].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCounts {
    pub root: usize,
    pub branch: usize,
    pub leaf: usize,
    pub pass_through: usize,
}

impl NodeTable {
    /// Counts nodes per role.
    pub fn role_counts(&self) -> RoleCounts {
        let mut counts = RoleCounts::default();
        for node in &self.nodes {
            match NodeRole::classify(node.parent.is_some(), self.children(node.id).len()) {
                NodeRole::Root => counts.root += 1,
                NodeRole::Branch => counts.branch += 1,
                NodeRole::Leaf => counts.leaf += 1,
                NodeRole::PassThrough => counts.pass_through += 1,
            }
        }
        counts
    }

    /// Returns the total cable length, i.e. the sum of all
    /// parent-to-child distances in scene units.
    pub fn cable_length(&self) -> f64 {
        self.nodes
            .iter()
            .filter_map(|node| {
                let parent = self.position(node.parent?)?;
                Some(parent.distance(&node.position))
            })
            .sum()
    }
}
