//! Treenodes of a neuron skeleton and their topological roles.

use crate::model::point::Point3;
use serde::{Deserialize, Serialize};

/// Opaque id of a treenode, unique within a skeleton.
pub type NodeId = i64;

/// Id of a skeleton (one neuron reconstruction).
pub type SkeletonId = i64;

// =#========================================================================#=
// RAW NODE RECORD
// =#========================================================================#=
/// A treenode as delivered by the data source, in source coordinates.
///
/// Mirrors the row layout `(id, parent, x, y, z, radius, confidence)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNodeRecord {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub radius: f64,
    #[serde(default)]
    pub confidence: u8,
}

impl RawNodeRecord {
    /// Creates a record with zero radius and default confidence,
    /// which is mostly useful for tests and synthetic data.
    pub fn new(id: NodeId, parent: Option<NodeId>, x: f64, y: f64, z: f64) -> Self {
        RawNodeRecord {
            id,
            parent,
            x,
            y,
            z,
            radius: 0.0,
            confidence: 5,
        }
    }

    /// Sets the radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }
}

// =#========================================================================#=
// TREE NODE
// =#========================================================================#=
/// A treenode after import, positioned in scene coordinates.
///
/// # Invariants
/// - `id` is unique within its [NodeTable](crate::model::NodeTable)
/// - `parent` is `None` for exactly one node of a table (the root)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub position: Point3,
    pub radius: f64,
    pub confidence: u8,
}

impl TreeNode {
    /// Converts a raw record, remapping its coordinates with `scale`.
    pub fn from_record(record: &RawNodeRecord, scale: f64) -> Self {
        TreeNode {
            id: record.id,
            parent: record.parent,
            position: Point3::from_raw(record.x, record.y, record.z, scale),
            radius: record.radius,
            confidence: record.confidence,
        }
    }

    /// Returns `true` if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

// =#========================================================================#=
// NODE ROLE
// =#========================================================================#=
/// Topological role of a node, derived from its parent and child count.
///
/// - **Root**: Has no parent (takes precedence, also for a single-node tree)
/// - **Leaf**: Has a parent and no children
/// - **Branch**: Has a parent and more than one child
/// - **PassThrough**: Has a parent and exactly one child
///
/// Roles are never stored; they are computed on demand from a child index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    Root,
    Leaf,
    Branch,
    PassThrough,
}

impl NodeRole {
    /// Classifies a node.
    ///
    /// # Arguments
    /// * `has_parent` - Whether the node has a parent
    /// * `num_children` - Number of children of the node
    pub fn classify(has_parent: bool, num_children: usize) -> Self {
        match (has_parent, num_children) {
            (false, _) => NodeRole::Root,
            (true, 0) => NodeRole::Leaf,
            (true, 1) => NodeRole::PassThrough,
            (true, _) => NodeRole::Branch,
        }
    }

    /// Returns `true` for topologically significant roles (everything but
    /// [NodeRole::PassThrough]), which survive resampling.
    pub fn is_fixed(&self) -> bool {
        !matches!(self, NodeRole::PassThrough)
    }
}
