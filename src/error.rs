//! Error types for skeleton import and traversal.
//!
//! This module provides [SkeletonError] for integrity errors detected while
//! building the node table, walking the tree, or attaching connectors.
//! All integrity errors carry the offending id(s) and are non-retryable:
//! the input data itself has to be fixed upstream.

use crate::model::{ConnectorId, NodeId};

/// Result type for skeleton operations.
pub type SkeletonResult<T> = Result<T, SkeletonError>;

// =#========================================================================#=
// SKELETON ERROR
// =#========================================================================#=
/// Errors that can occur while importing or traversing a skeleton.
#[derive(Debug, thiserror::Error)]
pub enum SkeletonError {
    /// Zero or more than one node without a parent.
    #[error("Malformed tree - expected exactly one root, found {}: {roots:?}", .roots.len())]
    MalformedTree {
        /// Ids of all parentless nodes found (empty if none)
        roots: Vec<NodeId>,
    },

    /// A node refers to a parent id that is not part of the record set.
    #[error("Node {node} refers to unknown parent {parent}")]
    UnknownParentReference { node: NodeId, parent: NodeId },

    /// The same node id occurs in more than one record.
    #[error("Node {0} occurs more than once")]
    DuplicateNode(NodeId),

    /// A connector is attached to a node that is not part of the skeleton.
    #[error("Connector {connector} is attached to unknown carrier node {node}")]
    UnknownCarrierNode { connector: ConnectorId, node: NodeId },

    /// A connector record carries a role flag other than pre- or postsynaptic.
    #[error("Connector {connector} has unknown role flag {flag}")]
    UnknownConnectorRole { connector: ConnectorId, flag: u8 },

    /// A child index refers to a node absent from the node table.
    #[error("Node {0} is not part of the node table")]
    UnknownNode(NodeId),

    /// Traversal exceeded its step limit, revisited a node, or found nodes
    /// not reachable from the root.
    #[error("Tree too deep or cyclic - traversal stopped at node {node} after {steps} steps")]
    TreeTooDeepOrCyclic { node: NodeId, steps: usize },

    /// The data source failed to deliver records.
    #[error("Data source error - {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SkeletonError {
    /// Wraps an error raised by a [SkeletonSource](crate::source::SkeletonSource).
    pub fn source_error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SkeletonError::Source(Box::new(err))
    }

    /// Returns `true` if retrying the operation without changing the input
    /// could succeed, which only holds for data source failures.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SkeletonError::Source(_))
    }
}
