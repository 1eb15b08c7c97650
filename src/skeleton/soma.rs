//! Detection of the cell body (soma) of a skeleton.

use crate::model::{NodeId, NodeTable, Point3};
use serde::{Deserialize, Serialize};

/// Default radius above which a node is taken as soma (source units).
pub const DEFAULT_SOMA_RADIUS_THRESHOLD: f64 = 10.0;

/// The soma node of a skeleton and its scene position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Soma {
    pub node: NodeId,
    pub position: Point3,
    pub radius: f64,
}

/// Returns the first node (input order) whose radius exceeds `threshold`.
///
/// A skeleton has at most one recognized soma; `None` is a valid outcome.
pub fn find_soma(table: &NodeTable, threshold: f64) -> Option<Soma> {
    table
        .iter()
        .find(|node| node.radius > threshold)
        .map(|node| Soma {
            node: node.id,
            position: node.position,
            radius: node.radius,
        })
}
