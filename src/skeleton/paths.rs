//! Decomposition of a skeleton into paths between significant nodes.
//!
//! A [Path] runs from a significant node (root or branch) down to the next
//! branch or leaf, following single-child entries of a child index. Every
//! link of the child index is covered by exactly one path; consecutive
//! paths share only their branch endpoints.
//!
//! The walk uses an explicit work stack of pending `(start, first_child)`
//! pairs. Children are pushed in reverse so paths come out depth-first in
//! child index order, exactly as a recursive walk would emit them.

use crate::error::{SkeletonError, SkeletonResult};
use crate::model::{ChildIndex, NodeId, NodeTable, Point3};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default cap on traversal steps before reporting a too deep or cyclic tree.
pub const DEFAULT_MAX_TRAVERSAL_STEPS: usize = 1_000_000;

// =#========================================================================#=
// PATH GEOMETRY
// =#========================================================================#=
/// Which points a decomposed [Path] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathGeometry {
    /// Only nodes present in the (possibly resampled) child index.
    /// This is the default.
    #[default]
    Resampled,

    /// Every resampled edge is expanded with the original intermediate
    /// nodes along the parent chain, giving full-resolution polylines.
    FullResolution,
}

// =#========================================================================#=
// PATH
// =#========================================================================#=
/// Contiguous polyline between two significant nodes, both inclusive.
///
/// Holds at least two nodes and one point per node; deserialization
/// rejects anything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PathRecord")]
pub struct Path {
    nodes: Vec<NodeId>,
    points: Vec<Point3>,
}

/// Unchecked serialized form of a [Path].
#[derive(Deserialize)]
struct PathRecord {
    nodes: Vec<NodeId>,
    points: Vec<Point3>,
}

/// Reasons a deserialized [Path] is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPath {
    #[error("Path needs at least two nodes, got {0}")]
    TooShort(usize),

    #[error("Path has {nodes} nodes but {points} points")]
    PointCountMismatch { nodes: usize, points: usize },
}

impl TryFrom<PathRecord> for Path {
    type Error = InvalidPath;

    fn try_from(record: PathRecord) -> Result<Self, Self::Error> {
        if record.nodes.len() < 2 {
            return Err(InvalidPath::TooShort(record.nodes.len()));
        }
        if record.points.len() != record.nodes.len() {
            return Err(InvalidPath::PointCountMismatch {
                nodes: record.nodes.len(),
                points: record.points.len(),
            });
        }
        Ok(Path {
            nodes: record.nodes,
            points: record.points,
        })
    }
}

impl Path {
    /// Returns the node ids along this path, start first.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Returns the scene positions along this path, start first.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns the first node (root or branch node).
    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    /// Returns the last node (branch node or leaf).
    pub fn end(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; a path has at least two points.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of consecutive node pairs (edges) along this path.
    pub fn num_edges(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Returns the polyline length in scene units.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(&w[1])).sum()
    }
}

// =#========================================================================#=
// PATH DECOMPOSER
// =#========================================================================#=
/// Walks a child index from the root of a [NodeTable] and emits [Path]s.
///
/// # Example
/// ```
/// use neuroskel::model::{NodeTable, RawNodeRecord};
/// use neuroskel::skeleton::PathDecomposer;
///
/// let records = vec![
///     RawNodeRecord::new(1, None, 0.0, 0.0, 0.0),
///     RawNodeRecord::new(2, Some(1), 1.0, 0.0, 0.0),
///     RawNodeRecord::new(3, Some(2), 2.0, 0.0, 0.0),
///     RawNodeRecord::new(4, Some(2), 2.0, 1.0, 0.0),
/// ];
/// let table = NodeTable::build(&records, 1.0)?;
///
/// let paths = PathDecomposer::new(&table).decompose(table.child_index())?;
/// let nodes: Vec<_> = paths.iter().map(|p| p.nodes().to_vec()).collect();
/// assert_eq!(nodes, vec![vec![1, 2], vec![2, 3], vec![2, 4]]);
/// # Ok::<(), neuroskel::SkeletonError>(())
/// ```
pub struct PathDecomposer<'a> {
    table: &'a NodeTable,
    geometry: PathGeometry,
    max_steps: usize,
}

impl<'a> PathDecomposer<'a> {
    /// Creates a decomposer with [PathGeometry::Resampled] and
    /// [DEFAULT_MAX_TRAVERSAL_STEPS].
    pub fn new(table: &'a NodeTable) -> Self {
        PathDecomposer {
            table,
            geometry: PathGeometry::Resampled,
            max_steps: DEFAULT_MAX_TRAVERSAL_STEPS,
        }
    }

    /// Sets the geometry mode.
    pub fn with_geometry(mut self, geometry: PathGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Sets the cap on traversal steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Decomposes `index` into paths, starting at the table's root.
    ///
    /// # Arguments
    /// * `index` - Either the table's own child index or one derived from it
    ///   by [resample](crate::skeleton::resample)
    ///
    /// # Returns
    /// All paths in depth-first order; empty for a single-node skeleton.
    ///
    /// # Errors
    /// * [SkeletonError::TreeTooDeepOrCyclic] - step cap exceeded or a node
    ///   reached twice
    /// * [SkeletonError::UnknownNode] - `index` names a node absent from the table
    pub fn decompose(&self, index: &ChildIndex) -> SkeletonResult<Vec<Path>> {
        let root = self.table.root();
        let mut paths = Vec::new();
        let mut visited = AHashSet::with_capacity(index.num_entries());
        visited.insert(root);

        let mut stack: Vec<(NodeId, NodeId)> = index
            .children(root)
            .iter()
            .rev()
            .map(|&child| (root, child))
            .collect();
        let mut steps = 0;

        while let Some((start, first)) = stack.pop() {
            let mut nodes = vec![start];
            let mut previous = start;
            let mut current = first;

            loop {
                steps += 1;
                if steps > self.max_steps || !visited.insert(current) {
                    return Err(SkeletonError::TreeTooDeepOrCyclic {
                        node: current,
                        steps,
                    });
                }

                if self.geometry == PathGeometry::FullResolution {
                    self.push_original_route(previous, current, &mut nodes)?;
                }
                nodes.push(current);

                match index.children(current) {
                    [] => break,
                    [next] => {
                        previous = current;
                        current = *next;
                    }
                    children => {
                        stack.extend(children.iter().rev().map(|&child| (current, child)));
                        break;
                    }
                }
            }

            paths.push(self.resolve(nodes)?);
        }

        debug!(
            paths = paths.len(),
            steps,
            geometry = ?self.geometry,
            "Decomposed skeleton into paths"
        );

        Ok(paths)
    }

    /// Pushes the original nodes strictly between `from` and its
    /// (resampled) descendant `to`, in top-down order.
    fn push_original_route(
        &self,
        from: NodeId,
        to: NodeId,
        nodes: &mut Vec<NodeId>,
    ) -> SkeletonResult<()> {
        if !self.table.contains(to) {
            return Err(SkeletonError::UnknownNode(to));
        }
        let mut route = Vec::new();
        let mut current = to;
        loop {
            let parent = self
                .table
                .parent(current)
                .ok_or(SkeletonError::TreeTooDeepOrCyclic {
                    node: to,
                    steps: route.len(),
                })?;
            if parent == from {
                break;
            }
            if route.len() >= self.table.len() {
                return Err(SkeletonError::TreeTooDeepOrCyclic {
                    node: to,
                    steps: route.len(),
                });
            }
            route.push(parent);
            current = parent;
        }
        nodes.extend(route.into_iter().rev());
        Ok(())
    }

    /// Attaches positions to a list of node ids.
    fn resolve(&self, nodes: Vec<NodeId>) -> SkeletonResult<Path> {
        let points = nodes
            .iter()
            .map(|&id| self.table.position(id).ok_or(SkeletonError::UnknownNode(id)))
            .collect::<SkeletonResult<Vec<_>>>()?;
        Ok(Path { nodes, points })
    }
}

/// Decomposes `index` with default settings, see [PathDecomposer::decompose].
pub fn decompose(table: &NodeTable, index: &ChildIndex) -> SkeletonResult<Vec<Path>> {
    PathDecomposer::new(table).decompose(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawNodeRecord;

    #[test]
    fn test_single_node_has_no_paths() {
        let records = vec![RawNodeRecord::new(7, None, 0.0, 0.0, 0.0)];
        let table = NodeTable::build(&records, 1.0).unwrap();
        assert!(decompose(&table, table.child_index()).unwrap().is_empty());
    }

    #[test]
    fn test_step_cap() {
        let records: Vec<_> = (1..=20)
            .map(|id| RawNodeRecord::new(id, (id > 1).then(|| id - 1), 0.0, 0.0, 0.0))
            .collect();
        let table = NodeTable::build(&records, 1.0).unwrap();
        let result = PathDecomposer::new(&table)
            .with_max_steps(5)
            .decompose(table.child_index());
        assert!(matches!(
            result,
            Err(SkeletonError::TreeTooDeepOrCyclic { steps: 6, .. })
        ));
    }

    #[test]
    fn test_revisit_is_reported() {
        let records = vec![
            RawNodeRecord::new(1, None, 0.0, 0.0, 0.0),
            RawNodeRecord::new(2, Some(1), 1.0, 0.0, 0.0),
            RawNodeRecord::new(3, Some(2), 2.0, 0.0, 0.0),
        ];
        let table = NodeTable::build(&records, 1.0).unwrap();

        // Hand-made index looping 3 back to 2
        let mut index = ChildIndex::new();
        index.push_child(1, 2);
        index.push_child(2, 3);
        index.push_child(3, 2);

        let result = decompose(&table, &index);
        assert!(matches!(
            result,
            Err(SkeletonError::TreeTooDeepOrCyclic { node: 2, .. })
        ));
    }
}
