//! Decimation of non-branching runs.
//!
//! Resampling keeps every topologically significant ("fixed") node, i.e.
//! the root, all branch nodes and all leaves, and replaces runs of
//! pass-through nodes between them by hops of at most `factor` original
//! edges. Skipped nodes are dropped, not interpolated.
//!
//! For factor `k`, starting at a child `c` of a fixed node `f`, the walk
//! advances through pass-through nodes at most `k - 1` further steps and
//! stops early at the first fixed node. The reached node becomes the new
//! child of `f`; if it is a pass-through node, it is kept as intermediate
//! entry and the walk continues from its child until a fixed node is hit.
//!
//! ```text
//! chain 1-2-3-4-5-6-7-8-9-10, k = 3:   1 -> 4 -> 7 -> 10
//! chain 1-2-3-4,              k = 3:   1 -> 4
//! ```

use crate::model::{ChildIndex, NodeId, NodeTable};
use tracing::debug;

/// Resamples the child index of `table` with decimation factor `factor`.
///
/// # Arguments
/// * `table` - Node table providing the original child index and roles
/// * `factor` - Maximum number of original hops per resampled edge;
///   `0` and `1` return the original child index unchanged
///
/// # Returns
/// A new [ChildIndex] with entries for all fixed nodes (input order) and
/// for intermediate pass-through nodes kept on long runs. Each pass-through
/// node is visited by exactly one forward walk.
///
/// # Example
/// ```
/// use neuroskel::model::{NodeTable, RawNodeRecord};
/// use neuroskel::skeleton::resample;
///
/// let records: Vec<_> = (1..=4)
///     .map(|id| RawNodeRecord::new(id, (id > 1).then(|| id - 1), 0.0, 0.0, 0.0))
///     .collect();
/// let table = NodeTable::build(&records, 1.0)?;
///
/// let resampled = resample(&table, 3);
/// assert_eq!(resampled.children(1), &[4]);
/// # Ok::<(), neuroskel::SkeletonError>(())
/// ```
pub fn resample(table: &NodeTable, factor: usize) -> ChildIndex {
    if factor <= 1 {
        return table.child_index().clone();
    }

    let fixed_nodes: Vec<NodeId> = table
        .iter()
        .map(|node| node.id)
        .filter(|&id| table.is_fixed(id))
        .collect();

    let mut resampled = ChildIndex::with_capacity(fixed_nodes.len());
    for &fixed in &fixed_nodes {
        resampled.insert_node(fixed);

        for &child in table.children(fixed) {
            let mut from = fixed;
            let mut reached = skip_pass_through(table, child, factor);
            resampled.push_child(from, reached);

            // Long run: keep reached node as intermediate and continue
            while !table.is_fixed(reached) {
                let Some(&next) = table.children(reached).first() else {
                    break;
                };
                from = reached;
                reached = skip_pass_through(table, next, factor);
                resampled.push_child(from, reached);
            }
        }
    }

    debug!(
        factor,
        original_edges = table.child_index().num_edges(),
        resampled_edges = resampled.num_edges(),
        "Resampled skeleton"
    );

    resampled
}

/// Walks from `start` through pass-through nodes, taking at most
/// `factor - 1` steps and stopping at the first fixed node.
fn skip_pass_through(table: &NodeTable, start: NodeId, factor: usize) -> NodeId {
    let mut current = start;
    for _ in 1..factor {
        if table.is_fixed(current) {
            break;
        }
        match table.children(current).first() {
            Some(&next) => current = next,
            None => break,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawNodeRecord;

    fn chain(len: i64) -> NodeTable {
        let records: Vec<_> = (1..=len)
            .map(|id| RawNodeRecord::new(id, (id > 1).then(|| id - 1), id as f64, 0.0, 0.0))
            .collect();
        NodeTable::build(&records, 1.0).unwrap()
    }

    #[test]
    fn test_skip_stops_at_fixed() {
        let table = chain(5);
        assert_eq!(skip_pass_through(&table, 2, 10), 5);
        assert_eq!(skip_pass_through(&table, 2, 2), 3);
        assert_eq!(skip_pass_through(&table, 5, 3), 5);
    }

    #[test]
    fn test_chain_of_ten_keeps_every_third() {
        let table = chain(10);
        let resampled = resample(&table, 3);
        assert_eq!(resampled.children(1), &[4]);
        assert_eq!(resampled.children(4), &[7]);
        assert_eq!(resampled.children(7), &[10]);
        assert_eq!(resampled.num_edges(), 3);
    }
}
