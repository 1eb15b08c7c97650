use neuroskel::cluster::{ClusterConfig, find_clusters};
use neuroskel::model::{
    ConnectorRole, NodeId, NodeTable, Point3, RawConnectorRecord, RawNodeRecord,
};
use neuroskel::skeleton::{PathDecomposer, PathGeometry, decompose, resample};
use neuroskel::synapse::aggregate_connectors;
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::BTreeSet;

/// Random tree: node `i + 2` hangs below one of the nodes `1..=i + 1`.
fn tree_records() -> impl Strategy<Value = Vec<RawNodeRecord>> {
    prop::collection::vec((any::<Index>(), -100.0..100.0f64), 0..150).prop_map(|picks| {
        let mut records = vec![RawNodeRecord::new(1, None, 0.0, 0.0, 0.0)];
        for (i, (pick, x)) in picks.into_iter().enumerate() {
            let id = i as NodeId + 2;
            let parent = pick.index(i + 1) as NodeId + 1;
            records.push(RawNodeRecord::new(id, Some(parent), x, id as f64, 0.0));
        }
        records
    })
}

fn hops_between(table: &NodeTable, ancestor: NodeId, node: NodeId) -> Option<usize> {
    let mut hops = 0;
    let mut current = node;
    while current != ancestor {
        current = table.parent(current)?;
        hops += 1;
    }
    Some(hops)
}

proptest! {
    #[test]
    fn prop_table_is_connected(records in tree_records()) {
        let table = NodeTable::build(&records, 1.0).unwrap();
        prop_assert_eq!(table.child_index().pre_order_iter(table.root()).count(), records.len());
        prop_assert_eq!(table.child_index().num_edges(), records.len() - 1);
    }

    #[test]
    fn prop_child_index_reproduces_parent_links(records in tree_records()) {
        let table = NodeTable::build(&records, 1.0).unwrap();

        let expected: BTreeSet<(NodeId, NodeId)> = records
            .iter()
            .filter_map(|record| record.parent.map(|parent| (parent, record.id)))
            .collect();
        let edges: BTreeSet<(NodeId, NodeId)> = table.child_index().edges().collect();
        prop_assert_eq!(&edges, &expected);

        for (parent, child) in table.child_index().edges() {
            prop_assert_eq!(table.parent(child), Some(parent));
        }
    }

    #[test]
    fn prop_factor_one_is_identity(records in tree_records()) {
        let table = NodeTable::build(&records, 1.0).unwrap();
        prop_assert_eq!(&resample(&table, 1), table.child_index());
    }

    #[test]
    fn prop_resampling_keeps_fixed_nodes(records in tree_records(), factor in 2usize..8) {
        let table = NodeTable::build(&records, 1.0).unwrap();
        let resampled = resample(&table, factor);

        for node in table.iter() {
            if table.is_fixed(node.id) {
                prop_assert!(resampled.contains(node.id));
            }
        }
        for (parent, child) in resampled.edges() {
            let hops = hops_between(&table, parent, child);
            prop_assert!(matches!(hops, Some(h) if h >= 1 && h <= factor));
        }
    }

    #[test]
    fn prop_paths_partition_edges(records in tree_records(), factor in 1usize..6) {
        let table = NodeTable::build(&records, 1.0).unwrap();
        let resampled = resample(&table, factor);
        let paths = decompose(&table, &resampled).unwrap();

        let covered: usize = paths.iter().map(|path| path.num_edges()).sum();
        prop_assert_eq!(covered, resampled.num_edges());
        for path in &paths {
            prop_assert!(path.len() >= 2);
            prop_assert!(table.is_fixed(path.start()));
            prop_assert!(table.is_fixed(path.end()));
        }
    }

    #[test]
    fn prop_full_resolution_matches_original(records in tree_records(), factor in 2usize..6) {
        let table = NodeTable::build(&records, 1.0).unwrap();
        let resampled = resample(&table, factor);
        let full = PathDecomposer::new(&table)
            .with_geometry(PathGeometry::FullResolution)
            .decompose(&resampled)
            .unwrap();
        let original = decompose(&table, table.child_index()).unwrap();

        let total: usize = full.iter().map(|path| path.num_edges()).sum();
        prop_assert_eq!(total, table.len() - 1);
        prop_assert_eq!(full.len(), original.len());
    }

    #[test]
    fn prop_connectors_are_partitioned(
        records in tree_records(),
        attachments in prop::collection::vec((any::<Index>(), any::<bool>()), 0..40),
    ) {
        let table = NodeTable::build(&records, 1.0).unwrap();
        let connectors: Vec<_> = attachments
            .iter()
            .enumerate()
            .map(|(i, (pick, pre))| {
                let role = if *pre { ConnectorRole::Presynaptic } else { ConnectorRole::Postsynaptic };
                let carrier = records[pick.index(records.len())].id;
                RawConnectorRecord::new(carrier, i as i64, role, 0.0, 0.0, 0.0)
            })
            .collect();

        let set = aggregate_connectors(&table, &connectors, 1.0).unwrap();
        prop_assert_eq!(set.len(), connectors.len());
        prop_assert!(set.presynaptic().iter().all(|c| c.role == ConnectorRole::Presynaptic));
        prop_assert!(set.postsynaptic().iter().all(|c| c.role == ConnectorRole::Postsynaptic));
    }

    #[test]
    fn prop_clusters_bounded_and_tight(
        coords in prop::collection::vec((-5.0..5.0f64, -5.0..5.0f64, -5.0..5.0f64), 0..60),
        cluster_count in 1usize..8,
    ) {
        let points: Vec<_> = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y, z))| (Point3::new(x, y, z), i))
            .collect();
        let config = ClusterConfig { cluster_count, ..ClusterConfig::default() };
        let clusters = find_clusters(&points, &config);

        prop_assert!(clusters.len() <= cluster_count.min(points.len()));
        let mut seen = vec![false; points.len()];
        for cluster in &clusters {
            for &member in &cluster.members {
                prop_assert!(!seen[member]);
                seen[member] = true;
                prop_assert!(cluster.seed.distance(&points[member].0) <= config.merge_distance);
            }
        }
    }
}
