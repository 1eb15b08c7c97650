use ahash::AHashMap;
use neuroskel::SkeletonError;
use neuroskel::model::{
    ConnectorRole, NodeTable, Point3, RawConnectorRecord, RawNodeRecord,
};
use neuroskel::synapse::{PartnerListing, aggregate_connectors};

fn table() -> NodeTable {
    let records = vec![
        RawNodeRecord::new(1, None, 0.0, 0.0, 0.0),
        RawNodeRecord::new(2, Some(1), 10.0, 0.0, 0.0),
        RawNodeRecord::new(3, Some(2), 20.0, 0.0, 0.0),
    ];
    NodeTable::build(&records, 10.0).unwrap()
}

#[test]
fn test_partition_by_role() {
    let records = vec![
        RawConnectorRecord::new(2, 100, ConnectorRole::Presynaptic, 15.0, 0.0, 0.0),
        RawConnectorRecord::new(3, 101, ConnectorRole::Postsynaptic, 25.0, 0.0, 0.0),
        RawConnectorRecord::new(1, 102, ConnectorRole::Presynaptic, 5.0, 0.0, 0.0),
    ];
    let set = aggregate_connectors(&table(), &records, 10.0).unwrap();

    assert_eq!(set.len(), 3);
    let pre: Vec<_> = set.presynaptic().iter().map(|c| c.id).collect();
    let post: Vec<_> = set.postsynaptic().iter().map(|c| c.id).collect();
    assert_eq!(pre, vec![100, 102]);
    assert_eq!(post, vec![101]);

    let first = &set.presynaptic()[0];
    assert_eq!(first.carrier_node, 2);
    assert_eq!(first.role, ConnectorRole::Presynaptic);
    assert_eq!(first.position, Point3::new(1.0, 0.0, 0.0));
    assert_eq!(first.connector_position, Point3::new(1.5, 0.0, 0.0));
}

#[test]
fn test_unknown_carrier_node() {
    let records = vec![RawConnectorRecord::new(
        99,
        100,
        ConnectorRole::Presynaptic,
        0.0,
        0.0,
        0.0,
    )];
    let err = aggregate_connectors(&table(), &records, 10.0).unwrap_err();
    assert!(matches!(
        err,
        SkeletonError::UnknownCarrierNode {
            connector: 100,
            node: 99
        }
    ));
    assert!(!err.is_retryable());
}

#[test]
fn test_unknown_role_flag() {
    let records = vec![RawConnectorRecord {
        carrier_node: 1,
        connector_id: 7,
        role_flag: 2,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    }];
    assert!(matches!(
        aggregate_connectors(&table(), &records, 10.0),
        Err(SkeletonError::UnknownConnectorRole { connector: 7, flag: 2 })
    ));
}

#[test]
fn test_plain_position_map() {
    let mut positions = AHashMap::new();
    positions.insert(5, Point3::new(1.0, 2.0, 3.0));
    let records = vec![RawConnectorRecord::new(5, 1, ConnectorRole::Postsynaptic, 0.0, 0.0, 0.0)];

    let set = aggregate_connectors(&positions, &records, 1.0).unwrap();
    assert_eq!(set.postsynaptic()[0].position, Point3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_empty_records() {
    let set = aggregate_connectors(&table(), &[], 10.0).unwrap();
    assert!(set.is_empty());
    assert!(set.presynaptic_ids().is_empty());
}

#[test]
fn test_partner_counts() {
    let records = vec![
        RawConnectorRecord::new(1, 100, ConnectorRole::Presynaptic, 0.0, 0.0, 0.0),
        RawConnectorRecord::new(2, 101, ConnectorRole::Presynaptic, 0.0, 0.0, 0.0),
        RawConnectorRecord::new(3, 100, ConnectorRole::Presynaptic, 0.0, 0.0, 0.0),
        RawConnectorRecord::new(3, 200, ConnectorRole::Postsynaptic, 0.0, 0.0, 0.0),
    ];
    let mut set = aggregate_connectors(&table(), &records, 10.0).unwrap();
    assert_eq!(set.presynaptic_ids(), vec![100, 101]);
    assert_eq!(set.partner_count(100), None);

    // Repeated target 11 counts once; 101 is not listed at all
    let listing: PartnerListing = [(100, 10), (100, 11), (100, 11), (300, 12)]
        .into_iter()
        .collect();
    set.apply_partner_listing(&listing);

    assert_eq!(set.partner_count(100), Some(2));
    assert_eq!(set.partner_count(101), Some(0));
    assert_eq!(set.partner_count(200), None);
    let order: Vec<_> = set.partner_counts().keys().copied().collect();
    assert_eq!(order, vec![100, 101]);
}

#[test]
fn test_partner_listing_merge() {
    let mut listing: PartnerListing = [(1, 10)].into_iter().collect();
    listing.merge([(1, 11), (2, 20)].into_iter().collect());

    assert_eq!(listing.len(), 2);
    assert_eq!(listing.targets(1), &[10, 11]);
    assert_eq!(listing.distinct_count(2), 1);
    assert_eq!(listing.distinct_count(3), 0);
}

#[test]
fn test_role_flags() {
    assert_eq!(ConnectorRole::from_flag(0), Some(ConnectorRole::Presynaptic));
    assert_eq!(ConnectorRole::from_flag(1), Some(ConnectorRole::Postsynaptic));
    assert_eq!(ConnectorRole::from_flag(5), None);
    assert_eq!(ConnectorRole::Postsynaptic.flag(), 1);
}
