use neuroskel::cluster::{ClusterConfig, ClusterPalette, find_clusters};
use neuroskel::model::Point3;

fn two_groups() -> Vec<(Point3, u32)> {
    vec![
        (Point3::new(10.0, 0.0, 0.0), 0),
        (Point3::new(0.0, 0.0, 0.0), 1),
        (Point3::new(0.2, 0.0, 0.0), 2),
        (Point3::new(0.0, 0.3, 0.0), 3),
        (Point3::new(10.3, 0.0, 0.0), 4),
    ]
}

#[test]
fn test_densest_group_first() {
    let clusters = find_clusters(&two_groups(), &ClusterConfig::default());

    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0].density, 3);
    assert_eq!(clusters[0].members, vec![1, 2, 3]);
    assert_eq!(clusters[1].members, vec![0, 4]);
    assert_eq!(clusters[1].seed, Point3::new(10.0, 0.0, 0.0));
    assert!((clusters[1].center.x - 10.15).abs() < 1e-12);
}

#[test]
fn test_cluster_count_limits_output() {
    let config = ClusterConfig {
        cluster_count: 1,
        ..ClusterConfig::default()
    };
    let clusters = find_clusters(&two_groups(), &config);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].members, vec![1, 2, 3]);
}

#[test]
fn test_fewer_points_than_clusters() {
    let points = vec![(Point3::ORIGIN, "only")];
    let config = ClusterConfig {
        cluster_count: 10,
        ..ClusterConfig::default()
    };
    let clusters = find_clusters(&points, &config);

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].center, Point3::ORIGIN);
}

#[test]
fn test_members_within_merge_distance_of_seed() {
    let points: Vec<_> = (0..30)
        .map(|i| (Point3::new(i as f64 * 0.37, (i % 4) as f64 * 0.5, 0.0), i))
        .collect();
    let config = ClusterConfig {
        cluster_count: 50,
        ..ClusterConfig::default()
    };
    let clusters = find_clusters(&points, &config);

    let mut seen: Vec<_> = clusters.iter().flat_map(|c| c.members.clone()).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..30).collect::<Vec<_>>());

    for cluster in &clusters {
        for &member in &cluster.members {
            assert!(cluster.seed.distance(&points[member].0) <= config.merge_distance);
        }
    }
}

#[test]
fn test_palette_from_clusters() {
    let config = ClusterConfig::default();
    let clusters = find_clusters(&two_groups(), &config);
    let palette = ClusterPalette::from_clusters(&clusters, &config);

    let near_second = palette.color_for(&Point3::new(10.15, 0.0, 0.0)).unwrap();
    assert_eq!(near_second.hue, 0.5);
    assert!((near_second.value - 1.0).abs() < 1e-9);

    let (index, _) = palette.nearest(&Point3::new(1.0, 0.0, 0.0)).unwrap();
    assert_eq!(index, 0);
}

#[test]
fn test_negative_merge_distance_merges_nothing() {
    let points = vec![
        (Point3::new(0.0, 0.0, 0.0), 0),
        (Point3::new(0.5, 0.0, 0.0), 1),
    ];
    let config = ClusterConfig {
        neighborhood_radius: -1.0,
        merge_distance: -1.0,
        ..ClusterConfig::default()
    };
    let clusters = find_clusters(&points, &config);

    let members: Vec<_> = clusters.iter().map(|c| c.members.clone()).collect();
    assert_eq!(members, vec![vec![0], vec![1]]);
}

#[test]
fn test_non_finite_points_are_skipped() {
    let points = vec![
        (Point3::new(f64::NAN, 0.0, 0.0), 0),
        (Point3::new(0.0, 0.0, 0.0), 1),
        (Point3::new(f64::INFINITY, 0.0, 0.0), 2),
    ];
    let clusters = find_clusters(&points, &ClusterConfig::default());

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].members, vec![1]);
    assert!(clusters[0].center.is_finite());
}
