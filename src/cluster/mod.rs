//! Greedy spatial clustering of cell-body positions.
//!
//! Used to group somata of imported skeletons for coloring
//! (see [ClusterPalette]). The algorithm is single-linkage and greedy,
//! not globally optimal:
//! 1. Each point gets a density score: the number of points within the
//!    neighborhood radius `r`, itself included.
//! 2. Points are ordered by density, highest first; ties keep input order.
//! 3. Up to `K` times, the densest remaining point becomes a seed. Every
//!    remaining point within merge distance `d` of the seed joins its
//!    cluster and is removed. The cluster center is the seed moved by the
//!    mean offset of its members, pulling sparse seeds toward their mass.

pub mod palette;

pub use palette::{ClusterPalette, Hsv};

use crate::model::Point3;
use serde::{Deserialize, Serialize};
use tracing::debug;

// =#========================================================================#=
// CLUSTER CONFIG
// =#========================================================================#=
/// Parameters of the cluster finder and the derived palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Radius `r` for the density score (scene units)
    pub neighborhood_radius: f64,
    /// Distance `d` within which points join a seed's cluster (scene units)
    pub merge_distance: f64,
    /// Target number of clusters `K`
    pub cluster_count: usize,
    /// Distance to the nearest center at which the palette reaches its
    /// minimal value (scene units)
    pub falloff_distance: f64,
    /// Minimal color value of the palette, in `[0, 1]`
    pub min_value: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        ClusterConfig {
            neighborhood_radius: 0.5,
            merge_distance: 1.0,
            cluster_count: 5,
            falloff_distance: 2.0,
            min_value: 0.2,
        }
    }
}

// =#========================================================================#=
// CLUSTER
// =#========================================================================#=
/// One cluster found by [find_clusters].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster<L> {
    /// Position of the seed point
    pub seed: Point3,
    /// Seed moved by the mean offset of all members
    pub center: Point3,
    /// Labels of all members (seed first, then in density order)
    pub members: Vec<L>,
    /// Density score of the seed
    pub density: usize,
}

/// Clusters labeled points, see the [module docs](self) for the algorithm.
///
/// # Arguments
/// * `points` - `(position, label)` pairs, e.g. soma positions with skeleton ids
/// * `config` - Radii and target count
///
/// # Returns
/// At most `min(K, points.len())` clusters, densest seed first.
/// Negative radii count as zero; points with non-finite coordinates never
/// seed or join a cluster.
///
/// # Example
/// ```
/// use neuroskel::cluster::{ClusterConfig, find_clusters};
/// use neuroskel::model::Point3;
///
/// let points = vec![
///     (Point3::new(0.0, 0.0, 0.0), "a"),
///     (Point3::new(0.1, 0.0, 0.0), "b"),
///     (Point3::new(9.0, 0.0, 0.0), "c"),
/// ];
/// let config = ClusterConfig { cluster_count: 2, ..ClusterConfig::default() };
///
/// let clusters = find_clusters(&points, &config);
/// assert_eq!(clusters.len(), 2);
/// assert_eq!(clusters[0].members, vec!["a", "b"]);
/// assert_eq!(clusters[1].members, vec!["c"]);
/// ```
pub fn find_clusters<L: Clone>(points: &[(Point3, L)], config: &ClusterConfig) -> Vec<Cluster<L>> {
    let radius = config.neighborhood_radius.max(0.0);
    let merge_distance = config.merge_distance.max(0.0);
    let radius_sq = radius * radius;
    let merge_sq = merge_distance * merge_distance;

    let densities: Vec<usize> = points
        .iter()
        .map(|(p, _)| {
            points
                .iter()
                .filter(|(q, _)| p.distance_squared(q) <= radius_sq)
                .count()
        })
        .collect();

    // Stable sort keeps input order among equal densities
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.sort_by(|&a, &b| densities[b].cmp(&densities[a]));

    let mut taken = vec![false; points.len()];
    let mut clusters = Vec::with_capacity(config.cluster_count.min(points.len()));

    for &seed_index in &order {
        if clusters.len() >= config.cluster_count {
            break;
        }
        if taken[seed_index] {
            continue;
        }

        let seed = points[seed_index].0;
        if !seed.is_finite() {
            continue;
        }
        let mut offset_sum = Point3::ORIGIN;
        let mut members = Vec::new();
        for &index in &order {
            let (position, label) = &points[index];
            if !taken[index] && seed.distance_squared(position) <= merge_sq {
                taken[index] = true;
                offset_sum = offset_sum + (*position - seed);
                members.push(label.clone());
            }
        }

        // Seed is always a member, so members is non-empty
        let center = seed + offset_sum / members.len() as f64;
        clusters.push(Cluster {
            seed,
            center,
            members,
            density: densities[seed_index],
        });
    }

    debug!(
        points = points.len(),
        clusters = clusters.len(),
        "Clustered positions"
    );

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let points: Vec<(Point3, u32)> = Vec::new();
        assert!(find_clusters(&points, &ClusterConfig::default()).is_empty());
    }

    #[test]
    fn test_center_moves_toward_mass() {
        let points = vec![
            (Point3::new(0.0, 0.0, 0.0), 0),
            (Point3::new(0.4, 0.0, 0.0), 1),
            (Point3::new(0.8, 0.0, 0.0), 2),
        ];
        let config = ClusterConfig {
            neighborhood_radius: 0.5,
            merge_distance: 1.0,
            cluster_count: 1,
            ..ClusterConfig::default()
        };
        let clusters = find_clusters(&points, &config);
        assert_eq!(clusters.len(), 1);

        // Middle point sees both neighbors and becomes seed
        assert_eq!(clusters[0].seed, Point3::new(0.4, 0.0, 0.0));
        assert_eq!(clusters[0].density, 3);
        assert_eq!(clusters[0].members, vec![1, 0, 2]);
        assert!((clusters[0].center.x - 0.4).abs() < 1e-12);
    }
}
