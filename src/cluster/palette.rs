//! Coloring by proximity to cluster centers.
//!
//! Every cluster gets its own hue, evenly spaced around the color wheel.
//! A point takes the hue of its nearest center; its value falls off
//! linearly with the distance to that center, down to a floor.

use crate::cluster::{Cluster, ClusterConfig};
use crate::model::Point3;
use serde::{Deserialize, Serialize};

/// A color in HSV space, all components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

impl Hsv {
    /// Converts to RGB, components in `[0, 1]`.
    pub fn to_rgb(&self) -> [f64; 3] {
        let h = (self.hue.rem_euclid(1.0)) * 6.0;
        let c = self.value * self.saturation;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = self.value - c;

        let (r, g, b) = match h as u8 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        [r + m, g + m, b + m]
    }
}

/// Maps positions to colors based on a set of cluster centers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterPalette {
    centers: Vec<Point3>,
    falloff_distance: f64,
    min_value: f64,
}

impl ClusterPalette {
    /// Creates a palette for the given centers.
    ///
    /// # Arguments
    /// * `centers` - Cluster centers; hue `i / n` is assigned to center `i`
    /// * `falloff_distance` - Distance at which the value reaches `min_value`
    /// * `min_value` - Value floor, clamped to `[0, 1]`
    pub fn new(centers: Vec<Point3>, falloff_distance: f64, min_value: f64) -> Self {
        ClusterPalette {
            centers,
            falloff_distance,
            min_value: min_value.clamp(0.0, 1.0),
        }
    }

    /// Creates a palette from found clusters and the falloff settings in `config`.
    pub fn from_clusters<L>(clusters: &[Cluster<L>], config: &ClusterConfig) -> Self {
        Self::new(
            clusters.iter().map(|cluster| cluster.center).collect(),
            config.falloff_distance,
            config.min_value,
        )
    }

    /// Returns the hue of cluster `index`.
    pub fn hue(&self, index: usize) -> f64 {
        if self.centers.is_empty() {
            return 0.0;
        }
        index as f64 / self.centers.len() as f64
    }

    /// Returns the index of and distance to the center nearest to `point`,
    /// or `None` if the palette has no centers.
    pub fn nearest(&self, point: &Point3) -> Option<(usize, f64)> {
        self.centers
            .iter()
            .map(|center| center.distance(point))
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    /// Returns the color for `point`, or `None` if the palette has no centers.
    pub fn color_for(&self, point: &Point3) -> Option<Hsv> {
        let (index, distance) = self.nearest(point)?;
        let value = if self.falloff_distance > 0.0 {
            let fraction = (distance / self.falloff_distance).min(1.0);
            1.0 - fraction * (1.0 - self.min_value)
        } else {
            1.0
        };

        Some(Hsv {
            hue: self.hue(index),
            saturation: 1.0,
            value,
        })
    }
}
