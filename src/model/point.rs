//! Points in 3D space and the remap from source to scene coordinates.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Default divisor converting source coordinates (nanometres) to scene units.
pub const DEFAULT_COORDINATE_SCALE: f64 = 10_000.0;

// =#========================================================================#=
// POINT
// =#========================================================================#=
/// A position (or offset) in 3D scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The origin.
    pub const ORIGIN: Point3 = Point3 { x: 0.0, y: 0.0, z: 0.0 };

    /// Creates a new point.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    /// Converts raw source coordinates into scene coordinates.
    ///
    /// The second and third source axes are swapped, the source y axis is
    /// sign-inverted, and every coordinate is divided by `scale`:
    /// `(x, y, z) -> (x / scale, z / scale, -y / scale)`.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Coordinates as delivered by the data source
    /// * `scale` - Divisor, see [DEFAULT_COORDINATE_SCALE]
    ///
    /// # Example
    /// ```
    /// use neuroskel::model::Point3;
    ///
    /// let p = Point3::from_raw(10_000.0, 20_000.0, 30_000.0, 10_000.0);
    /// assert_eq!(p, Point3::new(1.0, 3.0, -2.0));
    /// ```
    pub fn from_raw(x: f64, y: f64, z: f64, scale: f64) -> Self {
        Point3 {
            x: x / scale,
            y: z / scale,
            z: -y / scale,
        }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point3) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared euclidean distance to `other`.
    pub fn distance_squared(&self, other: &Point3) -> f64 {
        let d = *self - *other;
        d.x * d.x + d.y * d.y + d.z * d.z
    }

    /// Returns `true` if no coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Returns coordinates as array `[x, y, z]`.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Point3 { x, y, z }
    }
}

impl Add for Point3 {
    type Output = Point3;
    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;
    fn mul(self, rhs: f64) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f64> for Point3 {
    type Output = Point3;
    fn div(self, rhs: f64) -> Point3 {
        Point3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}
