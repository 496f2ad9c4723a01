//! Planes for orthogonal projection.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An oriented plane through `origin` with unit `normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Plane {
    /// A point on the plane.
    pub origin: Point3<f64>,
    /// Unit normal.
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a plane, normalizing `normal`.
    ///
    /// A zero-length normal falls back to +Z.
    #[must_use]
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        let normal = normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
        Self { origin, normal }
    }

    /// Signed distance from the plane, positive on the normal side.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.origin).dot(&self.normal)
    }

    /// Project a point orthogonally onto the plane.
    #[must_use]
    pub fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        point - self.normal * self.signed_distance(point)
    }
}
