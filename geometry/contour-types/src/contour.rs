//! Contours: ordered point sequences lying (approximately) in a plane.

// Vertex counts don't overflow f64 mantissas in practice
#![allow(clippy::cast_precision_loss)]

use hashbrown::HashMap;
use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ContourError, ContourResult};
use crate::plane::Plane;

/// Origin of a contour vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VertexKind {
    /// A measured vertex supplied by the caller.
    #[default]
    Original,
    /// A synthetic vertex inserted to bridge two separate contours.
    ///
    /// Edges touching a pseudo-vertex are never used as bridge sites.
    Pseudo,
}

/// Index following `index` in a cycle of `len` vertices.
///
/// Returns 0 when `len` is 0.
#[must_use]
pub const fn cyclic_next(index: usize, len: usize) -> usize {
    if index + 1 >= len { 0 } else { index + 1 }
}

/// Index preceding `index` in a cycle of `len` vertices.
///
/// Returns 0 when `len` is 0.
#[must_use]
pub const fn cyclic_prev(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else if index == 0 || index > len {
        len - 1
    } else {
        index - 1
    }
}

/// An ordered sequence of points with string-keyed metadata.
///
/// Every point carries a [`VertexKind`]; contours built from caller data
/// contain only [`VertexKind::Original`] vertices.
///
/// # Example
///
/// ```
/// use contour_types::{Contour, Point3};
///
/// let tri = Contour::new(vec![
///     Point3::new(0.0, 0.0, 1.0),
///     Point3::new(1.0, 0.0, 1.0),
///     Point3::new(0.0, 1.0, 1.0),
/// ])
/// .with_metadata("ROIName", "Body");
///
/// assert_eq!(tri.len(), 3);
/// assert_eq!(tri.metadata("ROIName"), Some("Body"));
/// assert!(!tri.has_explicit_closure());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Contour {
    points: Vec<Point3<f64>>,
    kinds: Vec<VertexKind>,
    /// Whether the last vertex connects back to the first.
    pub closed: bool,
    /// Free-form annotations (structure name, slice position, ...).
    pub metadata: HashMap<String, String>,
}

impl Contour {
    /// Create a closed contour from caller points.
    #[must_use]
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        let kinds = vec![VertexKind::Original; points.len()];
        Self {
            points,
            kinds,
            closed: true,
            metadata: HashMap::new(),
        }
    }

    /// Create an open contour (a chain) from caller points.
    #[must_use]
    pub fn open(points: Vec<Point3<f64>>) -> Self {
        Self {
            closed: false,
            ..Self::new(points)
        }
    }

    /// Create a contour from tagged vertices.
    #[must_use]
    pub fn from_vertices(vertices: Vec<(Point3<f64>, VertexKind)>, closed: bool) -> Self {
        let (points, kinds) = vertices.into_iter().unzip();
        Self {
            points,
            kinds,
            closed,
            metadata: HashMap::new(),
        }
    }

    /// Attach a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Look up a metadata entry.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Stored points, including a duplicated closing point if present.
    #[must_use]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Stored points paired with their kinds.
    pub fn vertices(&self) -> impl Iterator<Item = (Point3<f64>, VertexKind)> + '_ {
        self.points.iter().copied().zip(self.kinds.iter().copied())
    }

    /// Kind of the vertex at `index`.
    #[must_use]
    pub fn kind(&self, index: usize) -> Option<VertexKind> {
        self.kinds.get(index).copied()
    }

    /// Check whether the vertex at `index` is a synthetic bridge vertex.
    #[must_use]
    pub fn is_pseudo(&self, index: usize) -> bool {
        self.kind(index) == Some(VertexKind::Pseudo)
    }

    /// Number of synthetic bridge vertices.
    #[must_use]
    pub fn pseudo_count(&self) -> usize {
        self.kinds.iter().filter(|k| **k == VertexKind::Pseudo).count()
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the contour has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check whether the first point is stored again at the end.
    #[must_use]
    pub fn has_explicit_closure(&self) -> bool {
        self.points.len() >= 2 && self.points.first() == self.points.last()
    }

    /// Number of distinct loop vertices (excludes a duplicated closing point).
    #[must_use]
    pub fn effective_len(&self) -> usize {
        if self.has_explicit_closure() {
            self.points.len() - 1
        } else {
            self.points.len()
        }
    }

    /// The distinct loop vertices.
    #[must_use]
    pub fn effective_points(&self) -> &[Point3<f64>] {
        &self.points[..self.effective_len()]
    }

    /// Iterate over the loop's edges as `(previous, current)` index pairs.
    ///
    /// The first pair is the closing edge `(n - 1, 0)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.effective_len();
        (0..n).map(move |i| (cyclic_prev(i, n), i))
    }

    /// Check that every coordinate is finite.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::NonFinitePoint`] for the first offending point.
    pub fn check_finite(&self) -> ContourResult<()> {
        match self.points.iter().position(|p| !p.coords.iter().all(|c| c.is_finite())) {
            Some(index) => Err(ContourError::NonFinitePoint { index }),
            None => Ok(()),
        }
    }

    /// Twice the vector area of the loop (Newell's method).
    fn newell_vector(&self) -> Vector3<f64> {
        let pts = self.effective_points();
        let n = pts.len();
        let mut acc = Vector3::zeros();
        for i in 0..n {
            let p = pts[i];
            let q = pts[cyclic_next(i, n)];
            acc.x += (p.y - q.y) * (p.z + q.z);
            acc.y += (p.z - q.z) * (p.x + q.x);
            acc.z += (p.x - q.x) * (p.y + q.y);
        }
        acc
    }

    /// Estimate the unit normal of the contour's plane.
    ///
    /// The direction follows the winding: counter-clockwise loops (seen from
    /// the tip of the normal) produce the normal.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::InsufficientPoints`] with fewer than 3 effective
    /// vertices and [`ContourError::DegenerateNormal`] when the loop encloses
    /// no area.
    pub fn estimate_planar_normal(&self) -> ContourResult<Vector3<f64>> {
        let n = self.effective_len();
        if n < 3 {
            return Err(ContourError::insufficient_points(3, n));
        }
        self.check_finite()?;

        let newell = self.newell_vector();
        let norm = newell.norm();
        if !norm.is_finite() || norm < 1e-12 {
            return Err(ContourError::DegenerateNormal);
        }
        Ok(newell / norm)
    }

    /// Least-squares plane through the effective vertices.
    ///
    /// The normal is the covariance eigenvector with the smallest eigenvalue,
    /// flipped if needed so it agrees with `hint`.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::InsufficientPoints`] with fewer than 3 effective
    /// vertices.
    pub fn best_fit_plane(&self, hint: &Vector3<f64>) -> ContourResult<Plane> {
        let pts = self.effective_points();
        if pts.len() < 3 {
            return Err(ContourError::insufficient_points(3, pts.len()));
        }
        self.check_finite()?;

        let centroid = self.average_point()?;
        let mut cov = Matrix3::zeros();
        for p in pts {
            let d = p - centroid;
            cov += d * d.transpose();
        }

        let eigen = SymmetricEigen::new(cov);
        let min_idx = eigen.eigenvalues.imin();
        let column = eigen.eigenvectors.column(min_idx);
        let mut normal = Vector3::new(column[0], column[1], column[2]);
        if normal.dot(hint) < 0.0 {
            normal = -normal;
        }
        Ok(Plane::new(centroid, normal))
    }

    /// Signed area of the loop measured along `normal` (assumed unit length).
    ///
    /// Positive when the loop winds counter-clockwise about `normal`. Zero
    /// for fewer than 3 effective vertices.
    #[must_use]
    pub fn signed_area(&self, normal: &Vector3<f64>) -> f64 {
        if self.effective_len() < 3 {
            return 0.0;
        }
        0.5 * self.newell_vector().dot(normal)
    }

    /// Unsigned area of a planar loop.
    #[must_use]
    pub fn area(&self) -> f64 {
        if self.effective_len() < 3 {
            return 0.0;
        }
        0.5 * self.newell_vector().norm()
    }

    /// Arithmetic mean of the effective vertices.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::InsufficientPoints`] for an empty contour.
    pub fn average_point(&self) -> ContourResult<Point3<f64>> {
        let pts = self.effective_points();
        if pts.is_empty() {
            return Err(ContourError::insufficient_points(1, 0));
        }
        let sum: Vector3<f64> = pts.iter().map(|p| p.coords).sum();
        Ok(Point3::from(sum / pts.len() as f64))
    }

    /// Area-weighted centroid of the enclosed region.
    ///
    /// Falls back to [`Contour::average_point`] when the loop encloses no area.
    ///
    /// # Errors
    ///
    /// Returns [`ContourError::InsufficientPoints`] for an empty contour.
    pub fn centroid(&self) -> ContourResult<Point3<f64>> {
        let average = self.average_point()?;
        let pts = self.effective_points();
        let newell = self.newell_vector();
        let Some(normal) = newell.try_normalize(1e-12) else {
            return Ok(average);
        };

        // Fan about the average point so that non-convex loops weigh correctly
        let mut weighted = Vector3::zeros();
        let mut total = 0.0;
        let n = pts.len();
        for i in 0..n {
            let p = pts[i];
            let q = pts[cyclic_next(i, n)];
            let w = 0.5 * (p - average).cross(&(q - average)).dot(&normal);
            weighted += (average.coords + p.coords + q.coords) * w;
            total += w;
        }

        if !total.is_finite() || total.abs() < 1e-12 {
            return Ok(average);
        }
        Ok(Point3::from(weighted / (3.0 * total)))
    }

    /// Total edge length, including the closing edge for closed contours.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        let pts = self.effective_points();
        let chain: f64 = pts.windows(2).map(|w| (w[1] - w[0]).norm()).sum();
        match (self.closed, pts.first(), pts.last()) {
            (true, Some(first), Some(last)) if pts.len() > 2 => chain + (first - last).norm(),
            _ => chain,
        }
    }

    /// A copy with the point order (and vertex kinds) reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut out = self.clone();
        out.points.reverse();
        out.kinds.reverse();
        out
    }

    /// A copy holding only the effective vertices in reverse order.
    ///
    /// Unlike [`Contour::reversed`], a duplicated closing point is dropped so
    /// that stored index `i` of the result is effective index `n - 1 - i` of
    /// the original.
    #[must_use]
    pub fn reversed_loop(&self) -> Self {
        let n = self.effective_len();
        let mut out = self.clone();
        out.points.truncate(n);
        out.kinds.truncate(n);
        out.points.reverse();
        out.kinds.reverse();
        out
    }

    /// A copy with every point scaled about `center` by `factor`.
    #[must_use]
    pub fn scaled_about(&self, center: &Point3<f64>, factor: f64) -> Self {
        let mut out = self.clone();
        for p in &mut out.points {
            *p = center + (*p - center) * factor;
        }
        out
    }

    /// A copy with every point shifted by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3<f64>) -> Self {
        let mut out = self.clone();
        for p in &mut out.points {
            *p += offset;
        }
        out
    }
}
