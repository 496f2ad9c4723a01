//! Result types for contour tiling.

use contour_types::{Contour, Face, Point3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether a tiling connected every vertex of both contours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TilingStatus {
    /// Every correspondence step was taken.
    #[default]
    Complete,
    /// The walk stopped early; the faces produced so far are kept.
    Partial {
        /// Steps taken before stopping.
        completed_steps: usize,
        /// Steps a complete walk would take (`N_A + N_B`).
        expected_steps: usize,
    },
}

/// Faces connecting two contours.
///
/// Face indices use the combined numbering of the caller's stored points:
/// contour A occupies `[0, count_a)` and contour B occupies
/// `[count_a, count_a + count_b)`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tiling {
    /// Triangles of the tiled surface.
    pub faces: Vec<Face>,

    /// Completion status.
    pub status: TilingStatus,

    /// Total path weight (sum of triangle perimeters) for optimal tilings.
    pub cost: Option<f64>,

    /// Stored point count of contour A (the offset of B's indices).
    pub count_a: usize,

    /// Stored point count of contour B.
    pub count_b: usize,

    /// Effective vertex count of contour A.
    pub loop_a: usize,

    /// Effective vertex count of contour B.
    pub loop_b: usize,
}

impl Tiling {
    /// Check whether every correspondence step was taken.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self.status, TilingStatus::Complete)
    }

    /// Number of triangles.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Size of the combined vertex numbering.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.count_a + self.count_b
    }

    /// Flags for each combined index telling whether any face references it.
    #[must_use]
    pub fn vertex_coverage(&self) -> Vec<bool> {
        let mut used = vec![false; self.vertex_count()];
        for face in &self.faces {
            for &v in face {
                if let Some(flag) = used.get_mut(v) {
                    *flag = true;
                }
            }
        }
        used
    }

    /// Check that every effective vertex of both contours is referenced.
    ///
    /// A duplicated closing point is never referenced and is not required.
    #[must_use]
    pub fn covers_all_vertices(&self) -> bool {
        let used = self.vertex_coverage();
        let a_covered = used.iter().take(self.loop_a).all(|u| *u);
        let b_covered = used
            .iter()
            .skip(self.count_a)
            .take(self.loop_b)
            .all(|u| *u);
        a_covered && b_covered
    }

    /// Map B-side indices produced against a reversed copy of B back onto
    /// B's original order.
    ///
    /// Every index `v >= count_a` becomes `count_a + (loop_b - 1) - (v - count_a)`.
    #[must_use]
    pub fn remap_reversed_b(mut self) -> Self {
        let offset = self.count_a;
        let last = self.loop_b.saturating_sub(1);
        for face in &mut self.faces {
            for v in face.iter_mut() {
                if *v >= offset {
                    *v = offset + last - (*v - offset);
                }
            }
        }
        self
    }

    /// Sum of the perimeters of all faces, measured on the given contours.
    ///
    /// For a complete optimal tiling of contours with at least two vertices
    /// each, this equals [`Tiling::cost`].
    #[must_use]
    pub fn perimeter_cost(&self, a: &Contour, b: &Contour) -> f64 {
        let surface = self.assemble(a, b);
        surface
            .triangles()
            .map(|[p, q, r]| (q - p).norm() + (r - q).norm() + (p - r).norm())
            .sum()
    }

    /// Concatenate the contours' points and attach the faces.
    ///
    /// `a` and `b` must be the contours this tiling was computed from.
    #[must_use]
    pub fn assemble(&self, a: &Contour, b: &Contour) -> TiledSurface {
        let mut vertices = Vec::with_capacity(a.len() + b.len());
        vertices.extend_from_slice(a.points());
        vertices.extend_from_slice(b.points());
        TiledSurface {
            vertices,
            faces: self.faces.clone(),
        }
    }
}

impl std::fmt::Display for Tiling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tiling: {} faces between {} and {} vertices",
            self.faces.len(),
            self.loop_a,
            self.loop_b
        )?;
        if let Some(cost) = self.cost {
            write!(f, " (cost {cost:.3})")?;
        }
        if let TilingStatus::Partial {
            completed_steps,
            expected_steps,
        } = self.status
        {
            write!(f, " [partial: {completed_steps}/{expected_steps} steps]")?;
        }
        Ok(())
    }
}

/// A triangle surface patch: contour A's points, then contour B's points.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TiledSurface {
    /// Vertex positions in combined numbering.
    pub vertices: Vec<Point3<f64>>,
    /// Triangles.
    pub faces: Vec<Face>,
}

impl TiledSurface {
    /// Number of triangles.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Iterate over triangles as vertex positions, skipping out-of-range faces.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.faces.iter().filter_map(|&[i, j, k]| {
            Some([
                *self.vertices.get(i)?,
                *self.vertices.get(j)?,
                *self.vertices.get(k)?,
            ])
        })
    }

    /// Total surface area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles()
            .map(|[p, q, r]| 0.5 * (q - p).cross(&(r - p)).norm())
            .sum()
    }
}
