//! Tiling and amalgamation parameters.

use contour_types::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Correspondence strategy used to connect two contours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TilingMethod {
    /// Minimum total triangle perimeter via graph search.
    ///
    /// Super-linear in time and needs an `O(m·n)` distance table.
    #[default]
    Optimal,
    /// Single linear pass using local edge heuristics.
    Greedy,
}

/// Parameters for tiling two contours.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TileParams {
    /// Correspondence strategy.
    pub method: TilingMethod,

    /// Normal assumed for contours whose plane cannot be estimated
    /// (fewer than 3 vertices, collinear points).
    pub fallback_normal: Vector3<f64>,
}

impl Default for TileParams {
    fn default() -> Self {
        Self {
            method: TilingMethod::Optimal,
            fallback_normal: Vector3::z(),
        }
    }
}

impl TileParams {
    /// Parameters for the optimal graph-search tiling.
    #[must_use]
    pub fn optimal() -> Self {
        Self::default()
    }

    /// Parameters for the linear-time greedy tiling.
    ///
    /// Prefer this for large contours when latency matters.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            method: TilingMethod::Greedy,
            ..Self::default()
        }
    }

    /// Set the correspondence strategy.
    #[must_use]
    pub const fn with_method(mut self, method: TilingMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the fallback normal.
    #[must_use]
    pub const fn with_fallback_normal(mut self, normal: Vector3<f64>) -> Self {
        self.fallback_normal = normal;
        self
    }
}

/// Parameters for merging several contours on one slice into a single loop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AmalgamateParams {
    /// Reference orientation every input contour is made to agree with.
    pub ortho_unit: Vector3<f64>,

    /// Displacement applied to each synthetic bridge vertex.
    ///
    /// Typically a small step along the slice normal so that re-slicing the
    /// tiled surface on the original plane recovers the original contours.
    pub pseudo_vertex_offset: Vector3<f64>,

    /// Edges shorter than this are never used as bridge sites.
    pub min_edge_length: f64,
}

impl Default for AmalgamateParams {
    fn default() -> Self {
        Self {
            ortho_unit: Vector3::z(),
            pseudo_vertex_offset: Vector3::zeros(),
            min_edge_length: (10.0 * f64::EPSILON).sqrt(),
        }
    }
}

impl AmalgamateParams {
    /// Create parameters from a reference orientation and pseudo-vertex offset.
    #[must_use]
    pub fn new(ortho_unit: Vector3<f64>, pseudo_vertex_offset: Vector3<f64>) -> Self {
        Self {
            ortho_unit,
            pseudo_vertex_offset,
            ..Self::default()
        }
    }

    /// Set the minimum bridgeable edge length.
    #[must_use]
    pub const fn with_min_edge_length(mut self, length: f64) -> Self {
        self.min_edge_length = length;
        self
    }
}

/// Parameters for tiling several contours against one (branching anatomy).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BranchParams {
    /// How the merged loop is tiled against the target.
    pub tile: TileParams,
    /// How the source contours are merged.
    pub amalgamate: AmalgamateParams,
}

impl BranchParams {
    /// Set the tiling parameters.
    #[must_use]
    pub fn with_tile(mut self, tile: TileParams) -> Self {
        self.tile = tile;
        self
    }

    /// Set the amalgamation parameters.
    #[must_use]
    pub fn with_amalgamate(mut self, amalgamate: AmalgamateParams) -> Self {
        self.amalgamate = amalgamate;
        self
    }
}
