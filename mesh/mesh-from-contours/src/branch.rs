//! Tiling several contours on one slice against a single contour on the next.

use contour_types::Contour;
use tracing::info;

use crate::amalgamate::{Amalgamation, amalgamate_contours};
use crate::error::TileResult;
use crate::params::BranchParams;
use crate::result::{TiledSurface, Tiling};
use crate::tile::tile_contours;

/// Result of tiling a branching structure.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchTiling {
    /// The merged source loop.
    pub merged: Amalgamation,
    /// Faces between the merged loop (indices first) and the target.
    pub tiling: Tiling,
}

impl BranchTiling {
    /// Build the surface patch; `target` must be the contour that was tiled.
    ///
    /// Pseudo-vertices of the merged loop appear as ordinary vertices.
    #[must_use]
    pub fn assemble(&self, target: &Contour) -> TiledSurface {
        self.tiling.assemble(&self.merged.contour, target)
    }
}

/// Merge `sources` into one loop and tile it against `target`.
///
/// # Errors
///
/// Returns any error from [`amalgamate_contours`] or [`tile_contours`].
pub fn tile_branching(
    sources: &[Contour],
    target: &Contour,
    params: &BranchParams,
) -> TileResult<BranchTiling> {
    let merged = amalgamate_contours(sources, &params.amalgamate)?;
    info!(
        sources = sources.len(),
        bridges = merged.bridges.len(),
        merged_vertices = merged.contour.len(),
        "Merged branch contours"
    );

    let tiling = tile_contours(&merged.contour, target, &params.tile)?;
    Ok(BranchTiling { merged, tiling })
}
