//! Entry point for tiling a pair of contours.

use contour_types::Contour;
use tracing::info;

use crate::error::TileResult;
use crate::greedy::tile_greedy;
use crate::optimal::tile_optimal;
use crate::params::{TileParams, TilingMethod};
use crate::result::Tiling;

/// Tile two contours on adjacent slices with the configured method.
///
/// Face indices refer to A's stored points followed by B's stored points.
/// If the contours wind in opposite directions the result still refers to
/// the caller's original vertex order.
///
/// # Errors
///
/// Returns [`crate::TileError::EmptyContour`] if either contour has no
/// points; see [`tile_optimal`] and [`tile_greedy`] for method-specific
/// errors.
///
/// # Example
///
/// ```
/// use mesh_from_contours::{Contour, Point3, TileParams, tile_contours};
///
/// let square = |z: f64| {
///     Contour::new(vec![
///         Point3::new(0.0, 0.0, z),
///         Point3::new(1.0, 0.0, z),
///         Point3::new(1.0, 1.0, z),
///         Point3::new(0.0, 1.0, z),
///     ])
/// };
///
/// let tiling = tile_contours(&square(0.0), &square(1.0), &TileParams::default()).unwrap();
/// assert_eq!(tiling.face_count(), 8);
/// assert!(tiling.covers_all_vertices());
/// ```
pub fn tile_contours(a: &Contour, b: &Contour, params: &TileParams) -> TileResult<Tiling> {
    info!(
        count_a = a.len(),
        count_b = b.len(),
        method = ?params.method,
        "Tiling contour pair"
    );

    let tiling = match params.method {
        TilingMethod::Optimal => tile_optimal(a, b, params)?,
        TilingMethod::Greedy => tile_greedy(a, b, params)?,
    };

    info!(faces = tiling.face_count(), complete = tiling.is_complete(), "Tiling complete");
    Ok(tiling)
}
