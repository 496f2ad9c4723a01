//! Winding normalization for contour pairs.
//!
//! Tiling assumes both contours wind the same way about their normals. When
//! they disagree, contour B is replaced by a reversed copy, the pair is tiled,
//! and the B-side face indices are mapped back onto B's original order so the
//! caller never sees the reversal.

use contour_types::{Contour, Vector3};
use tracing::warn;

use crate::error::{ContourSide, TileError, TileResult};
use crate::result::Tiling;

/// Unit normals used for a contour pair after normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairNormals {
    /// Normal of contour A.
    pub a: Vector3<f64>,
    /// Normal of contour B.
    pub b: Vector3<f64>,
}

/// What must happen before two contours can be tiled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrientationPlan {
    /// The contours agree; tile them as given with these normals.
    Consistent(PairNormals),
    /// Contour B winds the other way; tile against a reversed copy of B.
    ReverseB,
}

/// Estimate a contour's normal, substituting `fallback` when the contour has
/// fewer than 3 vertices or no enclosed area.
#[must_use]
pub fn normal_or(contour: &Contour, fallback: &Vector3<f64>) -> Vector3<f64> {
    contour.estimate_planar_normal().unwrap_or(*fallback)
}

/// Decide how to reconcile the windings of `a` and `b`.
///
/// A single-vertex contour has no winding and adopts the other contour's
/// normal instead of forcing a reversal.
#[must_use]
pub fn plan_orientation(a: &Contour, b: &Contour, fallback: &Vector3<f64>) -> OrientationPlan {
    let normal_a = normal_or(a, fallback);
    let normal_b = normal_or(b, fallback);

    if normal_a.dot(&normal_b) > 0.0 {
        return OrientationPlan::Consistent(PairNormals {
            a: normal_a,
            b: normal_b,
        });
    }

    match (a.effective_len() == 1, b.effective_len() == 1) {
        (true, false) => OrientationPlan::Consistent(PairNormals {
            a: normal_b,
            b: normal_b,
        }),
        (false, true) => OrientationPlan::Consistent(PairNormals {
            a: normal_a,
            b: normal_a,
        }),
        _ => OrientationPlan::ReverseB,
    }
}

/// Reject empty contours before any tiling work.
pub(crate) fn ensure_non_empty(a: &Contour, b: &Contour) -> TileResult<()> {
    if a.is_empty() {
        return Err(TileError::EmptyContour {
            side: ContourSide::A,
        });
    }
    if b.is_empty() {
        return Err(TileError::EmptyContour {
            side: ContourSide::B,
        });
    }
    Ok(())
}

/// Run `tile` on a consistently oriented version of the pair.
///
/// `tile` receives contours by reference and must report indices relative to
/// the contours it was given. When B had to be reversed, the reversed copy is
/// an owned value local to this call and the returned faces are remapped onto
/// the caller's B. B is reversed at most once.
pub(crate) fn with_consistent_orientation<F>(
    a: &Contour,
    b: &Contour,
    fallback: &Vector3<f64>,
    tile: F,
) -> TileResult<Tiling>
where
    F: FnOnce(&Contour, &Contour, PairNormals) -> TileResult<Tiling>,
{
    match plan_orientation(a, b, fallback) {
        OrientationPlan::Consistent(normals) => tile(a, b, normals),
        OrientationPlan::ReverseB => {
            warn!(
                count_a = a.len(),
                count_b = b.len(),
                "Adjacent contours have opposite orientations; tiling against reversed copy"
            );
            let flipped = b.reversed_loop();
            let normals = match plan_orientation(a, &flipped, fallback) {
                OrientationPlan::Consistent(normals) => normals,
                // Perpendicular planes: no second reversal
                OrientationPlan::ReverseB => PairNormals {
                    a: normal_or(a, fallback),
                    b: normal_or(&flipped, fallback),
                },
            };

            let mut tiling = tile(a, &flipped, normals)?.remap_reversed_b();
            tiling.count_b = b.len();
            Ok(tiling)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_types::Point3;

    fn triangle(z: f64) -> Contour {
        Contour::new(vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(0.0, 1.0, z),
        ])
    }

    #[test]
    fn test_consistent_pair() {
        let plan = plan_orientation(&triangle(0.0), &triangle(1.0), &Vector3::z());
        assert!(matches!(plan, OrientationPlan::Consistent(_)));
    }

    #[test]
    fn test_opposite_pair_reverses_b() {
        let plan = plan_orientation(&triangle(0.0), &triangle(1.0).reversed(), &Vector3::z());
        assert_eq!(plan, OrientationPlan::ReverseB);
    }

    #[test]
    fn test_single_vertex_adopts_other_normal() {
        let point = Contour::new(vec![Point3::new(0.3, 0.3, 1.0)]);
        let cw = triangle(0.0).reversed();

        match plan_orientation(&cw, &point, &Vector3::z()) {
            OrientationPlan::Consistent(normals) => {
                assert!((normals.a.z + 1.0).abs() < 1e-12);
                assert!((normals.b.z + 1.0).abs() < 1e-12);
            }
            OrientationPlan::ReverseB => panic!("single vertex must not be reversed"),
        }

        match plan_orientation(&point, &cw, &Vector3::z()) {
            OrientationPlan::Consistent(normals) => assert!((normals.a.z + 1.0).abs() < 1e-12),
            OrientationPlan::ReverseB => panic!("single vertex must not be reversed"),
        }
    }

    #[test]
    fn test_fallback_for_degenerate_contours() {
        let pair = Contour::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        let n = normal_or(&pair, &Vector3::y());
        assert!((n.y - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_contours_rejected() {
        let empty = Contour::new(Vec::new());
        assert_eq!(
            ensure_non_empty(&empty, &triangle(0.0)),
            Err(TileError::EmptyContour {
                side: ContourSide::A
            })
        );
        assert_eq!(
            ensure_non_empty(&triangle(0.0), &empty),
            Err(TileError::EmptyContour {
                side: ContourSide::B
            })
        );
    }

    #[test]
    fn test_reversal_is_remapped() {
        let a = triangle(0.0);
        let b = triangle(1.0).reversed();

        let tiling = with_consistent_orientation(&a, &b, &Vector3::z(), |_, flipped, normals| {
            // The closure sees B in A's winding
            assert!(normals.a.dot(&normals.b) > 0.0);
            assert_eq!(flipped.points()[0], b.points()[2]);
            Ok(Tiling {
                faces: vec![[0, 1, 3]],
                count_a: 3,
                count_b: 3,
                loop_a: 3,
                loop_b: 3,
                ..Tiling::default()
            })
        })
        .unwrap();

        // Index 3 (flipped[0]) is b[2] in the caller's numbering
        assert_eq!(tiling.faces, vec![[0, 1, 5]]);
        assert_eq!(tiling.count_b, 3);
    }
}
