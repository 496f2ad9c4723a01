//! Linear-time greedy tiling.
//!
//! The walk starts from A's first vertex and the nearest B vertex, then takes
//! `N_A + N_B` steps. Each step advances along whichever contour yields the
//! better new cross edge, alternating between two criteria: on even steps the
//! shorter edge wins, on odd steps the edge most nearly parallel to the
//! contour normal wins.

use std::borrow::Cow;

use contour_types::{Contour, Face, Point3, Vector3, cyclic_next};
use tracing::{debug, warn};

use crate::error::{TileError, TileResult};
use crate::orient::{PairNormals, ensure_non_empty, with_consistent_orientation};
use crate::params::TileParams;
use crate::result::{Tiling, TilingStatus};

/// Position and progress of the walk along both contours.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WalkState {
    /// Current A vertex.
    a: usize,
    /// Current B vertex.
    b: usize,
    /// A edges consumed so far.
    consumed_a: usize,
    /// B edges consumed so far.
    consumed_b: usize,
    /// Length of A consumed so far.
    perimeter_a: f64,
    /// Length of B consumed so far.
    perimeter_b: f64,
}

impl WalkState {
    const fn start(b: usize) -> Self {
        Self {
            a: 0,
            b,
            consumed_a: 0,
            consumed_b: 0,
            perimeter_a: 0.0,
            perimeter_b: 0.0,
        }
    }

    const fn steps(&self) -> usize {
        self.consumed_a + self.consumed_b
    }
}

/// Which contour a step advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    AdvanceA,
    AdvanceB,
}

/// Contour points as seen by the walk.
struct Walk<'a> {
    a: &'a [Point3<f64>],
    b: &'a [Point3<f64>],
    normals: PairNormals,
    offset: usize,
}

impl Walk<'_> {
    /// Score a candidate cross edge; lower is better, non-finite is invalid.
    fn score(edge: Vector3<f64>, normal: &Vector3<f64>, even: bool) -> f64 {
        if even {
            edge.norm()
        } else {
            // A zero-length edge has no direction and scores NaN
            -(edge / edge.norm()).dot(normal).abs()
        }
    }

    fn score_a(&self, state: &WalkState) -> Option<f64> {
        if state.consumed_a >= self.a.len() {
            return None;
        }
        let next = cyclic_next(state.a, self.a.len());
        let edge = self.a[next] - self.b[state.b];
        Some(Self::score(edge, &self.normals.a, state.steps() % 2 == 0)).filter(|s| s.is_finite())
    }

    fn score_b(&self, state: &WalkState) -> Option<f64> {
        if state.consumed_b >= self.b.len() {
            return None;
        }
        let next = cyclic_next(state.b, self.b.len());
        let edge = self.b[next] - self.a[state.a];
        Some(Self::score(edge, &self.normals.b, state.steps() % 2 == 0)).filter(|s| s.is_finite())
    }

    /// Pick the next move. Equal scores advance B.
    fn choose(&self, state: &WalkState) -> Option<Move> {
        match (self.score_a(state), self.score_b(state)) {
            (None, None) => None,
            (Some(_), None) => Some(Move::AdvanceA),
            (None, Some(_)) => Some(Move::AdvanceB),
            (Some(sa), Some(sb)) if sa < sb => Some(Move::AdvanceA),
            (Some(_), Some(_)) => Some(Move::AdvanceB),
        }
    }

    /// Apply a move, returning the new state and the face it produces.
    ///
    /// Advancing along a single-vertex contour produces no face.
    fn apply(&self, state: WalkState, mv: Move) -> (WalkState, Option<Face>) {
        match mv {
            Move::AdvanceA => {
                let next = cyclic_next(state.a, self.a.len());
                let face = (self.a.len() > 1).then(|| [state.a, next, self.offset + state.b]);
                let advanced = WalkState {
                    a: next,
                    consumed_a: state.consumed_a + 1,
                    perimeter_a: state.perimeter_a + (self.a[next] - self.a[state.a]).norm(),
                    ..state
                };
                (advanced, face)
            }
            Move::AdvanceB => {
                let next = cyclic_next(state.b, self.b.len());
                let face = (self.b.len() > 1)
                    .then(|| [state.a, self.offset + next, self.offset + state.b]);
                let advanced = WalkState {
                    b: next,
                    consumed_b: state.consumed_b + 1,
                    perimeter_b: state.perimeter_b + (self.b[next] - self.b[state.b]).norm(),
                    ..state
                };
                (advanced, face)
            }
        }
    }
}

/// Index of the B vertex nearest to `target`; the first of equals wins.
fn nearest_vertex(points: &[Point3<f64>], target: &Point3<f64>) -> usize {
    let mut best = 0;
    let mut best_sq = f64::INFINITY;
    for (i, p) in points.iter().enumerate() {
        let sq = (p - target).norm_squared();
        if sq < best_sq {
            best = i;
            best_sq = sq;
        }
    }
    best
}

/// Rescale B to A's area and move its centroid onto A's, measured in A's
/// best-fit plane. Contours with fewer than 3 vertices are left alone.
fn align_to(a: &Contour, b: &Contour, normals: &PairNormals) -> TileResult<Contour> {
    let area_a = a.area();
    let area_b = b.area();
    let ratio = area_a / area_b;
    if !ratio.is_finite() {
        return Err(TileError::NonFiniteAreaRatio { ratio });
    }
    let scale = ratio.sqrt();

    let centroid_a = a.centroid()?;
    let centroid_b = b.centroid()?;
    let plane_a = a.best_fit_plane(&normals.a)?;
    let shift = plane_a.project(&centroid_a) - plane_a.project(&centroid_b);
    debug!(scale, shift = shift.norm(), "Aligned contour B to contour A");

    Ok(b.scaled_about(&centroid_b, scale).translated(&shift))
}

/// Tile two contours with a single greedy pass.
///
/// Produces `N_A + N_B` faces when the walk completes (fewer when a contour
/// has a single vertex). If the walk runs out of valid moves, the faces
/// produced so far are returned with [`TilingStatus::Partial`].
///
/// # Errors
///
/// Returns [`TileError::EmptyContour`] if either contour has no points and
/// [`TileError::NonFiniteAreaRatio`] if both contours are polygons and B
/// encloses no area.
pub fn tile_greedy(a: &Contour, b: &Contour, params: &TileParams) -> TileResult<Tiling> {
    ensure_non_empty(a, b)?;

    with_consistent_orientation(a, b, &params.fallback_normal, |a, b, normals| {
        let (m, n) = (a.effective_len(), b.effective_len());
        let walked_b = if m > 2 && n > 2 {
            Cow::Owned(align_to(a, b, &normals)?)
        } else {
            Cow::Borrowed(b)
        };

        let walk = Walk {
            a: a.effective_points(),
            b: walked_b.effective_points(),
            normals,
            offset: a.len(),
        };

        let expected_steps = m + n;
        let mut state = WalkState::start(nearest_vertex(walk.b, &walk.a[0]));
        let mut faces = Vec::with_capacity(expected_steps);
        let mut status = TilingStatus::Complete;

        for step in 0..expected_steps {
            let Some(mv) = walk.choose(&state) else {
                warn!(
                    completed_steps = step,
                    expected_steps, "Greedy walk found no valid move; tiling may be incomplete"
                );
                status = TilingStatus::Partial {
                    completed_steps: step,
                    expected_steps,
                };
                break;
            };
            let (next, face) = walk.apply(state, mv);
            faces.extend(face);
            state = next;
        }

        debug!(
            faces = faces.len(),
            perimeter_a = state.perimeter_a,
            perimeter_b = state.perimeter_b,
            "Greedy walk finished"
        );

        Ok(Tiling {
            faces,
            status,
            cost: None,
            count_a: a.len(),
            count_b: b.len(),
            loop_a: m,
            loop_b: n,
        })
    })
}
