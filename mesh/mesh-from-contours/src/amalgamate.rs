//! Merging several contours on one slice into a single loop.
//!
//! When one contour on a slice must be tiled against several on the next
//! (a branching structure), the several are first joined into one traversal
//! loop. Each join cuts one edge of the growing loop and one edge of a
//! candidate contour and reconnects the four endpoints through two synthetic
//! pseudo-vertices placed at the midpoints of the new connecting edges.

use contour_types::{Contour, Point3, Vector3, VertexKind};
use tracing::{debug, warn};

use crate::error::{TileError, TileResult};
use crate::orient::normal_or;
use crate::params::AmalgamateParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One join between the merged loop and a candidate contour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bridge {
    /// Position of the joined contour in the input list.
    pub source: usize,
    /// Combined length of the two connecting edges.
    pub cost: f64,
    /// Pseudo-vertex leading from the merged loop into the candidate.
    pub entry: Point3<f64>,
    /// Pseudo-vertex leading from the candidate back to the merged loop.
    pub exit: Point3<f64>,
}

/// Result of merging contours.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Amalgamation {
    /// The merged loop. Synthetic vertices are tagged [`VertexKind::Pseudo`].
    pub contour: Contour,
    /// Joins in the order they were made.
    pub bridges: Vec<Bridge>,
    /// Input positions of contours that could not be joined.
    pub unbridged: Vec<usize>,
}

impl Amalgamation {
    /// Check whether every input contour ended up in the merged loop.
    #[must_use]
    pub fn is_fully_merged(&self) -> bool {
        self.unbridged.is_empty()
    }

    /// Sum of all bridge costs.
    #[must_use]
    pub fn total_bridge_cost(&self) -> f64 {
        self.bridges.iter().map(|b| b.cost).sum()
    }
}

type Vertices = Vec<(Point3<f64>, VertexKind)>;

/// Cheapest place to join one candidate into the merged loop.
#[derive(Debug, Clone, Copy)]
struct BridgeSite {
    /// Position of the candidate in the pool.
    pool_pos: usize,
    /// Merged-loop index of the second endpoint of the cut edge.
    merged_at: usize,
    /// Candidate index of the second endpoint of its cut edge.
    candidate_at: usize,
    cost: f64,
    entry: Point3<f64>,
    exit: Point3<f64>,
}

/// Reverse `contour` if it winds against `ortho_unit`.
fn reorient(contour: &Contour, index: usize, ortho_unit: &Vector3<f64>) -> Contour {
    let normal = normal_or(contour, ortho_unit);
    if ortho_unit.dot(&normal) > 0.0 {
        contour.clone()
    } else {
        warn!(
            index,
            "Contour winds against the reference orientation; using a reversed copy"
        );
        contour.reversed()
    }
}

/// Cut edges `(prev, i)` of a loop that may carry a bridge.
fn bridgeable_edges(contour: &Contour, min_length: f64) -> impl Iterator<Item = (usize, usize)> {
    let points = contour.points();
    contour.edges().filter(move |&(p, i)| {
        !contour.is_pseudo(p)
            && !contour.is_pseudo(i)
            && (points[i] - points[p]).norm() >= min_length
    })
}

fn find_site(
    merged: &Contour,
    pool: &[(usize, Contour)],
    params: &AmalgamateParams,
) -> Option<BridgeSite> {
    let mut best: Option<BridgeSite> = None;

    for (pool_pos, (_, candidate)) in pool.iter().enumerate() {
        for (a1, a2) in bridgeable_edges(merged, params.min_edge_length) {
            let (pa1, pa2) = (merged.points()[a1], merged.points()[a2]);
            for (b1, b2) in bridgeable_edges(candidate, params.min_edge_length) {
                let (pb1, pb2) = (candidate.points()[b1], candidate.points()[b2]);
                let cost = (pa1 - pb2).norm() + (pa2 - pb1).norm();
                if !cost.is_finite() || best.is_some_and(|b| b.cost <= cost) {
                    continue;
                }
                best = Some(BridgeSite {
                    pool_pos,
                    merged_at: a2,
                    candidate_at: b2,
                    cost,
                    entry: nalgebra::center(&pa1, &pb2) + params.pseudo_vertex_offset,
                    exit: nalgebra::center(&pa2, &pb1) + params.pseudo_vertex_offset,
                });
            }
        }
    }

    best
}

/// Merge closed contours on one slice into a single loop.
///
/// Every contour is first made to wind counter-clockwise about
/// `params.ortho_unit`. The first contour seeds the merged loop; the
/// remaining contours are joined one at a time, always taking the cheapest
/// available join. Edges touching a pseudo-vertex and edges shorter than
/// `params.min_edge_length` are never cut. Contours that cannot be joined are
/// reported in [`Amalgamation::unbridged`].
///
/// # Errors
///
/// Returns [`TileError::NoContours`] for an empty list,
/// [`TileError::OpenContour`] if any contour is open,
/// [`TileError::Geometry`] for non-finite points, and
/// [`TileError::InsufficientSeedVertices`] if the first contour has fewer
/// than 3 vertices.
pub fn amalgamate_contours(
    contours: &[Contour],
    params: &AmalgamateParams,
) -> TileResult<Amalgamation> {
    if contours.is_empty() {
        return Err(TileError::NoContours);
    }
    if let Some(index) = contours.iter().position(|c| !c.closed) {
        return Err(TileError::OpenContour { index });
    }
    for contour in contours {
        contour.check_finite()?;
    }

    let oriented: Vec<Contour> = contours
        .iter()
        .enumerate()
        .map(|(i, c)| reorient(c, i, &params.ortho_unit))
        .collect();

    let seed = &oriented[0];
    if seed.effective_len() < 3 {
        return Err(TileError::InsufficientSeedVertices {
            required: 3,
            actual: seed.effective_len(),
        });
    }

    let effective = |c: &Contour| -> Contour {
        Contour::from_vertices(c.vertices().take(c.effective_len()).collect(), true)
    };
    let mut merged = effective(seed);
    let mut pool: Vec<(usize, Contour)> = oriented
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, c)| (i, effective(c)))
        .collect();
    let mut bridges = Vec::new();

    while let Some(site) = find_site(&merged, &pool, params) {
        let (source, candidate) = pool.remove(site.pool_pos);
        // Traverse the candidate from the far end of its cut edge back to
        // the near end
        let mut inserted: Vertices = candidate.vertices().collect();
        inserted.rotate_left(site.candidate_at);

        let mut vertices: Vertices = merged.vertices().collect();
        let tail = vertices.split_off(site.merged_at);
        vertices.push((site.entry, VertexKind::Pseudo));
        vertices.extend(inserted);
        vertices.push((site.exit, VertexKind::Pseudo));
        vertices.extend(tail);
        merged = Contour::from_vertices(vertices, true);

        debug!(
            source,
            cost = site.cost,
            vertices = merged.len(),
            "Bridged contour into merged loop"
        );
        bridges.push(Bridge {
            source,
            cost: site.cost,
            entry: site.entry,
            exit: site.exit,
        });
    }

    let unbridged: Vec<usize> = pool.iter().map(|(i, _)| *i).collect();
    if !unbridged.is_empty() {
        warn!(
            count = unbridged.len(),
            "Some contours could not be bridged and were left out of the merged loop"
        );
    }

    let contour = if bridges.is_empty() {
        seed.clone()
    } else {
        merged.metadata = seed.metadata.clone();
        merged
    };

    Ok(Amalgamation {
        contour,
        bridges,
        unbridged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle(dx: f64) -> Contour {
        Contour::new(vec![
            Point3::new(dx, 0.0, 0.0),
            Point3::new(dx + 1.0, 0.0, 0.0),
            Point3::new(dx + 0.5, 1.0, 0.0),
        ])
    }

    #[test]
    fn test_two_triangles() {
        let contours = [triangle(0.0).with_metadata("name", "left"), triangle(2.0)];
        let result = amalgamate_contours(&contours, &AmalgamateParams::default()).unwrap();
        let merged = &result.contour;

        assert_eq!(merged.len(), 8);
        assert_eq!(merged.pseudo_count(), 2);
        assert!(merged.is_pseudo(2));
        assert!(merged.is_pseudo(6));
        assert!(result.is_fully_merged());
        assert_eq!(merged.metadata("name"), Some("left"));

        assert_eq!(result.bridges.len(), 1);
        let bridge = &result.bridges[0];
        assert_eq!(bridge.source, 1);
        assert_relative_eq!(bridge.cost, 3.0, epsilon = 1e-12);
        assert_relative_eq!(bridge.entry, Point3::new(1.5, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(bridge.exit, Point3::new(1.5, 1.0, 0.0), epsilon = 1e-12);

        // The merged loop is a trapezoid
        assert_eq!(merged.points()[3], Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(merged.signed_area(&Vector3::z()), 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_bridgeable_edges_skip_pseudo_and_short() {
        let contour = Contour::from_vertices(
            vec![
                (Point3::new(0.0, 0.0, 0.0), VertexKind::Original),
                (Point3::new(1.0, 0.0, 0.0), VertexKind::Original),
                (Point3::new(1.0, 1e-9, 0.0), VertexKind::Original),
                (Point3::new(1.0, 1.0, 0.0), VertexKind::Pseudo),
                (Point3::new(0.0, 1.0, 0.0), VertexKind::Original),
            ],
            true,
        );
        let edges: Vec<_> = bridgeable_edges(&contour, 1e-6).collect();
        assert_eq!(edges, vec![(4, 0), (0, 1)]);
    }

    #[test]
    fn test_pseudo_vertex_offset() {
        let params = AmalgamateParams::new(Vector3::z(), Vector3::new(0.0, 0.0, 0.25));
        let result = amalgamate_contours(&[triangle(0.0), triangle(2.0)], &params).unwrap();
        assert_relative_eq!(result.contour.points()[2].z, 0.25);
        assert_relative_eq!(result.contour.points()[6].z, 0.25);
        assert_relative_eq!(result.contour.points()[3].z, 0.0);
    }

    #[test]
    fn test_reversed_candidate_is_reoriented() {
        let plain =
            amalgamate_contours(&[triangle(0.0), triangle(2.0)], &AmalgamateParams::default())
                .unwrap();
        let flipped = amalgamate_contours(
            &[triangle(0.0), triangle(2.0).reversed()],
            &AmalgamateParams::default(),
        )
        .unwrap();
        assert_eq!(plain.contour.points(), flipped.contour.points());
    }

    #[test]
    fn test_three_contours() {
        let contours = [triangle(0.0), triangle(2.0), triangle(-2.0)];
        let result = amalgamate_contours(&contours, &AmalgamateParams::default()).unwrap();

        assert_eq!(result.bridges.len(), 2);
        assert_eq!(result.contour.len(), 13);
        assert_eq!(result.contour.pseudo_count(), 4);
        // No two pseudo-vertices from different bridges are adjacent
        let n = result.contour.len();
        for i in 0..n {
            assert!(!(result.contour.is_pseudo(i) && result.contour.is_pseudo((i + 1) % n)));
        }
    }

    #[test]
    fn test_single_contour_is_unchanged() {
        let result = amalgamate_contours(&[triangle(0.0)], &AmalgamateParams::default()).unwrap();
        assert_eq!(result.contour, triangle(0.0));
        assert!(result.bridges.is_empty());
    }

    #[test]
    fn test_unbridgeable_point() {
        let point = Contour::new(vec![Point3::new(5.0, 5.0, 0.0)]);
        let result =
            amalgamate_contours(&[triangle(0.0), point], &AmalgamateParams::default()).unwrap();
        assert_eq!(result.unbridged, vec![1]);
        assert_eq!(result.contour, triangle(0.0));
        assert!(!result.is_fully_merged());
    }

    #[test]
    fn test_invalid_inputs() {
        let params = AmalgamateParams::default();
        assert_eq!(amalgamate_contours(&[], &params), Err(TileError::NoContours));

        let open = Contour::open(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        assert_eq!(
            amalgamate_contours(&[triangle(0.0), open], &params),
            Err(TileError::OpenContour { index: 1 })
        );

        let pair = Contour::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]);
        assert_eq!(
            amalgamate_contours(&[pair, triangle(0.0)], &params),
            Err(TileError::InsufficientSeedVertices {
                required: 3,
                actual: 2
            })
        );
    }
}
