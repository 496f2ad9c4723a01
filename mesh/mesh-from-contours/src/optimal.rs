//! Minimum-perimeter tiling by shortest paths in the correspondence graph.
//!
//! Every tiling corresponds to a monotone path from `(k, 0)` to `(k + m, n)`
//! for some start row `k`. Computing the shortest path for each `k` naively
//! costs `m` searches; instead the paths for the first and last start rows
//! are found, and every other start row is solved recursively inside the
//! strip bounded by the already-known paths above and below it. Shortest
//! paths from distinct start rows never need to cross, so the bounded search
//! loses nothing.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use contour_types::{Contour, Face};
use tracing::debug;

use crate::error::{TileError, TileResult};
use crate::graph::{Advance, CorrespondenceGraph};
use crate::orient::{ensure_non_empty, with_consistent_orientation};
use crate::params::TileParams;
use crate::result::{Tiling, TilingStatus};

/// A monotone path through the correspondence graph.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrespondencePath {
    /// `rows[c]` is the row at which the path enters column `c`.
    pub rows: Vec<usize>,
    /// Sum of the weights along the path.
    pub cost: f64,
}

impl CorrespondencePath {
    /// Row the path starts from.
    #[must_use]
    pub fn start_row(&self) -> usize {
        self.rows.first().copied().unwrap_or(0)
    }

    /// The same path moved `offset` rows down.
    #[must_use]
    pub fn shifted(&self, offset: usize) -> Self {
        Self {
            rows: self.rows.iter().map(|r| r + offset).collect(),
            cost: self.cost,
        }
    }
}

/// Per-column row limits for a bounded path search.
#[derive(Debug, Clone)]
pub struct PathBounds {
    top: Vec<usize>,
    bottom: Vec<usize>,
}

impl PathBounds {
    /// Bounds that only restrict the search to the graph.
    #[must_use]
    pub fn unbounded(graph: &CorrespondenceGraph) -> Self {
        Self {
            top: vec![0; graph.cols()],
            bottom: vec![graph.rows(); graph.cols()],
        }
    }

    /// Bounds for the strip between two paths.
    ///
    /// The paths are first ordered column by column, so either argument
    /// order gives the same strip. In column `c` a node may not lie above
    /// the row where the upper path enters `c`, nor below the row where the
    /// lower path leaves `c`.
    #[must_use]
    pub fn between(upper: &CorrespondencePath, lower: &CorrespondencePath, loop_a: usize) -> Self {
        let (top, low): (Vec<usize>, Vec<usize>) = upper
            .rows
            .iter()
            .zip(&lower.rows)
            .map(|(&u, &l)| (u.min(l), u.max(l)))
            .unzip();
        let exit = low.first().map_or(0, |r| r + loop_a);
        let bottom = (0..low.len())
            .map(|c| low.get(c + 1).copied().unwrap_or(exit))
            .collect();
        Self { top, bottom }
    }

    fn contains(&self, row: usize, col: usize) -> bool {
        match (self.top.get(col), self.bottom.get(col)) {
            (Some(&top), Some(&bottom)) => row >= top && row <= bottom,
            _ => false,
        }
    }
}

/// Priority queue entry for the path search.
#[derive(Debug, Clone, Copy)]
struct State {
    cost: f64,
    row: usize,
    col: usize,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.row.cmp(&self.row))
            .then_with(|| other.col.cmp(&self.col))
    }
}

/// Shortest path from `(start, 0)` to `(start + m, n)` within `bounds`.
///
/// # Errors
///
/// Returns [`TileError::NoCorrespondencePath`] if no path exists, which
/// only happens for an empty graph, inconsistent bounds or non-finite
/// weights.
pub fn single_path(
    graph: &CorrespondenceGraph,
    start: usize,
    bounds: &PathBounds,
) -> TileResult<CorrespondencePath> {
    let no_path = || TileError::NoCorrespondencePath {
        rows: graph.rows(),
        cols: graph.cols(),
    };
    if graph.is_empty() {
        return Err(no_path());
    }

    let m = graph.loop_a();
    let cols = graph.cols();
    let end = start + m;
    let allowed = |row: usize, col: usize| row >= start && row <= end && bounds.contains(row, col);
    let index = |row: usize, col: usize| (row - start) * cols + col;

    if !allowed(start, 0) || !allowed(end, cols - 1) {
        return Err(no_path());
    }

    let size = (m + 1) * cols;
    let mut dist = vec![f64::INFINITY; size];
    let mut pred: Vec<Option<Advance>> = vec![None; size];
    let mut done = vec![false; size];
    let mut heap = BinaryHeap::new();

    dist[index(start, 0)] = 0.0;
    heap.push(State {
        cost: 0.0,
        row: start,
        col: 0,
    });

    while let Some(State { cost, row, col }) = heap.pop() {
        let here = index(row, col);
        if done[here] {
            continue;
        }
        done[here] = true;
        if row == end && col == cols - 1 {
            break;
        }

        let node = graph.node(row, col);
        let moves = [
            (row + 1, col, node.weight_a, Advance::A),
            (row, col + 1, node.weight_b, Advance::B),
        ];
        for (next_row, next_col, weight, advance) in moves {
            if next_col >= cols || !allowed(next_row, next_col) {
                continue;
            }
            let next = index(next_row, next_col);
            let candidate = cost + weight;
            if !done[next] && candidate < dist[next] {
                dist[next] = candidate;
                pred[next] = Some(advance);
                heap.push(State {
                    cost: candidate,
                    row: next_row,
                    col: next_col,
                });
            }
        }
    }

    let (mut row, mut col) = (end, cols - 1);
    if !done[index(row, col)] {
        return Err(no_path());
    }
    let cost = dist[index(row, col)];

    let mut rows = vec![start; cols];
    while row != start || col != 0 {
        match pred[index(row, col)] {
            Some(Advance::A) => row -= 1,
            Some(Advance::B) => {
                rows[col] = row;
                col -= 1;
            }
            None => return Err(no_path()),
        }
    }

    Ok(CorrespondencePath { rows, cost })
}

/// Cheapest path among all start rows strictly between those of `upper`
/// and `lower`, or `None` if no start row lies between them.
///
/// # Errors
///
/// Propagates [`TileError::NoCorrespondencePath`] from the bounded searches.
pub fn paths_between(
    graph: &CorrespondenceGraph,
    upper: &CorrespondencePath,
    lower: &CorrespondencePath,
) -> TileResult<Option<CorrespondencePath>> {
    let (i, j) = (upper.start_row(), lower.start_row());
    if j < i + 2 {
        return Ok(None);
    }

    let k = i + (j - i) / 2;
    let bounds = PathBounds::between(upper, lower, graph.loop_a());
    let middle = single_path(graph, k, &bounds)?;
    let before = paths_between(graph, upper, &middle)?;
    let after = paths_between(graph, &middle, lower)?;

    Ok(cheapest([Some(middle), before, after]))
}

/// Shortest path over every start row.
///
/// On a cost tie the path found by the divide-and-conquer search wins over
/// the paths from the first and last start rows.
///
/// # Errors
///
/// Returns [`TileError::NoCorrespondencePath`] for an empty graph.
pub fn all_paths(graph: &CorrespondenceGraph) -> TileResult<CorrespondencePath> {
    let m = graph.loop_a();
    let first = single_path(graph, 0, &PathBounds::unbounded(graph))?;
    if m == 1 {
        return Ok(first);
    }

    let bounds = PathBounds::between(&first, &first.shifted(m), m);
    let last = single_path(graph, m - 1, &bounds)?;
    let between = paths_between(graph, &first, &last)?;

    cheapest([between, Some(first), Some(last)]).ok_or(TileError::NoCorrespondencePath {
        rows: graph.rows(),
        cols: graph.cols(),
    })
}

/// First path of minimal cost.
fn cheapest<const N: usize>(paths: [Option<CorrespondencePath>; N]) -> Option<CorrespondencePath> {
    paths.into_iter().flatten().fold(None, |best, path| match best {
        Some(b) if b.cost <= path.cost => Some(b),
        _ => Some(path),
    })
}

/// Emit one face per path step.
///
/// Steps along a single-vertex contour produce no face.
#[must_use]
pub fn emit_faces(graph: &CorrespondenceGraph, path: &CorrespondencePath, offset: usize) -> Vec<Face> {
    let (m, n) = (graph.loop_a(), graph.loop_b());
    graph
        .path_steps(&path.rows)
        .into_iter()
        .filter_map(|step| {
            let node = graph.node(step.row, step.col);
            match step.advance {
                Advance::A if m > 1 => Some([
                    node.a,
                    offset + node.b,
                    graph.node(step.row + 1, step.col).a,
                ]),
                Advance::B if n > 1 => Some([
                    node.a,
                    offset + node.b,
                    offset + graph.node(step.row, step.col + 1).b,
                ]),
                _ => None,
            }
        })
        .collect()
}

/// Tile two contours with the minimum total triangle perimeter.
///
/// # Errors
///
/// Returns [`TileError::EmptyContour`] if either contour has no points and
/// [`TileError::Geometry`] if a point is not finite.
pub fn tile_optimal(a: &Contour, b: &Contour, params: &TileParams) -> TileResult<Tiling> {
    ensure_non_empty(a, b)?;
    a.check_finite()?;
    b.check_finite()?;

    with_consistent_orientation(a, b, &params.fallback_normal, |a, b, _| {
        let graph = CorrespondenceGraph::build(a.effective_points(), b.effective_points());
        debug!(
            rows = graph.rows(),
            cols = graph.cols(),
            "Searching correspondence graph"
        );

        let path = all_paths(&graph)?;
        let faces = emit_faces(&graph, &path, a.len());
        debug!(
            start_row = path.start_row(),
            cost = path.cost,
            faces = faces.len(),
            "Selected optimal correspondence"
        );

        Ok(Tiling {
            faces,
            status: TilingStatus::Complete,
            cost: Some(path.cost),
            count_a: a.len(),
            count_b: b.len(),
            loop_a: graph.loop_a(),
            loop_b: graph.loop_b(),
        })
    })
}
