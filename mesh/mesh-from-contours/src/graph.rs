//! Correspondence graph between two contours.
//!
//! Node `(r, c)` pairs A-vertex `r mod m` with B-vertex `c mod n`. The graph
//! has `2m` rows so that a path may start at any A-vertex and wrap once
//! around A, and `n + 1` columns so that it wraps once around B. Moving down
//! a row advances along A, moving right a column advances along B, and each
//! move corresponds to one triangle of the tiling.

use contour_types::{Point3, cyclic_next};

/// Edge weights leaving one correspondence node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrespondenceNode {
    /// Index of the A-vertex (within A's effective vertices).
    pub a: usize,
    /// Index of the B-vertex (within B's effective vertices).
    pub b: usize,
    /// Perimeter of triangle `(a_i, b_j, a_{i+1})`, the cost of advancing A.
    pub weight_a: f64,
    /// Perimeter of triangle `(a_i, b_j, b_{j+1})`, the cost of advancing B.
    pub weight_b: f64,
}

/// Direction of one step along a correspondence path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move to the next A-vertex (one row down).
    A,
    /// Move to the next B-vertex (one column right).
    B,
}

/// One step of a correspondence path: the node it leaves and its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    /// Row of the node the step leaves.
    pub row: usize,
    /// Column of the node the step leaves.
    pub col: usize,
    /// Direction taken.
    pub advance: Advance,
}

/// Weighted grid of vertex correspondences between contours A and B.
///
/// Weights depend only on `(r mod m, c mod n)`, so only `m * n` nodes are
/// stored.
#[derive(Debug, Clone)]
pub struct CorrespondenceGraph {
    loop_a: usize,
    loop_b: usize,
    nodes: Vec<CorrespondenceNode>,
}

impl CorrespondenceGraph {
    /// Build the graph from the effective vertices of A and B.
    #[must_use]
    pub fn build(a: &[Point3<f64>], b: &[Point3<f64>]) -> Self {
        let (m, n) = (a.len(), b.len());
        let mut nodes = Vec::with_capacity(m * n);

        for (i, pa) in a.iter().enumerate() {
            let pa_next = &a[cyclic_next(i, m)];
            for (j, pb) in b.iter().enumerate() {
                let pb_next = &b[cyclic_next(j, n)];
                let cross = (pa - pb).norm();
                nodes.push(CorrespondenceNode {
                    a: i,
                    b: j,
                    weight_a: cross + (pa - pa_next).norm() + (pb - pa_next).norm(),
                    weight_b: cross + (pa - pb_next).norm() + (pb - pb_next).norm(),
                });
            }
        }

        Self {
            loop_a: m,
            loop_b: n,
            nodes,
        }
    }

    /// Number of A-vertices.
    #[must_use]
    pub const fn loop_a(&self) -> usize {
        self.loop_a
    }

    /// Number of B-vertices.
    #[must_use]
    pub const fn loop_b(&self) -> usize {
        self.loop_b
    }

    /// Number of graph rows (`2m`).
    #[must_use]
    pub const fn rows(&self) -> usize {
        2 * self.loop_a
    }

    /// Number of graph columns (`n + 1`).
    #[must_use]
    pub const fn cols(&self) -> usize {
        if self.loop_b == 0 { 0 } else { self.loop_b + 1 }
    }

    /// Check whether either contour contributed no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node at grid position `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the graph is empty.
    #[must_use]
    pub fn node(&self, row: usize, col: usize) -> CorrespondenceNode {
        self.nodes[(row % self.loop_a) * self.loop_b + col % self.loop_b]
    }

    /// Weight of leaving `(row, col)` in the given direction.
    #[must_use]
    pub fn weight(&self, row: usize, col: usize, advance: Advance) -> f64 {
        let node = self.node(row, col);
        match advance {
            Advance::A => node.weight_a,
            Advance::B => node.weight_b,
        }
    }

    /// Expand a path given by per-column entry rows into its steps.
    ///
    /// `rows[c]` is the row at which the path enters column `c`; the path
    /// leaves the last column at `rows[0] + m`. The result holds exactly
    /// `m + n` steps for a well-formed path.
    #[must_use]
    pub fn path_steps(&self, rows: &[usize]) -> Vec<PathStep> {
        let cols = rows.len();
        let mut steps = Vec::with_capacity(self.loop_a + self.loop_b);

        for (col, &start) in rows.iter().enumerate() {
            let end = rows.get(col + 1).copied().unwrap_or(rows[0] + self.loop_a);
            for row in start..=end {
                if row < end {
                    steps.push(PathStep {
                        row,
                        col,
                        advance: Advance::A,
                    });
                } else if col + 1 < cols {
                    steps.push(PathStep {
                        row,
                        col,
                        advance: Advance::B,
                    });
                }
            }
        }

        steps
    }

    /// Total weight of a path given by per-column entry rows.
    #[must_use]
    pub fn path_cost(&self, rows: &[usize]) -> f64 {
        self.path_steps(rows)
            .iter()
            .map(|step| self.weight(step.row, step.col, step.advance))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(z: f64) -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(0.0, 1.0, z),
        ]
    }

    #[test]
    fn test_dimensions() {
        let graph = CorrespondenceGraph::build(&square(0.0), &square(1.0)[..3]);
        assert_eq!(graph.rows(), 8);
        assert_eq!(graph.cols(), 4);
        assert_eq!(graph.loop_a(), 4);
        assert_eq!(graph.loop_b(), 3);
    }

    #[test]
    fn test_empty_graph() {
        let graph = CorrespondenceGraph::build(&[], &square(1.0));
        assert!(graph.is_empty());
        assert_eq!(graph.rows(), 0);
    }

    #[test]
    fn test_weights_are_triangle_perimeters() {
        let graph = CorrespondenceGraph::build(&square(0.0), &square(1.0));
        let node = graph.node(0, 0);
        // Triangle (a0, b0, a1): 1 + 1 + sqrt(2)
        assert_relative_eq!(node.weight_a, 2.0 + 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(node.weight_b, 2.0 + 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_node_wraps() {
        let graph = CorrespondenceGraph::build(&square(0.0), &square(1.0));
        assert_eq!(graph.node(5, 4), graph.node(1, 0));
        assert_eq!(graph.node(7, 3).a, 3);
        assert_eq!(graph.node(7, 3).b, 3);
    }

    #[test]
    fn test_path_steps() {
        let graph = CorrespondenceGraph::build(&square(0.0), &square(1.0)[..3]);
        // Enter column 0 at row 1, columns 1..3 at rows 2, 2, 4; leave at 5
        let steps = graph.path_steps(&[1, 2, 2, 4]);

        assert_eq!(steps.len(), 4 + 3);
        assert_eq!(steps.iter().filter(|s| s.advance == Advance::A).count(), 4);
        assert_eq!(
            steps[0],
            PathStep {
                row: 1,
                col: 0,
                advance: Advance::A
            }
        );
        assert_eq!(
            steps[1],
            PathStep {
                row: 2,
                col: 0,
                advance: Advance::B
            }
        );
        assert_eq!(steps.last().map(|s| (s.row, s.col)), Some((4, 3)));
    }

    #[test]
    fn test_path_cost_sums_steps() {
        let graph = CorrespondenceGraph::build(&square(0.0), &square(1.0));
        let rows = [0, 1, 2, 3, 4];
        let expected: f64 = (0..4)
            .map(|i| graph.node(i, i).weight_a + graph.node(i + 1, i).weight_b)
            .sum();
        assert_relative_eq!(graph.path_cost(&rows), expected, epsilon = 1e-12);
    }
}
