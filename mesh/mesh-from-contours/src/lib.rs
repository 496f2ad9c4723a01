//! Surface tiling between planar contours on adjacent slices.
//!
//! Given closed outlines of a structure on two neighbouring image slices,
//! this crate decides which vertex of one outline connects to which vertex
//! of the other and emits the triangles of the connecting surface patch.
//!
//! # Features
//!
//! - **Optimal tiling**: minimum total triangle perimeter via shortest paths
//!   in a correspondence graph ([`tile_optimal`])
//! - **Greedy tiling**: single linear pass with local heuristics
//!   ([`tile_greedy`])
//! - **Orientation normalization**: contours of opposite winding are tiled
//!   transparently; faces always refer to the caller's vertex order
//! - **Amalgamation**: several contours on one slice are bridged into one
//!   loop so they can be tiled against a single contour
//!   ([`amalgamate_contours`], [`tile_branching`])
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It only depends
//! on `contour-types` and `nalgebra` for geometry.
//!
//! # Face Numbering
//!
//! Faces index a combined vertex list: contour A's stored points occupy
//! `[0, N_A)` and contour B's stored points occupy `[N_A, N_A + N_B)`.
//! [`Tiling::assemble`] builds that vertex list.
//!
//! # Example
//!
//! ```
//! use mesh_from_contours::{Contour, Point3, TileParams, tile_contours};
//!
//! let ring = |radius: f64, z: f64| {
//!     Contour::new(
//!         (0..8)
//!             .map(|i| {
//!                 let t = f64::from(i) * std::f64::consts::TAU / 8.0;
//!                 Point3::new(radius * t.cos(), radius * t.sin(), z)
//!             })
//!             .collect(),
//!     )
//! };
//!
//! let lower = ring(1.0, 0.0);
//! let upper = ring(0.8, 1.0);
//!
//! let tiling = tile_contours(&lower, &upper, &TileParams::fast()).unwrap();
//! assert_eq!(tiling.face_count(), 16);
//!
//! let surface = tiling.assemble(&lower, &upper);
//! println!("{tiling}, area {:.3}", surface.area());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod amalgamate;
mod branch;
mod error;
mod graph;
mod greedy;
mod optimal;
mod orient;
mod params;
mod result;
mod tile;

// Re-export main types and functions
pub use amalgamate::{Amalgamation, Bridge, amalgamate_contours};
pub use branch::{BranchTiling, tile_branching};
pub use error::{ContourSide, TileError, TileResult};
pub use graph::{Advance, CorrespondenceGraph, CorrespondenceNode, PathStep};
pub use greedy::tile_greedy;
pub use optimal::{
    CorrespondencePath, PathBounds, all_paths, emit_faces, paths_between, single_path,
    tile_optimal,
};
pub use orient::{OrientationPlan, PairNormals, normal_or, plan_orientation};
pub use params::{AmalgamateParams, BranchParams, TileParams, TilingMethod};
pub use result::{TiledSurface, Tiling, TilingStatus};
pub use tile::tile_contours;

// Re-export contour types for convenience
pub use contour_types::{Contour, ContourError, Face, Point3, Vector3, VertexKind};
