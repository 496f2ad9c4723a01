//! Planar contour types for slice-to-slice surface tiling.
//!
//! This crate provides the value types shared by the contour tiling
//! pipeline:
//!
//! - [`Contour`] - An ordered loop (or chain) of points with metadata
//! - [`VertexKind`] - Distinguishes measured vertices from synthetic bridge vertices
//! - [`Plane`] - A best-fit plane used for projections
//! - [`Face`] - A triangle as three indices into a combined vertex numbering
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It only depends on
//! `nalgebra` for vector math and `hashbrown` for contour metadata.
//!
//! # Closure Convention
//!
//! A closed contour may store its first point again at the end (explicit
//! closure) or not. [`Contour::effective_len`] excludes a duplicated closing
//! point, and every geometric query works on the effective vertices only.
//!
//! # Orientation
//!
//! [`Contour::estimate_planar_normal`] follows the winding: a loop that is
//! counter-clockwise when viewed from +Z has a normal pointing along +Z.
//!
//! # Example
//!
//! ```
//! use contour_types::{Contour, Point3, Vector3};
//!
//! let square = Contour::new(vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ]);
//!
//! let normal = square.estimate_planar_normal().unwrap();
//! assert!((normal - Vector3::z()).norm() < 1e-12);
//! assert!((square.area() - 1.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod contour;
mod error;
mod plane;

pub use contour::{Contour, VertexKind, cyclic_next, cyclic_prev};
pub use error::{ContourError, ContourResult};
pub use plane::Plane;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

/// A triangle referencing three vertices of a combined numbering.
///
/// When two contours `A` and `B` are tiled, `A` occupies indices
/// `[0, N_A)` and `B` occupies `[N_A, N_A + N_B)`, where `N_A` and `N_B`
/// are the stored point counts.
pub type Face = [usize; 3];
