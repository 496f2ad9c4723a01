//! Error types for contour tiling operations.

use std::fmt;

use contour_types::ContourError;
use thiserror::Error;

/// Result type for contour tiling operations.
pub type TileResult<T> = Result<T, TileError>;

/// Which of the two contours in a tiling call an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourSide {
    /// The first contour (indices `[0, N_A)`).
    A,
    /// The second contour (indices `[N_A, N_A + N_B)`).
    B,
}

impl fmt::Display for ContourSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Errors that can occur while tiling or amalgamating contours.
///
/// Every variant except [`TileError::NoCorrespondencePath`] reports invalid
/// input; see [`TileError::is_invalid_input`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TileError {
    /// A contour has no vertices.
    #[error("contour {side} contains no vertices")]
    EmptyContour {
        /// The empty contour.
        side: ContourSide,
    },

    /// Rescaling one contour to the other's area is impossible.
    #[error("contour area ratio is not finite: {ratio}")]
    NonFiniteAreaRatio {
        /// The offending `area_A / area_B` ratio.
        ratio: f64,
    },

    /// Amalgamation was requested for an empty list.
    #[error("no contours supplied for amalgamation")]
    NoContours,

    /// Amalgamation only works with closed loops.
    #[error("contour {index} is open; amalgamation requires closed contours")]
    OpenContour {
        /// Position of the open contour in the input list.
        index: usize,
    },

    /// The first contour cannot seed an amalgamated loop.
    #[error("seed contour needs at least {required} vertices, got {actual}")]
    InsufficientSeedVertices {
        /// Minimum vertex count.
        required: usize,
        /// Effective vertex count of the seed.
        actual: usize,
    },

    /// Contour geometry could not be evaluated.
    #[error(transparent)]
    Geometry(#[from] ContourError),

    /// The correspondence graph search found no route.
    #[error("no correspondence path through the {rows}x{cols} graph")]
    NoCorrespondencePath {
        /// Graph rows.
        rows: usize,
        /// Graph columns.
        cols: usize,
    },
}

impl TileError {
    /// Check whether the error was caused by the caller's input.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        !matches!(self, Self::NoCorrespondencePath { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TileError::EmptyContour {
            side: ContourSide::B,
        };
        assert_eq!(format!("{err}"), "contour B contains no vertices");

        let err = TileError::NonFiniteAreaRatio {
            ratio: f64::INFINITY,
        };
        assert!(format!("{err}").contains("inf"));
    }

    #[test]
    fn test_invalid_input_classification() {
        assert!(TileError::NoContours.is_invalid_input());
        assert!(TileError::OpenContour { index: 2 }.is_invalid_input());
        assert!(!TileError::NoCorrespondencePath { rows: 4, cols: 3 }.is_invalid_input());
    }

    #[test]
    fn test_geometry_error_converts() {
        let err: TileError = ContourError::DegenerateNormal.into();
        assert!(matches!(err, TileError::Geometry(ContourError::DegenerateNormal)));
    }
}
