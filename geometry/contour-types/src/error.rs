//! Error types for contour geometry.

use thiserror::Error;

/// Result type for contour operations.
pub type ContourResult<T> = Result<T, ContourError>;

/// Errors that can occur when deriving geometry from a contour.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContourError {
    /// Not enough effective vertices for the requested quantity.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum required effective vertices.
        required: usize,
        /// Effective vertices available.
        actual: usize,
    },

    /// The vertices do not span a plane (collinear or coincident).
    #[error("contour normal is degenerate")]
    DegenerateNormal,

    /// A vertex has a NaN or infinite coordinate.
    #[error("non-finite point at index {index}")]
    NonFinitePoint {
        /// Index of the offending point.
        index: usize,
    },
}

impl ContourError {
    pub(crate) const fn insufficient_points(required: usize, actual: usize) -> Self {
        Self::InsufficientPoints { required, actual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ContourError::insufficient_points(3, 2);
        assert_eq!(format!("{err}"), "insufficient points: need at least 3, got 2");

        let err = ContourError::NonFinitePoint { index: 4 };
        assert!(format!("{err}").contains('4'));
    }
}
