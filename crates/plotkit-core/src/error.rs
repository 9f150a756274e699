//! Error types for geometry operations.

use crate::geometry::Point;
use thiserror::Error;

/// Errors that can occur while building or approximating geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A line chain was constructed from zero segments.
    #[error("Line chain must contain at least one segment")]
    EmptyChain,

    /// Consecutive segments of a chain do not join.
    #[error("Discontinuous chain: segment {index} starts at {found} but the previous segment ends at {expected}")]
    Discontinuity {
        index: usize,
        expected: Point,
        found: Point,
    },

    /// Strict flattening ran out of subdivision depth before reaching
    /// the requested tolerance.
    #[error("Curve flattening exhausted subdivision depth {max_depth}: deviation {achieved} exceeds tolerance {tolerance}")]
    ToleranceNotReached {
        max_depth: u32,
        achieved: f64,
        tolerance: f64,
    },
}

/// Result type alias for geometry operations.
pub type GeometryResult<T> = Result<T, GeometryError>;
