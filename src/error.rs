//! Error types for einplan.

use thiserror::Error;

/// The main error type for einplan operations.
#[derive(Debug, Error)]
pub enum EinError {
    /// Candle tensor operation failed
    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Notation string could not be lexed or parsed
    #[error("parse error at {location}: {message}")]
    Parse { location: String, message: String },

    /// Specifications do not fit the operands they are applied to.
    ///
    /// Raised before any output cell is written: bad labels, spec/operand
    /// count or rank mismatches, unresolvable or inconsistent extents.
    #[error("invalid specification: {reason}")]
    InvalidSpecification { reason: String },

    /// An operand rejected an index during descent.
    ///
    /// Only reachable when an operand misreports its own extent. Output
    /// cells assigned before the failure keep their new values.
    #[error("index {index} out of bounds for dimension {dim} of extent {extent}")]
    Bounds {
        dim: usize,
        index: usize,
        extent: usize,
    },

    /// Dimension does not exist on the operand
    #[error("no dimension {dim} on operand of rank {rank}")]
    NoSuchDimension { dim: usize, rank: usize },

    /// Element read from a view that still has free dimensions
    #[error("expected a scalar view, got rank {rank}")]
    NotScalar { rank: usize },

    /// Shape mismatch
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Reported by a fallible terminal reduction
    #[error("reduction failed: {0}")]
    Reduction(String),
}

impl EinError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EinError::InvalidSpecification {
            reason: reason.into(),
        }
    }
}

/// Result type for einplan operations.
pub type Result<T> = std::result::Result<T, EinError>;
