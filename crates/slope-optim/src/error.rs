//! Error types for optimization runs.

use thiserror::Error;

/// A specialized Result type for optimization operations.
pub type OptimResult<T> = Result<T, OptimError>;

/// Errors that can occur while building or running an optimizer.
///
/// Reaching the iteration limit is not an error; it is reported through
/// [`OptimizationResult::aborted`](crate::result::OptimizationResult::aborted).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimError {
    /// A point, gradient or bound has the wrong number of coordinates.
    #[error("Dimension mismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch {
        /// Declared arity.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A constructor parameter is out of its valid range.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Description of the invalid parameter.
        reason: String,
    },

    /// An external sampler returned no value.
    #[error("External sample failed at {point:?}")]
    ExternalSampleFailure {
        /// The point that was being sampled.
        point: Vec<f64>,
    },

    /// A step size, value or gradient became NaN or infinite.
    #[error("Non-finite value produced by {operation}")]
    NonFiniteValue {
        /// The operation that produced the value.
        operation: String,
    },
}

impl OptimError {
    /// Creates a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// Creates a non-finite value error.
    #[must_use]
    pub fn non_finite(operation: impl Into<String>) -> Self {
        Self::NonFiniteValue {
            operation: operation.into(),
        }
    }
}

/// Fails with [`OptimError::DimensionMismatch`] unless `actual == expected`.
pub(crate) fn check_dimension(expected: usize, actual: usize) -> OptimResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(OptimError::dimension_mismatch(expected, actual))
    }
}

/// Fails with [`OptimError::InvalidConfiguration`] unless `value` is finite and > 0.
pub(crate) fn require_positive(name: &str, value: f64) -> OptimResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(OptimError::invalid_configuration(format!(
            "{name} must be positive, got {value}"
        )))
    }
}
