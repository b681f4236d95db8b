//! Error types for mathematical operations.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur during mathematical operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Newton step aborted because the derivative was below tolerance.
    #[error("Derivative too small at iteration {iteration}: f'({x}) = {derivative:.2e}")]
    FlatDerivative {
        /// 1-based iteration at which the guard tripped.
        iteration: u32,
        /// Point being evaluated.
        x: f64,
        /// Derivative value.
        derivative: f64,
    },

    /// Insufficient data points for operation.
    #[error("Insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a flat derivative error.
    #[must_use]
    pub fn flat_derivative(iteration: u32, x: f64, derivative: f64) -> Self {
        Self::FlatDerivative {
            iteration,
            x,
            derivative,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }
}
