//! Error types for the Fincalc engine.
//!
//! [`FinError`] is the taxonomy every formula and analysis layer reports
//! through. Iteration exhaustion in the IRR solver is *not* an error: it is
//! reported as data on [`IrrSolution`](crate::types::IrrSolution). The
//! [`FinError::NonConvergence`] variant only surfaces when a derived layer
//! needs a primary value from a solver run that never converged.

use thiserror::Error;

/// A specialized Result type for Fincalc operations.
pub type FinResult<T> = Result<T, FinError>;

/// The main error type for Fincalc operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FinError {
    /// No formula is registered under the requested identifier.
    #[error("Unknown formula: {id}")]
    UnknownFormula {
        /// The identifier that failed to resolve.
        id: String,
    },

    /// Parameters failed validation before any calculation ran.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// Parameter or field that failed validation.
        field: String,
        /// Description of the failure.
        message: String,
    },

    /// A rate at or below -100%.
    #[error("Invalid rate for '{field}': {value} (rates must be greater than -1)")]
    InvalidRate {
        /// Parameter holding the rate.
        field: String,
        /// The offending value.
        value: f64,
    },

    /// Zero denominator in a ratio.
    #[error("Division by zero: {context}")]
    DivisionByZero {
        /// Which denominator was zero.
        context: String,
    },

    /// Model assumption violated (e.g. required return not above growth).
    #[error("Invalid assumption: {reason}")]
    InvalidAssumption {
        /// Description of the violated assumption.
        reason: String,
    },

    /// An iterative solve exhausted its iteration budget.
    #[error("No convergence after {iterations} iterations (last estimate: {last_estimate})")]
    NonConvergence {
        /// Iterations performed.
        iterations: u32,
        /// Estimate at the final iteration.
        last_estimate: f64,
    },

    /// Newton step aborted because the derivative was effectively zero.
    #[error("Derivative too small at iteration {iteration} (rate: {rate}, derivative: {derivative:.2e})")]
    DivergentDerivative {
        /// 1-based iteration at which the guard tripped.
        iteration: u32,
        /// Rate being evaluated.
        rate: f64,
        /// Derivative value.
        derivative: f64,
    },

    /// A formula produced no primary value for a derived analysis.
    #[error("No primary value: {reason}")]
    NoPrimaryValue {
        /// Why the result could not be reduced to a number.
        reason: String,
    },

    /// Monte Carlo run retained no samples.
    #[error("No valid samples out of {iterations} iterations")]
    NoValidSamples {
        /// Iterations attempted.
        iterations: usize,
    },
}

impl FinError {
    /// Creates an unknown formula error.
    #[must_use]
    pub fn unknown_formula(id: impl Into<String>) -> Self {
        Self::UnknownFormula { id: id.into() }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid rate error.
    #[must_use]
    pub fn invalid_rate(field: impl Into<String>, value: f64) -> Self {
        Self::InvalidRate {
            field: field.into(),
            value,
        }
    }

    /// Creates a division by zero error.
    #[must_use]
    pub fn division_by_zero(context: impl Into<String>) -> Self {
        Self::DivisionByZero {
            context: context.into(),
        }
    }

    /// Creates an invalid assumption error.
    #[must_use]
    pub fn invalid_assumption(reason: impl Into<String>) -> Self {
        Self::InvalidAssumption {
            reason: reason.into(),
        }
    }

    /// Creates a no primary value error.
    #[must_use]
    pub fn no_primary_value(reason: impl Into<String>) -> Self {
        Self::NoPrimaryValue {
            reason: reason.into(),
        }
    }

    /// Checks that a rate lies strictly above -1.
    pub fn check_rate(field: &str, value: f64) -> FinResult<()> {
        if value > -1.0 {
            Ok(())
        } else {
            Err(Self::invalid_rate(field, value))
        }
    }

    /// Checks that a denominator is non-zero.
    pub fn check_denominator(context: &str, value: f64) -> FinResult<()> {
        if value == 0.0 {
            Err(Self::division_by_zero(context))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FinError::unknown_formula("present_worth");
        assert_eq!(err.to_string(), "Unknown formula: present_worth");

        let err = FinError::division_by_zero("current liabilities cannot be zero");
        assert!(err.to_string().contains("current liabilities"));
    }

    #[test]
    fn test_check_rate() {
        assert!(FinError::check_rate("rate", 0.05).is_ok());
        assert!(FinError::check_rate("rate", -0.99).is_ok());
        assert_eq!(
            FinError::check_rate("rate", -1.0),
            Err(FinError::invalid_rate("rate", -1.0))
        );
        assert!(FinError::check_rate("rate", f64::NAN).is_err());
    }

    #[test]
    fn test_check_denominator() {
        assert!(FinError::check_denominator("equity", 1.0).is_ok());
        assert!(matches!(
            FinError::check_denominator("equity", 0.0),
            Err(FinError::DivisionByZero { .. })
        ));
    }
}
