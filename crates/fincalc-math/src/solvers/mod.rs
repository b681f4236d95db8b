//! Root-finding algorithms.
//!
//! [`newton_raphson_traced`] is the solver behind the IRR calculation. It
//! records every step so callers can display how the estimate evolved, and
//! separates its two failure modes:
//!
//! - a derivative below tolerance aborts with [`MathError::FlatDerivative`](crate::MathError::FlatDerivative)
//! - exhausting `max_iterations` returns an outcome with `converged == false`
//!
//! # Example
//!
//! ```rust
//! use fincalc_math::solvers::{newton_raphson_traced, SolverConfig};
//!
//! let f = |x: f64| x * x - 2.0;
//! let df = |x: f64| 2.0 * x;
//!
//! let outcome = newton_raphson_traced(f, df, 1.5, &SolverConfig::default()).unwrap();
//! assert!(outcome.converged);
//! assert!((outcome.root - std::f64::consts::SQRT_2).abs() < 1e-10);
//! assert_eq!(outcome.trace.len() as u32, outcome.iterations);
//! ```

mod newton;

pub use newton::{newton_raphson_traced, NewtonOutcome, NewtonStep};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence and for the derivative guard.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(50);

        assert!((config.tolerance - 1e-8).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    }
}
