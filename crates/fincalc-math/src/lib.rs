//! # Fincalc Math
//!
//! Numerical building blocks for the Fincalc financial calculation engine.
//!
//! This crate provides:
//!
//! - **Solvers**: Newton-Raphson root finding with a per-iteration trace and
//!   a flat-derivative guard
//! - **Statistics**: Mean, population variance, probability-weighted moments
//!   and floor-indexed percentiles over sorted samples
//!
//! ## Design Philosophy
//!
//! - **Reported, not thrown**: Exhausting the iteration budget is an outcome
//!   the caller inspects; only a zero derivative aborts a solve
//! - **Exact indexing**: Percentiles use `sorted[floor(n * p)]` with no
//!   interpolation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod solvers;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::solvers::{
        newton_raphson_traced, NewtonOutcome, NewtonStep, SolverConfig, DEFAULT_MAX_ITERATIONS,
        DEFAULT_TOLERANCE,
    };
    pub use crate::statistics::{
        floor_percentile, mean, population_variance, sort_ascending, upper_median,
        weighted_moments, WeightedMoments,
    };
}

pub use error::{MathError, MathResult};
