//! # Fincalc Core
//!
//! Core types and abstractions shared by every Fincalc crate.
//!
//! This crate provides:
//!
//! - **Error taxonomy**: [`FinError`], the single error type returned by
//!   formula evaluation and the analysis layers
//! - **Parameters**: [`ParamValue`], [`ParamSpec`] and [`ParamRole`], the
//!   positional inputs of a formula and their validation constraints
//! - **Results**: [`FormulaResult`], a tagged union of every formula output,
//!   normalized through [`FormulaResult::primary_value`]
//! - **Tiers**: [`Tier`] and [`Ladder`], threshold ladders that classify a
//!   ratio into a categorical band
//!
//! ## Example
//!
//! ```rust
//! use fincalc_core::prelude::*;
//!
//! let spec = ParamSpec::scalar("discount_rate", "Discount Rate (%)", ParamRole::Rate);
//! assert!(spec.check(&ParamValue::from(0.12)).is_ok());
//! assert!(spec.check(&ParamValue::from(-1.0)).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{FinError, FinResult};
    pub use crate::types::{
        AmortizationRow, AmortizationSchedule, BreakEvenDetail, Category, DuPont, FormulaResult,
        IrrIteration, IrrSolution, Ladder, ParamKind, ParamRole, ParamSpec, ParamValue,
        RatioDetail, RatioResult, Tier,
    };
}

pub use error::{FinError, FinResult};
