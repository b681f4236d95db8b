//! # Fincalc Formulas
//!
//! The financial formula library and the catalog that exposes it.
//!
//! This crate provides:
//!
//! - **Time value**: Present and future value with annuities, compound
//!   interest, effective annual rate
//! - **Investment**: NPV, traced Newton-Raphson IRR, payback and discounted
//!   payback, a combined cash-flow appraisal
//! - **Ratios**: Liquidity, leverage, profitability, market, break-even and
//!   valuation ratios, each classified through its own threshold ladder
//! - **Amortization**: Level loan payments and full schedules
//! - **Budget**: Flexible budgets across activity levels
//! - **Catalog**: [`FormulaCatalog`](catalog::FormulaCatalog), an immutable
//!   id-keyed registry of every formula with metadata and validation
//!
//! ## Usage
//!
//! ```rust
//! use fincalc_formulas::prelude::*;
//!
//! let npv = FormulaCatalog::global().lookup("net_present_value").unwrap();
//! let params = vec![
//!     ParamValue::from(0.12),
//!     ParamValue::from(vec![-100_000.0, 25_000.0, 35_000.0, 40_000.0, 45_000.0, 50_000.0]),
//! ];
//! let value = npv.calculate(&params).unwrap().primary_value().unwrap();
//! assert!(value > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod amortization;
pub mod budget;
pub mod catalog;
pub mod investment;
pub mod ratios;
pub mod time_value;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use fincalc_core::prelude::*;

    pub use crate::amortization::{
        amortization_schedule, loan_amortization, loan_payment, LoanAmortization,
    };
    pub use crate::budget::{flexible_budget, BudgetLine, FlexibleBudget};
    pub use crate::catalog::{
        validate_inputs, FormulaCatalog, FormulaDescriptor, Preference, ValidationReport,
    };
    pub use crate::investment::{
        cash_flow_analysis, discounted_payback_period, internal_rate_of_return, net_present_value,
        npv_breakdown, payback_period, CashFlowAnalysis, NpvBreakdown, DEFAULT_IRR_GUESS,
    };
    pub use crate::time_value::{
        compound_interest, effective_interest_rate, future_value, present_value, AnnuityTiming,
    };
}
