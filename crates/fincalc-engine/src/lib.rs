//! # Fincalc Engine
//!
//! The calculation facade of the Fincalc financial calculation engine.
//!
//! [`FinancialEngine`] is the single call boundary for the reporting layer:
//!
//! - **Catalog**: Formula lookup, categories and example parameters
//! - **Calculation**: Validated formula runs, IRR with configured solver
//!   settings, cash-flow appraisal, loan amortization, flexible budgets
//! - **Analysis**: Sensitivity sweeps, scenario sets, Monte Carlo simulation,
//!   peer comparison and benchmark ranking
//!
//! Every public call opens a `tracing` span and reports partial failures as
//! `warn` events. The crate never installs a subscriber.
//!
//! ## Quick Start
//!
//! ```rust
//! use fincalc_engine::prelude::*;
//!
//! let engine = FinancialEngine::new(EngineConfig::standard().with_seed(42)).unwrap();
//! let params = engine.default_params("net_present_value").unwrap();
//!
//! let spec = engine.monte_carlo_spec().with_range(0, 0.25);
//! let result = engine.simulate("net_present_value", &params, &spec).unwrap();
//! assert_eq!(result.seed, 42);
//! assert_eq!(result.valid_samples + result.failed_iterations, 1000);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod engine;
pub mod error;

pub use engine::FinancialEngine;
pub use error::{EngineError, EngineResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::FinancialEngine;
    pub use crate::error::{EngineError, EngineResult};

    pub use fincalc_analysis::prelude::*;
    pub use fincalc_config::prelude::*;
    pub use fincalc_formulas::prelude::*;
}
