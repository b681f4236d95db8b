//! # Fincalc Config
//!
//! Settings for the Fincalc calculation engine: IRR solver tolerances,
//! sensitivity grids, the scenario base-case weight and Monte Carlo
//! scheduling.
//!
//! Settings load from TOML or JSON. Every field has a default, so a file
//! only lists what it changes, and every load is validated before it is
//! returned.
//!
//! # Example
//!
//! ```rust
//! use fincalc_config::{EngineConfig, Validate};
//!
//! let config = EngineConfig::high_precision().with_seed(42);
//! assert!(config.is_valid());
//!
//! let solver = config.solver.solver_config();
//! assert_eq!(solver.max_iterations, 500);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]

pub mod engine;
pub mod error;

pub use engine::{
    EngineConfig, MonteCarloSettings, ScenarioSettings, SensitivitySettings, SolverSettings,
};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::{
        EngineConfig, MonteCarloSettings, ScenarioSettings, SensitivitySettings, SolverSettings,
    };
    pub use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
}
