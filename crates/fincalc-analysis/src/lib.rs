//! # Fincalc Analysis
//!
//! Derived analysis layers that re-run catalog formulas under perturbed
//! inputs and aggregate the results.
//!
//! This crate provides:
//!
//! - **Sensitivity**: One-factor sweeps with elasticities, magnitude bands and
//!   critical-level crossings
//! - **Scenarios**: Named what-if cases with probability-weighted expected
//!   value, variance and best/worst case
//! - **Monte Carlo**: Uniform perturbation of selected inputs with percentile
//!   bands, value at risk and loss probability
//! - **Comparison**: Peer comparison and benchmark ranking
//!
//! ## Partial failure
//!
//! A failing sweep point, scenario, peer or simulation iteration is recorded
//! (or, for Monte Carlo, counted) and the run continues. Only a failure of the
//! base calculation aborts an analysis.
//!
//! ## Features
//!
//! - `parallel`: Fan Monte Carlo chunks and peer comparisons out over rayon
//!   when [`AnalysisConfig::should_parallelize`](config::AnalysisConfig::should_parallelize)
//!   allows it
//!
//! ## Example
//!
//! ```rust
//! use fincalc_analysis::prelude::*;
//! use fincalc_formulas::catalog::FormulaCatalog;
//!
//! let npv = FormulaCatalog::global().lookup("net_present_value").unwrap();
//! let report = analyze_sensitivity(npv, &npv.default_params, 0, None).unwrap();
//! assert!(report.variations.iter().all(|p| p.is_ok()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod comparison;
pub mod config;
pub mod monte_carlo;
pub mod parallel;
pub mod scenario;
pub mod sensitivity;

mod perturb;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::comparison::{
        benchmark_statistics, compare, BenchmarkStatistics, CompetitivePosition,
        ComparisonReport, Peer, PeerComparison, Performance,
    };
    pub use crate::config::AnalysisConfig;
    pub use crate::monte_carlo::{
        simulate, ConfidenceBand, MonteCarloResult, MonteCarloSpec, VariableRange,
    };
    pub use crate::scenario::{
        analyze_scenarios, ImpactDirection, ImpactMagnitude, ParamDelta, ParamSelector, Scenario,
        ScenarioAggregates, ScenarioImpact, ScenarioOutcome, ScenarioSet,
    };
    pub use crate::sensitivity::{
        analyze_sensitivity, default_variations, CriticalThreshold, Crossing, RiskLevel,
        SensitivityLevel, SensitivityPoint, SensitivityReport,
    };
}
