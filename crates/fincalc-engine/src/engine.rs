//! The calculation facade.
//!
//! `FinancialEngine` pairs the shared formula catalog with an
//! [`EngineConfig`] and exposes one method per call the reporting layer
//! makes. It holds no per-request state, so one engine can serve any number
//! of callers concurrently.
//!
//! # Example
//!
//! ```rust
//! use fincalc_engine::prelude::*;
//!
//! let engine = FinancialEngine::standard();
//! let npv = engine.calculate_defaults("net_present_value").unwrap();
//! assert!(npv.primary_value().unwrap() > 0.0);
//!
//! let report = engine
//!     .sensitivity("net_present_value", &engine.default_params("net_present_value").unwrap(), "discount_rate", None)
//!     .unwrap();
//! assert_eq!(report.parameter_index, 0);
//! ```

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use fincalc_analysis::comparison::{
    benchmark_statistics, compare, BenchmarkStatistics, ComparisonReport, Peer,
};
use fincalc_analysis::config::AnalysisConfig;
use fincalc_analysis::monte_carlo::{simulate, MonteCarloResult, MonteCarloSpec};
use fincalc_analysis::scenario::{analyze_scenarios, ParamSelector, Scenario, ScenarioSet};
use fincalc_analysis::sensitivity::{analyze_sensitivity, SensitivityReport};
use fincalc_config::{EngineConfig, Validate};
use fincalc_core::prelude::*;
use fincalc_formulas::amortization::{loan_amortization, LoanAmortization};
use fincalc_formulas::budget::{flexible_budget, FlexibleBudget};
use fincalc_formulas::catalog::{validate_inputs, FormulaCatalog, FormulaDescriptor, ValidationReport};
use fincalc_formulas::investment::{cash_flow_analysis, internal_rate_of_return, CashFlowAnalysis};
use fincalc_math::solvers::SolverConfig;

use crate::error::EngineResult;

/// Stateless calculation engine over the global formula catalog.
#[derive(Clone)]
pub struct FinancialEngine {
    config: EngineConfig,
    catalog: &'static FormulaCatalog,
}

impl std::fmt::Debug for FinancialEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinancialEngine")
            .field("config", &self.config)
            .field("formulas", &self.catalog.len())
            .finish()
    }
}

impl Default for FinancialEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl FinancialEngine {
    /// Creates an engine after validating `config`.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate_or_error()?;
        Ok(Self {
            config,
            catalog: FormulaCatalog::global(),
        })
    }

    /// Engine with the standard settings.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            config: EngineConfig::standard(),
            catalog: FormulaCatalog::global(),
        }
    }

    /// Loads the configuration from a `.toml` or `.json` file.
    pub fn from_config_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let config = EngineConfig::load(path)?;
        info!(path = %path.display(), "Loaded engine configuration");
        Self::new(config)
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The formula catalog.
    #[must_use]
    pub fn catalog(&self) -> &'static FormulaCatalog {
        self.catalog
    }

    // =========================================================================
    // CATALOG
    // =========================================================================

    /// Looks up a formula.
    pub fn lookup(&self, id: &str) -> EngineResult<&'static FormulaDescriptor> {
        Ok(self.catalog.lookup(id)?)
    }

    /// Formula ids in `category`.
    #[must_use]
    pub fn formulas_in(&self, category: Category) -> Vec<&'static str> {
        self.catalog.list_by_category(category)
    }

    /// Example parameters registered with a formula.
    pub fn default_params(&self, id: &str) -> EngineResult<Vec<ParamValue>> {
        Ok(self.lookup(id)?.default_params.clone())
    }

    /// Checks parameters without calculating.
    #[instrument(level = "debug", skip_all, fields(formula = %id))]
    pub fn validate_inputs(&self, id: &str, params: &[ParamValue]) -> EngineResult<ValidationReport> {
        let descriptor = self.lookup(id)?;
        let report = validate_inputs(descriptor, params);
        if !report.is_valid() {
            debug!(errors = report.errors.len(), "Input validation failed");
        }
        if !report.warnings.is_empty() {
            debug!(warnings = report.warnings.len(), "Input validation warnings");
        }
        Ok(report)
    }

    // =========================================================================
    // CALCULATION
    // =========================================================================

    /// Validates `params` and runs the formula.
    ///
    /// An IRR that exhausts its iteration budget is returned as data with
    /// `converged == false`.
    #[instrument(skip_all, fields(formula = %id))]
    pub fn calculate(&self, id: &str, params: &[ParamValue]) -> EngineResult<FormulaResult> {
        let descriptor = self.lookup(id)?;
        let result = descriptor.calculate(params).map_err(|err| {
            warn!(error = %err, "Calculation failed");
            err
        })?;

        if let FormulaResult::Irr(solution) = &result {
            if !solution.converged {
                warn!(
                    iterations = solution.iterations,
                    last_estimate = solution.rate,
                    "IRR did not converge"
                );
            }
        }
        debug!(
            value = ?result.primary_value(),
            tier = ?result.tier().map(|tier| tier.level),
            "Calculation complete"
        );
        Ok(result)
    }

    /// Runs a formula on its registered example parameters.
    pub fn calculate_defaults(&self, id: &str) -> EngineResult<FormulaResult> {
        let params = self.default_params(id)?;
        self.calculate(id, &params)
    }

    /// Solves IRR with the configured guess, tolerance and iteration cap.
    #[instrument(skip_all, fields(flows = cash_flows.len()))]
    pub fn internal_rate_of_return(&self, cash_flows: &[f64]) -> EngineResult<IrrSolution> {
        let solver = &self.config.solver;
        let solution =
            internal_rate_of_return(cash_flows, solver.irr_guess, &self.solver_config())?;
        if solution.converged {
            debug!(rate = solution.rate, iterations = solution.iterations, "IRR converged");
        } else {
            warn!(iterations = solution.iterations, "IRR did not converge");
        }
        Ok(solution)
    }

    /// NPV, IRR, payback and profitability index for one series.
    #[instrument(skip_all, fields(flows = cash_flows.len(), discount_rate = discount_rate))]
    pub fn cash_flow_analysis(
        &self,
        cash_flows: &[f64],
        discount_rate: f64,
    ) -> EngineResult<CashFlowAnalysis> {
        let analysis = cash_flow_analysis(
            cash_flows,
            discount_rate,
            self.config.solver.irr_guess,
            &self.solver_config(),
        )?;
        debug!(
            npv = analysis.npv,
            payback = ?analysis.payback_period,
            "Cash flow analysis complete"
        );
        Ok(analysis)
    }

    /// Amortizes a loan quoted with an annual rate.
    #[instrument(skip_all, fields(principal = principal, annual_rate = annual_rate, years = years))]
    pub fn loan_amortization(
        &self,
        principal: f64,
        annual_rate: f64,
        years: f64,
        payments_per_year: f64,
    ) -> EngineResult<LoanAmortization> {
        let loan = loan_amortization(principal, annual_rate, years, payments_per_year)?;
        debug!(payment = loan.payment, total_interest = loan.total_interest, "Loan amortized");
        Ok(loan)
    }

    /// Flexible budget across activity levels.
    #[instrument(skip_all, fields(levels = activity_levels.len()))]
    pub fn flexible_budget(
        &self,
        fixed_costs: f64,
        variable_cost_per_unit: f64,
        price_per_unit: f64,
        activity_levels: &[f64],
    ) -> EngineResult<FlexibleBudget> {
        Ok(flexible_budget(
            fixed_costs,
            variable_cost_per_unit,
            price_per_unit,
            activity_levels,
        )?)
    }

    // =========================================================================
    // ANALYSIS
    // =========================================================================

    /// Sweeps one parameter.
    ///
    /// `variations` falls back to the configured grid, then to the grid for
    /// the parameter's role.
    #[instrument(skip_all, fields(formula = %id))]
    pub fn sensitivity(
        &self,
        id: &str,
        params: &[ParamValue],
        param: impl Into<ParamSelector>,
        variations: Option<&[f64]>,
    ) -> EngineResult<SensitivityReport> {
        let descriptor = self.lookup(id)?;
        let index = param.into().resolve(descriptor)?;
        let grid = variations.or(self.config.sensitivity.variations.as_deref());
        let report = analyze_sensitivity(descriptor, params, index, grid)?;

        let failed = report.variations.iter().filter(|point| !point.is_ok()).count();
        if failed > 0 {
            warn!(failed, parameter = report.parameter_name, "Sensitivity points failed");
        }
        info!(
            parameter = report.parameter_name,
            points = report.variations.len(),
            thresholds = report.critical_thresholds.len(),
            risk = ?report.summary.map(|summary| summary.risk_level),
            "Sensitivity analysis complete"
        );
        Ok(report)
    }

    /// Evaluates scenarios with the configured base-case weight.
    pub fn scenarios(
        &self,
        id: &str,
        params: &[ParamValue],
        scenarios: &[Scenario],
    ) -> EngineResult<ScenarioSet> {
        self.scenarios_weighted(id, params, scenarios, self.config.scenario.base_probability)
    }

    /// Evaluates scenarios with an explicit base-case weight.
    #[instrument(skip_all, fields(formula = %id, scenarios = scenarios.len()))]
    pub fn scenarios_weighted(
        &self,
        id: &str,
        params: &[ParamValue],
        scenarios: &[Scenario],
        base_probability: f64,
    ) -> EngineResult<ScenarioSet> {
        let descriptor = self.lookup(id)?;
        let set = analyze_scenarios(descriptor, params, scenarios, base_probability)?;

        let failed = set.scenarios.iter().filter(|s| s.error.is_some()).count();
        if failed > 0 {
            warn!(failed, "Scenarios failed");
        }
        match &set.aggregates {
            Some(aggregates) => info!(
                expected_value = aggregates.expected_value,
                std_dev = aggregates.std_dev,
                "Scenario analysis complete"
            ),
            None => warn!("Scenario weights sum to zero; no aggregates"),
        }
        Ok(set)
    }

    /// A simulation spec carrying the configured iteration count and seed.
    #[must_use]
    pub fn monte_carlo_spec(&self) -> MonteCarloSpec {
        let settings = &self.config.monte_carlo;
        let spec = MonteCarloSpec::new(settings.iterations);
        match settings.seed {
            Some(seed) => spec.with_seed(seed),
            None => spec,
        }
    }

    /// Runs a Monte Carlo simulation.
    ///
    /// A spec without a seed takes the configured seed, if any.
    #[instrument(skip_all, fields(formula = %id, iterations = spec.iterations))]
    pub fn simulate(
        &self,
        id: &str,
        params: &[ParamValue],
        spec: &MonteCarloSpec,
    ) -> EngineResult<MonteCarloResult> {
        let descriptor = self.lookup(id)?;
        let mut spec = spec.clone();
        if spec.seed.is_none() {
            spec.seed = self.config.monte_carlo.seed;
        }
        let result = simulate(descriptor, params, &spec, &self.analysis_config())?;

        if result.failed_iterations > 0 {
            warn!(
                failed = result.failed_iterations,
                retained = result.valid_samples,
                "Monte Carlo iterations skipped"
            );
        }
        info!(
            seed = result.seed,
            mean = result.mean,
            std_dev = result.std_dev,
            probability_of_loss = result.probability_of_loss,
            "Monte Carlo simulation complete"
        );
        Ok(result)
    }

    /// Compares peer parameter sets against the base.
    #[instrument(skip_all, fields(formula = %id, peers = peers.len()))]
    pub fn compare(
        &self,
        id: &str,
        params: &[ParamValue],
        peers: &[Peer],
    ) -> EngineResult<ComparisonReport> {
        let descriptor = self.lookup(id)?;
        let report = compare(descriptor, params, peers, &self.analysis_config())?;
        debug!(base = report.base_result, "Comparison complete");
        Ok(report)
    }

    /// Ranks a value among benchmark values.
    #[instrument(level = "debug", skip_all, fields(subject = subject, benchmarks = benchmarks.len()))]
    pub fn benchmark(&self, subject: f64, benchmarks: &[f64]) -> EngineResult<BenchmarkStatistics> {
        Ok(benchmark_statistics(subject, benchmarks)?)
    }

    fn solver_config(&self) -> SolverConfig {
        self.config.solver.solver_config()
    }

    fn analysis_config(&self) -> AnalysisConfig {
        self.config.monte_carlo.analysis_config()
    }
}
