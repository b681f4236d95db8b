//! Engine settings tree.
//!
//! Every field has a serde default, so a configuration file only needs to
//! name the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use fincalc_analysis::config::{AnalysisConfig, DEFAULT_CHUNK_SIZE, DEFAULT_PARALLEL_THRESHOLD};
use fincalc_math::solvers::{SolverConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// SOLVER
// =============================================================================

/// IRR solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Starting rate for Newton-Raphson.
    #[serde(default = "default_irr_guess")]
    pub irr_guess: f64,

    /// Convergence tolerance on `|NPV|` and on the step size.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Iteration cap.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_irr_guess() -> f64 {
    0.1
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            irr_guess: default_irr_guess(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl SolverSettings {
    /// Converts to the solver's own configuration.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }
}

// =============================================================================
// SENSITIVITY
// =============================================================================

/// Sensitivity sweep settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensitivitySettings {
    /// Grid used when a request names none. When absent, the grid is chosen
    /// from the swept parameter's role.
    #[serde(default)]
    pub variations: Option<Vec<f64>>,
}

// =============================================================================
// SCENARIO
// =============================================================================

/// Scenario analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSettings {
    /// Weight of the base case in the aggregates.
    #[serde(default = "default_base_probability")]
    pub base_probability: f64,
}

fn default_base_probability() -> f64 {
    fincalc_analysis::scenario::DEFAULT_BASE_PROBABILITY
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self {
            base_probability: default_base_probability(),
        }
    }
}

// =============================================================================
// MONTE CARLO
// =============================================================================

/// Monte Carlo settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSettings {
    /// Iterations when a request names none.
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Fixed seed; a random seed is drawn per run when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Allow rayon fan-out (requires the `parallel` feature).
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Minimum iterations before running in parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Iterations per RNG stream.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_iterations() -> usize {
    fincalc_analysis::monte_carlo::DEFAULT_ITERATIONS
}

fn default_parallel() -> bool {
    true
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            seed: None,
            parallel: default_parallel(),
            parallel_threshold: default_parallel_threshold(),
            chunk_size: default_chunk_size(),
        }
    }
}

impl MonteCarloSettings {
    /// Converts to the analysis layer's scheduling configuration.
    #[must_use]
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig::new()
            .with_parallel(self.parallel)
            .with_threshold(self.parallel_threshold)
            .with_chunk_size(self.chunk_size)
    }
}

// =============================================================================
// ENGINE CONFIGURATION
// =============================================================================

/// Complete engine configuration.
///
/// # Example
///
/// ```rust
/// use fincalc_config::{EngineConfig, Validate};
///
/// let config = EngineConfig::from_toml_str(
///     r#"
///     [solver]
///     tolerance = 1e-12
///
///     [monte_carlo]
///     iterations = 5000
///     seed = 42
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.solver.max_iterations, 100);
/// assert_eq!(config.monte_carlo.seed, Some(42));
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// IRR solver settings.
    #[serde(default)]
    pub solver: SolverSettings,

    /// Sensitivity sweep settings.
    #[serde(default)]
    pub sensitivity: SensitivitySettings,

    /// Scenario settings.
    #[serde(default)]
    pub scenario: ScenarioSettings,

    /// Monte Carlo settings.
    #[serde(default)]
    pub monte_carlo: MonteCarloSettings,
}

impl EngineConfig {
    /// Default settings.
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
    }

    /// Tighter solver tolerance and more simulation iterations.
    #[must_use]
    pub fn high_precision() -> Self {
        Self {
            solver: SolverSettings {
                tolerance: 1e-12,
                max_iterations: 500,
                ..SolverSettings::default()
            },
            monte_carlo: MonteCarloSettings {
                iterations: 10_000,
                ..MonteCarloSettings::default()
            },
            ..Self::default()
        }
    }

    /// Looser solver tolerance and fewer simulation iterations.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            solver: SolverSettings {
                tolerance: 1e-8,
                max_iterations: 50,
                ..SolverSettings::default()
            },
            monte_carlo: MonteCarloSettings {
                iterations: 500,
                ..MonteCarloSettings::default()
            },
            ..Self::default()
        }
    }

    /// Sets the solver tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.solver.tolerance = tolerance;
        self
    }

    /// Sets the solver iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.solver.max_iterations = max_iterations;
        self
    }

    /// Sets the IRR starting guess.
    #[must_use]
    pub fn with_irr_guess(mut self, guess: f64) -> Self {
        self.solver.irr_guess = guess;
        self
    }

    /// Sets the sensitivity grid used when a request names none.
    #[must_use]
    pub fn with_variations(mut self, variations: Vec<f64>) -> Self {
        self.sensitivity.variations = Some(variations);
        self
    }

    /// Sets the base-case weight for scenarios.
    #[must_use]
    pub fn with_base_probability(mut self, probability: f64) -> Self {
        self.scenario.base_probability = probability;
        self
    }

    /// Sets the default Monte Carlo iteration count.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.monte_carlo.iterations = iterations;
        self
    }

    /// Fixes the Monte Carlo seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.monte_carlo.seed = Some(seed);
        self
    }

    /// Enables or disables parallel simulation.
    #[must_use]
    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.monte_carlo.parallel = enabled;
        self
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> ConfigResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&source)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::Parse {
            format: "toml",
            message: err.to_string(),
        })
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let solver = &self.solver;
        if !(solver.irr_guess.is_finite() && solver.irr_guess > -1.0) {
            errors.push(ValidationError::with_rule(
                "solver.irr_guess",
                format!("IRR guess {} must be greater than -1", solver.irr_guess),
                "valid_rate",
            ));
        }
        if !(solver.tolerance > 0.0 && solver.tolerance <= 1e-4) {
            errors.push(ValidationError::with_rule(
                "solver.tolerance",
                "Solver tolerance must be between 0 and 1e-4",
                "valid_tolerance",
            ));
        }
        if solver.max_iterations == 0 || solver.max_iterations > 10_000 {
            errors.push(ValidationError::with_rule(
                "solver.max_iterations",
                "Max iterations must be between 1 and 10000",
                "valid_iterations",
            ));
        }

        if let Some(variations) = &self.sensitivity.variations {
            if variations.is_empty() {
                errors.push(ValidationError::new(
                    "sensitivity.variations",
                    "Variation grid cannot be empty",
                ));
            }
            if variations.iter().any(|v| !v.is_finite()) {
                errors.push(ValidationError::with_rule(
                    "sensitivity.variations",
                    "Variations must be finite percentages",
                    "finite",
                ));
            }
        }

        let base_probability = self.scenario.base_probability;
        if !(base_probability.is_finite() && base_probability >= 0.0) {
            errors.push(ValidationError::with_rule(
                "scenario.base_probability",
                format!("Base probability {base_probability} must be non-negative"),
                "non_negative",
            ));
        }

        let mc = &self.monte_carlo;
        if mc.iterations == 0 || mc.iterations > 10_000_000 {
            errors.push(ValidationError::with_rule(
                "monte_carlo.iterations",
                "Iterations must be between 1 and 10000000",
                "valid_iterations",
            ));
        }
        if mc.chunk_size == 0 {
            errors.push(ValidationError::new(
                "monte_carlo.chunk_size",
                "Chunk size must be at least 1",
            ));
        }

        errors
    }
}
