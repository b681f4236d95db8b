//! Monte Carlo simulation over formula inputs.
//!
//! Each iteration scales the selected parameters by a factor drawn uniformly
//! from `[1 − range, 1 + range]` and recomputes the formula. Iterations whose
//! calculation fails are skipped; the retained sample count is reported next
//! to the requested one.
//!
//! Iterations are grouped into chunks of [`AnalysisConfig::chunk_size`]. Each
//! chunk draws from its own `StdRng` seeded from the run seed and the chunk
//! index, so a seeded run produces the same sorted samples whether chunks run
//! sequentially or on the rayon pool.
//!
//! Percentiles use `sorted[floor(n · p)]`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use fincalc_core::prelude::*;
use fincalc_formulas::catalog::FormulaDescriptor;
use fincalc_math::statistics::{
    floor_percentile, mean, population_variance, sort_ascending, upper_median,
};

use crate::config::AnalysisConfig;
use crate::parallel::maybe_parallel_map;
use crate::perturb::{check_index, evaluate};

/// Default number of iterations.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Largest accepted relative range. Factors are drawn from
/// `[1 - range, 1 + range]`, whose width must stay finite.
pub const MAX_RANGE: f64 = 1e6;

/// Results below this fraction of the base result count as a loss for
/// formulas whose sign carries no meaning.
const LOSS_FRACTION_OF_BASE: f64 = 0.9;

/// Confidence levels and their `(lower, upper)` percentiles.
const BANDS: [(f64, f64, f64); 3] = [
    (0.90, 0.05, 0.95),
    (0.95, 0.025, 0.975),
    (0.99, 0.005, 0.995),
];

/// Relative variation applied to one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariableRange {
    /// Position of the varied parameter.
    pub param_index: usize,
    /// Half-width of the uniform factor around 1 (0.2 means ±20%).
    pub range: f64,
}

/// What to simulate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloSpec {
    /// Requested iterations.
    pub iterations: usize,
    /// Varied parameters. Parameters not listed stay at their base value.
    #[serde(default)]
    pub ranges: Vec<VariableRange>,
    /// RNG seed. A random seed is drawn when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MonteCarloSpec {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl MonteCarloSpec {
    /// Creates a spec with no varied parameters.
    #[must_use]
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            ranges: Vec::new(),
            seed: None,
        }
    }

    /// Varies the parameter at `param_index` by `±range`.
    #[must_use]
    pub fn with_range(mut self, param_index: usize, range: f64) -> Self {
        self.ranges.push(VariableRange { param_index, range });
        self
    }

    /// Fixes the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self, descriptor: &FormulaDescriptor) -> FinResult<()> {
        if self.iterations == 0 {
            return Err(FinError::validation("iterations", "must be at least 1"));
        }
        for (i, range) in self.ranges.iter().enumerate() {
            check_index(descriptor, range.param_index)?;
            if !(0.0..=MAX_RANGE).contains(&range.range) {
                return Err(FinError::validation(
                    "ranges",
                    format!("range {} must be between 0 and {MAX_RANGE}", range.range),
                ));
            }
            if self.ranges[..i]
                .iter()
                .any(|other| other.param_index == range.param_index)
            {
                return Err(FinError::validation(
                    "ranges",
                    format!("parameter {} is varied twice", range.param_index),
                ));
            }
        }
        Ok(())
    }
}

/// Symmetric percentile interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceBand {
    /// Confidence level, e.g. 0.95.
    pub confidence: f64,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

/// Output of [`simulate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloResult {
    /// Formula that was simulated.
    pub formula_id: &'static str,
    /// Requested iterations.
    pub iterations: usize,
    /// Retained samples; statistics are computed over these only.
    pub valid_samples: usize,
    /// Iterations whose calculation failed.
    pub failed_iterations: usize,
    /// Seed the run used.
    pub seed: u64,
    /// Result at the base parameters.
    pub base_result: f64,
    /// Retained samples, ascending.
    pub samples: Vec<f64>,
    /// Mean.
    pub mean: f64,
    /// `samples[floor(n / 2)]`.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// `std_dev / mean`; absent when the mean is zero.
    pub coefficient_of_variation: Option<f64>,
    /// Share of samples counted as a loss.
    pub probability_of_loss: f64,
    /// 5th percentile.
    pub value_at_risk_95: f64,
    /// 1st percentile.
    pub value_at_risk_99: f64,
    /// 90%, 95% and 99% bands.
    pub confidence_bands: Vec<ConfidenceBand>,
}

impl MonteCarloResult {
    /// Returns the band for `confidence`, if computed.
    #[must_use]
    pub fn band(&self, confidence: f64) -> Option<ConfidenceBand> {
        self.confidence_bands
            .iter()
            .copied()
            .find(|band| (band.confidence - confidence).abs() < 1e-9)
    }
}

#[derive(Debug, Clone, Copy)]
struct Chunk {
    index: usize,
    len: usize,
}

/// Runs a Monte Carlo simulation.
///
/// # Errors
///
/// Fails when the spec is invalid, the base parameters do not produce a
/// result, or every iteration fails ([`FinError::NoValidSamples`]).
///
/// # Example
///
/// ```rust
/// use fincalc_analysis::config::AnalysisConfig;
/// use fincalc_analysis::monte_carlo::{simulate, MonteCarloSpec};
/// use fincalc_formulas::catalog::FormulaCatalog;
///
/// let npv = FormulaCatalog::global().lookup("net_present_value").unwrap();
/// let spec = MonteCarloSpec::new(500).with_range(0, 0.3).with_seed(7);
/// let result = simulate(npv, &npv.default_params, &spec, &AnalysisConfig::default()).unwrap();
/// assert_eq!(result.valid_samples, 500);
/// assert!(result.value_at_risk_99 <= result.value_at_risk_95);
/// ```
pub fn simulate(
    descriptor: &FormulaDescriptor,
    base_params: &[ParamValue],
    spec: &MonteCarloSpec,
    config: &AnalysisConfig,
) -> FinResult<MonteCarloResult> {
    spec.validate(descriptor)?;
    let base_result = evaluate(descriptor, base_params)?;
    let seed = spec.seed.unwrap_or_else(rand::random);

    let chunk_size = config.chunk_size.max(1);
    let chunks: Vec<Chunk> = (0..spec.iterations.div_ceil(chunk_size))
        .map(|index| Chunk {
            index,
            len: chunk_size.min(spec.iterations - index * chunk_size),
        })
        .collect();

    let per_chunk = maybe_parallel_map(&chunks, spec.iterations, config, |chunk| {
        run_chunk(descriptor, base_params, &spec.ranges, seed, *chunk)
    });

    let mut samples = Vec::with_capacity(spec.iterations);
    for chunk_samples in per_chunk {
        samples.extend(chunk_samples);
    }
    let failed_iterations = spec.iterations - samples.len();
    if samples.is_empty() {
        return Err(FinError::NoValidSamples {
            iterations: spec.iterations,
        });
    }
    if failed_iterations > 0 {
        log::debug!(
            "{}: {failed_iterations} of {} iterations failed and were skipped",
            descriptor.id,
            spec.iterations
        );
    }

    sort_ascending(&mut samples);
    let stats = SampleStats::from_sorted(&samples)?;

    let losses = if descriptor.signed_outcome {
        samples.iter().filter(|&&x| x < 0.0).count()
    } else {
        let threshold = base_result * LOSS_FRACTION_OF_BASE;
        samples.iter().filter(|&&x| x < threshold).count()
    };
    let n = samples.len() as f64;

    let confidence_bands = BANDS
        .iter()
        .map(|&(confidence, lower, upper)| {
            Ok(ConfidenceBand {
                confidence,
                lower: floor_percentile(&samples, lower)?,
                upper: floor_percentile(&samples, upper)?,
            })
        })
        .collect::<Result<Vec<_>, fincalc_math::MathError>>()
        .map_err(stats_error)?;

    Ok(MonteCarloResult {
        formula_id: descriptor.id,
        iterations: spec.iterations,
        valid_samples: samples.len(),
        failed_iterations,
        seed,
        base_result,
        mean: stats.mean,
        median: upper_median(&samples).map_err(stats_error)?,
        std_dev: stats.std_dev,
        min: stats.min,
        max: stats.max,
        coefficient_of_variation: (stats.mean != 0.0).then(|| stats.std_dev / stats.mean),
        probability_of_loss: losses as f64 / n,
        value_at_risk_95: floor_percentile(&samples, 0.05).map_err(stats_error)?,
        value_at_risk_99: floor_percentile(&samples, 0.01).map_err(stats_error)?,
        confidence_bands,
        samples,
    })
}

fn chunk_seed(seed: u64, chunk: usize) -> u64 {
    seed.wrapping_add((chunk as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn run_chunk(
    descriptor: &FormulaDescriptor,
    base_params: &[ParamValue],
    ranges: &[VariableRange],
    seed: u64,
    chunk: Chunk,
) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(chunk_seed(seed, chunk.index));
    let mut samples = Vec::with_capacity(chunk.len);
    let mut params = base_params.to_vec();

    for _ in 0..chunk.len {
        for range in ranges {
            let factor = if range.range == 0.0 {
                1.0
            } else {
                rng.gen_range((1.0 - range.range)..=(1.0 + range.range))
            };
            params[range.param_index] = base_params[range.param_index].scaled(factor);
        }
        match evaluate(descriptor, &params) {
            Ok(value) => samples.push(value),
            Err(err) => log::debug!("{} iteration skipped: {err}", descriptor.id),
        }
    }
    samples
}

struct SampleStats {
    mean: f64,
    std_dev: f64,
    min: f64,
    max: f64,
}

impl SampleStats {
    fn from_sorted(sorted: &[f64]) -> FinResult<Self> {
        let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
            return Err(FinError::NoValidSamples { iterations: 0 });
        };
        // Identical samples: report them exactly instead of the rounded sum.
        if min == max {
            return Ok(Self {
                mean: min,
                std_dev: 0.0,
                min,
                max,
            });
        }
        let mean = mean(sorted).map_err(stats_error)?;
        let variance = population_variance(sorted, mean).map_err(stats_error)?;
        Ok(Self {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }
}

fn stats_error(err: fincalc_math::MathError) -> FinError {
    FinError::validation("samples", err.to_string())
}
