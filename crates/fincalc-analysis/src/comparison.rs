//! Peer comparison and benchmark statistics.

use serde::{Deserialize, Serialize};

use fincalc_core::prelude::*;
use fincalc_formulas::catalog::{FormulaDescriptor, Preference};
use fincalc_math::statistics::{mean, population_variance, sort_ascending, upper_median};

use crate::config::AnalysisConfig;
use crate::parallel::maybe_parallel_map;
use crate::perturb::evaluate;

/// A named parameter set to compare against the base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    /// Peer name (company, division, plan, ...).
    pub name: String,
    /// Full parameter list for the formula.
    pub params: Vec<ParamValue>,
}

impl Peer {
    /// Creates a peer.
    #[must_use]
    pub fn new(name: impl Into<String>, params: Vec<ParamValue>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }
}

/// How a peer's result compares to the base, given the formula's preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Performance {
    /// Favourable difference.
    Better,
    /// Unfavourable difference.
    Worse,
    /// Identical result.
    Equal,
}

impl Performance {
    /// Judges `value` against `base`.
    #[must_use]
    pub fn judge(value: f64, base: f64, preference: Preference) -> Self {
        if value == base {
            return Self::Equal;
        }
        let higher = value > base;
        match (preference, higher) {
            (Preference::HigherIsBetter, true) | (Preference::LowerIsBetter, false) => Self::Better,
            _ => Self::Worse,
        }
    }
}

/// One peer's comparison with the base.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerComparison {
    /// Peer name.
    pub name: String,
    /// Peer result.
    pub result: Option<f64>,
    /// `result − base`.
    pub difference: Option<f64>,
    /// `difference / base · 100`; absent when the base is zero.
    pub percent_difference: Option<f64>,
    /// Judgement from the formula's preference.
    pub performance: Option<Performance>,
    /// Why this peer failed.
    pub error: Option<String>,
}

/// Output of [`compare`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Formula compared.
    pub formula_id: &'static str,
    /// Direction used to judge differences.
    pub preference: Preference,
    /// Result at the base parameters.
    pub base_result: f64,
    /// One entry per peer, in input order.
    pub peers: Vec<PeerComparison>,
}

/// Calculates every peer and compares it with the base result.
///
/// # Errors
///
/// Fails only when the base parameters do not produce a result; a failing
/// peer is annotated with an `error`.
pub fn compare(
    descriptor: &FormulaDescriptor,
    base_params: &[ParamValue],
    peers: &[Peer],
    config: &AnalysisConfig,
) -> FinResult<ComparisonReport> {
    let base_result = evaluate(descriptor, base_params)?;
    let preference = descriptor.preference;

    let peers = maybe_parallel_map(peers, peers.len(), config, |peer| {
        match evaluate(descriptor, &peer.params) {
            Ok(result) => {
                let difference = result - base_result;
                PeerComparison {
                    name: peer.name.clone(),
                    result: Some(result),
                    difference: Some(difference),
                    percent_difference: (base_result != 0.0)
                        .then(|| difference / base_result * 100.0),
                    performance: Some(Performance::judge(result, base_result, preference)),
                    error: None,
                }
            }
            Err(err) => {
                log::debug!("{} peer '{}' failed: {err}", descriptor.id, peer.name);
                PeerComparison {
                    name: peer.name.clone(),
                    result: None,
                    difference: None,
                    percent_difference: None,
                    performance: None,
                    error: Some(err.to_string()),
                }
            }
        }
    });

    Ok(ComparisonReport {
        formula_id: descriptor.id,
        preference,
        base_result,
        peers,
    })
}

/// Where the subject ranks among its benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitivePosition {
    /// Percentile rank ≥ 90.
    TopPerformer,
    /// Percentile rank ≥ 75.
    AboveAverage,
    /// Percentile rank ≥ 50.
    Average,
    /// Percentile rank ≥ 25.
    BelowAverage,
    /// Everything else.
    BottomQuartile,
}

impl CompetitivePosition {
    /// Bands a percentile rank.
    #[must_use]
    pub fn from_rank(rank: f64) -> Self {
        if rank >= 90.0 {
            Self::TopPerformer
        } else if rank >= 75.0 {
            Self::AboveAverage
        } else if rank >= 50.0 {
            Self::Average
        } else if rank >= 25.0 {
            Self::BelowAverage
        } else {
            Self::BottomQuartile
        }
    }

    /// Display text.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::TopPerformer => "Top Performer - Industry Leader",
            Self::AboveAverage => "Above Average - Strong Competitor",
            Self::Average => "Average - Market Follower",
            Self::BelowAverage => "Below Average - Needs Improvement",
            Self::BottomQuartile => "Bottom Quartile - Significant Improvement Required",
        }
    }
}

/// Descriptive statistics of a subject value among benchmark values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkStatistics {
    /// The value being ranked.
    pub subject: f64,
    /// Values counted, subject included.
    pub count: usize,
    /// Mean over subject and benchmarks.
    pub mean: f64,
    /// `sorted[floor(n / 2)]`.
    pub median: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Share of values strictly below the subject, in percent.
    pub percentile_rank: f64,
    /// Band of the percentile rank.
    pub position: CompetitivePosition,
}

/// Ranks `subject` among `benchmarks`.
///
/// # Errors
///
/// Fails when any value is not finite.
///
/// # Example
///
/// ```rust
/// use fincalc_analysis::comparison::{benchmark_statistics, CompetitivePosition};
///
/// let stats = benchmark_statistics(0.18, &[0.08, 0.10, 0.12, 0.15]).unwrap();
/// assert_eq!(stats.percentile_rank, 80.0);
/// assert_eq!(stats.position, CompetitivePosition::AboveAverage);
/// ```
pub fn benchmark_statistics(subject: f64, benchmarks: &[f64]) -> FinResult<BenchmarkStatistics> {
    let mut values = Vec::with_capacity(benchmarks.len() + 1);
    values.push(subject);
    values.extend_from_slice(benchmarks);
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(FinError::validation(
            "benchmarks",
            format!("{bad} is not a finite number"),
        ));
    }
    sort_ascending(&mut values);

    let to_fin = |err: fincalc_math::MathError| FinError::validation("benchmarks", err.to_string());
    let n = values.len();
    let mean = mean(&values).map_err(to_fin)?;
    let std_dev = population_variance(&values, mean).map_err(to_fin)?.sqrt();
    let below = values.iter().filter(|&&v| v < subject).count();
    let percentile_rank = below as f64 / n as f64 * 100.0;

    Ok(BenchmarkStatistics {
        subject,
        count: n,
        mean,
        median: upper_median(&values).map_err(to_fin)?,
        std_dev,
        min: values[0],
        max: values[n - 1],
        percentile_rank,
        position: CompetitivePosition::from_rank(percentile_rank),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use fincalc_formulas::catalog::FormulaCatalog;

    fn lookup(id: &str) -> &'static FormulaDescriptor {
        FormulaCatalog::global().lookup(id).unwrap()
    }

    #[test]
    fn test_judge() {
        use Preference::{HigherIsBetter, LowerIsBetter};
        assert_eq!(Performance::judge(2.0, 1.0, HigherIsBetter), Performance::Better);
        assert_eq!(Performance::judge(0.5, 1.0, HigherIsBetter), Performance::Worse);
        assert_eq!(Performance::judge(0.5, 1.0, LowerIsBetter), Performance::Better);
        assert_eq!(Performance::judge(1.0, 1.0, LowerIsBetter), Performance::Equal);
    }

    #[test]
    fn test_compare_current_ratio() {
        let current = lookup("current_ratio");
        let peers = [
            Peer::new("Strong", vec![ParamValue::from(300_000.0), ParamValue::from(100_000.0)]),
            Peer::new("Weak", vec![ParamValue::from(90_000.0), ParamValue::from(100_000.0)]),
            Peer::new("Broken", vec![ParamValue::from(90_000.0), ParamValue::from(0.0)]),
        ];
        let report =
            compare(current, &current.default_params, &peers, &AnalysisConfig::sequential())
                .unwrap();

        assert_eq!(report.preference, Preference::HigherIsBetter);
        assert_eq!(report.peers.len(), 3);

        let strong = &report.peers[0];
        assert_eq!(strong.performance, Some(Performance::Better));
        assert_relative_eq!(strong.difference.unwrap(), 3.0 - 250.0 / 150.0, epsilon = 1e-12);
        assert_relative_eq!(strong.percent_difference.unwrap(), 80.0, epsilon = 1e-9);

        assert_eq!(report.peers[1].performance, Some(Performance::Worse));

        let broken = &report.peers[2];
        assert!(broken.result.is_none());
        assert!(broken.error.as_deref().unwrap().contains("Division by zero"));
    }

    #[test]
    fn test_compare_lower_is_better() {
        let de = lookup("debt_to_equity_ratio");
        let mut peer = de.default_params.clone();
        peer[0] = peer[0].scaled(0.5);
        let report = compare(
            de,
            &de.default_params,
            &[Peer::new("Conservative", peer)],
            &AnalysisConfig::sequential(),
        )
        .unwrap();
        assert_eq!(report.preference, Preference::LowerIsBetter);
        assert_eq!(report.peers[0].performance, Some(Performance::Better));
    }

    #[test]
    fn test_benchmark_statistics() {
        let stats = benchmark_statistics(12.0, &[8.0, 10.0, 14.0, 16.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert_relative_eq!(stats.mean, 12.0);
        assert_eq!(stats.median, 12.0);
        assert_relative_eq!(stats.std_dev, 8.0_f64.sqrt());
        assert_eq!(stats.min, 8.0);
        assert_eq!(stats.max, 16.0);
        assert_relative_eq!(stats.percentile_rank, 40.0);
        assert_eq!(stats.position, CompetitivePosition::BelowAverage);
    }

    #[test]
    fn test_benchmark_bands() {
        assert_eq!(CompetitivePosition::from_rank(90.0), CompetitivePosition::TopPerformer);
        assert_eq!(CompetitivePosition::from_rank(75.0), CompetitivePosition::AboveAverage);
        assert_eq!(CompetitivePosition::from_rank(50.0), CompetitivePosition::Average);
        assert_eq!(CompetitivePosition::from_rank(24.9), CompetitivePosition::BottomQuartile);

        let alone = benchmark_statistics(5.0, &[]).unwrap();
        assert_eq!(alone.percentile_rank, 0.0);
        assert_eq!(alone.std_dev, 0.0);
        assert!(benchmark_statistics(5.0, &[f64::NAN]).is_err());
    }
}
