//! Descriptive statistics over simulation and scenario outputs.
//!
//! Percentiles follow the empirical convention `sorted[floor(n * p)]` with no
//! interpolation, so a 5% tail of 1000 samples is exactly `sorted[50]`.

use std::cmp::Ordering;

use crate::error::{MathError, MathResult};

/// Sorts samples ascending. NaNs sort last.
pub fn sort_ascending(values: &mut [f64]) {
    values.sort_by(f64::total_cmp);
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> MathResult<f64> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`) about a precomputed mean.
pub fn population_variance(values: &[f64], mean: f64) -> MathResult<f64> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Ok(sum_sq / values.len() as f64)
}

/// Upper median: `sorted[floor(n / 2)]`.
///
/// `sorted` must already be in ascending order.
pub fn upper_median(sorted: &[f64]) -> MathResult<f64> {
    if sorted.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    Ok(sorted[sorted.len() / 2])
}

/// Empirical percentile `sorted[floor(n * p)]`, clamped to the last sample.
///
/// `sorted` must already be in ascending order and `p` must lie in `[0, 1]`.
pub fn floor_percentile(sorted: &[f64], p: f64) -> MathResult<f64> {
    if sorted.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(MathError::invalid_input(format!(
            "percentile {p} must lie in [0, 1]"
        )));
    }
    let index = ((sorted.len() as f64) * p).floor() as usize;
    Ok(sorted[index.min(sorted.len() - 1)])
}

/// Probability-weighted mean and variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedMoments {
    /// Sum of weights.
    pub total_weight: f64,
    /// `Σ w·x / Σ w`.
    pub mean: f64,
    /// `Σ w·(x − mean)² / Σ w`.
    pub variance: f64,
}

impl WeightedMoments {
    /// Square root of the variance.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Computes weighted moments over `(value, weight)` pairs.
///
/// Weights need not sum to one; they are normalized by their total.
pub fn weighted_moments(points: &[(f64, f64)]) -> MathResult<WeightedMoments> {
    if points.iter().any(|(_, w)| *w < 0.0 || !w.is_finite()) {
        return Err(MathError::invalid_input("weights must be finite and non-negative"));
    }
    let total_weight: f64 = points.iter().map(|(_, w)| w).sum();
    if total_weight.partial_cmp(&0.0) != Some(Ordering::Greater) {
        return Err(MathError::invalid_input("total weight must be positive"));
    }
    let mean = points.iter().map(|(x, w)| x * w).sum::<f64>() / total_weight;
    let variance = points
        .iter()
        .map(|(x, w)| w * (x - mean).powi(2))
        .sum::<f64>()
        / total_weight;
    Ok(WeightedMoments {
        total_weight,
        mean,
        variance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_mean_and_variance() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values).unwrap();
        assert_relative_eq!(m, 5.0);
        assert_relative_eq!(population_variance(&values, m).unwrap(), 4.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(mean(&[]).is_err());
        assert!(upper_median(&[]).is_err());
        assert!(floor_percentile(&[], 0.5).is_err());
    }

    #[test]
    fn test_floor_percentile_indexing() {
        let sorted: Vec<f64> = (0..1000).map(f64::from).collect();
        assert_eq!(floor_percentile(&sorted, 0.05).unwrap(), 50.0);
        assert_eq!(floor_percentile(&sorted, 0.01).unwrap(), 10.0);
        assert_eq!(floor_percentile(&sorted, 0.995).unwrap(), 995.0);
        assert_eq!(floor_percentile(&sorted, 1.0).unwrap(), 999.0);
    }

    #[test]
    fn test_floor_percentile_small_sample() {
        let sorted = [1.0, 2.0, 3.0];
        // floor(3 * 0.05) = 0
        assert_eq!(floor_percentile(&sorted, 0.05).unwrap(), 1.0);
        // floor(3 * 0.95) = 2
        assert_eq!(floor_percentile(&sorted, 0.95).unwrap(), 3.0);
    }

    #[test]
    fn test_upper_median() {
        assert_eq!(upper_median(&[1.0, 2.0, 3.0, 4.0]).unwrap(), 3.0);
        assert_eq!(upper_median(&[1.0, 2.0, 3.0]).unwrap(), 2.0);
    }

    #[test]
    fn test_weighted_moments() {
        let moments = weighted_moments(&[(100.0, 0.5), (80.0, 0.25), (140.0, 0.25)]).unwrap();
        assert_relative_eq!(moments.mean, 105.0);
        // 0.5*25 + 0.25*625 + 0.25*1225 = 475
        assert_relative_eq!(moments.variance, 475.0);
        assert_relative_eq!(moments.total_weight, 1.0);
    }

    #[test]
    fn test_weighted_moments_rejects_bad_weights() {
        assert!(weighted_moments(&[(1.0, 0.0)]).is_err());
        assert!(weighted_moments(&[(1.0, -0.5), (2.0, 1.0)]).is_err());
    }

    #[test]
    fn test_sort_ascending() {
        let mut values = [3.0, -1.0, 2.0];
        sort_ascending(&mut values);
        assert_eq!(values, [-1.0, 2.0, 3.0]);
    }

    proptest! {
        #[test]
        fn prop_percentile_is_a_sample(mut values in prop::collection::vec(-1e6f64..1e6, 1..200), p in 0.0f64..=1.0) {
            sort_ascending(&mut values);
            let q = floor_percentile(&values, p).unwrap();
            prop_assert!(values.contains(&q));
        }

        #[test]
        fn prop_variance_non_negative(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
            let m = mean(&values).unwrap();
            prop_assert!(population_variance(&values, m).unwrap() >= 0.0);
        }
    }
}
