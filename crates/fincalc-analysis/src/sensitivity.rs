//! One-factor-at-a-time sensitivity analysis.
//!
//! A single parameter is scaled by each percentage in a variation grid while
//! every other parameter is held at its base value. Each point records the
//! recomputed result, the percentage change against the base result and the
//! elasticity `result change % / parameter change %`.
//!
//! A failing point carries an `error` and the sweep continues. Only a failure
//! of the base calculation aborts the analysis.

use serde::Serialize;

use fincalc_core::prelude::*;
use fincalc_formulas::catalog::FormulaDescriptor;

use crate::perturb::{check_index, evaluate, percent_change, with_param};

/// Default grid for rate parameters.
pub const RATE_VARIATIONS: &[f64] = &[
    -50.0, -25.0, -20.0, -15.0, -10.0, -5.0, 0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 50.0,
];

/// Default grid for cost and price parameters.
pub const COST_VARIATIONS: &[f64] = &[
    -30.0, -20.0, -15.0, -10.0, -5.0, -2.5, 0.0, 2.5, 5.0, 10.0, 15.0, 20.0, 30.0,
];

/// Default grid for every other parameter.
pub const GENERAL_VARIATIONS: &[f64] = &[
    -40.0, -30.0, -20.0, -10.0, -5.0, 0.0, 5.0, 10.0, 20.0, 30.0, 40.0,
];

/// Returns the default variation grid for a parameter role.
#[must_use]
pub fn default_variations(role: ParamRole) -> &'static [f64] {
    if role.is_rate() {
        RATE_VARIATIONS
    } else if role.is_cost_or_price() {
        COST_VARIATIONS
    } else {
        GENERAL_VARIATIONS
    }
}

/// Magnitude band of a single elasticity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityLevel {
    /// `|elasticity| > 2`.
    High,
    /// `|elasticity| > 1`.
    Moderate,
    /// `|elasticity| > 0.5`.
    Low,
    /// Everything else.
    Minimal,
}

impl SensitivityLevel {
    /// Classifies an elasticity by its absolute value.
    #[must_use]
    pub fn classify(elasticity: f64) -> Self {
        let magnitude = elasticity.abs();
        if magnitude > 2.0 {
            Self::High
        } else if magnitude > 1.0 {
            Self::Moderate
        } else if magnitude > 0.5 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    /// Display text.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::High => "High sensitivity - significant impact",
            Self::Moderate => "Moderate sensitivity - material impact",
            Self::Low => "Low sensitivity - minor impact",
            Self::Minimal => "Minimal sensitivity - negligible impact",
        }
    }
}

/// Overall risk implied by the mean absolute elasticity of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Mean `|elasticity| > 2`.
    High,
    /// Mean `|elasticity| > 1`.
    Moderate,
    /// Everything else.
    Low,
}

impl RiskLevel {
    /// Classifies a mean absolute elasticity.
    #[must_use]
    pub fn classify(mean_abs_elasticity: f64) -> Self {
        if mean_abs_elasticity > 2.0 {
            Self::High
        } else if mean_abs_elasticity > 1.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// One point of the sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityPoint {
    /// Applied change to the parameter, in percent.
    pub percent_change: f64,
    /// Perturbed parameter value.
    pub new_value: ParamValue,
    /// Recomputed result.
    pub new_result: Option<f64>,
    /// Change of the result against the base result, in percent.
    pub result_change_pct: Option<f64>,
    /// `result_change_pct / percent_change`, or `0` when `percent_change == 0`.
    pub elasticity: Option<f64>,
    /// Magnitude band of the elasticity.
    pub level: Option<SensitivityLevel>,
    /// Why this point failed.
    pub error: Option<String>,
}

impl SensitivityPoint {
    fn failed(percent_change: f64, new_value: ParamValue, error: impl Into<String>) -> Self {
        Self {
            percent_change,
            new_value,
            new_result: None,
            result_change_pct: None,
            elasticity: None,
            level: None,
            error: Some(error.into()),
        }
    }

    /// Returns true when the point was computed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Direction in which a result crosses a critical level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossing {
    /// From at-or-above the level to below it.
    Falls,
    /// From below the level to at-or-above it.
    Rises,
}

/// Two neighbouring sweep points on opposite sides of a critical level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalThreshold {
    /// The level being watched (0 for NPV, 1.0 for the current ratio, ...).
    pub level: f64,
    /// Percent change of the earlier point.
    pub from_percent: f64,
    /// Percent change of the later point.
    pub to_percent: f64,
    /// Result at the earlier point.
    pub from_result: f64,
    /// Result at the later point.
    pub to_result: f64,
    /// Direction of the crossing.
    pub crossing: Crossing,
}

/// Aggregate over the successful points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensitivitySummary {
    /// Mean of `|elasticity|`.
    pub mean_abs_elasticity: f64,
    /// Risk band of the mean.
    pub risk_level: RiskLevel,
    /// Points that produced a result.
    pub valid_points: usize,
}

/// Output of [`analyze_sensitivity`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    /// Formula that was swept.
    pub formula_id: &'static str,
    /// Name of the swept parameter.
    pub parameter_name: &'static str,
    /// Position of the swept parameter.
    pub parameter_index: usize,
    /// Unperturbed parameter value.
    pub base_value: ParamValue,
    /// Result at the base parameters.
    pub base_result: f64,
    /// One entry per variation, in grid order.
    pub variations: Vec<SensitivityPoint>,
    /// Crossings of the formula's critical level between neighbouring points.
    pub critical_thresholds: Vec<CriticalThreshold>,
    /// Absent when no point succeeded.
    pub summary: Option<SensitivitySummary>,
}

/// Sweeps the parameter at `param_index` across `variations` (in percent).
///
/// When `variations` is `None` the grid is chosen from the parameter's role
/// with [`default_variations`]. Series parameters are scaled element-wise.
///
/// # Errors
///
/// Fails when the index is out of range, a variation is not finite, or the
/// base parameters do not produce a result.
///
/// # Example
///
/// ```rust
/// use fincalc_analysis::sensitivity::analyze_sensitivity;
/// use fincalc_formulas::catalog::FormulaCatalog;
///
/// let npv = FormulaCatalog::global().lookup("net_present_value").unwrap();
/// let report = analyze_sensitivity(npv, &npv.default_params, 0, Some(&[-10.0, 0.0, 10.0])).unwrap();
/// assert_eq!(report.variations[1].elasticity, Some(0.0));
/// assert!(report.variations[2].result_change_pct.unwrap() < 0.0);
/// ```
pub fn analyze_sensitivity(
    descriptor: &FormulaDescriptor,
    base_params: &[ParamValue],
    param_index: usize,
    variations: Option<&[f64]>,
) -> FinResult<SensitivityReport> {
    check_index(descriptor, param_index)?;
    let spec = descriptor.params[param_index];
    let grid = variations.unwrap_or_else(|| default_variations(spec.role));
    if let Some(bad) = grid.iter().find(|p| !p.is_finite()) {
        return Err(FinError::validation(
            "variations",
            format!("{bad} is not a finite percentage"),
        ));
    }

    let base_result = evaluate(descriptor, base_params)?;
    let base_value = base_params[param_index].clone();

    let points: Vec<SensitivityPoint> = grid
        .iter()
        .map(|&percent| sweep_point(descriptor, base_params, param_index, base_result, percent))
        .collect();

    let critical_thresholds = descriptor
        .critical_level
        .map(|level| critical_thresholds(&points, level))
        .unwrap_or_default();

    Ok(SensitivityReport {
        formula_id: descriptor.id,
        parameter_name: spec.name,
        parameter_index: param_index,
        base_value,
        base_result,
        summary: summarize(&points),
        variations: points,
        critical_thresholds,
    })
}

fn sweep_point(
    descriptor: &FormulaDescriptor,
    base_params: &[ParamValue],
    index: usize,
    base_result: f64,
    percent: f64,
) -> SensitivityPoint {
    let new_value = base_params[index].scaled(1.0 + percent / 100.0);
    let params = with_param(base_params, index, new_value.clone());

    let new_result = match evaluate(descriptor, &params) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("{} sweep at {percent}% failed: {err}", descriptor.id);
            return SensitivityPoint::failed(percent, new_value, err.to_string());
        }
    };

    let Some(result_change_pct) = percent_change(base_result, new_result) else {
        return SensitivityPoint {
            new_result: Some(new_result),
            ..SensitivityPoint::failed(
                percent,
                new_value,
                "base result is zero, percentage change is undefined",
            )
        };
    };

    let elasticity = if percent == 0.0 {
        0.0
    } else {
        result_change_pct / percent
    };

    SensitivityPoint {
        percent_change: percent,
        new_value,
        new_result: Some(new_result),
        result_change_pct: Some(result_change_pct),
        elasticity: Some(elasticity),
        level: Some(SensitivityLevel::classify(elasticity)),
        error: None,
    }
}

/// Scans neighbouring successful points for crossings of `level`.
fn critical_thresholds(points: &[SensitivityPoint], level: f64) -> Vec<CriticalThreshold> {
    let valid: Vec<(f64, f64)> = points
        .iter()
        .filter_map(|p| p.new_result.map(|r| (p.percent_change, r)))
        .collect();

    valid
        .windows(2)
        .filter_map(|pair| {
            let (from_percent, from_result) = pair[0];
            let (to_percent, to_result) = pair[1];
            let crossing = match (from_result >= level, to_result >= level) {
                (true, false) => Crossing::Falls,
                (false, true) => Crossing::Rises,
                _ => return None,
            };
            Some(CriticalThreshold {
                level,
                from_percent,
                to_percent,
                from_result,
                to_result,
                crossing,
            })
        })
        .collect()
}

fn summarize(points: &[SensitivityPoint]) -> Option<SensitivitySummary> {
    let elasticities: Vec<f64> = points.iter().filter_map(|p| p.elasticity).collect();
    if elasticities.is_empty() {
        return None;
    }
    let mean_abs_elasticity =
        elasticities.iter().map(|e| e.abs()).sum::<f64>() / elasticities.len() as f64;
    Some(SensitivitySummary {
        mean_abs_elasticity,
        risk_level: RiskLevel::classify(mean_abs_elasticity),
        valid_points: elasticities.len(),
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
    fn test_default_grids() {
        assert_eq!(default_variations(ParamRole::Rate).len(), 13);
        assert_eq!(default_variations(ParamRole::Cost)[5], -2.5);
        assert_eq!(default_variations(ParamRole::Price), COST_VARIATIONS);
        assert_eq!(default_variations(ParamRole::Amount), GENERAL_VARIATIONS);
    }

    #[test]
    fn test_levels() {
        assert_eq!(SensitivityLevel::classify(-2.5), SensitivityLevel::High);
        assert_eq!(SensitivityLevel::classify(2.0), SensitivityLevel::Moderate);
        assert_eq!(SensitivityLevel::classify(0.75), SensitivityLevel::Low);
        assert_eq!(SensitivityLevel::classify(0.5), SensitivityLevel::Minimal);
        assert_eq!(RiskLevel::classify(2.1), RiskLevel::High);
        assert_eq!(RiskLevel::classify(1.0), RiskLevel::Low);
    }

    #[test]
    fn test_npv_rate_sweep() {
        let npv = lookup("net_present_value");
        let report =
            analyze_sensitivity(npv, &npv.default_params, 0, Some(&[-50.0, 0.0, 50.0, 100.0]))
                .unwrap();

        assert_eq!(report.parameter_name, "discount_rate");
        assert_relative_eq!(report.base_result, 35_664.08, epsilon = 0.01);
        assert_eq!(report.variations.len(), 4);
        assert!(report.variations.iter().all(SensitivityPoint::is_ok));

        let zero = &report.variations[1];
        assert_eq!(zero.elasticity, Some(0.0));
        assert_eq!(zero.new_result, Some(report.base_result));

        let up = &report.variations[2];
        assert_eq!(up.new_value, ParamValue::from(0.12 * 1.5));
        assert_relative_eq!(up.new_result.unwrap(), 15_734.09, epsilon = 0.01);
        assert!(up.elasticity.unwrap() < 0.0);

        assert_eq!(report.critical_thresholds.len(), 1);
        let threshold = report.critical_thresholds[0];
        assert_eq!(threshold.level, 0.0);
        assert_eq!(threshold.from_percent, 50.0);
        assert_eq!(threshold.to_percent, 100.0);
        assert_eq!(threshold.crossing, Crossing::Falls);
    }

    #[test]
    fn test_default_grid_by_role() {
        let npv = lookup("net_present_value");
        let report = analyze_sensitivity(npv, &npv.default_params, 0, None).unwrap();
        assert_eq!(report.variations.len(), RATE_VARIATIONS.len());
        let summary = report.summary.unwrap();
        assert_eq!(summary.valid_points, RATE_VARIATIONS.len());
        assert!(summary.mean_abs_elasticity > 0.0);
    }

    #[test]
    fn test_series_scaled_elementwise() {
        let npv = lookup("net_present_value");
        let report = analyze_sensitivity(npv, &npv.default_params, 1, Some(&[10.0])).unwrap();
        let point = &report.variations[0];
        let flows = point.new_value.as_series().unwrap();
        assert_relative_eq!(flows[0], -110_000.0, epsilon = 1e-9);
        assert_relative_eq!(flows[5], 55_000.0, epsilon = 1e-9);
        // Scaling every flow scales NPV by the same factor.
        assert_relative_eq!(point.elasticity.unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_failed_point_is_annotated() {
        let pv = lookup("present_value");
        // 0.08 * (1 - 15) = -1.04
        let report = analyze_sensitivity(pv, &pv.default_params, 1, Some(&[-1500.0, 0.0])).unwrap();
        let failed = &report.variations[0];
        assert!(!failed.is_ok());
        assert!(failed.new_result.is_none());
        assert!(failed.error.as_deref().unwrap().contains("Invalid rate"));
        assert!(report.variations[1].is_ok());
        assert_eq!(report.summary.unwrap().valid_points, 1);
    }

    #[test]
    fn test_current_ratio_liquidity_threshold() {
        let current = lookup("current_ratio");
        let report =
            analyze_sensitivity(current, &current.default_params, 1, Some(&[0.0, 50.0, 100.0]))
                .unwrap();
        assert_eq!(report.critical_thresholds.len(), 1);
        assert_eq!(report.critical_thresholds[0].level, 1.0);
        assert_eq!(report.critical_thresholds[0].from_percent, 50.0);
    }

    #[test]
    fn test_zero_base_result() {
        let wc = lookup("working_capital");
        let params = vec![ParamValue::from(100.0), ParamValue::from(100.0)];
        let report = analyze_sensitivity(wc, &params, 0, Some(&[0.0, 10.0])).unwrap();
        assert_eq!(report.variations[0].elasticity, Some(0.0));
        let moved = &report.variations[1];
        assert!(moved.error.is_some());
        assert_relative_eq!(moved.new_result.unwrap(), 10.0, epsilon = 1e-9);
        assert!(moved.elasticity.is_none());
    }

    #[test]
    fn test_invalid_inputs() {
        let npv = lookup("net_present_value");
        assert!(analyze_sensitivity(npv, &npv.default_params, 2, None).is_err());
        assert!(analyze_sensitivity(npv, &npv.default_params, 0, Some(&[f64::NAN])).is_err());

        let mut broken = npv.default_params.clone();
        broken[0] = ParamValue::from(-2.0);
        assert!(matches!(
            analyze_sensitivity(npv, &broken, 0, None),
            Err(FinError::InvalidRate { .. })
        ));
    }

    #[test]
    fn test_base_params_untouched() {
        let npv = lookup("net_present_value");
        let params = npv.default_params.clone();
        let _ = analyze_sensitivity(npv, &params, 1, None).unwrap();
        assert_eq!(params, npv.default_params);
    }
}
