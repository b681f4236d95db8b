//! Probability-weighted scenario analysis.
//!
//! Each [`Scenario`] changes one or more parameters relative to the base
//! inputs, either by a percentage or by replacing the value outright. The
//! base case and every successful scenario are combined into a weighted
//! expected value, variance and best/worst case. Probabilities need not sum
//! to one; they are normalized by their total.

use serde::{Deserialize, Serialize};

use fincalc_core::prelude::*;
use fincalc_formulas::catalog::FormulaDescriptor;
use fincalc_math::statistics::weighted_moments;

use crate::perturb::{check_index, evaluate, percent_change};

/// Default weight of the base case.
pub const DEFAULT_BASE_PROBABILITY: f64 = 0.5;

/// Identifies the parameter a change applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamSelector {
    /// Position in the formula's parameter list.
    Index(usize),
    /// Parameter name or label, matched case-insensitively.
    Name(String),
}

impl From<usize> for ParamSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for ParamSelector {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl ParamSelector {
    /// Resolves the selector to a parameter position.
    ///
    /// Names resolve by exact match on the parameter name or label first
    /// (ignoring case, spaces treated as underscores), then by the first
    /// parameter whose name or label contains the query.
    pub fn resolve(&self, descriptor: &FormulaDescriptor) -> FinResult<usize> {
        match self {
            Self::Index(index) => check_index(descriptor, *index).map(|()| *index),
            Self::Name(name) => resolve_name(descriptor, name),
        }
    }
}

fn resolve_name(descriptor: &FormulaDescriptor, query: &str) -> FinResult<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(FinError::validation("parameter", "parameter name cannot be empty"));
    }
    let snake = needle.replace(' ', "_");

    let exact = descriptor
        .params
        .iter()
        .position(|spec| spec.name == snake || spec.label.to_lowercase() == needle);
    let partial = || {
        descriptor.params.iter().position(|spec| {
            spec.name.contains(snake.as_str()) || spec.label.to_lowercase().contains(&needle)
        })
    };

    exact.or_else(partial).ok_or_else(|| {
        FinError::validation(
            "parameter",
            format!("'{query}' matches no parameter of {}", descriptor.id),
        )
    })
}

/// How a parameter changes in a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamDelta {
    /// Scale the base value by `1 + p / 100`; series scale element-wise.
    Percent(f64),
    /// Replace the base value.
    Absolute(ParamValue),
}

/// One parameter change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamChange {
    /// Target parameter.
    pub param: ParamSelector,
    /// Change to apply.
    pub delta: ParamDelta,
}

/// A named what-if case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Optional free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Relative weight.
    pub probability: f64,
    /// Changes relative to the base parameters, applied in order.
    #[serde(default)]
    pub changes: Vec<ParamChange>,
}

impl Scenario {
    /// Creates a scenario with no changes.
    #[must_use]
    pub fn new(name: impl Into<String>, probability: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            probability,
            changes: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a percentage change.
    #[must_use]
    pub fn with_percent(mut self, param: impl Into<ParamSelector>, percent: f64) -> Self {
        self.changes.push(ParamChange {
            param: param.into(),
            delta: ParamDelta::Percent(percent),
        });
        self
    }

    /// Adds a replacement value.
    #[must_use]
    pub fn with_value(mut self, param: impl Into<ParamSelector>, value: impl Into<ParamValue>) -> Self {
        self.changes.push(ParamChange {
            param: param.into(),
            delta: ParamDelta::Absolute(value.into()),
        });
        self
    }

    /// Builds this scenario's parameters from `base`.
    ///
    /// Percentages are always taken against the base value, so a later change
    /// to the same parameter overrides an earlier one.
    pub fn apply(
        &self,
        descriptor: &FormulaDescriptor,
        base: &[ParamValue],
    ) -> FinResult<Vec<ParamValue>> {
        let mut params = base.to_vec();
        for change in &self.changes {
            let index = change.param.resolve(descriptor)?;
            let base_value = base.get(index).ok_or_else(|| {
                FinError::validation("parameter", format!("no base value at index {index}"))
            })?;
            params[index] = match &change.delta {
                ParamDelta::Percent(p) => base_value.scaled(1.0 + p / 100.0),
                ParamDelta::Absolute(value) => value.clone(),
            };
        }
        Ok(params)
    }
}

/// Size of a scenario's change against the base result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactMagnitude {
    /// `|change| < 5%`.
    Minimal,
    /// `|change| < 15%`.
    Moderate,
    /// `|change| < 30%`.
    Significant,
    /// Everything else.
    Dramatic,
}

/// Sign of a scenario's change against the base result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactDirection {
    /// Result at or above the base.
    Improvement,
    /// Result below the base.
    Deterioration,
}

/// Classification of a scenario's percentage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScenarioImpact {
    /// How large the change is.
    pub magnitude: ImpactMagnitude,
    /// Which way it goes.
    pub direction: ImpactDirection,
}

impl ScenarioImpact {
    /// Classifies a percentage change.
    #[must_use]
    pub fn classify(change_pct: f64) -> Self {
        let size = change_pct.abs();
        let magnitude = if size < 5.0 {
            ImpactMagnitude::Minimal
        } else if size < 15.0 {
            ImpactMagnitude::Moderate
        } else if size < 30.0 {
            ImpactMagnitude::Significant
        } else {
            ImpactMagnitude::Dramatic
        };
        let direction = if change_pct >= 0.0 {
            ImpactDirection::Improvement
        } else {
            ImpactDirection::Deterioration
        };
        Self {
            magnitude,
            direction,
        }
    }
}

/// Evaluated scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    /// Scenario name.
    pub name: String,
    /// Scenario description.
    pub description: Option<String>,
    /// Relative weight.
    pub probability: f64,
    /// Parameters the scenario ran with.
    pub params: Option<Vec<ParamValue>>,
    /// Result under the scenario.
    pub result: Option<f64>,
    /// Change against the base result, in percent.
    pub result_change_pct: Option<f64>,
    /// Classification of the change.
    pub impact: Option<ScenarioImpact>,
    /// Why the scenario failed.
    pub error: Option<String>,
}

impl ScenarioOutcome {
    /// Returns true when the scenario produced a result.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The unperturbed case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaseCase {
    /// Result at the base parameters.
    pub result: f64,
    /// Relative weight.
    pub probability: f64,
}

/// Probability-weighted aggregates over the base case and successful scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioAggregates {
    /// Sum of the weights used.
    pub total_probability: f64,
    /// `Σ p·x / Σ p`.
    pub expected_value: f64,
    /// `Σ p·(x − E)² / Σ p`.
    pub variance: f64,
    /// Square root of the variance.
    pub std_dev: f64,
    /// `std_dev / expected_value`; absent when the expected value is zero.
    pub coefficient_of_variation: Option<f64>,
    /// Lowest result with positive weight.
    pub worst_case: f64,
    /// Highest result with positive weight.
    pub best_case: f64,
}

/// Output of [`analyze_scenarios`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSet {
    /// Formula the scenarios ran against.
    pub formula_id: &'static str,
    /// Base case.
    pub base_case: BaseCase,
    /// One outcome per scenario, in input order.
    pub scenarios: Vec<ScenarioOutcome>,
    /// Absent when the total weight is zero.
    pub aggregates: Option<ScenarioAggregates>,
}

/// Evaluates every scenario and aggregates the weighted results.
///
/// Failed scenarios are reported with an `error` and left out of the
/// aggregates.
///
/// # Errors
///
/// Fails when a probability is negative or not finite, or when the base
/// parameters do not produce a result.
///
/// # Example
///
/// ```rust
/// use fincalc_analysis::scenario::{analyze_scenarios, Scenario};
/// use fincalc_formulas::catalog::FormulaCatalog;
///
/// let npv = FormulaCatalog::global().lookup("net_present_value").unwrap();
/// let scenarios = [
///     Scenario::new("Recession", 0.25).with_percent("rate", 50.0),
///     Scenario::new("Boom", 0.25).with_percent("cash flows", 20.0),
/// ];
/// let set = analyze_scenarios(npv, &npv.default_params, &scenarios, 0.5).unwrap();
/// let aggregates = set.aggregates.unwrap();
/// assert!(aggregates.worst_case < set.base_case.result);
/// assert!(aggregates.best_case > set.base_case.result);
/// ```
pub fn analyze_scenarios(
    descriptor: &FormulaDescriptor,
    base_params: &[ParamValue],
    scenarios: &[Scenario],
    base_probability: f64,
) -> FinResult<ScenarioSet> {
    check_probability("base_probability", base_probability)?;
    for scenario in scenarios {
        check_probability(&scenario.name, scenario.probability)?;
    }

    let base_case = BaseCase {
        result: evaluate(descriptor, base_params)?,
        probability: base_probability,
    };

    let outcomes: Vec<ScenarioOutcome> = scenarios
        .iter()
        .map(|scenario| run_scenario(descriptor, base_params, base_case.result, scenario))
        .collect();

    Ok(ScenarioSet {
        formula_id: descriptor.id,
        base_case,
        aggregates: aggregate(base_case, &outcomes),
        scenarios: outcomes,
    })
}

fn check_probability(field: &str, probability: f64) -> FinResult<()> {
    if probability.is_finite() && probability >= 0.0 {
        Ok(())
    } else {
        Err(FinError::validation(
            field,
            format!("probability {probability} must be finite and non-negative"),
        ))
    }
}

fn run_scenario(
    descriptor: &FormulaDescriptor,
    base_params: &[ParamValue],
    base_result: f64,
    scenario: &Scenario,
) -> ScenarioOutcome {
    let mut outcome = ScenarioOutcome {
        name: scenario.name.clone(),
        description: scenario.description.clone(),
        probability: scenario.probability,
        params: None,
        result: None,
        result_change_pct: None,
        impact: None,
        error: None,
    };

    let evaluated = scenario
        .apply(descriptor, base_params)
        .and_then(|params| evaluate(descriptor, &params).map(|result| (params, result)));

    match evaluated {
        Ok((params, result)) => {
            let change = percent_change(base_result, result);
            outcome.params = Some(params);
            outcome.result = Some(result);
            outcome.result_change_pct = change;
            outcome.impact = change.map(ScenarioImpact::classify);
        }
        Err(err) => {
            log::debug!("{} scenario '{}' failed: {err}", descriptor.id, scenario.name);
            outcome.error = Some(err.to_string());
        }
    }
    outcome
}

fn aggregate(base: BaseCase, outcomes: &[ScenarioOutcome]) -> Option<ScenarioAggregates> {
    let points: Vec<(f64, f64)> = std::iter::once((base.result, base.probability))
        .chain(
            outcomes
                .iter()
                .filter_map(|o| o.result.map(|result| (result, o.probability))),
        )
        .collect();

    let moments = weighted_moments(&points).ok()?;
    let weighted = points.iter().filter(|(_, w)| *w > 0.0).map(|(x, _)| *x);
    let worst_case = weighted.clone().fold(f64::INFINITY, f64::min);
    let best_case = weighted.fold(f64::NEG_INFINITY, f64::max);
    let std_dev = moments.std_dev();

    Some(ScenarioAggregates {
        total_probability: moments.total_weight,
        expected_value: moments.mean,
        variance: moments.variance,
        std_dev,
        coefficient_of_variation: (moments.mean != 0.0).then(|| std_dev / moments.mean),
        worst_case,
        best_case,
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
    fn test_resolve_names() {
        let dpp = lookup("discounted_payback_period");
        assert_eq!(ParamSelector::from("discount_rate").resolve(dpp), Ok(2));
        assert_eq!(ParamSelector::from("Discount Rate").resolve(dpp), Ok(2));
        assert_eq!(ParamSelector::from("CASH").resolve(dpp), Ok(1));
        assert_eq!(ParamSelector::from(0_usize).resolve(dpp), Ok(0));
        assert!(ParamSelector::from(3_usize).resolve(dpp).is_err());
        assert!(ParamSelector::from("volatility").resolve(dpp).is_err());
        assert!(ParamSelector::from("  ").resolve(dpp).is_err());
    }

    #[test]
    fn test_resolve_first_partial_match() {
        let ddm = lookup("dividend_discount_model");
        assert_eq!(ParamSelector::from("rate").resolve(ddm), Ok(1));
        assert_eq!(ParamSelector::from("share").resolve(ddm), Ok(0));
        assert_eq!(ParamSelector::from("required").resolve(ddm), Ok(2));
    }

    #[test]
    fn test_apply_does_not_mutate_base() {
        let npv = lookup("net_present_value");
        let base = npv.default_params.clone();
        let scenario = Scenario::new("Up", 1.0)
            .with_percent(0_usize, 50.0)
            .with_value(1_usize, vec![-10.0, 20.0]);
        let params = scenario.apply(npv, &base).unwrap();
        assert_eq!(base, npv.default_params);
        assert_eq!(params[0], ParamValue::from(0.12 * 1.5));
        assert_eq!(params[1], ParamValue::from(vec![-10.0, 20.0]));
    }

    #[test]
    fn test_percentages_taken_from_base() {
        let npv = lookup("net_present_value");
        let scenario = Scenario::new("Twice", 1.0)
            .with_percent(0_usize, 50.0)
            .with_percent(0_usize, 50.0);
        let params = scenario.apply(npv, &npv.default_params).unwrap();
        assert_eq!(params[0], ParamValue::from(0.12 * 1.5));
    }

    #[test]
    fn test_single_certain_scenario() {
        let npv = lookup("net_present_value");
        let scenarios = [Scenario::new("Only", 1.0).with_percent("rate", 50.0)];
        let set = analyze_scenarios(npv, &npv.default_params, &scenarios, 0.0).unwrap();
        let result = set.scenarios[0].result.unwrap();
        let aggregates = set.aggregates.unwrap();
        assert_eq!(aggregates.expected_value, result);
        assert_eq!(aggregates.worst_case, result);
        assert_eq!(aggregates.best_case, result);
        assert_eq!(aggregates.std_dev, 0.0);
    }

    #[test]
    fn test_weighted_aggregates() {
        let npv = lookup("net_present_value");
        let scenarios = [
            Scenario::new("Pessimistic", 0.25).with_percent("discount_rate", 50.0),
            Scenario::new("Optimistic", 0.25).with_percent("discount_rate", -50.0),
        ];
        let set = analyze_scenarios(npv, &npv.default_params, &scenarios, 0.5).unwrap();
        let base = set.base_case.result;
        let low = set.scenarios[0].result.unwrap();
        let high = set.scenarios[1].result.unwrap();
        assert_relative_eq!(low, 15_734.09, epsilon = 0.01);
        assert_relative_eq!(high, 61_326.68, epsilon = 0.01);

        let aggregates = set.aggregates.unwrap();
        let expected = 0.5 * base + 0.25 * low + 0.25 * high;
        assert_relative_eq!(aggregates.expected_value, expected, epsilon = 1e-6);
        let variance = 0.5 * (base - expected).powi(2)
            + 0.25 * (low - expected).powi(2)
            + 0.25 * (high - expected).powi(2);
        assert_relative_eq!(aggregates.variance, variance, max_relative = 1e-10);
        assert_eq!(aggregates.worst_case, low);
        assert_eq!(aggregates.best_case, high);
        assert_relative_eq!(
            aggregates.coefficient_of_variation.unwrap(),
            aggregates.std_dev / aggregates.expected_value
        );

        let impact = set.scenarios[0].impact.unwrap();
        assert_eq!(impact.magnitude, ImpactMagnitude::Dramatic);
        assert_eq!(impact.direction, ImpactDirection::Deterioration);
    }

    #[test]
    fn test_failed_scenario_excluded() {
        let npv = lookup("net_present_value");
        let scenarios = [
            Scenario::new("Broken", 0.5).with_value("discount_rate", -3.0),
            Scenario::new("Unknown", 0.5).with_percent("inflation", 10.0),
        ];
        let set = analyze_scenarios(npv, &npv.default_params, &scenarios, 0.5).unwrap();
        assert!(set.scenarios.iter().all(|s| !s.is_ok()));
        assert!(set.scenarios[1].error.as_deref().unwrap().contains("inflation"));
        let aggregates = set.aggregates.unwrap();
        assert_eq!(aggregates.expected_value, set.base_case.result);
        assert_eq!(aggregates.total_probability, 0.5);
    }

    #[test]
    fn test_zero_total_weight() {
        let npv = lookup("net_present_value");
        let scenarios = [Scenario::new("Ignored", 0.0).with_percent(0_usize, 10.0)];
        let set = analyze_scenarios(npv, &npv.default_params, &scenarios, 0.0).unwrap();
        assert!(set.scenarios[0].is_ok());
        assert!(set.aggregates.is_none());
    }

    #[test]
    fn test_negative_probability_rejected() {
        let npv = lookup("net_present_value");
        let scenarios = [Scenario::new("Bad", -0.1)];
        assert!(matches!(
            analyze_scenarios(npv, &npv.default_params, &scenarios, 0.5),
            Err(FinError::Validation { .. })
        ));
        assert!(analyze_scenarios(npv, &npv.default_params, &[], f64::NAN).is_err());
    }

    #[test]
    fn test_impact_bands() {
        assert_eq!(ScenarioImpact::classify(4.9).magnitude, ImpactMagnitude::Minimal);
        assert_eq!(ScenarioImpact::classify(-5.0).magnitude, ImpactMagnitude::Moderate);
        assert_eq!(ScenarioImpact::classify(15.0).magnitude, ImpactMagnitude::Significant);
        assert_eq!(ScenarioImpact::classify(30.0).magnitude, ImpactMagnitude::Dramatic);
        assert_eq!(ScenarioImpact::classify(0.0).direction, ImpactDirection::Improvement);
    }

    #[test]
    fn test_scenario_deserializes() {
        let json = r#"{
            "name": "Stress",
            "probability": 0.2,
            "changes": [
                {"param": "discount_rate", "delta": {"type": "percent", "value": 25}},
                {"param": 1, "delta": {"type": "absolute", "value": [-100, 60, 60]}}
            ]
        }"#;
        let scenario: Scenario = serde_json::from_str(json).unwrap();
        assert_eq!(scenario.changes[0].param, ParamSelector::from("discount_rate"));
        assert_eq!(scenario.changes[1].param, ParamSelector::Index(1));
        assert_eq!(
            scenario.changes[1].delta,
            ParamDelta::Absolute(ParamValue::from(vec![-100.0, 60.0, 60.0]))
        );
    }
}
