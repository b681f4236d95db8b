//! Equity valuation models.

use fincalc_core::prelude::*;

use super::checked_ratio;

static DIVIDEND_YIELD_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (0.06, Tier::new("High Yield", "Attractive dividend yield for income investors")),
        (0.04, Tier::new("Good Yield", "Reasonable dividend yield")),
        (0.02, Tier::new("Moderate Yield", "Average dividend yield")),
    ],
    Tier::new("Low Yield", "Low dividend yield - growth-focused"),
);

static ASSUMPTION_SENSITIVITY: Ladder<&str> = Ladder::at_most(
    &[
        (0.02, "High sensitivity to assumption changes"),
        (0.05, "Moderate sensitivity to assumptions"),
    ],
    "Low sensitivity to assumption changes",
);

static EVA_SPREAD_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (0.10, Tier::new("Excellent", "Strong economic value creation")),
        (0.05, Tier::new("Good", "Positive economic value creation")),
        (0.0, Tier::new("Adequate", "Minimal value creation above cost of capital")),
        (-0.05, Tier::new("Poor", "Slight value destruction")),
    ],
    Tier::new("Very Poor", "Significant value destruction"),
);

/// Gordon growth value `D / (r - g)`.
///
/// Requires `required_return > growth_rate`. The implied dividend yield
/// `D / value` equals the spread `r - g`, which drives both the tier and the
/// sensitivity assessment.
pub fn dividend_discount_model(
    dividend: f64,
    growth_rate: f64,
    required_return: f64,
) -> FinResult<RatioResult> {
    FinError::check_rate("growthRate", growth_rate)?;
    FinError::check_rate("requiredReturn", required_return)?;
    if required_return <= growth_rate {
        return Err(FinError::invalid_assumption(
            "required return must be greater than growth rate",
        ));
    }

    let spread = required_return - growth_rate;
    Ok(RatioResult::tiered(dividend / spread, DIVIDEND_YIELD_TIERS.classify(spread))
        .with_assessment(ASSUMPTION_SENSITIVITY.classify(spread)))
}

/// NOPAT minus the capital charge `wacc * invested_capital`.
pub fn economic_value_added(nopat: f64, wacc: f64, invested_capital: f64) -> FinResult<RatioResult> {
    let eva = nopat - wacc * invested_capital;
    let spread = checked_ratio(eva, invested_capital, "invested capital cannot be zero")?;
    let creation = if eva > 0.0 {
        "Creating Value"
    } else {
        "Destroying Value"
    };
    Ok(RatioResult::tiered(eva, EVA_SPREAD_TIERS.classify(spread)).with_assessment(creation))
}
