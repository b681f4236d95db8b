//! Leverage ratios.

use fincalc_core::prelude::*;

use super::checked_ratio;

static DEBT_TO_EQUITY_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (2.0, Tier::new("Very High", "Excessive leverage - significant financial risk")),
        (1.0, Tier::new("High", "High leverage - debt exceeds equity")),
        (0.6, Tier::new("Moderate-High", "Elevated leverage - monitor debt capacity")),
        (0.3, Tier::new("Moderate", "Balanced capital structure")),
    ],
    Tier::new("Conservative", "Low leverage - strong equity base"),
);

static LEVERAGE_RISK: Ladder<&str> = Ladder::at_least(
    &[(1.5, "High Risk"), (0.8, "Moderate Risk"), (0.4, "Low Risk")],
    "Very Low Risk",
);

/// Total debt / total equity.
pub fn debt_to_equity_ratio(total_debt: f64, total_equity: f64) -> FinResult<RatioResult> {
    let ratio = checked_ratio(total_debt, total_equity, "total equity cannot be zero")?;
    Ok(RatioResult::tiered(ratio, DEBT_TO_EQUITY_TIERS.classify(ratio))
        .with_assessment(LEVERAGE_RISK.classify(ratio)))
}
