//! Cost-volume-profit break-even analysis.

use fincalc_core::prelude::*;

static BREAK_EVEN_REVENUE_TIERS: Ladder<Tier> = Ladder::at_most(
    &[
        (0.2, Tier::new("Excellent", "Low break-even threshold with strong scalability")),
        (0.4, Tier::new("Good", "Reasonable break-even point")),
        (0.6, Tier::new("Average", "Moderate break-even requirements")),
        (0.8, Tier::new("High", "High break-even threshold")),
    ],
    Tier::new("Very High", "Challenging break-even requirements"),
);

/// Units needed to cover fixed costs.
///
/// Fails with [`FinError::InvalidAssumption`] when price does not exceed
/// variable cost. The result carries the full [`BreakEvenDetail`] and no tier.
///
/// # Example
///
/// ```rust
/// use fincalc_formulas::ratios::break_even_units;
///
/// let result = break_even_units(120_000.0, 75.0, 45.0).unwrap();
/// assert_eq!(result.value, 4_000.0);
/// ```
pub fn break_even_units(
    fixed_costs: f64,
    price_per_unit: f64,
    variable_cost_per_unit: f64,
) -> FinResult<RatioResult> {
    let detail = break_even_detail(fixed_costs, price_per_unit, variable_cost_per_unit)?;
    Ok(RatioResult {
        value: detail.break_even_units,
        tier: None,
        assessment: None,
        detail: Some(RatioDetail::BreakEven(detail)),
    })
}

pub(crate) fn break_even_detail(
    fixed_costs: f64,
    price_per_unit: f64,
    variable_cost_per_unit: f64,
) -> FinResult<BreakEvenDetail> {
    let contribution_margin = price_per_unit - variable_cost_per_unit;
    if contribution_margin <= 0.0 {
        return Err(FinError::invalid_assumption(
            "contribution margin must be positive",
        ));
    }
    let units = fixed_costs / contribution_margin;
    Ok(BreakEvenDetail {
        break_even_units: units,
        break_even_revenue: units * price_per_unit,
        contribution_margin,
        contribution_margin_ratio: contribution_margin / price_per_unit,
    })
}

/// Fixed costs / contribution margin ratio.
///
/// Tiered by fixed costs as a share of break-even revenue, which is the
/// contribution margin ratio itself.
pub fn break_even_revenue(fixed_costs: f64, contribution_margin_ratio: f64) -> FinResult<RatioResult> {
    if contribution_margin_ratio <= 0.0 {
        return Err(FinError::invalid_assumption(
            "contribution margin ratio must be positive",
        ));
    }
    let revenue = fixed_costs / contribution_margin_ratio;
    Ok(RatioResult::tiered(
        revenue,
        BREAK_EVEN_REVENUE_TIERS.classify(contribution_margin_ratio),
    ))
}
