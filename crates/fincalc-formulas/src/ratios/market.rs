//! Per-share market ratios.

use fincalc_core::prelude::*;

use super::checked_ratio;

static EPS_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (5.0, Tier::new("Excellent", "Strong earnings per share performance")),
        (2.0, Tier::new("Good", "Solid earnings per share")),
        (1.0, Tier::new("Average", "Market-level earnings per share")),
        (0.0, Tier::new("Weak", "Low earnings per share")),
    ],
    Tier::new("Loss", "Negative earnings per share"),
);

static PE_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (30.0, Tier::new("Very High", "High growth expectations or overvalued")),
        (20.0, Tier::new("High", "Strong growth expectations")),
        (15.0, Tier::new("Average-High", "Market-level to above-average valuation")),
        (10.0, Tier::new("Average", "Market-level valuation")),
        (5.0, Tier::new("Low", "Below-average valuation or concerns")),
    ],
    Tier::new("Very Low", "Undervalued or significant concerns"),
);

static PE_VALUATION: Ladder<&str> = Ladder::at_least(
    &[
        (25.0, "Potentially Overvalued"),
        (15.0, "Fairly Valued"),
        (8.0, "Reasonably Valued"),
    ],
    "Potentially Undervalued",
);

/// Net income / weighted average shares outstanding.
pub fn earnings_per_share(net_income: f64, weighted_average_shares: f64) -> FinResult<RatioResult> {
    let eps = checked_ratio(
        net_income,
        weighted_average_shares,
        "weighted average shares cannot be zero",
    )?;
    Ok(RatioResult::tiered(eps, EPS_TIERS.classify(eps)))
}

/// Market price / earnings per share.
pub fn price_to_earnings_ratio(market_price: f64, earnings_per_share: f64) -> FinResult<RatioResult> {
    let pe = checked_ratio(
        market_price,
        earnings_per_share,
        "earnings per share cannot be zero",
    )?;
    Ok(RatioResult::tiered(pe, PE_TIERS.classify(pe)).with_assessment(PE_VALUATION.classify(pe)))
}
