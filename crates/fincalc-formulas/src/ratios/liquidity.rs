//! Liquidity and working capital ratios.

use fincalc_core::prelude::*;

use super::checked_ratio;

static CURRENT_RATIO_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (2.5, Tier::new("Excellent", "Very strong liquidity position, may indicate inefficient use of assets")),
        (2.0, Tier::new("Very Good", "Strong liquidity position with comfortable safety margin")),
        (1.5, Tier::new("Good", "Adequate liquidity for normal operations")),
        (1.2, Tier::new("Adequate", "Minimal but acceptable liquidity cushion")),
        (1.0, Tier::new("Weak", "Just meeting short-term obligations, monitor closely")),
    ],
    Tier::new("Poor", "Significant liquidity concerns, immediate attention required"),
);

static QUICK_RATIO_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (1.5, Tier::new("Excellent", "Very strong immediate liquidity without relying on inventory")),
        (1.0, Tier::new("Good", "Adequate immediate liquidity to meet short-term obligations")),
        (0.8, Tier::new("Adequate", "Minimal but acceptable immediate liquidity")),
        (0.6, Tier::new("Weak", "Limited immediate liquidity - monitor closely")),
    ],
    Tier::new("Critical", "Insufficient liquid assets to meet short-term obligations"),
);

static LIQUIDITY_RISK: Ladder<&str> = Ladder::at_least(
    &[(2.0, "Low Risk"), (1.5, "Moderate Risk"), (1.0, "High Risk")],
    "Critical Risk",
);

static WORKING_CAPITAL_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (0.5, Tier::new("Strong", "Substantial working capital cushion")),
        (0.3, Tier::new("Good", "Adequate working capital position")),
        (0.1, Tier::new("Adequate", "Minimal but sufficient working capital")),
        (0.0, Tier::new("Weak", "Limited working capital buffer")),
    ],
    Tier::new("Negative", "Working capital deficit - liquidity risk"),
);

static CASH_CYCLE_TIERS: Ladder<Tier> = Ladder::at_most(
    &[
        (30.0, Tier::new("Excellent", "Very efficient cash conversion - strong working capital management")),
        (60.0, Tier::new("Good", "Efficient cash conversion cycle")),
        (90.0, Tier::new("Average", "Market-level cash conversion efficiency")),
        (120.0, Tier::new("Weak", "Slow cash conversion - needs improvement")),
    ],
    Tier::new("Poor", "Very slow cash conversion - significant working capital issues"),
);

static CASH_CYCLE_EFFICIENCY: Ladder<&str> = Ladder::at_most(
    &[
        (45.0, "Highly Efficient"),
        (75.0, "Efficient"),
        (105.0, "Moderately Efficient"),
    ],
    "Inefficient",
);

/// Current assets / current liabilities, with working capital attached.
///
/// # Example
///
/// ```rust
/// use fincalc_formulas::ratios::current_ratio;
///
/// let result = current_ratio(250_000.0, 150_000.0).unwrap();
/// assert_eq!(result.tier.unwrap().level, "Good");
/// ```
pub fn current_ratio(current_assets: f64, current_liabilities: f64) -> FinResult<RatioResult> {
    let ratio = checked_ratio(
        current_assets,
        current_liabilities,
        "current liabilities cannot be zero",
    )?;
    Ok(RatioResult::tiered(ratio, CURRENT_RATIO_TIERS.classify(ratio))
        .with_assessment(LIQUIDITY_RISK.classify(ratio))
        .with_detail(RatioDetail::WorkingCapital {
            working_capital: current_assets - current_liabilities,
        }))
}

/// Quick assets / current liabilities.
pub fn quick_ratio(quick_assets: f64, current_liabilities: f64) -> FinResult<RatioResult> {
    let ratio = checked_ratio(
        quick_assets,
        current_liabilities,
        "current liabilities cannot be zero",
    )?;
    Ok(RatioResult::tiered(ratio, QUICK_RATIO_TIERS.classify(ratio))
        .with_assessment(LIQUIDITY_RISK.classify(ratio)))
}

/// Current assets minus current liabilities.
///
/// Tiered by working capital as a share of current assets; the assessment
/// compares working capital with current liabilities.
pub fn working_capital(current_assets: f64, current_liabilities: f64) -> FinResult<RatioResult> {
    let working_capital = current_assets - current_liabilities;
    let share = checked_ratio(
        working_capital,
        current_assets,
        "current assets cannot be zero",
    )?;

    let adequacy = if working_capital >= current_liabilities {
        "More than Adequate"
    } else if working_capital >= current_liabilities * 0.5 {
        "Adequate"
    } else if working_capital >= 0.0 {
        "Minimal"
    } else {
        "Inadequate"
    };

    Ok(RatioResult::tiered(working_capital, WORKING_CAPITAL_TIERS.classify(share))
        .with_assessment(adequacy))
}

/// Days inventory + days receivables - days payables.
pub fn cash_conversion_cycle(
    days_inventory: f64,
    days_receivables: f64,
    days_payables: f64,
) -> FinResult<RatioResult> {
    let ccc = days_inventory + days_receivables - days_payables;
    Ok(RatioResult::tiered(ccc, CASH_CYCLE_TIERS.classify(ccc))
        .with_assessment(CASH_CYCLE_EFFICIENCY.classify(ccc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn level(result: &RatioResult) -> &'static str {
        result.tier.map(|t| t.level).unwrap_or_default()
    }

    #[test]
    fn test_current_ratio_scenario() {
        let result = current_ratio(250_000.0, 150_000.0).unwrap();
        assert_relative_eq!(result.value, 1.6667, epsilon = 1e-4);
        assert_eq!(level(&result), "Good");
        assert_eq!(result.assessment, Some("Moderate Risk"));
        assert_eq!(
            result.detail,
            Some(RatioDetail::WorkingCapital {
                working_capital: 100_000.0
            })
        );
    }

    #[test]
    fn test_current_ratio_cut_points() {
        let cases = [
            (250.0, "Excellent"),
            (200.0, "Very Good"),
            (150.0, "Good"),
            (120.0, "Adequate"),
            (100.0, "Weak"),
            (99.0, "Poor"),
        ];
        for (assets, expected) in cases {
            let result = current_ratio(assets, 100.0).unwrap();
            assert_eq!(level(&result), expected, "assets {assets}");
        }
        assert_eq!(level(&current_ratio(149.999, 100.0).unwrap()), "Adequate");
    }

    #[test]
    fn test_current_ratio_zero_liabilities() {
        assert!(matches!(
            current_ratio(100.0, 0.0),
            Err(FinError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_quick_ratio() {
        let result = quick_ratio(150_000.0, 100_000.0).unwrap();
        assert_eq!(level(&result), "Excellent");
        assert_eq!(result.assessment, Some("Moderate Risk"));

        assert_eq!(level(&quick_ratio(60.0, 100.0).unwrap()), "Weak");
        assert_eq!(level(&quick_ratio(59.0, 100.0).unwrap()), "Critical");
        assert!(quick_ratio(1.0, 0.0).is_err());
    }

    #[test]
    fn test_working_capital() {
        let result = working_capital(300_000.0, 150_000.0).unwrap();
        assert_eq!(result.value, 150_000.0);
        assert_eq!(level(&result), "Strong");
        assert_eq!(result.assessment, Some("More than Adequate"));

        let deficit = working_capital(100_000.0, 150_000.0).unwrap();
        assert_eq!(level(&deficit), "Negative");
        assert_eq!(deficit.assessment, Some("Inadequate"));

        assert!(working_capital(0.0, 10.0).is_err());
    }

    #[test]
    fn test_cash_conversion_cycle() {
        let result = cash_conversion_cycle(45.0, 30.0, 35.0).unwrap();
        assert_eq!(result.value, 40.0);
        assert_eq!(level(&result), "Good");
        assert_eq!(result.assessment, Some("Highly Efficient"));

        assert_eq!(level(&cash_conversion_cycle(20.0, 10.0, 0.0).unwrap()), "Excellent");
        assert_eq!(level(&cash_conversion_cycle(121.0, 0.0, 0.0).unwrap()), "Poor");
    }
}
