//! Return and margin ratios.
//!
//! Tiers are assigned on the percentage (`ratio * 100`).

use fincalc_core::prelude::*;

use super::checked_ratio;

static ROE_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (25.0, Tier::new("Exceptional", "Outstanding returns, investigate sustainability")),
        (20.0, Tier::new("Excellent", "Very strong returns for shareholders")),
        (15.0, Tier::new("Very Good", "Above-average performance")),
        (10.0, Tier::new("Average", "Market-level returns")),
        (5.0, Tier::new("Below Average", "Subpar performance, needs improvement")),
        (0.0, Tier::new("Poor", "Weak returns, significant concerns")),
    ],
    Tier::new("Loss", "Company is losing money"),
);

static ROA_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (15.0, Tier::new("Exceptional", "Outstanding asset utilization and profitability")),
        (10.0, Tier::new("Excellent", "Very efficient asset utilization")),
        (5.0, Tier::new("Good", "Above-average asset efficiency")),
        (2.0, Tier::new("Average", "Market-level asset utilization")),
        (0.0, Tier::new("Poor", "Inefficient asset utilization")),
    ],
    Tier::new("Loss", "Assets generating losses"),
);

static ASSET_EFFICIENCY: Ladder<&str> = Ladder::at_least(
    &[
        (10.0, "Highly Efficient"),
        (5.0, "Efficient"),
        (2.0, "Moderately Efficient"),
    ],
    "Inefficient",
);

static GROSS_MARGIN_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (70.0, Tier::new("Exceptional", "Outstanding pricing power and cost control")),
        (50.0, Tier::new("Excellent", "Strong gross profitability")),
        (30.0, Tier::new("Good", "Healthy gross margins")),
        (20.0, Tier::new("Average", "Market-level gross margins")),
        (10.0, Tier::new("Weak", "Low gross profitability")),
    ],
    Tier::new("Poor", "Very weak gross margins"),
);

static OPERATING_MARGIN_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (25.0, Tier::new("Exceptional", "Outstanding operational efficiency")),
        (15.0, Tier::new("Excellent", "Strong operational performance")),
        (10.0, Tier::new("Good", "Healthy operating margins")),
        (5.0, Tier::new("Average", "Market-level operating efficiency")),
        (0.0, Tier::new("Weak", "Poor operating performance")),
    ],
    Tier::new("Loss", "Operating losses"),
);

static NET_MARGIN_TIERS: Ladder<Tier> = Ladder::at_least(
    &[
        (20.0, Tier::new("Exceptional", "Outstanding overall profitability")),
        (10.0, Tier::new("Excellent", "Strong net profitability")),
        (5.0, Tier::new("Good", "Healthy net margins")),
        (2.0, Tier::new("Average", "Market-level profitability")),
        (0.0, Tier::new("Weak", "Poor overall profitability")),
    ],
    Tier::new("Loss", "Net losses"),
);

const LEADER: &str = "Industry Leader";
const COMPETITIVE: &str = "Competitive";
const BELOW_AVERAGE: &str = "Below Average";
const UNDERPERFORMER: &str = "Underperformer";

static GROSS_POSITION: Ladder<&str> = Ladder::at_least(
    &[(50.0, LEADER), (30.0, COMPETITIVE), (20.0, BELOW_AVERAGE)],
    UNDERPERFORMER,
);

static OPERATING_POSITION: Ladder<&str> = Ladder::at_least(
    &[(15.0, LEADER), (10.0, COMPETITIVE), (5.0, BELOW_AVERAGE)],
    UNDERPERFORMER,
);

static NET_POSITION: Ladder<&str> = Ladder::at_least(
    &[(10.0, LEADER), (5.0, COMPETITIVE), (2.0, BELOW_AVERAGE)],
    UNDERPERFORMER,
);

/// Optional inputs that enable the DuPont breakdown of ROE.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DuPontInputs {
    /// Revenue for the period.
    pub revenue: f64,
    /// Total assets.
    pub total_assets: f64,
}

/// Net income / average shareholders' equity.
///
/// When `dupont` is supplied with non-zero revenue and assets, the result
/// carries the margin × turnover × leverage decomposition.
///
/// # Example
///
/// ```rust
/// use fincalc_formulas::ratios::{return_on_equity, DuPontInputs};
/// use fincalc_core::types::RatioDetail;
///
/// let inputs = DuPontInputs { revenue: 500_000.0, total_assets: 800_000.0 };
/// let result = return_on_equity(50_000.0, 400_000.0, Some(inputs)).unwrap();
/// let Some(RatioDetail::DuPont(dupont)) = result.detail else { panic!() };
/// assert!((dupont.verification - result.value).abs() < 1e-12);
/// ```
pub fn return_on_equity(
    net_income: f64,
    average_equity: f64,
    dupont: Option<DuPontInputs>,
) -> FinResult<RatioResult> {
    let roe = checked_ratio(net_income, average_equity, "average equity cannot be zero")?;
    let mut result = RatioResult::tiered(roe, ROE_TIERS.classify(roe * 100.0));

    if let Some(DuPontInputs {
        revenue,
        total_assets,
    }) = dupont.filter(|d| d.revenue != 0.0 && d.total_assets != 0.0)
    {
        let net_profit_margin = net_income / revenue;
        let asset_turnover = revenue / total_assets;
        let equity_multiplier = total_assets / average_equity;
        result = result.with_detail(RatioDetail::DuPont(DuPont {
            net_profit_margin,
            asset_turnover,
            equity_multiplier,
            verification: net_profit_margin * asset_turnover * equity_multiplier,
        }));
    }
    Ok(result)
}

/// Net income / average total assets.
pub fn return_on_assets(net_income: f64, average_assets: f64) -> FinResult<RatioResult> {
    let roa = checked_ratio(net_income, average_assets, "average assets cannot be zero")?;
    let pct = roa * 100.0;
    Ok(RatioResult::tiered(roa, ROA_TIERS.classify(pct)).with_assessment(ASSET_EFFICIENCY.classify(pct)))
}

/// Gross profit / revenue.
pub fn gross_profit_margin(gross_profit: f64, revenue: f64) -> FinResult<RatioResult> {
    margin(gross_profit, revenue, &GROSS_MARGIN_TIERS, &GROSS_POSITION)
}

/// Operating income / revenue.
pub fn operating_margin(operating_income: f64, revenue: f64) -> FinResult<RatioResult> {
    margin(operating_income, revenue, &OPERATING_MARGIN_TIERS, &OPERATING_POSITION)
}

/// Net income / revenue.
pub fn net_profit_margin(net_income: f64, revenue: f64) -> FinResult<RatioResult> {
    margin(net_income, revenue, &NET_MARGIN_TIERS, &NET_POSITION)
}

fn margin(
    income: f64,
    revenue: f64,
    tiers: &Ladder<Tier>,
    position: &Ladder<&'static str>,
) -> FinResult<RatioResult> {
    let margin = checked_ratio(income, revenue, "revenue cannot be zero")?;
    let pct = margin * 100.0;
    Ok(RatioResult::tiered(margin, tiers.classify(pct)).with_assessment(position.classify(pct)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn level(result: &RatioResult) -> &'static str {
        result.tier.map(|t| t.level).unwrap_or_default()
    }

    #[test]
    fn test_roe_default() {
        let result = return_on_equity(50_000.0, 400_000.0, None).unwrap();
        assert_relative_eq!(result.value, 0.125);
        assert_eq!(level(&result), "Average");
        assert!(result.detail.is_none());
    }

    #[test]
    fn test_roe_ladder() {
        let level_for = |income: f64| level(&return_on_equity(income, 100.0, None).unwrap());
        assert_eq!(level_for(25.0), "Exceptional");
        assert_eq!(level_for(20.0), "Excellent");
        assert_eq!(level_for(16.0), "Very Good");
        assert_eq!(level_for(5.0), "Below Average");
        assert_eq!(level_for(0.0), "Poor");
        assert_eq!(level_for(-1.0), "Loss");
    }

    #[test]
    fn test_dupont_decomposition() {
        let inputs = DuPontInputs {
            revenue: 500_000.0,
            total_assets: 800_000.0,
        };
        let result = return_on_equity(50_000.0, 400_000.0, Some(inputs)).unwrap();
        let Some(RatioDetail::DuPont(dupont)) = result.detail else {
            panic!("expected DuPont detail");
        };
        assert_relative_eq!(dupont.net_profit_margin, 0.1);
        assert_relative_eq!(dupont.asset_turnover, 0.625);
        assert_relative_eq!(dupont.equity_multiplier, 2.0);
        assert_relative_eq!(dupont.verification, result.value, epsilon = 1e-12);
    }

    #[test]
    fn test_dupont_skipped_without_revenue() {
        let inputs = DuPontInputs {
            revenue: 0.0,
            total_assets: 800_000.0,
        };
        let result = return_on_equity(50_000.0, 400_000.0, Some(inputs)).unwrap();
        assert!(result.detail.is_none());
    }

    #[test]
    fn test_roe_zero_equity() {
        assert!(matches!(
            return_on_equity(1.0, 0.0, None),
            Err(FinError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_roa() {
        let result = return_on_assets(50_000.0, 500_000.0).unwrap();
        assert_eq!(level(&result), "Excellent");
        assert_eq!(result.assessment, Some("Highly Efficient"));
        assert!(return_on_assets(1.0, 0.0).is_err());
    }

    #[test]
    fn test_margins() {
        let gross = gross_profit_margin(150_000.0, 250_000.0).unwrap();
        assert_eq!(level(&gross), "Excellent");
        assert_eq!(gross.assessment, Some("Industry Leader"));

        let operating = operating_margin(75_000.0, 250_000.0).unwrap();
        assert_eq!(level(&operating), "Exceptional");

        let net = net_profit_margin(5_000.0, 250_000.0).unwrap();
        assert_eq!(level(&net), "Average");
        assert_eq!(net.assessment, Some("Below Average"));

        let loss = net_profit_margin(-5_000.0, 250_000.0).unwrap();
        assert_eq!(level(&loss), "Loss");
        assert_eq!(loss.assessment, Some("Underperformer"));

        assert!(gross_profit_margin(1.0, 0.0).is_err());
    }
}
