//! Formula outputs.

use serde::Serialize;

use super::tier::Tier;

/// Output of a formula calculation.
///
/// Every variant reduces to an optional headline number through
/// [`FormulaResult::primary_value`], which is what the sensitivity, scenario
/// and Monte Carlo layers consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormulaResult {
    /// A bare scalar (present value, NPV, loan payment, ...).
    Value {
        /// The computed value.
        value: f64,
    },
    /// Payback period in years; `None` when the investment never recovers.
    Payback {
        /// Years to recovery.
        years: Option<f64>,
    },
    /// IRR solver outcome.
    Irr(IrrSolution),
    /// A classified ratio.
    Ratio(RatioResult),
    /// A full amortization schedule.
    Schedule(AmortizationSchedule),
}

impl FormulaResult {
    /// Wraps a bare scalar.
    #[must_use]
    pub fn value(value: f64) -> Self {
        Self::Value { value }
    }

    /// Wraps a payback search outcome.
    #[must_use]
    pub fn payback(years: Option<f64>) -> Self {
        Self::Payback { years }
    }

    /// Returns the headline number of the result.
    ///
    /// `None` for a payback that never recovers and for an IRR run that did
    /// not converge.
    #[must_use]
    pub fn primary_value(&self) -> Option<f64> {
        match self {
            Self::Value { value } => Some(*value),
            Self::Payback { years } => *years,
            Self::Irr(solution) => solution.converged.then_some(solution.rate),
            Self::Ratio(ratio) => Some(ratio.value),
            Self::Schedule(schedule) => Some(schedule.payment),
        }
    }

    /// Returns the tier for classified ratios.
    #[must_use]
    pub fn tier(&self) -> Option<Tier> {
        match self {
            Self::Ratio(ratio) => ratio.tier,
            _ => None,
        }
    }
}

/// One Newton-Raphson step of the IRR solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IrrIteration {
    /// 1-based iteration number.
    pub iteration: u32,
    /// Rate evaluated at this step.
    pub rate: f64,
    /// NPV at `rate`.
    pub npv: f64,
    /// dNPV/dr at `rate`.
    pub derivative: f64,
}

/// Result of an IRR solve.
///
/// Exhausting the iteration budget is reported here with
/// `converged == false`, not raised as an error. A solve whose NPV or
/// derivative overflows is reported the same way, but stops at the
/// iteration that overflowed, so `iterations` can be below the cap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrrSolution {
    /// Final rate estimate.
    pub rate: f64,
    /// Whether a convergence criterion was met.
    pub converged: bool,
    /// Iterations performed; `max_iterations` on exhaustion, fewer when the
    /// estimate left the finite domain.
    pub iterations: u32,
    /// NPV at the final estimate.
    pub final_npv: f64,
    /// Per-iteration trace for diagnostics.
    pub trace: Vec<IrrIteration>,
}

/// A ratio with its classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioResult {
    /// The ratio or derived value.
    pub value: f64,
    /// Tier from the ratio's threshold ladder.
    pub tier: Option<Tier>,
    /// Secondary categorical assessment (risk level, competitive position, ...).
    pub assessment: Option<&'static str>,
    /// Extra figures for composite ratios.
    pub detail: Option<RatioDetail>,
}

impl RatioResult {
    /// Creates a tiered ratio without assessment or detail.
    #[must_use]
    pub fn tiered(value: f64, tier: Tier) -> Self {
        Self {
            value,
            tier: Some(tier),
            assessment: None,
            detail: None,
        }
    }

    /// Sets the secondary assessment.
    #[must_use]
    pub fn with_assessment(mut self, assessment: &'static str) -> Self {
        self.assessment = Some(assessment);
        self
    }

    /// Sets the detail.
    #[must_use]
    pub fn with_detail(mut self, detail: RatioDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Extra figures attached to composite ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RatioDetail {
    /// ROE decomposition.
    DuPont(DuPont),
    /// Break-even figures.
    BreakEven(BreakEvenDetail),
    /// Working capital alongside a liquidity ratio.
    WorkingCapital {
        /// Current assets minus current liabilities.
        working_capital: f64,
    },
}

/// DuPont decomposition of return on equity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DuPont {
    /// Net income / revenue.
    pub net_profit_margin: f64,
    /// Revenue / total assets.
    pub asset_turnover: f64,
    /// Total assets / equity.
    pub equity_multiplier: f64,
    /// Product of the three factors; equals ROE up to rounding.
    pub verification: f64,
}

/// Break-even figures for a unit-based analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakEvenDetail {
    /// Units needed to cover fixed costs.
    pub break_even_units: f64,
    /// Revenue at the break-even volume.
    pub break_even_revenue: f64,
    /// Price minus variable cost per unit.
    pub contribution_margin: f64,
    /// Contribution margin / price.
    pub contribution_margin_ratio: f64,
}

/// One period of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmortizationRow {
    /// 1-based period number.
    pub period: u32,
    /// Total payment for the period.
    pub payment: f64,
    /// Portion of the payment that reduces principal.
    pub principal_payment: f64,
    /// Portion of the payment that is interest.
    pub interest_payment: f64,
    /// Balance after the payment, floored at zero.
    pub remaining_balance: f64,
}

/// A level-payment amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationSchedule {
    /// Level payment per period.
    pub payment: f64,
    /// Per-period rows.
    pub rows: Vec<AmortizationRow>,
    /// Sum of interest portions.
    pub total_interest: f64,
    /// Sum of all payments.
    pub total_paid: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(converged: bool) -> IrrSolution {
        IrrSolution {
            rate: 0.12,
            converged,
            iterations: 4,
            final_npv: 1e-12,
            trace: Vec::new(),
        }
    }

    #[test]
    fn test_primary_value() {
        assert_eq!(FormulaResult::value(6805.83).primary_value(), Some(6805.83));
        assert_eq!(FormulaResult::payback(None).primary_value(), None);
        assert_eq!(FormulaResult::payback(Some(3.25)).primary_value(), Some(3.25));
        assert_eq!(FormulaResult::Irr(solution(true)).primary_value(), Some(0.12));
        assert_eq!(FormulaResult::Irr(solution(false)).primary_value(), None);
    }

    #[test]
    fn test_ratio_tier() {
        let result = FormulaResult::Ratio(
            RatioResult::tiered(1.667, Tier::new("Good", "Adequate liquidity"))
                .with_assessment("Moderate Risk"),
        );
        assert_eq!(result.tier().map(|t| t.level), Some("Good"));
        assert_eq!(result.primary_value(), Some(1.667));
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(FormulaResult::value(1.5)).unwrap();
        assert_eq!(json["kind"], "value");
        assert_eq!(json["value"], 1.5);
    }
}
