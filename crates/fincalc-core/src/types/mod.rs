//! Domain types for formula inputs and outputs.

mod params;
mod result;
mod tier;

pub use params::{ParamKind, ParamRole, ParamSpec, ParamValue};
pub use result::{
    AmortizationRow, AmortizationSchedule, BreakEvenDetail, DuPont, FormulaResult, IrrIteration,
    IrrSolution, RatioDetail, RatioResult,
};
pub use tier::{Ladder, Tier};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Formula category.
///
/// Categories group formulas in the catalog and drive category listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Present/future value and compounding.
    TimeValueOfMoney,
    /// NPV, IRR and payback.
    InvestmentAnalysis,
    /// Current and quick ratio, working capital.
    LiquidityAnalysis,
    /// Returns and margins.
    ProfitabilityAnalysis,
    /// Debt-to-equity.
    LeverageAnalysis,
    /// Break-even analysis.
    CostVolumeProfit,
    /// EPS and P/E.
    MarketRatios,
    /// Dividend discount model and EVA.
    ValuationModels,
    /// Loan payments and schedules.
    AmortizationAnalysis,
    /// Cash conversion cycle.
    WorkingCapitalAnalysis,
}

impl Category {
    /// Returns the display name of the category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TimeValueOfMoney => "Time Value of Money",
            Self::InvestmentAnalysis => "Investment Analysis",
            Self::LiquidityAnalysis => "Liquidity Analysis",
            Self::ProfitabilityAnalysis => "Profitability Analysis",
            Self::LeverageAnalysis => "Leverage Analysis",
            Self::CostVolumeProfit => "Cost-Volume-Profit Analysis",
            Self::MarketRatios => "Market Ratios",
            Self::ValuationModels => "Valuation Models",
            Self::AmortizationAnalysis => "Amortization Analysis",
            Self::WorkingCapitalAnalysis => "Working Capital Analysis",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
