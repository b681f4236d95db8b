//! Financial ratio analysis.
//!
//! Every ratio validates its denominator, computes the value and classifies
//! it through its own threshold [`Ladder`](fincalc_core::types::Ladder).
//! Cut points are inclusive on the side the ladder names: a current ratio of
//! exactly `1.5` is `Good`, `1.4999` is `Adequate`.
//!
//! Percentage ladders (ROE, ROA, margins) compare `ratio * 100` against
//! whole-number bounds.

mod cost_volume;
mod leverage;
mod liquidity;
mod market;
mod profitability;
mod valuation;

pub use cost_volume::{break_even_revenue, break_even_units};
pub(crate) use cost_volume::break_even_detail;
pub use leverage::debt_to_equity_ratio;
pub use liquidity::{cash_conversion_cycle, current_ratio, quick_ratio, working_capital};
pub use market::{earnings_per_share, price_to_earnings_ratio};
pub use profitability::{
    gross_profit_margin, net_profit_margin, operating_margin, return_on_assets, return_on_equity,
    DuPontInputs,
};
pub use valuation::{dividend_discount_model, economic_value_added};

use fincalc_core::{FinError, FinResult};

/// Divides after checking the denominator; `context` names the denominator.
pub(crate) fn checked_ratio(numerator: f64, denominator: f64, context: &str) -> FinResult<f64> {
    FinError::check_denominator(context, denominator)?;
    Ok(numerator / denominator)
}
