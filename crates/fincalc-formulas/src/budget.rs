//! Flexible budgeting across activity levels.

use serde::Serialize;

use fincalc_core::prelude::*;

use crate::ratios::break_even_detail;

/// Budget figures at one activity level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetLine {
    /// Units sold.
    pub units: f64,
    /// `units * price_per_unit`.
    pub revenue: f64,
    /// `units * variable_cost_per_unit`.
    pub variable_costs: f64,
    /// Fixed plus variable costs.
    pub total_costs: f64,
    /// Revenue minus variable costs.
    pub contribution_margin: f64,
    /// Contribution margin / revenue; `None` at zero revenue.
    pub contribution_margin_ratio: Option<f64>,
    /// Revenue minus total costs.
    pub operating_income: f64,
}

/// A flexible budget with its break-even point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlexibleBudget {
    /// Fixed costs shared by every line.
    pub fixed_costs: f64,
    /// One line per requested activity level, in input order.
    pub lines: Vec<BudgetLine>,
    /// Break-even analysis for the same cost structure.
    pub break_even: BreakEvenDetail,
}

/// Projects revenue, costs and operating income at each activity level.
///
/// # Errors
///
/// Returns [`FinError::Validation`] for negative costs or activity levels and
/// [`FinError::InvalidAssumption`] when price does not exceed variable cost.
pub fn flexible_budget(
    fixed_costs: f64,
    variable_cost_per_unit: f64,
    price_per_unit: f64,
    activity_levels: &[f64],
) -> FinResult<FlexibleBudget> {
    if fixed_costs < 0.0 {
        return Err(FinError::validation("fixed_costs", "cost cannot be negative"));
    }
    if variable_cost_per_unit < 0.0 {
        return Err(FinError::validation(
            "variable_cost_per_unit",
            "cost cannot be negative",
        ));
    }
    if let Some(bad) = activity_levels.iter().find(|u| !u.is_finite() || **u < 0.0) {
        return Err(FinError::validation(
            "activity_levels",
            format!("activity level must be a non-negative number, got {bad}"),
        ));
    }

    let break_even = break_even_detail(fixed_costs, price_per_unit, variable_cost_per_unit)?;

    let lines = activity_levels
        .iter()
        .map(|&units| {
            let revenue = units * price_per_unit;
            let variable_costs = units * variable_cost_per_unit;
            let total_costs = fixed_costs + variable_costs;
            let contribution_margin = revenue - variable_costs;
            BudgetLine {
                units,
                revenue,
                variable_costs,
                total_costs,
                contribution_margin,
                contribution_margin_ratio: (revenue != 0.0).then(|| contribution_margin / revenue),
                operating_income: revenue - total_costs,
            }
        })
        .collect();

    Ok(FlexibleBudget {
        fixed_costs,
        lines,
        break_even,
    })
}
