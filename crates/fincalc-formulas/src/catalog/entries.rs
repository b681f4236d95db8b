//! Catalog entries.

use fincalc_core::prelude::*;
use fincalc_math::solvers::SolverConfig;

use super::{Evaluate, FormulaDescriptor, Preference};
use crate::amortization::{amortization_schedule, loan_payment, whole_periods};
use crate::investment::{
    discounted_payback_period, internal_rate_of_return, net_present_value, payback_period,
};
use crate::ratios::{self, DuPontInputs};
use crate::time_value::{
    compound_interest, effective_interest_rate, future_value, present_value, AnnuityTiming,
};

use fincalc_core::types::Category::{
    AmortizationAnalysis, CostVolumeProfit, InvestmentAnalysis, LeverageAnalysis,
    LiquidityAnalysis, MarketRatios, ProfitabilityAnalysis, TimeValueOfMoney, ValuationModels,
    WorkingCapitalAnalysis,
};
use fincalc_core::types::ParamRole::{
    Amount, Cost, Count, Days, Frequency, Iterations, Periods, Price, Rate, Ratio, Timing,
    Tolerance,
};

// ---------------------------------------------------------------------------
// Parameter specifications
// ---------------------------------------------------------------------------

const PRESENT_VALUE: &[ParamSpec] = &[
    ParamSpec::scalar("future_value", "Future Value ($)", Amount),
    ParamSpec::scalar("interest_rate", "Interest Rate (%)", Rate),
    ParamSpec::scalar("periods", "Number of Periods", Periods),
    ParamSpec::scalar("payment", "Payment ($)", Amount),
    ParamSpec::scalar("type", "Type (0=end, 1=beginning)", Timing),
];

const FUTURE_VALUE: &[ParamSpec] = &[
    ParamSpec::scalar("present_value", "Present Value ($)", Amount),
    ParamSpec::scalar("interest_rate", "Interest Rate (%)", Rate),
    ParamSpec::scalar("periods", "Number of Periods", Periods),
    ParamSpec::scalar("payment", "Payment ($)", Amount),
    ParamSpec::scalar("type", "Type (0=end, 1=beginning)", Timing),
];

const COMPOUND_INTEREST: &[ParamSpec] = &[
    ParamSpec::scalar("principal", "Principal ($)", Amount),
    ParamSpec::scalar("rate", "Annual Interest Rate (%)", Rate),
    ParamSpec::scalar("periods", "Number of Years", Periods),
    ParamSpec::scalar("compounding_frequency", "Compounding Frequency (per year)", Frequency),
];

const EFFECTIVE_RATE: &[ParamSpec] = &[
    ParamSpec::scalar("nominal_rate", "Nominal Interest Rate (%)", Rate),
    ParamSpec::scalar("compounding_frequency", "Compounding Frequency (per year)", Frequency),
];

const NPV: &[ParamSpec] = &[
    ParamSpec::scalar("discount_rate", "Discount Rate (%)", Rate),
    ParamSpec::series("cash_flows", "Cash Flows Array (Period 0, 1, 2...)"),
];

const IRR: &[ParamSpec] = &[
    ParamSpec::series("cash_flows", "Cash Flows Array"),
    ParamSpec::scalar("guess", "Initial Guess (%)", Rate),
    ParamSpec::scalar("max_iterations", "Max Iterations", Iterations),
    ParamSpec::scalar("tolerance", "Tolerance", Tolerance),
];

const PAYBACK: &[ParamSpec] = &[
    ParamSpec::scalar("initial_investment", "Initial Investment ($)", Amount),
    ParamSpec::series("cash_flows", "Annual Cash Flows Array"),
];

const DISCOUNTED_PAYBACK: &[ParamSpec] = &[
    ParamSpec::scalar("initial_investment", "Initial Investment ($)", Amount),
    ParamSpec::series("cash_flows", "Annual Cash Flows Array"),
    ParamSpec::scalar("discount_rate", "Discount Rate (%)", Rate),
];

const CURRENT_POSITION: &[ParamSpec] = &[
    ParamSpec::scalar("current_assets", "Current Assets ($)", Amount),
    ParamSpec::scalar("current_liabilities", "Current Liabilities ($)", Amount),
];

const QUICK_RATIO: &[ParamSpec] = &[
    ParamSpec::scalar("quick_assets", "Quick Assets ($)", Amount),
    ParamSpec::scalar("current_liabilities", "Current Liabilities ($)", Amount),
];

const CASH_CYCLE: &[ParamSpec] = &[
    ParamSpec::scalar("days_inventory_outstanding", "Days Inventory Outstanding", Days),
    ParamSpec::scalar("days_receivables_outstanding", "Days Receivables Outstanding", Days),
    ParamSpec::scalar("days_payables_outstanding", "Days Payables Outstanding", Days),
];

const DEBT_TO_EQUITY: &[ParamSpec] = &[
    ParamSpec::scalar("total_debt", "Total Debt ($)", Amount),
    ParamSpec::scalar("total_equity", "Total Equity ($)", Amount),
];

const ROE: &[ParamSpec] = &[
    ParamSpec::scalar("net_income", "Net Income ($)", Amount),
    ParamSpec::scalar("average_equity", "Average Shareholders' Equity ($)", Amount),
];

const DUPONT_ROE: &[ParamSpec] = &[
    ParamSpec::scalar("net_income", "Net Income ($)", Amount),
    ParamSpec::scalar("average_equity", "Average Shareholders' Equity ($)", Amount),
    ParamSpec::scalar("revenue", "Revenue ($)", Amount),
    ParamSpec::scalar("total_assets", "Total Assets ($)", Amount),
];

const ROA: &[ParamSpec] = &[
    ParamSpec::scalar("net_income", "Net Income ($)", Amount),
    ParamSpec::scalar("average_assets", "Average Total Assets ($)", Amount),
];

const GROSS_MARGIN: &[ParamSpec] = &[
    ParamSpec::scalar("gross_profit", "Gross Profit ($)", Amount),
    ParamSpec::scalar("revenue", "Revenue ($)", Amount),
];

const OPERATING_MARGIN: &[ParamSpec] = &[
    ParamSpec::scalar("operating_income", "Operating Income ($)", Amount),
    ParamSpec::scalar("revenue", "Revenue ($)", Amount),
];

const NET_MARGIN: &[ParamSpec] = &[
    ParamSpec::scalar("net_income", "Net Income ($)", Amount),
    ParamSpec::scalar("revenue", "Revenue ($)", Amount),
];

const EPS: &[ParamSpec] = &[
    ParamSpec::scalar("net_income", "Net Income ($)", Amount),
    ParamSpec::scalar(
        "weighted_average_shares",
        "Weighted Average Shares Outstanding",
        Count,
    ),
];

const PE_RATIO: &[ParamSpec] = &[
    ParamSpec::scalar("market_price", "Market Price per Share ($)", Price),
    ParamSpec::scalar("earnings_per_share", "Earnings Per Share ($)", Amount),
];

const BREAK_EVEN_UNITS: &[ParamSpec] = &[
    ParamSpec::scalar("fixed_costs", "Fixed Costs ($)", Cost),
    ParamSpec::scalar("price_per_unit", "Price per Unit ($)", Price),
    ParamSpec::scalar("variable_cost_per_unit", "Variable Cost per Unit ($)", Cost),
];

const BREAK_EVEN_REVENUE: &[ParamSpec] = &[
    ParamSpec::scalar("fixed_costs", "Fixed Costs ($)", Cost),
    ParamSpec::scalar(
        "contribution_margin_ratio",
        "Contribution Margin Ratio (%)",
        Ratio,
    ),
];

const DDM: &[ParamSpec] = &[
    ParamSpec::scalar("dividend", "Expected Dividend per Share ($)", Amount),
    ParamSpec::scalar("growth_rate", "Growth Rate (%)", Rate),
    ParamSpec::scalar("required_return", "Required Return (%)", Rate),
];

const EVA: &[ParamSpec] = &[
    ParamSpec::scalar("nopat", "Net Operating Profit After Tax ($)", Amount),
    ParamSpec::scalar("wacc", "Weighted Average Cost of Capital (%)", Rate),
    ParamSpec::scalar("invested_capital", "Invested Capital ($)", Amount),
];

const LOAN: &[ParamSpec] = &[
    ParamSpec::scalar("principal", "Principal Amount ($)", Amount),
    ParamSpec::scalar("rate", "Interest Rate per Period (%)", Rate),
    ParamSpec::scalar("periods", "Number of Periods", Periods),
];

// ---------------------------------------------------------------------------
// Parameter access
// ---------------------------------------------------------------------------

fn scalar(params: &[ParamValue], index: usize) -> FinResult<f64> {
    params
        .get(index)
        .ok_or_else(|| FinError::validation(format!("params[{index}]"), "missing parameter"))?
        .require_scalar(&format!("params[{index}]"))
}

fn series(params: &[ParamValue], index: usize) -> FinResult<&[f64]> {
    params
        .get(index)
        .ok_or_else(|| FinError::validation(format!("params[{index}]"), "missing parameter"))?
        .require_series(&format!("params[{index}]"))
}

fn scalars<const N: usize>(params: &[ParamValue]) -> FinResult<[f64; N]> {
    let mut values = [0.0; N];
    for (index, slot) in values.iter_mut().enumerate() {
        *slot = scalar(params, index)?;
    }
    Ok(values)
}

fn ratio(result: FinResult<RatioResult>) -> FinResult<FormulaResult> {
    result.map(FormulaResult::Ratio)
}

// ---------------------------------------------------------------------------
// Calculations
// ---------------------------------------------------------------------------

fn eval_present_value(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [fv, rate, periods, payment, flag] = scalars(p)?;
    let timing = AnnuityTiming::from_flag(flag)?;
    present_value(fv, rate, periods, payment, timing).map(FormulaResult::value)
}

fn eval_future_value(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [pv, rate, periods, payment, flag] = scalars(p)?;
    let timing = AnnuityTiming::from_flag(flag)?;
    future_value(pv, rate, periods, payment, timing).map(FormulaResult::value)
}

fn eval_compound_interest(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [principal, rate, years, frequency] = scalars(p)?;
    compound_interest(principal, rate, years, frequency).map(FormulaResult::value)
}

fn eval_effective_rate(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [nominal, frequency] = scalars(p)?;
    effective_interest_rate(nominal, frequency).map(FormulaResult::value)
}

fn eval_npv(p: &[ParamValue]) -> FinResult<FormulaResult> {
    net_present_value(scalar(p, 0)?, series(p, 1)?).map(FormulaResult::value)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn eval_irr(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let flows = series(p, 0)?;
    let guess = scalar(p, 1)?;
    let max_iterations = scalar(p, 2)?.min(f64::from(u32::MAX)) as u32;
    let config = SolverConfig::new(scalar(p, 3)?, max_iterations);
    internal_rate_of_return(flows, guess, &config).map(FormulaResult::Irr)
}

fn eval_payback(p: &[ParamValue]) -> FinResult<FormulaResult> {
    Ok(FormulaResult::payback(payback_period(
        scalar(p, 0)?,
        series(p, 1)?,
    )))
}

fn eval_discounted_payback(p: &[ParamValue]) -> FinResult<FormulaResult> {
    discounted_payback_period(scalar(p, 0)?, series(p, 1)?, scalar(p, 2)?)
        .map(FormulaResult::payback)
}

fn eval_current_ratio(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [assets, liabilities] = scalars(p)?;
    ratio(ratios::current_ratio(assets, liabilities))
}

fn eval_quick_ratio(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [assets, liabilities] = scalars(p)?;
    ratio(ratios::quick_ratio(assets, liabilities))
}

fn eval_working_capital(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [assets, liabilities] = scalars(p)?;
    ratio(ratios::working_capital(assets, liabilities))
}

fn eval_cash_cycle(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [inventory, receivables, payables] = scalars(p)?;
    ratio(ratios::cash_conversion_cycle(inventory, receivables, payables))
}

fn eval_debt_to_equity(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [debt, equity] = scalars(p)?;
    ratio(ratios::debt_to_equity_ratio(debt, equity))
}

fn eval_roe(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [income, equity] = scalars(p)?;
    ratio(ratios::return_on_equity(income, equity, None))
}

fn eval_dupont_roe(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [income, equity, revenue, total_assets] = scalars(p)?;
    let dupont = DuPontInputs {
        revenue,
        total_assets,
    };
    ratio(ratios::return_on_equity(income, equity, Some(dupont)))
}

fn eval_roa(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [income, assets] = scalars(p)?;
    ratio(ratios::return_on_assets(income, assets))
}

fn eval_gross_margin(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [profit, revenue] = scalars(p)?;
    ratio(ratios::gross_profit_margin(profit, revenue))
}

fn eval_operating_margin(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [income, revenue] = scalars(p)?;
    ratio(ratios::operating_margin(income, revenue))
}

fn eval_net_margin(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [income, revenue] = scalars(p)?;
    ratio(ratios::net_profit_margin(income, revenue))
}

fn eval_eps(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [income, shares] = scalars(p)?;
    ratio(ratios::earnings_per_share(income, shares))
}

fn eval_pe_ratio(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [price, eps] = scalars(p)?;
    ratio(ratios::price_to_earnings_ratio(price, eps))
}

fn eval_break_even_units(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [fixed, price, variable] = scalars(p)?;
    ratio(ratios::break_even_units(fixed, price, variable))
}

fn eval_break_even_revenue(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [fixed, cm_ratio] = scalars(p)?;
    ratio(ratios::break_even_revenue(fixed, cm_ratio))
}

fn eval_ddm(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [dividend, growth, required] = scalars(p)?;
    ratio(ratios::dividend_discount_model(dividend, growth, required))
}

fn eval_eva(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [nopat, wacc, capital] = scalars(p)?;
    ratio(ratios::economic_value_added(nopat, wacc, capital))
}

fn eval_loan_payment(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [principal, rate, periods] = scalars(p)?;
    loan_payment(principal, rate, periods).map(FormulaResult::value)
}

fn eval_schedule(p: &[ParamValue]) -> FinResult<FormulaResult> {
    let [principal, rate, periods] = scalars(p)?;
    let periods = whole_periods("periods", periods)?;
    amortization_schedule(principal, rate, periods).map(FormulaResult::Schedule)
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn formula(
    id: &'static str,
    name: &'static str,
    category: Category,
    params: &'static [ParamSpec],
    default_params: Vec<ParamValue>,
    expression: &'static str,
    description: &'static str,
    evaluate: Evaluate,
) -> FormulaDescriptor {
    FormulaDescriptor {
        id,
        name,
        category,
        params,
        default_params,
        expression,
        description,
        preference: Preference::HigherIsBetter,
        signed_outcome: false,
        critical_level: None,
        evaluate,
    }
}

impl FormulaDescriptor {
    fn lower_is_better(mut self) -> Self {
        self.preference = Preference::LowerIsBetter;
        self
    }

    fn signed(mut self) -> Self {
        self.signed_outcome = true;
        self
    }

    fn critical_at(mut self, level: f64) -> Self {
        self.critical_level = Some(level);
        self
    }
}

fn values(scalars: &[f64]) -> Vec<ParamValue> {
    scalars.iter().copied().map(ParamValue::from).collect()
}

#[allow(clippy::too_many_lines)]
pub(super) fn all() -> Vec<FormulaDescriptor> {
    let project = vec![-100_000.0, 25_000.0, 35_000.0, 40_000.0, 45_000.0, 50_000.0];
    let recovery = vec![25_000.0, 30_000.0, 35_000.0, 40_000.0];

    vec![
        // Time value of money
        formula(
            "present_value",
            "Present Value (PV)",
            TimeValueOfMoney,
            PRESENT_VALUE,
            values(&[10_000.0, 0.08, 5.0, 0.0, 0.0]),
            "PV = FV / (1 + r)^n + PMT × [(1 - (1 + r)^-n) / r]",
            "Calculates the current worth of a future sum of money or stream of cash flows",
            eval_present_value,
        ),
        formula(
            "future_value",
            "Future Value (FV)",
            TimeValueOfMoney,
            FUTURE_VALUE,
            values(&[5_000.0, 0.08, 5.0, 0.0, 0.0]),
            "FV = PV × (1 + r)^n + PMT × [((1 + r)^n - 1) / r]",
            "Calculates the future worth of a present sum of money or stream of cash flows",
            eval_future_value,
        ),
        formula(
            "compound_interest",
            "Compound Interest",
            TimeValueOfMoney,
            COMPOUND_INTEREST,
            values(&[10_000.0, 0.06, 10.0, 12.0]),
            "A = P(1 + r/n)^(nt)",
            "Calculates compound interest with specified compounding frequency",
            eval_compound_interest,
        ),
        formula(
            "effective_interest_rate",
            "Effective Interest Rate",
            TimeValueOfMoney,
            EFFECTIVE_RATE,
            values(&[0.06, 12.0]),
            "EIR = (1 + r/n)^n - 1",
            "Calculates the effective annual rate accounting for compounding",
            eval_effective_rate,
        ),
        // Investment analysis
        formula(
            "net_present_value",
            "Net Present Value (NPV)",
            InvestmentAnalysis,
            NPV,
            vec![ParamValue::from(0.12), ParamValue::from(project)],
            "NPV = Σ [CFt / (1 + r)^t]",
            "Measures the net value created by an investment after accounting for the time value of money",
            eval_npv,
        )
        .signed()
        .critical_at(0.0),
        formula(
            "internal_rate_of_return",
            "Internal Rate of Return (IRR)",
            InvestmentAnalysis,
            IRR,
            vec![
                ParamValue::from(vec![-100_000.0, 25_000.0, 35_000.0, 40_000.0, 45_000.0]),
                ParamValue::from(0.1),
                ParamValue::from(100.0),
                ParamValue::from(1e-10),
            ],
            "IRR: Rate where NPV = 0",
            "Finds the discount rate that makes NPV equal to zero",
            eval_irr,
        ),
        formula(
            "payback_period",
            "Payback Period",
            InvestmentAnalysis,
            PAYBACK,
            vec![ParamValue::from(100_000.0), ParamValue::from(recovery.clone())],
            "Payback = Years until Cumulative Cash Flows = Initial Investment",
            "Time required to recover initial investment from cash flows",
            eval_payback,
        )
        .lower_is_better(),
        formula(
            "discounted_payback_period",
            "Discounted Payback Period",
            InvestmentAnalysis,
            DISCOUNTED_PAYBACK,
            vec![
                ParamValue::from(100_000.0),
                ParamValue::from(recovery),
                ParamValue::from(0.1),
            ],
            "DPP = Years until Cumulative Discounted Cash Flows = Initial Investment",
            "Payback period accounting for time value of money",
            eval_discounted_payback,
        )
        .lower_is_better(),
        // Liquidity
        formula(
            "current_ratio",
            "Current Ratio",
            LiquidityAnalysis,
            CURRENT_POSITION,
            values(&[250_000.0, 150_000.0]),
            "Current Ratio = Current Assets / Current Liabilities",
            "Measures a company's ability to pay short-term obligations with short-term assets",
            eval_current_ratio,
        )
        .critical_at(1.0),
        formula(
            "quick_ratio",
            "Quick Ratio (Acid Test)",
            LiquidityAnalysis,
            QUICK_RATIO,
            values(&[150_000.0, 100_000.0]),
            "Quick Ratio = Quick Assets / Current Liabilities",
            "Measures ability to pay short-term obligations with most liquid assets",
            eval_quick_ratio,
        )
        .critical_at(1.0),
        formula(
            "working_capital",
            "Working Capital",
            LiquidityAnalysis,
            CURRENT_POSITION,
            values(&[300_000.0, 150_000.0]),
            "Working Capital = Current Assets - Current Liabilities",
            "Measures short-term financial health and operational efficiency",
            eval_working_capital,
        )
        .critical_at(0.0),
        // Profitability
        formula(
            "return_on_equity",
            "Return on Equity (ROE)",
            ProfitabilityAnalysis,
            ROE,
            values(&[50_000.0, 400_000.0]),
            "ROE = Net Income / Average Shareholders' Equity",
            "Measures how effectively a company generates profits from shareholders' investments",
            eval_roe,
        ),
        formula(
            "dupont_return_on_equity",
            "Return on Equity (DuPont)",
            ProfitabilityAnalysis,
            DUPONT_ROE,
            values(&[50_000.0, 400_000.0, 500_000.0, 800_000.0]),
            "ROE = Net Margin × Asset Turnover × Equity Multiplier",
            "Decomposes return on equity into margin, turnover and leverage",
            eval_dupont_roe,
        ),
        formula(
            "return_on_assets",
            "Return on Assets (ROA)",
            ProfitabilityAnalysis,
            ROA,
            values(&[50_000.0, 500_000.0]),
            "ROA = Net Income / Average Total Assets",
            "Measures how efficiently assets generate profits",
            eval_roa,
        ),
        formula(
            "gross_profit_margin",
            "Gross Profit Margin",
            ProfitabilityAnalysis,
            GROSS_MARGIN,
            values(&[150_000.0, 250_000.0]),
            "Gross Margin = Gross Profit / Revenue",
            "Measures profitability after direct costs",
            eval_gross_margin,
        ),
        formula(
            "operating_margin",
            "Operating Margin",
            ProfitabilityAnalysis,
            OPERATING_MARGIN,
            values(&[75_000.0, 250_000.0]),
            "Operating Margin = Operating Income / Revenue",
            "Measures operational efficiency after all operating expenses",
            eval_operating_margin,
        ),
        formula(
            "net_profit_margin",
            "Net Profit Margin",
            ProfitabilityAnalysis,
            NET_MARGIN,
            values(&[50_000.0, 250_000.0]),
            "Net Margin = Net Income / Revenue",
            "Measures overall profitability after all expenses",
            eval_net_margin,
        ),
        // Leverage
        formula(
            "debt_to_equity_ratio",
            "Debt-to-Equity Ratio",
            LeverageAnalysis,
            DEBT_TO_EQUITY,
            values(&[200_000.0, 300_000.0]),
            "D/E Ratio = Total Debt / Total Equity",
            "Measures financial leverage and capital structure",
            eval_debt_to_equity,
        )
        .lower_is_better(),
        // Cost-volume-profit
        formula(
            "break_even_units",
            "Break-Even Analysis",
            CostVolumeProfit,
            BREAK_EVEN_UNITS,
            values(&[120_000.0, 75.0, 45.0]),
            "Break-Even Units = Fixed Costs / (Price - Variable Cost per Unit)",
            "Determines the sales volume needed to cover all fixed and variable costs",
            eval_break_even_units,
        )
        .lower_is_better(),
        formula(
            "break_even_revenue",
            "Break-Even Revenue",
            CostVolumeProfit,
            BREAK_EVEN_REVENUE,
            values(&[120_000.0, 0.4]),
            "Break-Even Revenue = Fixed Costs / Contribution Margin Ratio",
            "Revenue level needed to cover all fixed and variable costs",
            eval_break_even_revenue,
        )
        .lower_is_better(),
        // Market ratios
        formula(
            "earnings_per_share",
            "Earnings Per Share (EPS)",
            MarketRatios,
            EPS,
            values(&[1_000_000.0, 100_000.0]),
            "EPS = Net Income / Weighted Average Shares Outstanding",
            "Net income attributable to each share of common stock",
            eval_eps,
        ),
        formula(
            "price_to_earnings_ratio",
            "Price-to-Earnings Ratio (P/E)",
            MarketRatios,
            PE_RATIO,
            values(&[50.0, 2.5]),
            "P/E Ratio = Market Price per Share / Earnings per Share",
            "Valuation ratio comparing price to earnings",
            eval_pe_ratio,
        )
        .lower_is_better(),
        // Valuation
        formula(
            "dividend_discount_model",
            "Dividend Discount Model (DDM)",
            ValuationModels,
            DDM,
            values(&[2.5, 0.05, 0.12]),
            "DDM Value = Dividend / (Required Return - Growth Rate)",
            "Values stock based on present value of expected dividends",
            eval_ddm,
        ),
        formula(
            "economic_value_added",
            "Economic Value Added (EVA)",
            ValuationModels,
            EVA,
            values(&[150_000.0, 0.1, 1_000_000.0]),
            "EVA = NOPAT - (WACC × Invested Capital)",
            "Measures value creation above cost of capital",
            eval_eva,
        )
        .signed()
        .critical_at(0.0),
        // Amortization
        formula(
            "loan_payment",
            "Loan Payment Calculator",
            AmortizationAnalysis,
            LOAN,
            values(&[200_000.0, 0.005, 360.0]),
            "PMT = P × [r(1 + r)^n] / [(1 + r)^n - 1]",
            "Calculates periodic payment for a loan",
            eval_loan_payment,
        )
        .lower_is_better(),
        formula(
            "amortization_schedule",
            "Amortization Schedule",
            AmortizationAnalysis,
            LOAN,
            values(&[200_000.0, 0.005, 360.0]),
            "Interest = Balance × r; Principal = PMT - Interest",
            "Breaks a level-payment loan into per-period interest and principal",
            eval_schedule,
        )
        .lower_is_better(),
        // Working capital
        formula(
            "cash_conversion_cycle",
            "Cash Conversion Cycle (CCC)",
            WorkingCapitalAnalysis,
            CASH_CYCLE,
            values(&[45.0, 30.0, 35.0]),
            "CCC = DIO + DRO - DPO",
            "Time to convert investments in inventory and receivables into cash",
            eval_cash_cycle,
        )
        .lower_is_better(),
    ]
}

#[cfg(test)]
mod tests {
    use super::super::FormulaCatalog;
    use super::*;
    use approx::assert_relative_eq;

    fn defaults(id: &str) -> FormulaResult {
        let descriptor = FormulaCatalog::global().lookup(id).unwrap();
        descriptor.calculate(&descriptor.default_params).unwrap()
    }

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<_> = all().iter().map(|d| d.id).collect();
        let before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn test_npv_default_accepts() {
        let npv = defaults("net_present_value").primary_value().unwrap();
        assert!(npv > 0.0);
    }

    #[test]
    fn test_irr_default_converges() {
        let FormulaResult::Irr(solution) = defaults("internal_rate_of_return") else {
            panic!("expected IRR solution");
        };
        assert!(solution.converged);
        assert_eq!(solution.trace.len() as u32, solution.iterations);
    }

    #[test]
    fn test_irr_iteration_cap_reported() {
        let irr = FormulaCatalog::global()
            .lookup("internal_rate_of_return")
            .unwrap();
        let mut params = irr.default_params.clone();
        params[2] = ParamValue::from(1.0);
        let FormulaResult::Irr(solution) = irr.calculate(&params).unwrap() else {
            panic!("expected IRR solution");
        };
        assert!(!solution.converged);
        assert_eq!(solution.iterations, 1);
        assert!(FormulaResult::Irr(solution).primary_value().is_none());
    }

    #[test]
    fn test_irr_rejects_fractional_iterations() {
        let irr = FormulaCatalog::global()
            .lookup("internal_rate_of_return")
            .unwrap();
        let mut params = irr.default_params.clone();
        params[2] = ParamValue::from(10.5);
        assert!(irr.calculate(&params).is_err());
    }

    #[test]
    fn test_payback_defaults() {
        assert_eq!(defaults("payback_period").primary_value(), Some(3.25));
        assert!(defaults("discounted_payback_period").primary_value().is_some());
    }

    #[test]
    fn test_current_ratio_tier() {
        assert_eq!(defaults("current_ratio").tier().unwrap().level, "Good");
    }

    #[test]
    fn test_break_even_units_default() {
        assert_relative_eq!(defaults("break_even_units").primary_value().unwrap(), 4_000.0);
    }

    #[test]
    fn test_dupont_entry_carries_detail() {
        let FormulaResult::Ratio(result) = defaults("dupont_return_on_equity") else {
            panic!("expected ratio");
        };
        assert!(matches!(result.detail, Some(RatioDetail::DuPont(_))));
    }

    #[test]
    fn test_schedule_entry() {
        let FormulaResult::Schedule(schedule) = defaults("amortization_schedule") else {
            panic!("expected schedule");
        };
        assert_eq!(schedule.rows.len(), 360);
        assert_relative_eq!(schedule.rows[0].payment, 1199.10, epsilon = 0.01);
    }

    #[test]
    fn test_schedule_rejects_fractional_periods() {
        let schedule = FormulaCatalog::global()
            .lookup("amortization_schedule")
            .unwrap();
        let params = values(&[1_000.0, 0.01, 12.5]);
        assert!(schedule.calculate(&params).is_err());
    }

    #[test]
    fn test_schedule_rejects_huge_period_count() {
        let schedule = FormulaCatalog::global()
            .lookup("amortization_schedule")
            .unwrap();
        let params = values(&[1_000.0, 0.01, 4e9]);
        assert!(matches!(
            schedule.calculate(&params),
            Err(FinError::Validation { .. })
        ));
    }

    #[test]
    fn test_timing_flag_validated() {
        let pv = FormulaCatalog::global().lookup("present_value").unwrap();
        let params = values(&[10_000.0, 0.08, 5.0, 100.0, 2.0]);
        assert!(matches!(
            pv.calculate(&params),
            Err(FinError::Validation { .. })
        ));
    }

    #[test]
    fn test_direction_metadata() {
        let catalog = FormulaCatalog::global();
        let preference = |id: &str| catalog.lookup(id).unwrap().preference;
        assert_eq!(preference("return_on_equity"), Preference::HigherIsBetter);
        assert_eq!(preference("debt_to_equity_ratio"), Preference::LowerIsBetter);
        assert_eq!(preference("cash_conversion_cycle"), Preference::LowerIsBetter);

        let npv = catalog.lookup("net_present_value").unwrap();
        assert!(npv.signed_outcome);
        assert_eq!(npv.critical_level, Some(0.0));
        assert_eq!(catalog.lookup("current_ratio").unwrap().critical_level, Some(1.0));
    }
}
