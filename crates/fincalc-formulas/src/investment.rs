//! Investment appraisal: NPV, IRR and payback.
//!
//! Cash flow series are indexed by period with `cash_flows[0]` undiscounted.
//! Period 0 is conventionally the initial outlay but nothing here relies on
//! its sign.

use serde::Serialize;

use fincalc_core::prelude::*;
use fincalc_math::solvers::{newton_raphson_traced, SolverConfig};
use fincalc_math::MathError;

/// Default initial guess for the IRR solver.
pub const DEFAULT_IRR_GUESS: f64 = 0.1;

/// Net present value `Σ cf[t] / (1 + rate)^t`.
///
/// # Errors
///
/// Returns [`FinError::InvalidRate`] when `rate <= -1`.
///
/// # Example
///
/// ```rust
/// use fincalc_formulas::investment::net_present_value;
///
/// let flows = [-100_000.0, 25_000.0, 35_000.0, 40_000.0, 45_000.0, 50_000.0];
/// let npv = net_present_value(0.12, &flows).unwrap();
/// assert!(npv > 0.0);
/// ```
pub fn net_present_value(rate: f64, cash_flows: &[f64]) -> FinResult<f64> {
    FinError::check_rate("discount_rate", rate)?;
    Ok(npv_at(rate, cash_flows))
}

fn npv_at(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// `dNPV/dr = Σ_{t≥1} -t·cf[t] / (1 + r)^(t+1)`.
fn npv_derivative_at(rate: f64, cash_flows: &[f64]) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(t, cf)| -(t as f64) * cf / (1.0 + rate).powi(t as i32 + 1))
        .sum()
}

/// Discounting detail for one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscountedFlow {
    /// Period index.
    pub period: usize,
    /// Undiscounted cash flow.
    pub cash_flow: f64,
    /// `1 / (1 + rate)^period`.
    pub discount_factor: f64,
    /// `cash_flow * discount_factor`.
    pub present_value: f64,
}

/// NPV with its per-period breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NpvBreakdown {
    /// Sum of present values.
    pub npv: f64,
    /// One entry per period.
    pub flows: Vec<DiscountedFlow>,
}

/// Net present value with the discount factor and present value of every period.
///
/// # Errors
///
/// Returns [`FinError::InvalidRate`] when `rate <= -1`.
pub fn npv_breakdown(rate: f64, cash_flows: &[f64]) -> FinResult<NpvBreakdown> {
    FinError::check_rate("discount_rate", rate)?;
    let flows: Vec<DiscountedFlow> = cash_flows
        .iter()
        .enumerate()
        .map(|(period, &cash_flow)| {
            let discount_factor = 1.0 / (1.0 + rate).powi(period as i32);
            DiscountedFlow {
                period,
                cash_flow,
                discount_factor,
                present_value: cash_flow / (1.0 + rate).powi(period as i32),
            }
        })
        .collect();
    let npv = flows.iter().map(|f| f.present_value).sum();
    Ok(NpvBreakdown { npv, flows })
}

/// Internal rate of return by Newton-Raphson on `NPV(r)`.
///
/// Converges when `|NPV(r)| < tolerance` or the Newton step is smaller than
/// `tolerance`. Exhausting `max_iterations` yields `converged == false`
/// with `iterations == max_iterations`; the caller decides whether to retry
/// from another guess.
///
/// # Errors
///
/// Returns [`FinError::DivergentDerivative`] when `|dNPV/dr| < tolerance`
/// before convergence, and [`FinError::InvalidRate`] for a guess at or
/// below -1.
///
/// # Example
///
/// ```rust
/// use fincalc_formulas::investment::{internal_rate_of_return, net_present_value};
/// use fincalc_math::solvers::SolverConfig;
///
/// let flows = [-100_000.0, 25_000.0, 35_000.0, 40_000.0, 45_000.0];
/// let irr = internal_rate_of_return(&flows, 0.1, &SolverConfig::default()).unwrap();
/// assert!(irr.converged);
/// assert!(net_present_value(irr.rate, &flows).unwrap().abs() < 1e-6);
/// ```
pub fn internal_rate_of_return(
    cash_flows: &[f64],
    guess: f64,
    config: &SolverConfig,
) -> FinResult<IrrSolution> {
    FinError::check_rate("guess", guess)?;

    let outcome = newton_raphson_traced(
        |r| npv_at(r, cash_flows),
        |r| npv_derivative_at(r, cash_flows),
        guess,
        config,
    )
    .map_err(|err| match err {
        MathError::FlatDerivative {
            iteration,
            x,
            derivative,
        } => FinError::DivergentDerivative {
            iteration,
            rate: x,
            derivative,
        },
        other => FinError::validation("cash_flows", other.to_string()),
    })?;

    if outcome.converged {
        log::debug!(
            "IRR converged to {:.6} in {} iterations",
            outcome.root,
            outcome.iterations
        );
    } else {
        log::warn!(
            "IRR did not converge after {} iterations (last estimate {:.6})",
            outcome.iterations,
            outcome.root
        );
    }

    Ok(IrrSolution {
        rate: outcome.root,
        converged: outcome.converged,
        iterations: outcome.iterations,
        final_npv: outcome.residual,
        trace: outcome
            .trace
            .iter()
            .map(|step| IrrIteration {
                iteration: step.iteration,
                rate: step.x,
                npv: step.fx,
                derivative: step.dfx,
            })
            .collect(),
    })
}

/// Years until cumulative cash flows recover `|initial_investment|`.
///
/// `cash_flows[0]` is the first year's inflow. At the first period `p` where
/// the cumulative sum reaches zero, returns `p + |previous cumulative| / cf[p]`.
/// Returns `None` when the investment never pays back.
///
/// # Example
///
/// ```rust
/// use fincalc_formulas::investment::payback_period;
///
/// let years = payback_period(100_000.0, &[25_000.0, 30_000.0, 35_000.0, 40_000.0]);
/// assert_eq!(years, Some(3.25));
/// assert_eq!(payback_period(100_000.0, &[10_000.0]), None);
/// ```
pub fn payback_period(initial_investment: f64, cash_flows: &[f64]) -> Option<f64> {
    recovery_point(initial_investment, cash_flows.iter().copied())
}

/// Payback on flows discounted as `cf[t] / (1 + rate)^(t + 1)`.
///
/// `cash_flows[0]` is the first year's inflow, so it is discounted one full
/// period. Returns `Ok(None)` when the investment never pays back.
///
/// The result is counted the same way as [`payback_period`]: recovery within
/// the first inflow gives a value below 1. Spreadsheets that add one to the
/// recovery period index report a value exactly one year higher.
///
/// # Errors
///
/// Returns [`FinError::InvalidRate`] when `discount_rate <= -1`.
pub fn discounted_payback_period(
    initial_investment: f64,
    cash_flows: &[f64],
    discount_rate: f64,
) -> FinResult<Option<f64>> {
    FinError::check_rate("discount_rate", discount_rate)?;
    let discounted = cash_flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + discount_rate).powi(t as i32 + 1));
    Ok(recovery_point(initial_investment, discounted))
}

fn recovery_point(initial_investment: f64, flows: impl Iterator<Item = f64>) -> Option<f64> {
    let mut cumulative = -initial_investment.abs();
    for (period, cf) in flows.enumerate() {
        let previous = cumulative;
        cumulative += cf;
        if cumulative >= 0.0 {
            let fraction = if cf == 0.0 { 0.0 } else { previous.abs() / cf };
            return Some(period as f64 + fraction);
        }
    }
    None
}

/// Investment appraisal bundle for a single cash flow series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowAnalysis {
    /// NPV at the discount rate.
    pub npv: f64,
    /// IRR solve, or `None` when the solver aborted on a flat derivative.
    pub irr: Option<IrrSolution>,
    /// Payback of `cash_flows[1..]` against `|cash_flows[0]|`.
    pub payback_period: Option<f64>,
    /// Discounted payback of the same series.
    pub discounted_payback_period: Option<f64>,
    /// Sum of positive cash flows.
    pub total_inflows: f64,
    /// `NPV / |cash_flows[0]| + 1`; `None` when the initial flow is zero.
    pub profitability_index: Option<f64>,
}

/// Runs NPV, IRR, payback and profitability index over one series.
///
/// `cash_flows[0]` is treated as the initial investment for payback and the
/// profitability index.
///
/// # Errors
///
/// Returns [`FinError::Validation`] for an empty series and
/// [`FinError::InvalidRate`] for `discount_rate <= -1`.
pub fn cash_flow_analysis(
    cash_flows: &[f64],
    discount_rate: f64,
    guess: f64,
    solver: &SolverConfig,
) -> FinResult<CashFlowAnalysis> {
    let Some((&initial, rest)) = cash_flows.split_first() else {
        return Err(FinError::validation("cash_flows", "series cannot be empty"));
    };

    let npv = net_present_value(discount_rate, cash_flows)?;
    let irr = match internal_rate_of_return(cash_flows, guess, solver) {
        Ok(solution) => Some(solution),
        Err(err) => {
            log::debug!("IRR unavailable for cash flow analysis: {err}");
            None
        }
    };

    Ok(CashFlowAnalysis {
        npv,
        irr,
        payback_period: payback_period(initial, rest),
        discounted_payback_period: discounted_payback_period(initial, rest, discount_rate)?,
        total_inflows: cash_flows.iter().filter(|cf| **cf > 0.0).sum(),
        profitability_index: (initial != 0.0).then(|| npv / initial.abs() + 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const PROJECT: [f64; 6] = [-100_000.0, 25_000.0, 35_000.0, 40_000.0, 45_000.0, 50_000.0];

    #[test]
    fn test_npv_positive_project() {
        let npv = net_present_value(0.12, &PROJECT).unwrap();
        assert_relative_eq!(npv, 35_664.08, epsilon = 0.01);
    }

    #[test]
    fn test_npv_zero_rate_is_sum() {
        let npv = net_present_value(0.0, &PROJECT).unwrap();
        assert_eq!(npv, PROJECT.iter().sum::<f64>());
    }

    #[test]
    fn test_npv_breakdown_matches_total() {
        let breakdown = npv_breakdown(0.12, &PROJECT).unwrap();
        assert_eq!(breakdown.flows.len(), PROJECT.len());
        assert_eq!(breakdown.flows[0].discount_factor, 1.0);
        assert_relative_eq!(
            breakdown.npv,
            net_present_value(0.12, &PROJECT).unwrap(),
            epsilon = 1e-9
        );
        assert_relative_eq!(breakdown.flows[1].present_value, 25_000.0 / 1.12, epsilon = 1e-9);
    }

    #[test]
    fn test_irr_converges_to_root() {
        let irr = internal_rate_of_return(&PROJECT, 0.1, &SolverConfig::default()).unwrap();
        assert!(irr.converged);
        assert!(irr.rate > 0.12);
        assert!(net_present_value(irr.rate, &PROJECT).unwrap().abs() < 1e-6);
        assert_eq!(irr.trace.len(), irr.iterations as usize);
        assert_eq!(irr.trace[0].rate, 0.1);
    }

    #[test]
    fn test_irr_non_convergence_is_data() {
        let config = SolverConfig::new(1e-10, 2);
        let irr = internal_rate_of_return(&PROJECT, 0.9, &config).unwrap();
        assert!(!irr.converged);
        assert_eq!(irr.iterations, 2);
    }

    #[test]
    fn test_irr_flat_derivative_fails() {
        // Only a period-0 flow: derivative is identically zero
        let result = internal_rate_of_return(&[-100.0], 0.1, &SolverConfig::default());
        assert!(matches!(
            result,
            Err(FinError::DivergentDerivative { iteration: 1, .. })
        ));
    }

    #[test]
    fn test_payback_fractional_year() {
        let years = payback_period(100_000.0, &[25_000.0, 30_000.0, 35_000.0, 40_000.0]);
        assert_eq!(years, Some(3.25));
    }

    #[test]
    fn test_payback_sign_of_initial_is_ignored() {
        let flows = [50_000.0, 50_000.0];
        assert_eq!(payback_period(-100_000.0, &flows), payback_period(100_000.0, &flows));
        assert_eq!(payback_period(100_000.0, &flows), Some(2.0));
        assert_eq!(payback_period(-75_000.0, &flows), Some(1.5));
    }

    #[test]
    fn test_payback_never_recovers() {
        assert_eq!(payback_period(100_000.0, &[20_000.0, 20_000.0]), None);
    }

    #[test]
    fn test_discounted_payback() {
        let flows = [25_000.0, 30_000.0, 35_000.0, 40_000.0];
        let years = discounted_payback_period(100_000.0, &flows, 0.1)
            .unwrap()
            .unwrap();
        // Cumulative discounted flow turns positive in period 3
        assert_relative_eq!(years, 3.958375, epsilon = 1e-6);
        assert_eq!(discounted_payback_period(100_000.0, &flows[..3], 0.1).unwrap(), None);

        let years = discounted_payback_period(100_000.0, &[60_000.0, 60_000.0], 0.1)
            .unwrap()
            .unwrap();
        // 54,545.45 then 49,586.78: recovers in period 1
        let expected = 1.0 + (100_000.0 - 60_000.0 / 1.1) / (60_000.0 / 1.21);
        assert_relative_eq!(years, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_discounted_payback_counts_like_plain() {
        let flows = [50_000.0, 50_000.0, 50_000.0];
        let discounted = discounted_payback_period(75_000.0, &flows, 0.0).unwrap();
        assert_eq!(discounted, payback_period(75_000.0, &flows));
        assert_eq!(discounted, Some(1.5));
    }

    #[test]
    fn test_discounted_payback_exceeds_plain() {
        let flows = [40_000.0, 40_000.0, 40_000.0, 40_000.0];
        let plain = payback_period(100_000.0, &flows).unwrap();
        let discounted = discounted_payback_period(100_000.0, &flows, 0.08)
            .unwrap()
            .unwrap();
        assert!(discounted > plain);
    }

    #[test]
    fn test_cash_flow_analysis() {
        let analysis =
            cash_flow_analysis(&PROJECT, 0.12, DEFAULT_IRR_GUESS, &SolverConfig::default()).unwrap();
        assert_relative_eq!(analysis.npv, 35_664.08, epsilon = 0.01);
        assert!(analysis.irr.as_ref().is_some_and(|irr| irr.converged));
        assert_eq!(analysis.total_inflows, 195_000.0);
        assert_relative_eq!(
            analysis.profitability_index.unwrap(),
            analysis.npv / 100_000.0 + 1.0
        );
        assert_eq!(analysis.payback_period, Some(3.0));
    }

    #[test]
    fn test_cash_flow_analysis_empty() {
        assert!(cash_flow_analysis(&[], 0.1, 0.1, &SolverConfig::default()).is_err());
    }
}
