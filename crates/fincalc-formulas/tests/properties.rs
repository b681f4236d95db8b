//! Property tests and reference scenarios for the formula library.

use approx::assert_relative_eq;
use proptest::prelude::*;

use fincalc_formulas::prelude::*;
use fincalc_math::solvers::SolverConfig;

// =============================================================================
// REFERENCE SCENARIOS
// =============================================================================

#[test]
fn present_value_of_lump_sum() {
    let pv = present_value(10_000.0, 0.08, 5.0, 0.0, AnnuityTiming::End).unwrap();
    assert_relative_eq!(pv, 6805.83, epsilon = 0.01);
}

#[test]
fn npv_accepts_profitable_project() {
    let flows = [-100_000.0, 25_000.0, 35_000.0, 40_000.0, 45_000.0, 50_000.0];
    assert!(net_present_value(0.12, &flows).unwrap() > 0.0);
}

#[test]
fn irr_of_profitable_project_is_a_root() {
    let flows = [-100_000.0, 25_000.0, 35_000.0, 40_000.0, 45_000.0, 50_000.0];
    let irr = internal_rate_of_return(&flows, DEFAULT_IRR_GUESS, &SolverConfig::default()).unwrap();
    assert!(irr.converged);
    assert!(irr.rate > 0.12);
    assert!(net_present_value(irr.rate, &flows).unwrap().abs() < 1e-6);
}

#[test]
fn current_ratio_lands_in_good_tier() {
    let catalog = FormulaCatalog::global();
    let result = catalog
        .lookup("current_ratio")
        .unwrap()
        .calculate(&[ParamValue::from(250_000.0), ParamValue::from(150_000.0)])
        .unwrap();
    assert_relative_eq!(result.primary_value().unwrap(), 1.667, epsilon = 1e-3);
    assert_eq!(result.tier().unwrap().level, "Good");
}

#[test]
fn break_even_volume() {
    let result = fincalc_formulas::ratios::break_even_units(120_000.0, 75.0, 45.0).unwrap();
    assert_relative_eq!(result.value, 4_000.0);
}

#[test]
fn mortgage_schedule_first_payment() {
    let schedule = amortization_schedule(200_000.0, 0.005, 360).unwrap();
    assert_relative_eq!(schedule.rows[0].payment, 1199.10, epsilon = 0.01);
}

#[test]
fn single_cash_flow_aborts_irr() {
    let err = internal_rate_of_return(&[-100.0], 0.1, &SolverConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        FinError::DivergentDerivative { iteration: 1, .. }
    ));
}

// =============================================================================
// PROPERTIES
// =============================================================================

fn rate_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![-0.5..-0.001f64, 0.001..0.5f64]
}

proptest! {
    #[test]
    fn pv_fv_round_trip(pv in 1.0..1_000_000.0f64, rate in rate_strategy(), periods in 0.0..40.0f64) {
        let fv = future_value(pv, rate, periods, 0.0, AnnuityTiming::End).unwrap();
        let back = present_value(fv, rate, periods, 0.0, AnnuityTiming::End).unwrap();
        prop_assert!((back - pv).abs() <= 1e-9 * pv.abs().max(1.0));
    }

    #[test]
    fn npv_at_zero_rate_is_the_sum(flows in prop::collection::vec(-1e6..1e6f64, 1..20)) {
        let npv = net_present_value(0.0, &flows).unwrap();
        let sum: f64 = flows.iter().sum();
        prop_assert!((npv - sum).abs() <= 1e-9 * sum.abs().max(1.0));
    }

    #[test]
    fn converged_irr_zeroes_npv(
        initial in 1_000.0..100_000.0f64,
        shares in prop::collection::vec(0.1..1.0f64, 2..8),
    ) {
        let mut flows = vec![-initial];
        flows.extend(shares.iter().map(|s| s * initial));
        let irr = internal_rate_of_return(&flows, DEFAULT_IRR_GUESS, &SolverConfig::default()).unwrap();
        if irr.converged {
            prop_assert!(net_present_value(irr.rate, &flows).unwrap().abs() < 1e-6);
        }
    }

    #[test]
    fn payback_never_recovers_when_flows_fall_short(
        flows in prop::collection::vec(0.0..1_000.0f64, 0..12),
        shortfall in 1.0..1_000.0f64,
    ) {
        let initial = flows.iter().sum::<f64>() + shortfall;
        prop_assert_eq!(payback_period(initial, &flows), None);
    }

    #[test]
    fn amortization_retires_principal(
        principal in 1_000.0..1_000_000.0f64,
        rate in 0.0..0.02f64,
        periods in 1u32..480,
    ) {
        let schedule = amortization_schedule(principal, rate, periods).unwrap();
        let repaid: f64 = schedule.rows.iter().map(|r| r.principal_payment).sum();
        prop_assert!((repaid - principal).abs() <= 1e-6 * principal);
        prop_assert_eq!(schedule.rows.last().map(|r| r.remaining_balance), Some(0.0));
        prop_assert_eq!(schedule.rows.len(), periods as usize);
    }
}
