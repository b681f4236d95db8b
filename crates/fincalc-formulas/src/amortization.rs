//! Level-payment loan amortization.

use serde::Serialize;

use fincalc_core::prelude::*;

/// Level payment `P·r(1+r)^n / ((1+r)^n - 1)`, or `P/n` at a zero rate.
///
/// `rate` is the rate per payment period.
///
/// # Errors
///
/// Returns [`FinError::InvalidRate`] when `rate <= -1` and
/// [`FinError::Validation`] when `periods` is not positive.
///
/// # Example
///
/// ```rust
/// use fincalc_formulas::amortization::loan_payment;
///
/// let payment = loan_payment(200_000.0, 0.005, 360.0).unwrap();
/// assert!((payment - 1199.10).abs() < 0.01);
/// ```
pub fn loan_payment(principal: f64, rate: f64, periods: f64) -> FinResult<f64> {
    FinError::check_rate("rate", rate)?;
    if periods <= 0.0 || !periods.is_finite() {
        return Err(FinError::validation(
            "periods",
            "number of periods must be positive",
        ));
    }
    if rate == 0.0 {
        return Ok(principal / periods);
    }
    let growth = (1.0 + rate).powf(periods);
    Ok(principal * (rate * growth) / (growth - 1.0))
}

/// Longest schedule [`amortization_schedule`] will build.
pub const MAX_SCHEDULE_PERIODS: u32 = 20_000;

/// Builds the full amortization schedule.
///
/// Each row charges interest on the opening balance and applies the rest of
/// the level payment to principal. The final row retires whatever balance is
/// left, so the schedule always ends at exactly zero and the principal
/// portions sum to `principal`.
///
/// # Errors
///
/// Same conditions as [`loan_payment`], plus [`FinError::Validation`] when
/// `periods` exceeds [`MAX_SCHEDULE_PERIODS`].
pub fn amortization_schedule(principal: f64, rate: f64, periods: u32) -> FinResult<AmortizationSchedule> {
    if periods > MAX_SCHEDULE_PERIODS {
        return Err(FinError::validation(
            "periods",
            format!("schedule limited to {MAX_SCHEDULE_PERIODS} periods, got {periods}"),
        ));
    }
    let payment = loan_payment(principal, rate, f64::from(periods))?;

    let mut rows = Vec::with_capacity(periods as usize);
    let mut balance = principal;
    for period in 1..=periods {
        let interest_payment = balance * rate;
        let row = if period == periods {
            AmortizationRow {
                period,
                payment: interest_payment + balance,
                principal_payment: balance,
                interest_payment,
                remaining_balance: 0.0,
            }
        } else {
            let principal_payment = payment - interest_payment;
            balance -= principal_payment;
            AmortizationRow {
                period,
                payment,
                principal_payment,
                interest_payment,
                remaining_balance: balance.max(0.0),
            }
        };
        rows.push(row);
    }

    let total_interest = rows.iter().map(|r| r.interest_payment).sum();
    let total_paid = rows.iter().map(|r| r.payment).sum();
    Ok(AmortizationSchedule {
        payment,
        rows,
        total_interest,
        total_paid,
    })
}

/// Converts a whole-number period count carried as `f64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn whole_periods(field: &str, periods: f64) -> FinResult<u32> {
    if periods < 1.0 || periods.fract() != 0.0 || periods > f64::from(u32::MAX) {
        return Err(FinError::validation(
            field,
            format!("expected a positive whole number of periods, got {periods}"),
        ));
    }
    Ok(periods as u32)
}

/// Summary of a loan quoted with an annual rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanAmortization {
    /// Amount borrowed.
    pub principal: f64,
    /// Nominal annual rate.
    pub annual_rate: f64,
    /// `annual_rate / payments_per_year`.
    pub periodic_rate: f64,
    /// `years * payments_per_year`.
    pub total_payments: u32,
    /// Level payment per period.
    pub payment: f64,
    /// Sum of all payments.
    pub total_paid: f64,
    /// Sum of interest portions.
    pub total_interest: f64,
    /// Period-by-period schedule.
    pub schedule: AmortizationSchedule,
}

/// Amortizes a loan given an annual rate, a term in years and a payment
/// frequency.
///
/// # Errors
///
/// Returns [`FinError::Validation`] when `payments_per_year` is not positive
/// or `years * payments_per_year` is not a positive whole number, and
/// [`FinError::InvalidRate`] when the periodic rate is at or below -1.
pub fn loan_amortization(
    principal: f64,
    annual_rate: f64,
    years: f64,
    payments_per_year: f64,
) -> FinResult<LoanAmortization> {
    if payments_per_year <= 0.0 || !payments_per_year.is_finite() {
        return Err(FinError::validation(
            "payments_per_year",
            "payment frequency must be positive",
        ));
    }
    let periodic_rate = annual_rate / payments_per_year;
    let total_payments = whole_periods("years", years * payments_per_year)?;
    let schedule = amortization_schedule(principal, periodic_rate, total_payments)?;

    Ok(LoanAmortization {
        principal,
        annual_rate,
        periodic_rate,
        total_payments,
        payment: schedule.payment,
        total_paid: schedule.total_paid,
        total_interest: schedule.total_interest,
        schedule,
    })
}
