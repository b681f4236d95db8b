//! Time value of money.
//!
//! Closed-form present and future value with optional level payments,
//! periodic compounding and effective annual rates. All rates are decimal
//! per-period rates (`0.08` for 8%).

use serde::{Deserialize, Serialize};

use fincalc_core::{FinError, FinResult};

/// When annuity payments fall within each period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnuityTiming {
    /// Ordinary annuity: payments at the end of each period.
    #[default]
    End,
    /// Annuity-due: payments at the beginning of each period.
    Beginning,
}

impl AnnuityTiming {
    /// Maps the conventional `type` flag (0 = end, 1 = beginning).
    pub fn from_flag(flag: f64) -> FinResult<Self> {
        if flag == 0.0 {
            Ok(Self::End)
        } else if flag == 1.0 {
            Ok(Self::Beginning)
        } else {
            Err(FinError::validation(
                "type",
                format!("annuity timing flag must be 0 or 1, got {flag}"),
            ))
        }
    }

    fn factor(self, rate: f64) -> f64 {
        match self {
            Self::End => 1.0,
            Self::Beginning => 1.0 + rate,
        }
    }
}

/// Present value of a future sum plus an optional level payment stream.
///
/// With `rate == 0` the linear case `fv + pmt * periods` is returned and
/// `timing` has no effect.
///
/// # Errors
///
/// Returns [`FinError::InvalidRate`] when `rate <= -1`.
///
/// # Example
///
/// ```rust
/// use fincalc_formulas::time_value::{present_value, AnnuityTiming};
///
/// let pv = present_value(10_000.0, 0.08, 5.0, 0.0, AnnuityTiming::End).unwrap();
/// assert!((pv - 6805.83).abs() < 0.01);
/// ```
pub fn present_value(
    future_value: f64,
    rate: f64,
    periods: f64,
    payment: f64,
    timing: AnnuityTiming,
) -> FinResult<f64> {
    FinError::check_rate("interest_rate", rate)?;
    if rate == 0.0 {
        return Ok(future_value + payment * periods);
    }

    let growth = (1.0 + rate).powf(periods);
    let mut pv = future_value / growth;
    if payment != 0.0 {
        let annuity = payment * ((1.0 - (1.0 + rate).powf(-periods)) / rate);
        pv += annuity * timing.factor(rate);
    }
    Ok(pv)
}

/// Future value of a present sum plus an optional level payment stream.
///
/// The dual of [`present_value`].
///
/// # Errors
///
/// Returns [`FinError::InvalidRate`] when `rate <= -1`.
pub fn future_value(
    present_value: f64,
    rate: f64,
    periods: f64,
    payment: f64,
    timing: AnnuityTiming,
) -> FinResult<f64> {
    FinError::check_rate("interest_rate", rate)?;
    if rate == 0.0 {
        return Ok(present_value + payment * periods);
    }

    let growth = (1.0 + rate).powf(periods);
    let mut fv = present_value * growth;
    if payment != 0.0 {
        let annuity = payment * ((growth - 1.0) / rate);
        fv += annuity * timing.factor(rate);
    }
    Ok(fv)
}

/// Compound amount `P * (1 + r/m)^(n*m)`.
///
/// # Errors
///
/// Returns [`FinError::Validation`] for a non-positive frequency and
/// [`FinError::InvalidRate`] when the per-period rate `r/m` is at or below -1.
pub fn compound_interest(principal: f64, rate: f64, years: f64, frequency: f64) -> FinResult<f64> {
    let periodic = periodic_rate(rate, frequency)?;
    Ok(principal * (1.0 + periodic).powf(years * frequency))
}

/// Effective annual rate `(1 + r/m)^m - 1`.
///
/// # Errors
///
/// Same conditions as [`compound_interest`].
pub fn effective_interest_rate(nominal_rate: f64, frequency: f64) -> FinResult<f64> {
    let periodic = periodic_rate(nominal_rate, frequency)?;
    Ok((1.0 + periodic).powf(frequency) - 1.0)
}

fn periodic_rate(rate: f64, frequency: f64) -> FinResult<f64> {
    if frequency <= 0.0 || !frequency.is_finite() {
        return Err(FinError::validation(
            "compounding_frequency",
            "compounding frequency must be positive",
        ));
    }
    let periodic = rate / frequency;
    FinError::check_rate("rate", periodic)?;
    Ok(periodic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_present_value_lump_sum() {
        let pv = present_value(10_000.0, 0.08, 5.0, 0.0, AnnuityTiming::End).unwrap();
        assert_relative_eq!(pv, 6805.83, epsilon = 0.01);
    }

    #[test]
    fn test_present_value_zero_rate() {
        let pv = present_value(1_000.0, 0.0, 10.0, 50.0, AnnuityTiming::Beginning).unwrap();
        assert_eq!(pv, 1_500.0);
    }

    #[test]
    fn test_present_value_annuity() {
        // 5-year ordinary annuity of 1000 at 10%: 3790.79
        let pv = present_value(0.0, 0.10, 5.0, 1_000.0, AnnuityTiming::End).unwrap();
        assert_relative_eq!(pv, 3790.787, epsilon = 1e-3);

        let due = present_value(0.0, 0.10, 5.0, 1_000.0, AnnuityTiming::Beginning).unwrap();
        assert_relative_eq!(due, pv * 1.10, epsilon = 1e-9);
    }

    #[test]
    fn test_future_value() {
        let fv = future_value(5_000.0, 0.08, 5.0, 0.0, AnnuityTiming::End).unwrap();
        assert_relative_eq!(fv, 7346.64, epsilon = 0.01);

        // 5-year ordinary annuity of 1000 at 10%: 6105.10
        let fv = future_value(0.0, 0.10, 5.0, 1_000.0, AnnuityTiming::End).unwrap();
        assert_relative_eq!(fv, 6105.10, epsilon = 1e-2);
    }

    #[test]
    fn test_invalid_rate() {
        assert!(matches!(
            present_value(100.0, -1.0, 1.0, 0.0, AnnuityTiming::End),
            Err(FinError::InvalidRate { .. })
        ));
        assert!(future_value(100.0, -2.0, 1.0, 0.0, AnnuityTiming::End).is_err());
    }

    #[test]
    fn test_compound_interest() {
        let amount = compound_interest(10_000.0, 0.06, 10.0, 12.0).unwrap();
        assert_relative_eq!(amount, 18193.97, epsilon = 0.01);
        assert!(compound_interest(10_000.0, 0.06, 10.0, 0.0).is_err());
    }

    #[test]
    fn test_effective_interest_rate() {
        let ear = effective_interest_rate(0.06, 12.0).unwrap();
        assert_relative_eq!(ear, 0.0616778, epsilon = 1e-6);
        assert_relative_eq!(effective_interest_rate(0.06, 1.0).unwrap(), 0.06, epsilon = 1e-15);
    }

    #[test]
    fn test_timing_flag() {
        assert_eq!(AnnuityTiming::from_flag(0.0).unwrap(), AnnuityTiming::End);
        assert_eq!(AnnuityTiming::from_flag(1.0).unwrap(), AnnuityTiming::Beginning);
        assert!(AnnuityTiming::from_flag(2.0).is_err());
    }
}
