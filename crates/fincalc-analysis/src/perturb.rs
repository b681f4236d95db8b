//! Shared plumbing for re-running a formula under modified inputs.
//!
//! Every analysis copies the base parameters before changing them; the
//! caller's slice is never written to.

use fincalc_core::prelude::*;
use fincalc_formulas::catalog::FormulaDescriptor;

/// Calculates `params` and reduces the result to its headline number.
///
/// A non-converged IRR becomes [`FinError::NonConvergence`], a payback that
/// never recovers and a non-finite value become [`FinError::NoPrimaryValue`].
pub(crate) fn evaluate(descriptor: &FormulaDescriptor, params: &[ParamValue]) -> FinResult<f64> {
    let result = descriptor.calculate(params)?;
    let value = match (&result, result.primary_value()) {
        (_, Some(value)) => value,
        (FormulaResult::Irr(solution), None) => {
            return Err(FinError::NonConvergence {
                iterations: solution.iterations,
                last_estimate: solution.rate,
            })
        }
        (_, None) => return Err(FinError::no_primary_value("investment never recovers")),
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FinError::no_primary_value(format!("result {value} is not finite")))
    }
}

/// Returns a copy of `base` with the parameter at `index` replaced.
pub(crate) fn with_param(base: &[ParamValue], index: usize, value: ParamValue) -> Vec<ParamValue> {
    let mut params = base.to_vec();
    params[index] = value;
    params
}

/// Checks that `index` addresses a parameter of `descriptor`.
pub(crate) fn check_index(descriptor: &FormulaDescriptor, index: usize) -> FinResult<()> {
    if index < descriptor.params.len() {
        Ok(())
    } else {
        Err(FinError::validation(
            "param_index",
            format!(
                "{} has {} parameters, index {index} is out of range",
                descriptor.id,
                descriptor.params.len()
            ),
        ))
    }
}

/// Percentage change from `base` to `new`.
///
/// `None` when the base is zero and the new value is not, since the change is
/// then unbounded.
pub(crate) fn percent_change(base: f64, new: f64) -> Option<f64> {
    if base == 0.0 {
        (new == 0.0).then_some(0.0)
    } else {
        Some((new - base) / base * 100.0)
    }
}
