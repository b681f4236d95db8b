//! Input checks that report every problem instead of stopping at the first.

use serde::Serialize;

use fincalc_core::prelude::*;

use super::FormulaDescriptor;

/// Outcome of [`validate_inputs`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Problems that would make the calculation fail.
    pub errors: Vec<String>,
    /// Suspicious but accepted values.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Returns true when there are no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks `params` against the descriptor without calculating.
///
/// Count, shape and role violations are errors. A rate outside `[0, 1]` is
/// accepted with a warning, since it usually means a percentage was entered
/// as a whole number.
#[must_use]
pub fn validate_inputs(descriptor: &FormulaDescriptor, params: &[ParamValue]) -> ValidationReport {
    let mut report = ValidationReport::default();

    if params.len() != descriptor.params.len() {
        report.errors.push(format!(
            "Expected {} parameters, got {}",
            descriptor.params.len(),
            params.len()
        ));
    }

    for (spec, value) in descriptor.params.iter().zip(params) {
        if let Err(err) = spec.check(value) {
            report.errors.push(format!("{}: {err}", spec.label));
            continue;
        }
        if spec.role.is_rate() {
            if let Some(rate) = value.as_scalar().filter(|r| !(0.0..=1.0).contains(r)) {
                report.warnings.push(format!(
                    "{}: rate {rate} seems unusual (expected between 0 and 1)",
                    spec.label
                ));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FormulaCatalog;

    #[test]
    fn test_defaults_are_clean() {
        for descriptor in FormulaCatalog::global().iter() {
            let report = validate_inputs(descriptor, &descriptor.default_params);
            assert!(report.is_valid(), "{}: {:?}", descriptor.id, report.errors);
            assert!(report.warnings.is_empty(), "{}", descriptor.id);
        }
    }

    #[test]
    fn test_collects_every_error() {
        let pv = FormulaCatalog::global().lookup("present_value").unwrap();
        let params = vec![
            ParamValue::from(10_000.0),
            ParamValue::from(-2.0),
            ParamValue::from(-5.0),
            ParamValue::from(0.0),
            ParamValue::from(0.0),
        ];
        let report = validate_inputs(pv, &params);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("Interest Rate (%)"));
    }

    #[test]
    fn test_unusual_rate_warns() {
        let npv = FormulaCatalog::global().lookup("net_present_value").unwrap();
        let params = vec![ParamValue::from(12.0), ParamValue::from(vec![-100.0, 60.0])];
        let report = validate_inputs(npv, &params);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("seems unusual"));
    }

    #[test]
    fn test_count_mismatch() {
        let npv = FormulaCatalog::global().lookup("net_present_value").unwrap();
        let report = validate_inputs(npv, &[ParamValue::from(0.1)]);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0], "Expected 2 parameters, got 1");
    }
}
