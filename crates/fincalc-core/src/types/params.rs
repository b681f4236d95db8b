//! Formula parameters and their validation constraints.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FinError, FinResult};

/// A positional formula parameter.
///
/// Most parameters are plain numbers; investment formulas also take a cash
/// flow series. Deserializes from either a JSON number or a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A single number.
    Scalar(f64),
    /// An ordered series, indexed by period.
    Series(Vec<f64>),
}

impl ParamValue {
    /// Returns the number if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Series(_) => None,
        }
    }

    /// Returns the series if this is a series.
    #[must_use]
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Self::Scalar(_) => None,
            Self::Series(values) => Some(values),
        }
    }

    /// Returns the shape of the value.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Scalar(_) => ParamKind::Scalar,
            Self::Series(_) => ParamKind::Series,
        }
    }

    /// Returns the scalar or a validation error naming `field`.
    pub fn require_scalar(&self, field: &str) -> FinResult<f64> {
        self.as_scalar()
            .ok_or_else(|| FinError::validation(field, "expected a number, got a series"))
    }

    /// Returns the series or a validation error naming `field`.
    pub fn require_series(&self, field: &str) -> FinResult<&[f64]> {
        self.as_series()
            .ok_or_else(|| FinError::validation(field, "expected a series, got a number"))
    }

    /// Multiplies the value by `factor`; series are scaled element-wise.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        match self {
            Self::Scalar(v) => Self::Scalar(v * factor),
            Self::Series(values) => Self::Series(values.iter().map(|v| v * factor).collect()),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(values: Vec<f64>) -> Self {
        Self::Series(values)
    }
}

impl From<&[f64]> for ParamValue {
    fn from(values: &[f64]) -> Self {
        Self::Series(values.to_vec())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Series(values) => {
                f.write_str("[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Shape of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// A single number.
    Scalar,
    /// A series of numbers.
    Series,
}

/// Semantic role of a parameter.
///
/// The role determines the validation constraint applied before calculation
/// and the default variation grid used by sensitivity analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRole {
    /// Monetary amount of either sign.
    Amount,
    /// Interest, discount or growth rate. Must be greater than -1.
    Rate,
    /// Number of periods. Must be non-negative.
    Periods,
    /// Compounding frequency per year. Must be positive.
    Frequency,
    /// Annuity timing flag: 0 for end of period, 1 for beginning.
    Timing,
    /// Cost amount. Must be non-negative.
    Cost,
    /// Unit or share price.
    Price,
    /// Share count.
    Count,
    /// Day count for working capital cycles.
    Days,
    /// Dimensionless ratio.
    Ratio,
    /// Cash flow series. Must be non-empty.
    CashFlows,
    /// Solver iteration cap. Must be a positive whole number.
    Iterations,
    /// Solver tolerance. Must be positive.
    Tolerance,
}

impl ParamRole {
    /// Returns true for interest, discount and growth rates.
    #[must_use]
    pub const fn is_rate(self) -> bool {
        matches!(self, Self::Rate)
    }

    /// Returns true for costs and prices.
    #[must_use]
    pub const fn is_cost_or_price(self) -> bool {
        matches!(self, Self::Cost | Self::Price)
    }

    fn check_scalar(self, field: &str, value: f64) -> FinResult<()> {
        if !value.is_finite() {
            return Err(FinError::validation(field, format!("{value} is not a finite number")));
        }
        match self {
            Self::Rate => FinError::check_rate(field, value),
            Self::Periods if value < 0.0 => {
                Err(FinError::validation(field, "number of periods cannot be negative"))
            }
            Self::Frequency if value <= 0.0 => {
                Err(FinError::validation(field, "compounding frequency must be positive"))
            }
            Self::Timing if value != 0.0 && value != 1.0 => Err(FinError::validation(
                field,
                "annuity timing must be 0 (end) or 1 (beginning)",
            )),
            Self::Cost if value < 0.0 => Err(FinError::validation(field, "cost cannot be negative")),
            Self::Iterations if value < 1.0 || value.fract() != 0.0 => Err(
                FinError::validation(field, "iteration count must be a positive whole number"),
            ),
            Self::Tolerance if value <= 0.0 => {
                Err(FinError::validation(field, "tolerance must be positive"))
            }
            _ => Ok(()),
        }
    }
}

/// Specification of one positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    /// Machine name, e.g. `discount_rate`.
    pub name: &'static str,
    /// Display label, e.g. `Discount Rate (%)`.
    pub label: &'static str,
    /// Expected shape.
    pub kind: ParamKind,
    /// Semantic role.
    pub role: ParamRole,
}

impl ParamSpec {
    /// Creates a scalar parameter spec.
    #[must_use]
    pub const fn scalar(name: &'static str, label: &'static str, role: ParamRole) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Scalar,
            role,
        }
    }

    /// Creates a series parameter spec.
    #[must_use]
    pub const fn series(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Series,
            role: ParamRole::CashFlows,
        }
    }

    /// Validates a value against this spec's shape and role.
    pub fn check(&self, value: &ParamValue) -> FinResult<()> {
        match (self.kind, value) {
            (ParamKind::Scalar, ParamValue::Scalar(v)) => self.role.check_scalar(self.name, *v),
            (ParamKind::Series, ParamValue::Series(values)) => {
                if values.is_empty() {
                    return Err(FinError::validation(self.name, "series cannot be empty"));
                }
                if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                    return Err(FinError::validation(
                        self.name,
                        format!("{bad} is not a finite number"),
                    ));
                }
                Ok(())
            }
            (ParamKind::Scalar, ParamValue::Series(_)) => Err(FinError::validation(
                self.name,
                "expected a number, got a series",
            )),
            (ParamKind::Series, ParamValue::Scalar(_)) => Err(FinError::validation(
                self.name,
                "expected a series, got a number",
            )),
        }
    }
}
