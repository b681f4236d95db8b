//! The formula catalog.
//!
//! Every formula is registered once as a [`FormulaDescriptor`]: metadata, the
//! positional [`ParamSpec`] list, default parameters and a calculation
//! function. The catalog is built on first access and never mutated, so it can
//! be shared freely across threads.
//!
//! # Example
//!
//! ```rust
//! use fincalc_formulas::catalog::FormulaCatalog;
//! use fincalc_core::prelude::*;
//!
//! let catalog = FormulaCatalog::global();
//! let pv = catalog.lookup("present_value").unwrap();
//! let result = pv.calculate(&pv.default_params).unwrap();
//! assert!((result.primary_value().unwrap() - 6805.83).abs() < 0.01);
//!
//! assert!(matches!(
//!     catalog.lookup("present_worth"),
//!     Err(FinError::UnknownFormula { .. })
//! ));
//! ```

mod entries;
mod validation;

pub use validation::{validate_inputs, ValidationReport};

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use fincalc_core::prelude::*;

/// Signature of a formula's calculation function.
pub type Evaluate = fn(&[ParamValue]) -> FinResult<FormulaResult>;

/// Which direction of a formula's result is favourable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    /// Larger results are better (returns, margins, liquidity).
    HigherIsBetter,
    /// Smaller results are better (leverage, payback, cycle length).
    LowerIsBetter,
}

/// An immutable catalog entry.
#[derive(Clone, Serialize)]
pub struct FormulaDescriptor {
    /// Stable identifier, e.g. `net_present_value`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Category the formula is listed under.
    pub category: Category,
    /// Positional parameter specifications.
    pub params: &'static [ParamSpec],
    /// Example parameters, one per spec.
    pub default_params: Vec<ParamValue>,
    /// Human-readable formula.
    pub expression: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Favourable direction of the result.
    pub preference: Preference,
    /// Whether the sign of the result is meaningful (NPV-style outcomes).
    pub signed_outcome: bool,
    /// Level whose crossing the sensitivity scan reports.
    pub critical_level: Option<f64>,
    #[serde(skip)]
    evaluate: Evaluate,
}

impl fmt::Debug for FormulaDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaDescriptor")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("params", &self.params.len())
            .finish_non_exhaustive()
    }
}

impl FormulaDescriptor {
    /// Validates `params` against the descriptor and runs the calculation.
    ///
    /// Validation happens before any arithmetic: a count mismatch, a shape
    /// mismatch or a role constraint violation fails immediately.
    pub fn calculate(&self, params: &[ParamValue]) -> FinResult<FormulaResult> {
        self.validate(params)?;
        (self.evaluate)(params)
    }

    /// Checks parameter count, shapes and role constraints.
    pub fn validate(&self, params: &[ParamValue]) -> FinResult<()> {
        if params.len() != self.params.len() {
            return Err(FinError::validation(
                self.id,
                format!(
                    "expected {} parameters, got {}",
                    self.params.len(),
                    params.len()
                ),
            ));
        }
        self.params
            .iter()
            .zip(params)
            .try_for_each(|(spec, value)| spec.check(value))
    }

    /// Returns the position of the parameter called `name`.
    #[must_use]
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|spec| spec.name == name)
    }

    /// Returns the parameter spec at `index`.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&ParamSpec> {
        self.params.get(index)
    }
}

/// Registry of all formulas, keyed by id.
pub struct FormulaCatalog {
    formulas: Vec<FormulaDescriptor>,
    index: HashMap<&'static str, usize>,
}

static GLOBAL_CATALOG: OnceLock<FormulaCatalog> = OnceLock::new();

impl FormulaCatalog {
    /// Returns the process-wide catalog, building it on first access.
    #[must_use]
    pub fn global() -> &'static Self {
        GLOBAL_CATALOG.get_or_init(Self::new)
    }

    /// Builds a catalog containing every known formula.
    #[must_use]
    pub fn new() -> Self {
        let formulas = entries::all();
        let index = formulas
            .iter()
            .enumerate()
            .map(|(i, descriptor)| (descriptor.id, i))
            .collect();
        Self { formulas, index }
    }

    /// Looks up a formula.
    ///
    /// # Errors
    ///
    /// Returns [`FinError::UnknownFormula`] when no formula has this id.
    pub fn lookup(&self, id: &str) -> FinResult<&FormulaDescriptor> {
        self.get(id).ok_or_else(|| FinError::unknown_formula(id))
    }

    /// Returns the formula with this id, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FormulaDescriptor> {
        self.index.get(id).map(|&i| &self.formulas[i])
    }

    /// Ids of every formula in `category`, in catalog order.
    #[must_use]
    pub fn list_by_category(&self, category: Category) -> Vec<&'static str> {
        self.formulas
            .iter()
            .filter(|descriptor| descriptor.category == category)
            .map(|descriptor| descriptor.id)
            .collect()
    }

    /// Distinct categories in the order they first appear.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::new();
        for descriptor in &self.formulas {
            if !seen.contains(&descriptor.category) {
                seen.push(descriptor.category);
            }
        }
        seen
    }

    /// Iterates over every descriptor in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &FormulaDescriptor> {
        self.formulas.iter()
    }

    /// All formula ids in catalog order.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        self.formulas.iter().map(|descriptor| descriptor.id).collect()
    }

    /// Number of registered formulas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    /// Returns true if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

impl Default for FormulaCatalog {
    fn default() -> Self {
        Self::new()
    }
}
