//! Engine error types.

use thiserror::Error;

use fincalc_config::ConfigError;
use fincalc_core::FinError;

/// Engine operation result type.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine configuration is unusable.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A calculation or analysis failed.
    #[error(transparent)]
    Calculation(#[from] FinError),
}

impl EngineError {
    /// Returns the calculation error, if this is one.
    #[must_use]
    pub fn as_calculation(&self) -> Option<&FinError> {
        match self {
            Self::Calculation(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}
