use thiserror::Error;

use crate::domain::{RiskBand, Scope};

/// Malformed or contradictory configuration.
///
/// Always fatal: an assessment cannot run against a configuration that fails
/// any of these checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{scope} thresholds out of order: low/medium={low_medium} must be < medium/high={medium_high}")]
    ThresholdsOutOfOrder {
        scope: &'static str,
        low_medium: f64,
        medium_high: f64,
    },

    #[error("{scope} thresholds must be finite numbers")]
    NonFiniteThreshold { scope: &'static str },

    #[error("invalid weight {weight} for '{category}' in table '{table}' (must be finite and >= 0)")]
    InvalidWeight {
        table: String,
        category: String,
        weight: f64,
    },

    #[error("duplicate category '{category}' in table '{table}'")]
    DuplicateCategory { table: String, category: String },

    #[error("duplicate {scope:?} table for factor '{factor}'")]
    DuplicateTable { scope: Scope, factor: String },

    #[error("missing required {scope:?} table for factor '{factor}'")]
    MissingTable { scope: Scope, factor: String },

    #[error("{scope:?} flag table '{factor}' has no '{key}' entry")]
    MissingFlagKey {
        scope: Scope,
        factor: String,
        key: &'static str,
    },

    #[error("catalog entry '{category}' has no usable pattern")]
    EmptyPattern { category: String },

    #[error("catalog entry '{category}' weighs {weight}, above the unclassified weight {unclassified}")]
    UnclassifiedWeightTooLow {
        category: String,
        weight: f64,
        unclassified: f64,
    },

    #[error("combination matrix must have 3 rows, found {found}")]
    MatrixRowCount { found: usize },

    #[error("combination matrix row {row} must have 3 cells, found {found}")]
    MatrixRowLength { row: usize, found: usize },

    #[error("combination matrix is missing the cell for inherent={inherent}, specific={specific}")]
    MissingMatrixCell { inherent: RiskBand, specific: RiskBand },

    #[error("amount bands must be finite and strictly ascending, got {bounds:?}")]
    AmountBandsOutOfOrder { bounds: Vec<f64> },

    #[error("amount band '{band}' has no entry in the value_band table")]
    UnknownAmountBand { band: String },

    #[error("invalid configuration document: {0}")]
    Parse(String),
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(2, format!("Configuration error: {err}"))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_maps_to_exit_code_2() {
        let err: AppError = ConfigError::NonFiniteThreshold { scope: "client" }.into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("client thresholds"));
    }
}
