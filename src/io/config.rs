//! Configuration loading.
//!
//! Resolution order: explicit `--config` path, then `AML_CONFIG` from the
//! environment, then the built-in methodology. The binary loads `.env` once at
//! startup, before any of this runs.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ScoringConfig;
use crate::error::AppError;

/// Environment variable naming a configuration JSON file.
pub const CONFIG_ENV: &str = "AML_CONFIG";

/// Read and validate a configuration JSON file.
pub fn read_config_json(path: &Path) -> Result<ScoringConfig, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to open config JSON '{}': {e}", path.display())))?;
    let config = ScoringConfig::from_json_str(&text)
        .map_err(|e| AppError::new(2, format!("Invalid config JSON '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

/// Load the configuration for a run.
pub fn load_config(explicit: Option<&Path>) -> Result<ScoringConfig, AppError> {
    if let Some(path) = explicit {
        return read_config_json(path);
    }

    match std::env::var(CONFIG_ENV) {
        Ok(value) if !value.trim().is_empty() => read_config_json(&PathBuf::from(value.trim())),
        _ => {
            tracing::debug!("no configuration file given; using the built-in methodology");
            Ok(ScoringConfig::default_methodology()?)
        }
    }
}
