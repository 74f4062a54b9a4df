//! Assessment case JSON reading.
//!
//! A case file holds one `AssessmentCase`; a batch file holds a JSON array of
//! them.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::domain::AssessmentCase;
use crate::error::AppError;

/// Read a single case.
pub fn read_case_json(path: &Path) -> Result<AssessmentCase, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open case JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid case JSON '{}': {e}", path.display())))
}

/// Read a batch of cases.
pub fn read_cases_json(path: &Path) -> Result<Vec<AssessmentCase>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open cases JSON '{}': {e}", path.display())))?;
    let cases: Vec<AssessmentCase> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid cases JSON '{}': {e}", path.display())))?;
    if cases.is_empty() {
        return Err(AppError::new(2, format!("Cases JSON '{}' contains no cases.", path.display())));
    }
    tracing::debug!(count = cases.len(), "cases loaded");
    Ok(cases)
}
