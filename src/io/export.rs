//! Export assessments to JSON (single case) or CSV (batch summary).
//!
//! The CSV is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{AssessmentReport, RiskAssessmentResult};
use crate::error::AppError;

/// Value of the `tool` field in exported JSON.
pub const TOOL_NAME: &str = "aml";

/// Wrap a result with its run metadata.
pub fn build_report(
    subject: Option<String>,
    assessment_date: NaiveDate,
    result: RiskAssessmentResult,
) -> AssessmentReport {
    AssessmentReport {
        tool: TOOL_NAME.to_string(),
        assessment_date,
        subject,
        result,
    }
}

/// Write a single assessment as pretty JSON.
pub fn write_report_json(path: &Path, report: &AssessmentReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::new(4, format!("Failed to write export JSON: {e}")))?;
    tracing::info!(path = %path.display(), "assessment exported");
    Ok(())
}

/// One batch outcome: either a result or the reason the case failed.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub subject: Option<String>,
    pub result: Result<RiskAssessmentResult, String>,
}

#[derive(Debug, Serialize)]
struct BatchRow<'a> {
    subject: &'a str,
    inherent_score: Option<f64>,
    inherent: Option<&'static str>,
    specific_score: Option<f64>,
    specific: Option<&'static str>,
    overall: Option<&'static str>,
    due_diligence: Option<&'static str>,
    client_only: Option<bool>,
    review_flags: Option<usize>,
    error: Option<&'a str>,
}

impl<'a> BatchRow<'a> {
    fn from_outcome(outcome: &'a BatchOutcome) -> Self {
        let subject = outcome.subject.as_deref().unwrap_or("");
        match &outcome.result {
            Ok(r) => BatchRow {
                subject,
                inherent_score: Some(r.inherent.score),
                inherent: Some(r.inherent.band.display_name()),
                specific_score: Some(r.specific.score),
                specific: Some(r.specific.band.display_name()),
                overall: Some(r.overall.display_name()),
                due_diligence: Some(r.due_diligence.display_name()),
                client_only: Some(r.client_only),
                review_flags: Some(r.review_flags.len()),
                error: None,
            },
            Err(message) => BatchRow {
                subject,
                inherent_score: None,
                inherent: None,
                specific_score: None,
                specific: None,
                overall: None,
                due_diligence: None,
                client_only: None,
                review_flags: None,
                error: Some(message),
            },
        }
    }
}

/// Write one summary row per batch case, in input order.
pub fn write_batch_csv(path: &Path, outcomes: &[BatchOutcome]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for outcome in outcomes {
        writer
            .serialize(BatchRow::from_outcome(outcome))
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = outcomes.len(), "batch summary exported");
    Ok(())
}
