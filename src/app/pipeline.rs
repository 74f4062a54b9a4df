//! Shared assessment pipeline used by the `assess` and `batch` commands.
//!
//! case -> engine (one configuration snapshot) -> result
//!
//! The commands then only deal with presentation and exports.

use std::sync::Arc;

use rayon::prelude::*;

use crate::config::ScoringConfig;
use crate::domain::{AssessmentCase, RiskAssessmentResult};
use crate::engine::RiskAssessmentEngine;
use crate::error::AppError;
use crate::io::BatchOutcome;

/// Assess one case.
pub fn run_assessment(case: &AssessmentCase, config: Arc<ScoringConfig>) -> Result<RiskAssessmentResult, AppError> {
    let engine = RiskAssessmentEngine::new(config);
    engine
        .assess(&case.client, &case.operation)
        .map_err(|e| AppError::new(3, format!("Assessment failed: {e}")))
}

/// Assess every case against the same snapshot, in parallel.
///
/// Outcomes are returned in input order; a failing case does not stop the batch.
pub fn run_batch(cases: &[AssessmentCase], config: Arc<ScoringConfig>) -> Vec<BatchOutcome> {
    let engine = RiskAssessmentEngine::new(config);
    let outcomes: Vec<BatchOutcome> = cases
        .par_iter()
        .map(|case| BatchOutcome {
            subject: case.subject.clone(),
            result: engine.assess(&case.client, &case.operation).map_err(|e| e.to_string()),
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    tracing::info!(cases = outcomes.len(), failed, "batch completed");
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientProfile, OperationProfile, RiskBand};

    fn case(subject: &str, pep: bool) -> AssessmentCase {
        AssessmentCase {
            subject: Some(subject.to_string()),
            client: ClientProfile {
                legal_form: Some("S.p.A.".to_string()),
                pep: Some(pep),
                ..ClientProfile::default()
            },
            operation: OperationProfile {
                service_type: Some("consulenza societaria".to_string()),
                value_band: Some("low".to_string()),
                ..OperationProfile::default()
            },
        }
    }

    #[test]
    fn batch_matches_sequential_assessment_in_order() {
        let config = Arc::new(ScoringConfig::default_methodology().unwrap());
        let cases: Vec<AssessmentCase> = (0..32).map(|i| case(&format!("c{i}"), i % 3 == 0)).collect();

        let outcomes = run_batch(&cases, Arc::clone(&config));
        assert_eq!(outcomes.len(), cases.len());
        for (case, outcome) in cases.iter().zip(&outcomes) {
            assert_eq!(outcome.subject, case.subject);
            let expected = run_assessment(case, Arc::clone(&config)).unwrap();
            assert_eq!(outcome.result.as_ref().unwrap(), &expected);
        }
    }

    #[test]
    fn pep_raises_inherent_band() {
        let config = Arc::new(ScoringConfig::default_methodology().unwrap());
        let plain = run_assessment(&case("a", false), Arc::clone(&config)).unwrap();
        let pep = run_assessment(&case("b", true), config).unwrap();
        assert_eq!(plain.inherent.band, RiskBand::Low);
        assert_eq!(pep.inherent.band, RiskBand::Medium);
        assert_eq!(pep.inherent.score - plain.inherent.score, 4.0);
    }
}
