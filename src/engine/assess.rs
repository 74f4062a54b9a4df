//! The assessment pipeline.
//!
//! client factors -> aggregate -> inherent band
//! operation factors -> aggregate -> specific band
//! (inherent, specific) -> combination matrix -> overall band
//!
//! Every call is a pure function of its inputs and the configuration snapshot;
//! nothing is carried between assessments.

use std::sync::Arc;

use crate::config::{ConfigHandle, ReviewPolicy, ScoringConfig};
use crate::domain::{
    ClientProfile, DueDiligence, OperationProfile, Resolution, ReviewFlag, RiskAssessmentResult, Scope,
    WeightedContribution,
};
use crate::error::ConfigError;
use crate::scoring::{aggregate_scored, evaluate};

/// Entry point bound to one configuration snapshot.
#[derive(Debug, Clone)]
pub struct RiskAssessmentEngine {
    config: Arc<ScoringConfig>,
}

impl RiskAssessmentEngine {
    pub fn new(config: Arc<ScoringConfig>) -> Self {
        Self { config }
    }

    /// Engine over the handle's current snapshot. Later reloads do not affect it.
    pub fn from_handle(handle: &ConfigHandle) -> Self {
        Self::new(handle.snapshot())
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn assess(
        &self,
        client: &ClientProfile,
        operation: &OperationProfile,
    ) -> Result<RiskAssessmentResult, ConfigError> {
        assess(client, operation, &self.config)
    }
}

/// Assess a client and an operation against `config`.
pub fn assess(
    client: &ClientProfile,
    operation: &OperationProfile,
    config: &ScoringConfig,
) -> Result<RiskAssessmentResult, ConfigError> {
    let client_contributions = evaluate(client, config);
    let inherent = aggregate_scored(&client_contributions, config.thresholds(Scope::Client))?;

    let client_only = operation
        .service_type
        .as_deref()
        .is_some_and(|s| config.is_client_only_service(s));

    let (operation_contributions, specific) = if client_only {
        // Continuative service: the client side stands in for the operation.
        (Vec::new(), inherent)
    } else {
        let contributions = evaluate(operation, config);
        let specific = aggregate_scored(&contributions, config.thresholds(Scope::Operation))?;
        (contributions, specific)
    };

    let overall = config.matrix().combine(inherent.band, specific.band);
    let due_diligence = DueDiligence::for_band(overall);

    let mut contributions = client_contributions;
    contributions.extend(operation_contributions);

    let review_flags = review_flags(&contributions, config.review_policy());

    tracing::info!(
        inherent = %inherent.band,
        inherent_score = inherent.score,
        specific = %specific.band,
        specific_score = specific.score,
        overall = %overall,
        client_only,
        "assessment completed"
    );

    Ok(RiskAssessmentResult {
        inherent,
        specific,
        overall,
        due_diligence,
        requires_enhanced_acknowledgement: due_diligence == DueDiligence::Enhanced,
        client_only,
        contributions,
        review_flags,
    })
}

fn review_flags(contributions: &[WeightedContribution], policy: ReviewPolicy) -> Vec<ReviewFlag> {
    if policy != ReviewPolicy::Flag {
        return Vec::new();
    }
    contributions
        .iter()
        .filter(|c| matches!(c.resolution, Resolution::Unclassified { .. }))
        .map(|c| {
            let value = c.source.clone().unwrap_or_default();
            tracing::warn!(factor = %c.factor, value = %value, "legal form not recognized; flagged for manual review");
            ReviewFlag {
                factor: c.factor.clone(),
                value,
                reason: "legal form matched no catalog entry; scored as unclassified".to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfig;
    use crate::domain::{CategoricalAttribute, RiskBand};

    fn engine() -> RiskAssessmentEngine {
        RiskAssessmentEngine::new(Arc::new(ScoringConfig::default_methodology().unwrap()))
    }

    fn simple_client() -> ClientProfile {
        ClientProfile {
            legal_form: Some("S.R.L. semplificata".to_string()),
            pep: Some(false),
            ..ClientProfile::default()
        }
    }

    fn simple_operation() -> OperationProfile {
        OperationProfile {
            service_type: Some("consulenza societaria".to_string()),
            value_band: Some("low".to_string()),
            ..OperationProfile::default()
        }
    }

    #[test]
    fn simplified_llc_with_low_value_advisory_is_low() {
        let result = engine().assess(&simple_client(), &simple_operation()).unwrap();
        assert_eq!(result.inherent.band, RiskBand::Low);
        assert_eq!(result.specific.band, RiskBand::Low);
        assert_eq!(result.overall, RiskBand::Low);
        assert_eq!(result.due_diligence, DueDiligence::Simplified);
        assert!(!result.requires_enhanced_acknowledgement);
        assert!(!result.client_only);
    }

    #[test]
    fn pep_with_unmatched_legal_form_is_at_least_medium() {
        let client = ClientProfile {
            legal_form: Some("Gesellschaft mbH".to_string()),
            pep: Some(true),
            ..ClientProfile::default()
        };
        let result = engine().assess(&client, &simple_operation()).unwrap();
        assert!(result.inherent.band >= RiskBand::Medium);
        assert!(result
            .contributions_for(Scope::Client)
            .any(|c| matches!(c.resolution, Resolution::Unclassified { .. })));
        assert!(result.review_flags.is_empty());
    }

    #[test]
    fn audit_trail_lists_client_then_operation() {
        let result = engine().assess(&simple_client(), &simple_operation()).unwrap();
        let scopes: Vec<Scope> = result.contributions.iter().map(|c| c.scope).collect();
        let first_operation = scopes.iter().position(|s| *s == Scope::Operation).unwrap();
        assert!(scopes[..first_operation].iter().all(|s| *s == Scope::Client));
        assert!(scopes[first_operation..].iter().all(|s| *s == Scope::Operation));

        let client_sum: f64 = result.contributions_for(Scope::Client).map(|c| c.weight).sum();
        assert_eq!(client_sum, result.inherent.score);
    }

    #[test]
    fn high_specific_lifts_low_client() {
        let operation = OperationProfile {
            service_type: Some("gestione fondi".to_string()),
            amount: Some(2_000_000.0),
            payment_method: Some("cash".to_string()),
            destination: Some("Panama".to_string()),
            geographic_risk: Some("high_risk_country".to_string()),
            attributes: Vec::new(),
            value_band: None,
        };
        let result = engine().assess(&simple_client(), &operation).unwrap();
        assert_eq!(result.inherent.band, RiskBand::Low);
        assert_eq!(result.specific.band, RiskBand::High);
        assert_eq!(result.overall, RiskBand::High);
        assert_eq!(result.due_diligence, DueDiligence::Enhanced);
        assert!(result.requires_enhanced_acknowledgement);
    }

    #[test]
    fn client_only_service_skips_operation_factors() {
        let operation = OperationProfile {
            service_type: Some("Consulenza continuativa".to_string()),
            payment_method: Some("cash".to_string()),
            ..OperationProfile::default()
        };
        let result = engine().assess(&simple_client(), &operation).unwrap();
        assert!(result.client_only);
        assert_eq!(result.specific, result.inherent);
        assert_eq!(result.contributions_for(Scope::Operation).count(), 0);
    }

    #[test]
    fn flag_policy_adds_review_flag_without_changing_score() {
        let client = ClientProfile {
            legal_form: Some("Sociedad Anónima Extranjera".to_string()),
            ..ClientProfile::default()
        };
        let scored_only = engine().assess(&client, &simple_operation()).unwrap();

        let mut raw = RawConfig::default_methodology();
        raw.review_policy = ReviewPolicy::Flag;
        let flagged_engine = RiskAssessmentEngine::new(Arc::new(ScoringConfig::try_from(raw).unwrap()));
        let flagged = flagged_engine.assess(&client, &simple_operation()).unwrap();

        assert_eq!(flagged.review_flags.len(), 1);
        assert_eq!(flagged.review_flags[0].factor, "legal_form");
        assert_eq!(flagged.inherent, scored_only.inherent);
        assert_eq!(flagged.overall, scored_only.overall);
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let engine = engine();
        let client = ClientProfile {
            legal_form: Some("Fiduciaria Beta".to_string()),
            legal_form_category: None,
            residence: Some("Napoli".to_string()),
            geographic_risk: Some("elevated".to_string()),
            pep: Some(true),
            attributes: vec![CategoricalAttribute {
                factor: "relationship".to_string(),
                value: "new".to_string(),
            }],
        };
        let first = engine.assess(&client, &simple_operation()).unwrap();
        for _ in 0..10 {
            assert_eq!(engine.assess(&client, &simple_operation()).unwrap(), first);
        }
    }
}
