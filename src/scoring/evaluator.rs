//! Factor evaluation: profile attributes -> weighted contributions.
//!
//! Each profile exposes its attributes in declaration order through
//! `RiskProfile`; one routine resolves every attribute kind against the
//! configuration, so the audit trail order is the attribute order.
//!
//! Resolution rules:
//! - absent (or blank) attribute      -> neutral weight, `Missing`
//! - categorical value in its table   -> table weight, `Lookup`
//! - categorical value not in table   -> table's highest weight, `UnknownValue`
//! - legal form                       -> classifier (`Classified`), else the
//!                                       manual category (`ManualCategory`),
//!                                       else `Unclassified`
//! - place                            -> place table, else its unknown weight
//! - extra attribute with no table    -> not recognized, skipped
//! - factor already evaluated         -> skipped; each factor counts once

use std::collections::HashSet;

use crate::config::ScoringConfig;
use crate::domain::{
    factor, CategoricalAttribute, ClientProfile, OperationProfile, Resolution, Scope, WeightedContribution,
};
use crate::scoring::{Classification, UNCLASSIFIED};
use crate::text::normalize_key;

/// Table key for a set flag.
pub const FLAG_YES: &str = "yes";
/// Table key for a cleared flag.
pub const FLAG_NO: &str = "no";

/// Value carried by one profile attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    /// Looked up directly in the factor table.
    Categorical(Option<&'a str>),
    /// Free text resolved by the legal-form classifier, with the operator's
    /// manual category for text the classifier does not recognize.
    LegalForm { text: Option<&'a str>, category: Option<&'a str> },
    /// Province/country resolved through the place table.
    Place(Option<&'a str>),
    /// Boolean flag, looked up as `yes` / `no`.
    Flag(Option<bool>),
    /// Explicit value band, or an amount mapped to one.
    Amount { band: Option<&'a str>, amount: Option<f64> },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileAttribute<'a> {
    pub factor: &'a str,
    pub value: AttributeValue<'a>,
}

impl<'a> ProfileAttribute<'a> {
    pub fn new(factor: &'a str, value: AttributeValue<'a>) -> Self {
        Self { factor, value }
    }
}

/// A profile that can be scored.
pub trait RiskProfile {
    const SCOPE: Scope;

    /// Attributes in declaration order.
    fn attributes(&self) -> Vec<ProfileAttribute<'_>>;
}

impl RiskProfile for ClientProfile {
    const SCOPE: Scope = Scope::Client;

    fn attributes(&self) -> Vec<ProfileAttribute<'_>> {
        let mut out = vec![
            ProfileAttribute::new(
                factor::LEGAL_FORM,
                AttributeValue::LegalForm {
                    text: self.legal_form.as_deref(),
                    category: self.legal_form_category.as_deref(),
                },
            ),
            ProfileAttribute::new(factor::RESIDENCE, AttributeValue::Place(self.residence.as_deref())),
            ProfileAttribute::new(
                factor::GEOGRAPHIC_RISK,
                AttributeValue::Categorical(self.geographic_risk.as_deref()),
            ),
            ProfileAttribute::new(factor::PEP, AttributeValue::Flag(self.pep)),
        ];
        out.extend(extra_attributes(&self.attributes));
        out
    }
}

impl RiskProfile for OperationProfile {
    const SCOPE: Scope = Scope::Operation;

    fn attributes(&self) -> Vec<ProfileAttribute<'_>> {
        let mut out = vec![
            ProfileAttribute::new(
                factor::SERVICE_TYPE,
                AttributeValue::Categorical(self.service_type.as_deref()),
            ),
            ProfileAttribute::new(
                factor::VALUE_BAND,
                AttributeValue::Amount {
                    band: self.value_band.as_deref(),
                    amount: self.amount,
                },
            ),
            ProfileAttribute::new(
                factor::PAYMENT_METHOD,
                AttributeValue::Categorical(self.payment_method.as_deref()),
            ),
            ProfileAttribute::new(factor::DESTINATION, AttributeValue::Place(self.destination.as_deref())),
            ProfileAttribute::new(
                factor::GEOGRAPHIC_RISK,
                AttributeValue::Categorical(self.geographic_risk.as_deref()),
            ),
        ];
        out.extend(extra_attributes(&self.attributes));
        out
    }
}

fn extra_attributes(attrs: &[CategoricalAttribute]) -> impl Iterator<Item = ProfileAttribute<'_>> {
    attrs
        .iter()
        .map(|a| ProfileAttribute::new(&a.factor, AttributeValue::Categorical(Some(a.value.as_str()))))
}

/// Evaluate every attribute of `profile`.
pub fn evaluate<P: RiskProfile>(profile: &P, config: &ScoringConfig) -> Vec<WeightedContribution> {
    evaluate_attributes(P::SCOPE, &profile.attributes(), config)
}

/// Evaluate an explicit attribute list in the given scope.
pub fn evaluate_attributes(
    scope: Scope,
    attributes: &[ProfileAttribute<'_>],
    config: &ScoringConfig,
) -> Vec<WeightedContribution> {
    let mut out = Vec::with_capacity(attributes.len());
    let mut seen = HashSet::new();
    for attr in attributes {
        if !seen.insert(normalize_key(attr.factor)) {
            tracing::debug!(
                scope = scope.display_name(),
                factor = attr.factor,
                "factor already evaluated; skipped"
            );
            continue;
        }
        if matches!(attr.value, AttributeValue::LegalForm { .. }) {
            seen.insert(factor::LEGAL_FORM_CATEGORY.to_string());
        }
        match resolve(scope, attr, config) {
            Some(c) => {
                tracing::debug!(
                    scope = scope.display_name(),
                    factor = %c.factor,
                    weight = c.weight,
                    resolution = ?c.resolution,
                    "factor resolved"
                );
                out.push(c);
            }
            None => tracing::debug!(
                scope = scope.display_name(),
                factor = attr.factor,
                "attribute has no factor table; skipped"
            ),
        }
    }
    out
}

fn resolve(scope: Scope, attr: &ProfileAttribute<'_>, config: &ScoringConfig) -> Option<WeightedContribution> {
    let contribution = |weight: f64, source: Option<&str>, resolved_key: Option<String>, resolution: Resolution| {
        WeightedContribution {
            scope,
            factor: attr.factor.to_string(),
            weight,
            source: source.map(str::to_string),
            resolved_key,
            resolution,
        }
    };
    let missing = || contribution(config.neutral_weight(), None, None, Resolution::Missing);

    match attr.value {
        AttributeValue::Categorical(value) => {
            let table = config.tables().get(scope, attr.factor)?;
            let Some(value) = present(value) else {
                return Some(missing());
            };
            Some(match table.lookup(value) {
                Some(row) => contribution(row.weight, Some(value), None, Resolution::Lookup),
                None => contribution(table.max_weight(), Some(value), None, Resolution::UnknownValue),
            })
        }
        AttributeValue::Flag(flag) => {
            let table = config.tables().get(scope, attr.factor)?;
            let Some(flag) = flag else {
                return Some(missing());
            };
            let key = if flag { FLAG_YES } else { FLAG_NO };
            Some(match table.lookup(key) {
                Some(row) => contribution(row.weight, Some(key), None, Resolution::Lookup),
                None => contribution(table.max_weight(), Some(key), None, Resolution::UnknownValue),
            })
        }
        AttributeValue::LegalForm { text, category: chosen } => {
            let text = present(text);
            let chosen = present(chosen);
            if text.is_none() && chosen.is_none() {
                return Some(missing());
            }
            if let Some(Classification::Matched { category, weight, .. }) = text.map(|t| config.classifier().classify(t))
            {
                return Some(contribution(weight, text, None, Resolution::Classified { category }));
            }
            let manual = chosen.and_then(|c| config.tables().get(scope, factor::LEGAL_FORM_CATEGORY)?.lookup(c));
            Some(match manual {
                Some(row) => contribution(
                    row.weight,
                    text,
                    Some(row.category.clone()),
                    Resolution::ManualCategory {
                        category: row.category.clone(),
                    },
                ),
                None => {
                    if let Some(c) = chosen {
                        tracing::debug!(category = c, "manual legal-form category not recognized; ignored");
                    }
                    contribution(
                        config.classifier().fallback_weight(),
                        text,
                        None,
                        Resolution::Unclassified {
                            category: UNCLASSIFIED.to_string(),
                        },
                    )
                }
            })
        }
        AttributeValue::Place(place) => {
            let Some(place) = present(place) else {
                return Some(missing());
            };
            let places = config.places();
            Some(match places.lookup(place) {
                Some(weight) => contribution(weight, Some(place), None, Resolution::Lookup),
                None => contribution(places.unknown_weight(), Some(place), None, Resolution::UnknownValue),
            })
        }
        AttributeValue::Amount { band, amount } => {
            let table = config.tables().get(scope, attr.factor)?;
            if let Some(band) = present(band) {
                return Some(match table.lookup(band) {
                    Some(row) => contribution(row.weight, Some(band), None, Resolution::Lookup),
                    None => contribution(table.max_weight(), Some(band), None, Resolution::UnknownValue),
                });
            }
            let Some((amount, key)) = amount.and_then(|a| config.amount_bands().band_for(a).map(|k| (a, k))) else {
                return Some(missing());
            };
            let source = format!("{amount:.2}");
            Some(match table.lookup(key) {
                Some(row) => contribution(row.weight, Some(source.as_str()), Some(key.to_string()), Resolution::Lookup),
                None => contribution(
                    table.max_weight(),
                    Some(source.as_str()),
                    Some(key.to_string()),
                    Resolution::UnknownValue,
                ),
            })
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScoringConfig {
        ScoringConfig::default_methodology().unwrap()
    }

    #[test]
    fn client_order_follows_declaration() {
        let profile = ClientProfile {
            legal_form: Some("Alfa S.r.l.".to_string()),
            legal_form_category: None,
            residence: Some("Milano".to_string()),
            geographic_risk: Some("standard".to_string()),
            pep: Some(false),
            attributes: vec![CategoricalAttribute {
                factor: "activity_sector".to_string(),
                value: "real_estate".to_string(),
            }],
        };
        let out = evaluate(&profile, &config());
        let factors: Vec<&str> = out.iter().map(|c| c.factor.as_str()).collect();
        assert_eq!(factors, ["legal_form", "residence", "geographic_risk", "pep", "activity_sector"]);
        let weights: Vec<f64> = out.iter().map(|c| c.weight).collect();
        assert_eq!(weights, [2.0, 2.0, 1.0, 0.0, 3.0]);
        assert!(out.iter().all(|c| c.scope == Scope::Client));
    }

    #[test]
    fn missing_attributes_use_neutral_weight() {
        let config = config();
        let out = evaluate(&ClientProfile::default(), &config);
        assert_eq!(out.len(), 4);
        for c in &out {
            assert_eq!(c.resolution, Resolution::Missing);
            assert_eq!(c.weight, config.neutral_weight());
            assert!(c.source.is_none());
        }

        let blank = ClientProfile {
            legal_form: Some("   ".to_string()),
            ..ClientProfile::default()
        };
        assert_eq!(evaluate(&blank, &config)[0].resolution, Resolution::Missing);
    }

    #[test]
    fn unmatched_legal_form_is_tagged_unclassified() {
        let profile = ClientProfile {
            legal_form: Some("Gesellschaft mbH".to_string()),
            ..ClientProfile::default()
        };
        let c = &evaluate(&profile, &config())[0];
        assert_eq!(
            c.resolution,
            Resolution::Unclassified {
                category: UNCLASSIFIED.to_string()
            }
        );
        assert_eq!(c.weight, 4.0);
    }

    #[test]
    fn manual_category_applies_only_to_unrecognized_text() {
        let config = config();
        let unrecognized = ClientProfile {
            legal_form: Some("Gesellschaft mbH".to_string()),
            legal_form_category: Some(" Foreign_Company ".to_string()),
            ..ClientProfile::default()
        };
        let c = &evaluate(&unrecognized, &config)[0];
        assert_eq!(
            c.resolution,
            Resolution::ManualCategory {
                category: "foreign_company".to_string()
            }
        );
        assert_eq!(c.weight, 3.0);
        assert_eq!(c.source.as_deref(), Some("Gesellschaft mbH"));

        let recognized = ClientProfile {
            legal_form: Some("Alfa S.r.l.".to_string()),
            legal_form_category: Some("trust_fiduciary".to_string()),
            ..ClientProfile::default()
        };
        let c = &evaluate(&recognized, &config)[0];
        assert_eq!(
            c.resolution,
            Resolution::Classified {
                category: "llc".to_string()
            }
        );
        assert_eq!(c.weight, 2.0);
    }

    #[test]
    fn unknown_manual_category_stays_unclassified() {
        let config = config();
        let profile = ClientProfile {
            legal_form: Some("Gesellschaft mbH".to_string()),
            legal_form_category: Some("made_up".to_string()),
            ..ClientProfile::default()
        };
        let c = &evaluate(&profile, &config)[0];
        assert!(matches!(c.resolution, Resolution::Unclassified { .. }));
        assert_eq!(c.weight, config.classifier().fallback_weight());

        let category_only = ClientProfile {
            legal_form_category: Some("natural_person".to_string()),
            ..ClientProfile::default()
        };
        let c = &evaluate(&category_only, &config)[0];
        assert!(matches!(c.resolution, Resolution::ManualCategory { .. }));
        assert!(c.source.is_none());
        assert_eq!(c.weight, 2.0);
    }

    #[test]
    fn extra_attribute_cannot_repeat_a_factor() {
        let profile = ClientProfile {
            pep: Some(true),
            attributes: vec![
                CategoricalAttribute {
                    factor: "PEP".to_string(),
                    value: "yes".to_string(),
                },
                CategoricalAttribute {
                    factor: factor::LEGAL_FORM_CATEGORY.to_string(),
                    value: "trust_fiduciary".to_string(),
                },
                CategoricalAttribute {
                    factor: "relationship".to_string(),
                    value: "new".to_string(),
                },
                CategoricalAttribute {
                    factor: "relationship".to_string(),
                    value: "non_face_to_face".to_string(),
                },
            ],
            ..ClientProfile::default()
        };
        let out = evaluate(&profile, &config());
        let factors: Vec<&str> = out.iter().map(|c| c.factor.as_str()).collect();
        assert_eq!(factors, ["legal_form", "residence", "geographic_risk", "pep", "relationship"]);
        let pep: Vec<f64> = out.iter().filter(|c| c.factor == factor::PEP).map(|c| c.weight).collect();
        assert_eq!(pep, [4.0]);
        assert_eq!(out.last().map(|c| c.weight), Some(2.0));
    }

    #[test]
    fn unknown_categorical_value_is_conservative() {
        let profile = OperationProfile {
            payment_method: Some("gold bars".to_string()),
            ..OperationProfile::default()
        };
        let out = evaluate(&profile, &config());
        let payment = out.iter().find(|c| c.factor == factor::PAYMENT_METHOD).unwrap();
        assert_eq!(payment.resolution, Resolution::UnknownValue);
        assert_eq!(payment.weight, 4.0);
    }

    #[test]
    fn amount_maps_to_value_band_unless_band_given() {
        let config = config();
        let derived = OperationProfile {
            amount: Some(300_000.0),
            ..OperationProfile::default()
        };
        let c = evaluate(&derived, &config)
            .into_iter()
            .find(|c| c.factor == factor::VALUE_BAND)
            .unwrap();
        assert_eq!(c.resolved_key.as_deref(), Some("high"));
        assert_eq!(c.source.as_deref(), Some("300000.00"));
        assert_eq!(c.weight, 3.0);

        let explicit = OperationProfile {
            amount: Some(300_000.0),
            value_band: Some("low".to_string()),
            ..OperationProfile::default()
        };
        let c = evaluate(&explicit, &config)
            .into_iter()
            .find(|c| c.factor == factor::VALUE_BAND)
            .unwrap();
        assert_eq!(c.weight, 1.0);
        assert!(c.resolved_key.is_none());

        let negative = OperationProfile {
            amount: Some(-10.0),
            ..OperationProfile::default()
        };
        let c = evaluate(&negative, &config)
            .into_iter()
            .find(|c| c.factor == factor::VALUE_BAND)
            .unwrap();
        assert_eq!(c.resolution, Resolution::Missing);
    }

    #[test]
    fn unknown_place_and_unrecognized_attribute() {
        let config = config();
        let profile = OperationProfile {
            destination: Some("Atlantide".to_string()),
            attributes: vec![CategoricalAttribute {
                factor: "favourite_colour".to_string(),
                value: "blue".to_string(),
            }],
            ..OperationProfile::default()
        };
        let out = evaluate(&profile, &config);
        assert_eq!(out.len(), 5);
        let dest = out.iter().find(|c| c.factor == factor::DESTINATION).unwrap();
        assert_eq!(dest.resolution, Resolution::UnknownValue);
        assert_eq!(dest.weight, config.places().unknown_weight());
        assert!(out.iter().all(|c| c.factor != "favourite_colour"));
    }
}
