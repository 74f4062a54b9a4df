//! Legal-form classification.
//!
//! Free text such as `"S.r.l. semplificata"` is normalized and scanned against
//! an ordered catalog. An entry matches when any of its patterns is a substring
//! of the normalized text, or any of its tokens is a whole word of it; catalog
//! order is the priority order, so the first matching entry wins. Text matching nothing falls back to the conservative
//! `unclassified` category, whose weight is never below any catalog weight.

use crate::domain::EntityTypeCatalogEntry;
use crate::error::ConfigError;
use crate::text::normalize_legal_form;

/// Category reported when no catalog entry matches.
pub const UNCLASSIFIED: &str = "unclassified";

/// Outcome of classifying one legal-form text.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Matched {
        category: String,
        weight: f64,
        /// The normalized pattern that matched.
        pattern: String,
    },
    Fallback {
        category: String,
        weight: f64,
    },
}

impl Classification {
    pub fn category(&self) -> &str {
        match self {
            Classification::Matched { category, .. } | Classification::Fallback { category, .. } => category,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Classification::Matched { weight, .. } | Classification::Fallback { weight, .. } => *weight,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Classification::Fallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityTypeClassifier {
    catalog: Vec<EntityTypeCatalogEntry>,
    fallback_weight: f64,
}

impl EntityTypeClassifier {
    /// Build a classifier from catalog entries in priority order.
    ///
    /// Patterns and tokens are normalized with the same rules applied to input
    /// text; blank ones are dropped and an entry left with neither is rejected.
    pub fn new(catalog: Vec<EntityTypeCatalogEntry>, fallback_weight: f64) -> Result<Self, ConfigError> {
        check_weight(UNCLASSIFIED, fallback_weight)?;

        let mut normalized = Vec::with_capacity(catalog.len());
        for entry in catalog {
            check_weight(&entry.category, entry.weight)?;
            let patterns = normalize_all(&entry.patterns);
            let tokens = normalize_all(&entry.tokens);
            if patterns.is_empty() && tokens.is_empty() {
                return Err(ConfigError::EmptyPattern {
                    category: entry.category,
                });
            }
            // An unmatched legal form must never score below a matched one.
            if entry.weight > fallback_weight {
                return Err(ConfigError::UnclassifiedWeightTooLow {
                    category: entry.category,
                    weight: entry.weight,
                    unclassified: fallback_weight,
                });
            }
            normalized.push(EntityTypeCatalogEntry {
                patterns,
                tokens,
                category: entry.category,
                weight: entry.weight,
            });
        }

        Ok(Self {
            catalog: normalized,
            fallback_weight,
        })
    }

    pub fn entries(&self) -> &[EntityTypeCatalogEntry] {
        &self.catalog
    }

    pub fn fallback_weight(&self) -> f64 {
        self.fallback_weight
    }

    /// Classify raw legal-form text.
    pub fn classify(&self, raw: &str) -> Classification {
        let text = normalize_legal_form(raw);
        let words = format!(" {text} ");
        for entry in &self.catalog {
            let substring = entry.patterns.iter().find(|p| text.contains(p.as_str()));
            let word = || entry.tokens.iter().find(|t| words.contains(&format!(" {t} ")));
            if let Some(pattern) = substring.or_else(word) {
                return Classification::Matched {
                    category: entry.category.clone(),
                    weight: entry.weight,
                    pattern: pattern.clone(),
                };
            }
        }
        Classification::Fallback {
            category: UNCLASSIFIED.to_string(),
            weight: self.fallback_weight,
        }
    }
}

fn normalize_all(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|p| normalize_legal_form(p))
        .filter(|p| !p.is_empty())
        .collect()
}

fn check_weight(category: &str, weight: f64) -> Result<(), ConfigError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight {
            table: "entity_catalog".to_string(),
            category: category.to_string(),
            weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(patterns: &[&str], category: &str, weight: f64) -> EntityTypeCatalogEntry {
        EntityTypeCatalogEntry {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            tokens: Vec::new(),
            category: category.to_string(),
            weight,
        }
    }

    fn classifier() -> EntityTypeClassifier {
        EntityTypeClassifier::new(
            vec![
                entry(&["trust", "fiduciaria"], "trust_fiduciary", 4.0),
                entry(&["s.r.l. semplificata", "srls"], "simplified_llc", 2.0),
                entry(&["s.r.l."], "llc", 3.0),
                entry(&["banca"], "supervised_entity", 1.0),
            ],
            4.0,
        )
        .unwrap()
    }

    #[test]
    fn matches_after_normalization() {
        let c = classifier().classify("Rossi S.R.L. Semplificata");
        assert_eq!(c.category(), "simplified_llc");
        assert_eq!(c.weight(), 2.0);
        assert!(!c.is_fallback());
    }

    #[test]
    fn earlier_entry_wins_when_both_match() {
        // "srl semplificata" contains both "srl semplificata" and "srl".
        let classifier = classifier();
        for _ in 0..3 {
            assert_eq!(classifier.classify("s.r.l. semplificata").category(), "simplified_llc");
        }
        // A trust company that is also an S.r.l. is still a trust.
        assert_eq!(classifier.classify("Fiduciaria Alfa S.r.l.").category(), "trust_fiduciary");
    }

    #[test]
    fn unmatched_text_falls_back_conservatively() {
        let classifier = classifier();
        let c = classifier.classify("Gesellschaft mbH");
        assert!(c.is_fallback());
        assert_eq!(c.category(), UNCLASSIFIED);
        let lowest = classifier.entries().iter().map(|e| e.weight).fold(f64::MAX, f64::min);
        assert!(c.weight() > lowest);

        assert!(classifier.classify("").is_fallback());
    }

    #[test]
    fn tokens_match_whole_words_only() {
        let classifier = EntityTypeClassifier::new(
            vec![EntityTypeCatalogEntry {
                patterns: vec!["societa per azioni".to_string()],
                tokens: vec!["S.p.A.".to_string()],
                category: "joint_stock_company".to_string(),
                weight: 2.0,
            }],
            4.0,
        )
        .unwrap();

        let c = classifier.classify("Alfa S.p.A.");
        assert_eq!(c.category(), "joint_stock_company");
        assert!(matches!(c, Classification::Matched { ref pattern, .. } if pattern == "spa"));
        assert!(!classifier.classify("SpA").is_fallback());
        assert!(classifier.classify("Spagna Trading Ltd").is_fallback());
        assert!(classifier.classify("Espansione Srl").is_fallback());
    }

    #[test]
    fn rejects_blank_patterns() {
        let err = EntityTypeClassifier::new(vec![entry(&["  ", "..."], "empty", 1.0)], 4.0);
        assert!(matches!(err, Err(ConfigError::EmptyPattern { .. })));
    }

    #[test]
    fn rejects_fallback_below_catalog_weight() {
        let err = EntityTypeClassifier::new(vec![entry(&["trust"], "trust", 4.0)], 2.0);
        assert!(matches!(err, Err(ConfigError::UnclassifiedWeightTooLow { .. })));
    }
}
