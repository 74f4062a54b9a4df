//! Read-only lookup tables: factor value -> weight.
//!
//! Tables are built once from configuration, keys normalized on the way in,
//! and never mutated afterwards.

use std::collections::HashMap;

use crate::domain::{RiskFactor, Scope};
use crate::error::ConfigError;
use crate::text::normalize_key;

/// Weights for the values of one factor (e.g. `payment_method`) in one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskFactorTable {
    factor: String,
    scope: Scope,
    entries: Vec<RiskFactor>,
    index: HashMap<String, usize>,
}

impl RiskFactorTable {
    /// Build a table, normalizing categories and rejecting invalid rows.
    pub fn new(factor: impl Into<String>, scope: Scope, entries: Vec<RiskFactor>) -> Result<Self, ConfigError> {
        let factor = normalize_key(&factor.into());
        let mut index = HashMap::with_capacity(entries.len());
        let mut normalized = Vec::with_capacity(entries.len());

        for (i, entry) in entries.into_iter().enumerate() {
            let category = normalize_key(&entry.category);
            check_weight(&factor, &category, entry.weight)?;
            if index.insert(category.clone(), i).is_some() {
                return Err(ConfigError::DuplicateCategory {
                    table: factor,
                    category,
                });
            }
            normalized.push(RiskFactor {
                category,
                description: entry.description,
                weight: entry.weight,
                scope,
            });
        }

        Ok(Self {
            factor,
            scope,
            entries: normalized,
            index,
        })
    }

    pub fn factor(&self) -> &str {
        &self.factor
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn entries(&self) -> &[RiskFactor] {
        &self.entries
    }

    /// Look up a raw profile value (normalized before comparison).
    pub fn lookup(&self, value: &str) -> Option<&RiskFactor> {
        self.index.get(&normalize_key(value)).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, value: &str) -> bool {
        self.lookup(value).is_some()
    }

    /// Highest weight in the table (the conservative choice for unknown values).
    pub fn max_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).fold(0.0, f64::max)
    }
}

/// All factor tables of a configuration, keyed by `(scope, factor)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorTables {
    tables: HashMap<(Scope, String), RiskFactorTable>,
}

impl FactorTables {
    pub fn insert(&mut self, table: RiskFactorTable) -> Result<(), ConfigError> {
        let key = (table.scope(), table.factor().to_string());
        if self.tables.contains_key(&key) {
            return Err(ConfigError::DuplicateTable {
                scope: key.0,
                factor: key.1,
            });
        }
        self.tables.insert(key, table);
        Ok(())
    }

    pub fn get(&self, scope: Scope, factor: &str) -> Option<&RiskFactorTable> {
        self.tables.get(&(scope, normalize_key(factor)))
    }

    pub fn require(&self, scope: Scope, factor: &str) -> Result<&RiskFactorTable, ConfigError> {
        self.get(scope, factor).ok_or_else(|| ConfigError::MissingTable {
            scope,
            factor: factor.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Province/country name -> weight.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceTable {
    weights: HashMap<String, f64>,
    unknown_weight: f64,
}

impl PlaceTable {
    pub fn new(entries: impl IntoIterator<Item = (String, f64)>, unknown_weight: f64) -> Result<Self, ConfigError> {
        check_weight("places", "<unknown>", unknown_weight)?;
        let mut weights = HashMap::new();
        for (name, weight) in entries {
            let key = normalize_key(&name);
            check_weight("places", &key, weight)?;
            if weights.insert(key.clone(), weight).is_some() {
                return Err(ConfigError::DuplicateCategory {
                    table: "places".to_string(),
                    category: key,
                });
            }
        }
        Ok(Self {
            weights,
            unknown_weight,
        })
    }

    pub fn lookup(&self, place: &str) -> Option<f64> {
        self.weights.get(&normalize_key(place)).copied()
    }

    /// Weight applied to a place that is present but not listed.
    pub fn unknown_weight(&self) -> f64 {
        self.unknown_weight
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Ascending amount boundaries mapping a monetary amount to a value-band key.
///
/// `keys.len() == bounds.len() + 1`; each boundary is inclusive on the lower
/// side of the band above it.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountBands {
    bounds: Vec<f64>,
    keys: Vec<String>,
}

impl AmountBands {
    pub fn new(bounds: Vec<f64>, keys: Vec<String>) -> Result<Self, ConfigError> {
        let ascending = bounds.iter().all(|b| b.is_finite()) && bounds.windows(2).all(|w| w[0] < w[1]);
        if !ascending || keys.len() != bounds.len() + 1 {
            return Err(ConfigError::AmountBandsOutOfOrder { bounds });
        }
        let keys = keys.iter().map(|k| normalize_key(k)).collect();
        Ok(Self { bounds, keys })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Band key for `amount`. Non-finite or negative amounts yield `None`.
    pub fn band_for(&self, amount: f64) -> Option<&str> {
        if !(amount.is_finite() && amount >= 0.0) {
            return None;
        }
        let idx = self.bounds.iter().take_while(|&&b| amount >= b).count();
        self.keys.get(idx).map(String::as_str)
    }
}

fn check_weight(table: &str, category: &str, weight: f64) -> Result<(), ConfigError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight {
            table: table.to_string(),
            category: category.to_string(),
            weight,
        })
    }
}
