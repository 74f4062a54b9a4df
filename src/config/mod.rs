//! Scoring configuration.
//!
//! Configuration arrives as a JSON document (`RawConfig`) and is validated
//! once into an immutable `ScoringConfig`. Nothing downstream touches the raw
//! document: a malformed table is rejected here, before any assessment runs.
//!
//! - `RawConfig`: serde mirror of the document
//! - `ScoringConfig`: validated, normalized snapshot
//! - `ConfigHandle`: process-wide holder that swaps whole snapshots on reload

use serde::{Deserialize, Serialize};

use crate::domain::{factor, EntityTypeCatalogEntry, RiskBand, RiskFactor, Scope};
use crate::error::ConfigError;
use crate::scoring::{
    AmountBands, BandThresholds, CombinationMatrix, EntityTypeClassifier, FLAG_NO, FLAG_YES, FactorTables, PlaceTable,
    RiskFactorTable,
};
use crate::text::normalize_key;

pub mod defaults;
pub mod handle;

pub use handle::ConfigHandle;

/// Tables that every configuration must provide.
const REQUIRED_TABLES: [(Scope, &str); 6] = [
    (Scope::Client, factor::GEOGRAPHIC_RISK),
    (Scope::Client, factor::PEP),
    (Scope::Operation, factor::SERVICE_TYPE),
    (Scope::Operation, factor::VALUE_BAND),
    (Scope::Operation, factor::PAYMENT_METHOD),
    (Scope::Operation, factor::GEOGRAPHIC_RISK),
];

/// Tables looked up with the `yes` / `no` keys of a boolean flag.
const FLAG_TABLES: [(Scope, &str); 1] = [(Scope::Client, factor::PEP)];

/// What to do, beyond scoring, when a legal form matches no catalog entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewPolicy {
    /// Score conservatively; the audit trail records the fallback.
    #[default]
    ScoreOnly,
    /// Also attach a review flag to the result and log a warning.
    Flag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFactorEntry {
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawFactorTable {
    pub factor: String,
    pub entries: Vec<RawFactorEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawCatalogEntry {
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Whole-word patterns, for abbreviations that also occur inside words.
    #[serde(default)]
    pub tokens: Vec<String>,
    pub category: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPlace {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawPlaces {
    /// Weight for a place that is given but not listed.
    pub unknown_weight: f64,
    pub entries: Vec<RawPlace>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAmountBands {
    pub bounds: Vec<f64>,
    pub keys: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawThresholds {
    pub client: BandThresholds,
    pub operation: BandThresholds,
}

/// The configuration document as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Weight applied to an absent attribute.
    pub neutral_weight: f64,
    /// Weight applied to a legal form that matches no catalog entry.
    pub unclassified_weight: f64,
    #[serde(default)]
    pub review_policy: ReviewPolicy,
    pub thresholds: RawThresholds,
    /// Rows = inherent band, columns = specific band, both LOW/MEDIUM/HIGH.
    pub combination_matrix: Vec<Vec<RiskBand>>,
    pub client_factors: Vec<RawFactorTable>,
    pub operation_factors: Vec<RawFactorTable>,
    /// Ordered: the first matching entry wins.
    pub entity_catalog: Vec<RawCatalogEntry>,
    pub places: RawPlaces,
    pub amount_bands: RawAmountBands,
    /// Continuative services assessed on the client side only.
    #[serde(default)]
    pub client_only_services: Vec<String>,
}

/// Validated, immutable scoring configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    tables: FactorTables,
    classifier: EntityTypeClassifier,
    places: PlaceTable,
    amount_bands: AmountBands,
    client_thresholds: BandThresholds,
    operation_thresholds: BandThresholds,
    matrix: CombinationMatrix,
    neutral_weight: f64,
    client_only_services: Vec<String>,
    review_policy: ReviewPolicy,
}

impl ScoringConfig {
    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::try_from(raw)
    }

    /// The built-in default methodology.
    pub fn default_methodology() -> Result<Self, ConfigError> {
        Self::try_from(RawConfig::default_methodology())
    }

    pub fn tables(&self) -> &FactorTables {
        &self.tables
    }

    pub fn classifier(&self) -> &EntityTypeClassifier {
        &self.classifier
    }

    pub fn places(&self) -> &PlaceTable {
        &self.places
    }

    pub fn amount_bands(&self) -> &AmountBands {
        &self.amount_bands
    }

    pub fn thresholds(&self, scope: Scope) -> &BandThresholds {
        match scope {
            Scope::Client => &self.client_thresholds,
            Scope::Operation => &self.operation_thresholds,
        }
    }

    pub fn matrix(&self) -> &CombinationMatrix {
        &self.matrix
    }

    pub fn neutral_weight(&self) -> f64 {
        self.neutral_weight
    }

    pub fn review_policy(&self) -> ReviewPolicy {
        self.review_policy
    }

    /// Whether `service_type` is a continuative, client-only service.
    pub fn is_client_only_service(&self, service_type: &str) -> bool {
        let key = normalize_key(service_type);
        self.client_only_services.iter().any(|s| *s == key)
    }
}

impl TryFrom<RawConfig> for ScoringConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        if !(raw.neutral_weight.is_finite() && raw.neutral_weight >= 0.0) {
            return Err(ConfigError::InvalidWeight {
                table: "neutral".to_string(),
                category: "neutral_weight".to_string(),
                weight: raw.neutral_weight,
            });
        }
        raw.thresholds.client.validate("client")?;
        raw.thresholds.operation.validate("operation")?;

        let matrix = CombinationMatrix::from_rows(&raw.combination_matrix)?;

        let mut tables = FactorTables::default();
        for (scope, raw_tables) in [
            (Scope::Client, raw.client_factors),
            (Scope::Operation, raw.operation_factors),
        ] {
            for table in raw_tables {
                let entries = table
                    .entries
                    .into_iter()
                    .map(|e| RiskFactor {
                        category: e.category,
                        description: e.description,
                        weight: e.weight,
                        scope,
                    })
                    .collect();
                tables.insert(RiskFactorTable::new(table.factor, scope, entries)?)?;
            }
        }
        for (scope, name) in REQUIRED_TABLES {
            tables.require(scope, name)?;
        }
        for (scope, name) in FLAG_TABLES {
            let table = tables.require(scope, name)?;
            if let Some(key) = [FLAG_YES, FLAG_NO].into_iter().find(|k| !table.contains(k)) {
                return Err(ConfigError::MissingFlagKey {
                    scope,
                    factor: name.to_string(),
                    key,
                });
            }
        }

        let catalog = raw
            .entity_catalog
            .into_iter()
            .map(|e| EntityTypeCatalogEntry {
                patterns: e.patterns,
                tokens: e.tokens,
                category: e.category,
                weight: e.weight,
            })
            .collect();
        let classifier = EntityTypeClassifier::new(catalog, raw.unclassified_weight)?;

        let places = PlaceTable::new(
            raw.places.entries.into_iter().map(|p| (p.name, p.weight)),
            raw.places.unknown_weight,
        )?;

        let amount_bands = AmountBands::new(raw.amount_bands.bounds, raw.amount_bands.keys)?;
        let value_bands = tables.require(Scope::Operation, factor::VALUE_BAND)?;
        if let Some(missing) = amount_bands.keys().iter().find(|k| !value_bands.contains(k)) {
            return Err(ConfigError::UnknownAmountBand { band: missing.clone() });
        }

        let client_only_services = raw.client_only_services.iter().map(|s| normalize_key(s)).collect();

        Ok(Self {
            tables,
            classifier,
            places,
            amount_bands,
            client_thresholds: raw.thresholds.client,
            operation_thresholds: raw.thresholds.operation,
            matrix,
            neutral_weight: raw.neutral_weight,
            client_only_services,
            review_policy: raw.review_policy,
        })
    }
}
