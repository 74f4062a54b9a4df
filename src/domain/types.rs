//! Shared domain types.
//!
//! These types are value objects: created fresh per assessment, never mutated
//! afterwards, and serializable so the reporting layer can render them in any
//! structured format.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Factor names understood by the evaluator.
///
/// Tables in the configuration are keyed by `(Scope, factor name)`.
pub mod factor {
    pub const LEGAL_FORM: &str = "legal_form";
    /// Manually chosen legal-form category, used when the text is not recognized.
    pub const LEGAL_FORM_CATEGORY: &str = "legal_form_category";
    pub const RESIDENCE: &str = "residence";
    pub const GEOGRAPHIC_RISK: &str = "geographic_risk";
    pub const PEP: &str = "pep";

    pub const SERVICE_TYPE: &str = "service_type";
    pub const VALUE_BAND: &str = "value_band";
    pub const PAYMENT_METHOD: &str = "payment_method";
    pub const DESTINATION: &str = "destination";
}

/// Risk classification derived from a score.
///
/// Totally ordered: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub const ALL: [RiskBand; 3] = [RiskBand::Low, RiskBand::Medium, RiskBand::High];

    /// Row/column index in the combination matrix.
    pub fn index(self) -> usize {
        match self {
            RiskBand::Low => 0,
            RiskBand::Medium => 1,
            RiskBand::High => 2,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            RiskBand::Low => "LOW",
            RiskBand::Medium => "MEDIUM",
            RiskBand::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.display_name())
    }
}

/// Which side of the assessment a factor belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Inherent risk: the client.
    Client,
    /// Specific risk: the engagement/operation.
    Operation,
}

impl Scope {
    pub fn display_name(self) -> &'static str {
        match self {
            Scope::Client => "client",
            Scope::Operation => "operation",
        }
    }
}

/// One row of a risk factor table: a factor value and its weight.
///
/// `category` is the (normalized) value id, unique within its table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: String,
    pub description: String,
    pub weight: f64,
    pub scope: Scope,
}

/// One row of the legal-entity catalog.
///
/// Patterns are stored normalized; the catalog is ordered and the first
/// matching entry wins. `patterns` match anywhere in the text, `tokens` only
/// as whole words (short abbreviations such as `spa` or `sas`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeCatalogEntry {
    pub patterns: Vec<String>,
    #[serde(default)]
    pub tokens: Vec<String>,
    pub category: String,
    pub weight: f64,
}

/// An additional `{factor, value}` attribute carried by a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalAttribute {
    pub factor: String,
    pub value: String,
}

/// Client-side (inherent risk) inputs.
///
/// Every field is optional: absent attributes resolve to the neutral weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientProfile {
    /// Free-text legal form, e.g. `"S.r.l. semplificata"`.
    pub legal_form: Option<String>,
    /// Category picked by the operator when `legal_form` is not recognized.
    pub legal_form_category: Option<String>,
    /// Residence or nationality (province or country name).
    pub residence: Option<String>,
    /// Categorical geographic risk indicator.
    pub geographic_risk: Option<String>,
    /// Politically exposed person.
    pub pep: Option<bool>,
    pub attributes: Vec<CategoricalAttribute>,
}

/// Operation-side (specific risk) inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperationProfile {
    pub service_type: Option<String>,
    /// Explicit monetary value band; takes precedence over `amount`.
    pub value_band: Option<String>,
    /// Raw amount (EUR), mapped to a value band through the amount bands.
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    /// Destination of funds/engagement (province or country name).
    pub destination: Option<String>,
    pub geographic_risk: Option<String>,
    pub attributes: Vec<CategoricalAttribute>,
}

/// How a contribution's weight was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Direct table lookup.
    Lookup,
    /// Legal form matched a catalog entry.
    Classified { category: String },
    /// Legal form matched nothing; the operator's manual category applied.
    ManualCategory { category: String },
    /// Legal form matched nothing; conservative default applied.
    Unclassified { category: String },
    /// Value present but unknown to its table; conservative weight applied.
    UnknownValue,
    /// Attribute absent; neutral weight applied.
    Missing,
}

/// A single factor's contribution to a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedContribution {
    pub scope: Scope,
    pub factor: String,
    pub weight: f64,
    /// The raw value found on the profile (absent for `Missing`).
    pub source: Option<String>,
    /// The table key actually used, when it differs from a plain lookup of
    /// `source` (e.g. the band derived from an amount).
    pub resolved_key: Option<String>,
    pub resolution: Resolution,
}

/// Summed score and the band it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandScore {
    pub score: f64,
    pub band: RiskBand,
}

/// Customer due-diligence regime implied by the overall band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueDiligence {
    Simplified,
    Ordinary,
    Enhanced,
}

impl DueDiligence {
    pub fn for_band(band: RiskBand) -> Self {
        match band {
            RiskBand::Low => DueDiligence::Simplified,
            RiskBand::Medium => DueDiligence::Ordinary,
            RiskBand::High => DueDiligence::Enhanced,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DueDiligence::Simplified => "Simplified due diligence",
            DueDiligence::Ordinary => "Ordinary due diligence",
            DueDiligence::Enhanced => "Enhanced due diligence",
        }
    }
}

/// Something the reviewer should look at manually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewFlag {
    pub factor: String,
    pub value: String,
    pub reason: String,
}

/// Output of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessmentResult {
    pub inherent: BandScore,
    pub specific: BandScore,
    pub overall: RiskBand,
    pub due_diligence: DueDiligence,
    /// Enhanced due diligence must be explicitly acknowledged downstream.
    pub requires_enhanced_acknowledgement: bool,
    /// The service is assessed on the client side only.
    pub client_only: bool,
    /// Client contributions first, then operation contributions, each in
    /// attribute declaration order.
    pub contributions: Vec<WeightedContribution>,
    pub review_flags: Vec<ReviewFlag>,
}

impl RiskAssessmentResult {
    pub fn contributions_for(&self, scope: Scope) -> impl Iterator<Item = &WeightedContribution> {
        self.contributions.iter().filter(move |c| c.scope == scope)
    }
}

/// A subject plus the two profiles to assess (the unit read by the CLI).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentCase {
    /// Client name or case reference, for reports only.
    pub subject: Option<String>,
    pub client: ClientProfile,
    pub operation: OperationProfile,
}

/// A saved assessment (JSON), as handed to the reporting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    pub tool: String,
    pub assessment_date: NaiveDate,
    pub subject: Option<String>,
    pub result: RiskAssessmentResult,
}
