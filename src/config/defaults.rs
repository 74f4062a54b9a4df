//! Built-in default methodology.
//!
//! Weights follow the four significance levels of the professional guidelines
//! (1 = not significant .. 4 = very significant). Thresholds are calibrated so
//! that a client or operation scoring mostly level-1/2 factors lands in LOW.
//!
//! The entity catalog is in priority order: specific forms (trusts, supervised
//! entities, simplified llc) come before the generic forms they contain.
//! Abbreviations short enough to occur inside ordinary words are whole-word
//! tokens rather than substring patterns.

use crate::domain::factor;
use crate::scoring::BandThresholds;

use super::{
    RawAmountBands, RawCatalogEntry, RawConfig, RawFactorEntry, RawFactorTable, RawPlace, RawPlaces, RawThresholds,
    ReviewPolicy,
};

impl RawConfig {
    /// The default configuration document (also printed by `aml defaults`).
    pub fn default_methodology() -> Self {
        use crate::domain::RiskBand::{High, Low, Medium};

        RawConfig {
            neutral_weight: 1.0,
            unclassified_weight: 4.0,
            review_policy: ReviewPolicy::ScoreOnly,
            thresholds: RawThresholds {
                client: BandThresholds {
                    low_medium: 6.0,
                    medium_high: 9.0,
                },
                operation: BandThresholds {
                    low_medium: 7.0,
                    medium_high: 11.0,
                },
            },
            combination_matrix: vec![
                vec![Low, Medium, High],
                vec![Low, Medium, High],
                vec![Medium, High, High],
            ],
            client_factors: vec![
                table(
                    factor::GEOGRAPHIC_RISK,
                    &[
                        ("none", "No geographic risk indicator", 0.0),
                        ("standard", "EU/EEA, equivalent regime", 1.0),
                        ("elevated", "Non-equivalent third country", 3.0),
                        ("high_risk_country", "High-risk third country (FATF list)", 4.0),
                    ],
                ),
                table(
                    factor::PEP,
                    &[
                        ("no", "Not a politically exposed person", 0.0),
                        ("yes", "Politically exposed person", 4.0),
                    ],
                ),
                table(
                    factor::LEGAL_FORM_CATEGORY,
                    &[
                        ("capital_company", "Capital company (manual choice)", 2.0),
                        ("partnership", "Partnership (manual choice)", 3.0),
                        ("non_profit", "Association or foundation (manual choice)", 3.0),
                        ("public_body", "Public body (manual choice)", 1.0),
                        ("natural_person", "Natural person (manual choice)", 2.0),
                        ("foreign_company", "Foreign company (manual choice)", 3.0),
                        ("trust_fiduciary", "Trust or fiduciary (manual choice)", 4.0),
                    ],
                ),
                table(
                    "activity_sector",
                    &[
                        ("professional_services", "Professional services", 1.0),
                        ("manufacturing", "Manufacturing", 1.0),
                        ("real_estate", "Real estate", 3.0),
                        ("gaming", "Gaming and betting", 4.0),
                        ("cash_intensive", "Cash-intensive business", 4.0),
                    ],
                ),
                table(
                    "relationship",
                    &[
                        ("established", "Known client, long relationship", 1.0),
                        ("new", "New client", 2.0),
                        ("non_face_to_face", "Client never met in person", 3.0),
                    ],
                ),
            ],
            operation_factors: vec![
                table(
                    factor::SERVICE_TYPE,
                    &[
                        ("consulenza societaria", "Corporate advisory", 1.0),
                        ("consulenza fiscale", "Tax advisory", 1.0),
                        ("contenzioso", "Litigation", 1.0),
                        ("consulenza continuativa", "Continuative advisory", 2.0),
                        ("costituzione societa", "Company formation", 2.0),
                        ("operazioni straordinarie", "M&A, mergers, demergers", 3.0),
                        ("compravendita immobiliare", "Real-estate transfer", 3.0),
                        ("gestione fondi", "Management of client funds", 4.0),
                        ("costituzione trust", "Trust or fiduciary setup", 4.0),
                    ],
                ),
                table(
                    factor::VALUE_BAND,
                    &[
                        ("low", "< EUR 50,000", 1.0),
                        ("medium", "EUR 50,000 - 250,000", 2.0),
                        ("high", "EUR 250,000 - 1,000,000", 3.0),
                        ("very_high", "> EUR 1,000,000", 4.0),
                    ],
                ),
                table(
                    factor::PAYMENT_METHOD,
                    &[
                        ("bank_transfer", "Traceable bank transfer", 1.0),
                        ("card", "Card payment", 1.0),
                        ("cheque", "Cheque", 2.0),
                        ("third_party", "Paid by a third party", 3.0),
                        ("cash", "Cash", 4.0),
                        ("crypto", "Crypto-assets", 4.0),
                    ],
                ),
                table(
                    factor::GEOGRAPHIC_RISK,
                    &[
                        ("none", "Domestic operation", 0.0),
                        ("standard", "EU/EEA counterparties", 1.0),
                        ("elevated", "Non-equivalent third country", 3.0),
                        ("high_risk_country", "High-risk third country (FATF list)", 4.0),
                    ],
                ),
            ],
            entity_catalog: vec![
                catalog(
                    &["trust", "fiduciaria", "fiduciario", "offshore", "anstalt", "fondazione estera"],
                    "trust_fiduciary",
                    4.0,
                ),
                catalog(
                    &["banca", "istituto di credito", "compagnia di assicurazione", "intermediario finanziario"],
                    "supervised_entity",
                    1.0,
                )
                .with_tokens(&["sgr", "sim"]),
                catalog(
                    &["pubblica amministrazione", "comune di", "ministero", "ente pubblico"],
                    "public_body",
                    1.0,
                ),
                catalog(&["quotata", "listed company"], "listed_company", 1.0),
                catalog(
                    &["s.r.l. semplificata", "societa a responsabilita limitata semplificata"],
                    "simplified_llc",
                    2.0,
                )
                .with_tokens(&["srls"]),
                catalog(&["societa a responsabilita limitata"], "llc", 2.0).with_tokens(&["s.r.l."]),
                catalog(&["societa per azioni"], "joint_stock_company", 2.0).with_tokens(&["s.p.a."]),
                catalog(&["cooperativa", "soc. coop."], "cooperative", 2.0),
                catalog(
                    &["studio associato", "associazione professionale", "societa tra professionisti"],
                    "professional_firm",
                    2.0,
                )
                .with_tokens(&["s.t.p."]),
                catalog(
                    &["societa in nome collettivo", "societa in accomandita"],
                    "partnership",
                    3.0,
                )
                .with_tokens(&["s.n.c.", "s.a.s."]),
                catalog(
                    &["ditta individuale", "impresa individuale", "libero professionista"],
                    "sole_trader",
                    3.0,
                ),
                catalog(&["onlus", "associazione", "fondazione", "ente del terzo settore"], "non_profit", 3.0),
                catalog(&["persona fisica", "privato"], "natural_person", 2.0),
            ],
            places: RawPlaces {
                unknown_weight: 1.0,
                entries: [
                    ("Milano", 2.0),
                    ("Roma", 2.0),
                    ("Torino", 1.0),
                    ("Bologna", 1.0),
                    ("Firenze", 1.0),
                    ("Napoli", 3.0),
                    ("Reggio Calabria", 3.0),
                    ("Palermo", 3.0),
                    ("Caserta", 3.0),
                    ("Italia", 1.0),
                    ("Francia", 1.0),
                    ("Germania", 1.0),
                    ("Spagna", 1.0),
                    ("Svizzera", 2.0),
                    ("Regno Unito", 2.0),
                    ("Stati Uniti", 2.0),
                    ("Emirati Arabi Uniti", 3.0),
                    ("Panama", 4.0),
                    ("Isole Cayman", 4.0),
                    ("Iran", 4.0),
                    ("Corea del Nord", 4.0),
                ]
                .into_iter()
                .map(|(name, weight)| RawPlace {
                    name: name.to_string(),
                    weight,
                })
                .collect(),
            },
            amount_bands: RawAmountBands {
                bounds: vec![50_000.0, 250_000.0, 1_000_000.0],
                keys: ["low", "medium", "high", "very_high"].iter().map(|k| k.to_string()).collect(),
            },
            client_only_services: vec!["consulenza continuativa".to_string()],
        }
    }
}

fn table(factor: &str, rows: &[(&str, &str, f64)]) -> RawFactorTable {
    RawFactorTable {
        factor: factor.to_string(),
        entries: rows
            .iter()
            .map(|&(category, description, weight)| RawFactorEntry {
                category: category.to_string(),
                description: description.to_string(),
                weight,
            })
            .collect(),
    }
}

fn catalog(patterns: &[&str], category: &str, weight: f64) -> RawCatalogEntry {
    RawCatalogEntry {
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        tokens: Vec::new(),
        category: category.to_string(),
        weight,
    }
}

impl RawCatalogEntry {
    fn with_tokens(mut self, tokens: &[&str]) -> Self {
        self.tokens = tokens.iter().map(|t| t.to_string()).collect();
        self
    }
}
