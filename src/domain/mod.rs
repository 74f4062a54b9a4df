//! Domain types used throughout the scoring pipeline.
//!
//! This module defines:
//!
//! - risk bands, scopes and due-diligence regimes
//! - client/operation profiles (`ClientProfile`, `OperationProfile`)
//! - scoring outputs (`WeightedContribution`, `RiskAssessmentResult`)

pub mod types;

pub use types::*;
