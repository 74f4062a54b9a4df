//! Assessment orchestration.
//!
//! Profiles + configuration snapshot -> `RiskAssessmentResult`.

pub mod assess;

pub use assess::*;
