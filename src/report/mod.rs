//! Terminal reporting.
//!
//! Formatting code lives in one place so the scoring code stays free of
//! presentation concerns and output changes stay localized.

pub mod format;

pub use format::*;
