//! Text normalization shared by table lookups and the legal-form classifier.

pub mod normalize;

pub use normalize::*;
