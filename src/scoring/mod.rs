//! Risk scoring building blocks.
//!
//! Responsibilities:
//!
//! - factor/place/amount lookup tables (`table`)
//! - legal-form classification (`classifier`)
//! - profile attributes -> weighted contributions (`evaluator`)
//! - contributions -> score -> band (`aggregator`)
//! - inherent x specific -> overall band (`combiner`)

pub mod aggregator;
pub mod classifier;
pub mod combiner;
pub mod evaluator;
pub mod table;

pub use aggregator::*;
pub use classifier::*;
pub use combiner::*;
pub use evaluator::*;
pub use table::*;
