//! Input/output helpers.
//!
//! - configuration JSON loading (`config`)
//! - assessment case JSON reading (`case`)
//! - result exports (JSON/CSV) (`export`)

pub mod case;
pub mod config;
pub mod export;

pub use case::*;
pub use config::*;
pub use export::*;
