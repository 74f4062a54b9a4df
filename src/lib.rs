//! `aml-risk` library crate.
//!
//! Assigns an anti-money-laundering risk classification to a client and a
//! professional engagement: inherent (client) risk x specific (operation) risk
//! -> overall risk, with a full audit trail of every factor that contributed.
//!
//! The binary (`aml`) is a thin wrapper around this library so that:
//!
//! - the scoring core is testable without spawning processes
//! - configuration loading, reporting and exports stay outside the core

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod report;
pub mod scoring;
pub mod text;
