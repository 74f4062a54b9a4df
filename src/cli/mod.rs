//! Command-line parsing for the AML risk assessor.
//!
//! Argument parsing and command dispatch stay separate from the scoring code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "aml", version, about = "AML risk profiling: inherent x specific risk")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Assess one client/operation case and print the audit trail.
    Assess(AssessArgs),
    /// Assess every case in a JSON array and print a summary table.
    Batch(BatchArgs),
    /// Show how a legal-form text is classified.
    Classify(ClassifyArgs),
    /// Print the built-in methodology as configuration JSON.
    Defaults,
}

/// Configuration source shared by every scoring command.
#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    /// Scoring configuration JSON (overrides AML_CONFIG; defaults to the built-in methodology).
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct AssessArgs {
    /// Case JSON: `{"subject": ..., "client": {...}, "operation": {...}}`.
    #[arg(long, value_name = "JSON")]
    pub case: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Assessment date recorded in the report (YYYY-MM-DD; defaults to today).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Export the assessment to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// JSON array of cases.
    #[arg(long, value_name = "JSON")]
    pub cases: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Export one summary row per case to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Free-text legal form, e.g. "S.r.l. semplificata".
    pub text: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}
