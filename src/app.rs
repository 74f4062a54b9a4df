//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments
//! - loads the scoring configuration
//! - runs assessments and prints reports
//! - writes optional exports

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{AssessArgs, BatchArgs, ClassifyArgs, Command};
use crate::config::RawConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `aml` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Assess(args) => handle_assess(args),
        Command::Batch(args) => handle_batch(args),
        Command::Classify(args) => handle_classify(args),
        Command::Defaults => handle_defaults(),
    }
}

/// Logs go to stderr so stdout stays clean for reports and JSON.
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aml_risk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn handle_assess(args: AssessArgs) -> Result<(), AppError> {
    let config = Arc::new(crate::io::load_config(args.config.config.as_deref())?);
    let case = crate::io::read_case_json(&args.case)?;

    let result = pipeline::run_assessment(&case, config)?;
    let date = args.date.unwrap_or_else(|| chrono::Local::now().date_naive());
    let report = crate::io::build_report(case.subject, date, result);

    println!("{}", crate::report::format_assessment(&report));

    if let Some(path) = &args.export {
        crate::io::write_report_json(path, &report)?;
    }

    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), AppError> {
    let config = Arc::new(crate::io::load_config(args.config.config.as_deref())?);
    let cases = crate::io::read_cases_json(&args.cases)?;

    let outcomes = pipeline::run_batch(&cases, config);
    println!("{}", crate::report::format_batch_summary(&outcomes));

    if let Some(path) = &args.export_csv {
        crate::io::write_batch_csv(path, &outcomes)?;
    }

    Ok(())
}

fn handle_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let config = crate::io::load_config(args.config.config.as_deref())?;
    let classification = config.classifier().classify(&args.text);
    print!("{}", crate::report::format_classification(&args.text, &classification));
    Ok(())
}

fn handle_defaults() -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(&RawConfig::default_methodology())
        .map_err(|e| AppError::new(4, format!("Failed to serialize default methodology: {e}")))?;
    println!("{json}");
    Ok(())
}
