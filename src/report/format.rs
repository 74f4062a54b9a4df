//! Formatted terminal output for assessments, classifications and batches.

use crate::domain::{AssessmentReport, Resolution, Scope, WeightedContribution};
use crate::io::BatchOutcome;
use crate::scoring::Classification;

/// Format one assessment: header, scores, audit trail and review flags.
pub fn format_assessment(report: &AssessmentReport) -> String {
    let result = &report.result;
    let mut out = String::new();

    out.push_str("=== aml - AML Risk Assessment ===\n");
    if let Some(subject) = &report.subject {
        out.push_str(&format!("Subject: {subject}\n"));
    }
    out.push_str(&format!("Date: {}\n", report.assessment_date));
    out.push('\n');

    out.push_str(&format!(
        "Inherent risk (client):    {:<6} score={:.2}\n",
        result.inherent.band, result.inherent.score
    ));
    if result.client_only {
        out.push_str(&format!(
            "Specific risk (operation): {:<6} (client-only service; inherent risk applies)\n",
            result.specific.band
        ));
    } else {
        out.push_str(&format!(
            "Specific risk (operation): {:<6} score={:.2}\n",
            result.specific.band, result.specific.score
        ));
    }
    out.push_str(&format!("Overall risk:              {}\n", result.overall));
    out.push_str(&format!("Due diligence:             {}\n", result.due_diligence.display_name()));
    if result.requires_enhanced_acknowledgement {
        out.push_str("!! Enhanced due diligence must be acknowledged before proceeding.\n");
    }

    for scope in [Scope::Client, Scope::Operation] {
        let rows: Vec<&WeightedContribution> = result.contributions_for(scope).collect();
        if rows.is_empty() {
            continue;
        }
        out.push_str(&format!("\nContributions ({}):\n", scope.display_name()));
        out.push_str(&format_contributions(&rows));
    }

    if !result.review_flags.is_empty() {
        out.push_str("\nReview flags:\n");
        for flag in &result.review_flags {
            out.push_str(&format!("- {} '{}': {}\n", flag.factor, flag.value, flag.reason));
        }
    }

    out
}

fn format_contributions(rows: &[&WeightedContribution]) -> String {
    let mut out = String::new();
    out.push_str(
        format!("{:<18} {:<24} {:<20} {:>7} {:<12}", "factor", "value", "key", "weight", "resolution").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<18} {:-<24} {:-<20} {:->7} {:-<12}", "", "", "", "", "").trim_end());
    out.push('\n');

    for c in rows {
        out.push_str(
            format!(
                "{:<18} {:<24} {:<20} {:>7.2} {:<12}",
                truncate(&c.factor, 18),
                truncate(c.source.as_deref().unwrap_or("-"), 24),
                truncate(&resolved_key(c), 20),
                c.weight,
                resolution_label(&c.resolution),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn resolved_key(c: &WeightedContribution) -> String {
    match (&c.resolution, &c.resolved_key) {
        (
            Resolution::Classified { category }
            | Resolution::ManualCategory { category }
            | Resolution::Unclassified { category },
            _,
        ) => category.clone(),
        (_, Some(key)) => key.clone(),
        _ => String::new(),
    }
}

fn resolution_label(resolution: &Resolution) -> &'static str {
    match resolution {
        Resolution::Lookup => "lookup",
        Resolution::Classified { .. } => "classified",
        Resolution::ManualCategory { .. } => "manual",
        Resolution::Unclassified { .. } => "unclassified",
        Resolution::UnknownValue => "unknown",
        Resolution::Missing => "missing",
    }
}

/// Format the outcome of classifying a legal-form text.
pub fn format_classification(text: &str, classification: &Classification) -> String {
    match classification {
        Classification::Matched {
            category,
            weight,
            pattern,
        } => format!("'{text}' -> {category} (weight {weight:.2}, matched '{pattern}')\n"),
        Classification::Fallback { category, weight } => {
            format!("'{text}' -> {category} (weight {weight:.2}, no catalog entry matched)\n")
        }
    }
}

/// Format the batch summary table, one row per case in input order.
pub fn format_batch_summary(outcomes: &[BatchOutcome]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<28} {:>8} {:<8} {:>8} {:<8} {:<8} {:<10}",
            "subject", "inh.pts", "inherent", "spc.pts", "specific", "overall", "flags"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<28} {:->8} {:-<8} {:->8} {:-<8} {:-<8} {:-<10}", "", "", "", "", "", "", "").trim_end());
    out.push('\n');

    let mut failed = 0usize;
    for (i, outcome) in outcomes.iter().enumerate() {
        let fallback_subject = format!("case #{}", i + 1);
        let subject = truncate(outcome.subject.as_deref().unwrap_or(&fallback_subject), 28);
        let line = match &outcome.result {
            Ok(r) => format!(
                "{:<28} {:>8.2} {:<8} {:>8.2} {:<8} {:<8} {:<10}",
                subject,
                r.inherent.score,
                r.inherent.band.display_name(),
                r.specific.score,
                r.specific.band.display_name(),
                r.overall.display_name(),
                r.review_flags.len(),
            ),
            Err(message) => {
                failed += 1;
                format!("{subject:<28} error: {message}")
            }
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out.push_str(&format!("\nCases: {} | failed: {failed}\n", outcomes.len()));
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
