//! The `check` command.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use vetter_core::{MessageTemplates, Report, Validator};

use crate::args::OutputFormat;
use crate::input::{load_data, load_rules};

/// Exit code when every rule passed.
pub const EXIT_VALID: i32 = 0;
/// Exit code when at least one rule failed.
pub const EXIT_INVALID: i32 = 1;

/// Validate `data` against `rules` and print the outcome.
///
/// Returns the process exit code. Any error is a setup problem (unreadable
/// file, unknown rule), never a failed rule.
pub fn run_check(
    data: &Path,
    rules: &Path,
    templates: Option<&Path>,
    format: OutputFormat,
) -> Result<i32> {
    let data = load_data(data)?;
    let groups = load_rules(rules)?;

    let builtin = MessageTemplates::builtin()?;
    let templates = match templates {
        Some(path) => {
            let overrides = MessageTemplates::from_yaml_file(path)
                .with_context(|| format!("Failed to load templates {}", path.display()))?;
            Arc::new(builtin.merged_with(&overrides))
        }
        None => builtin,
    };

    let mut validator = Validator::with_templates(data, &groups, templates)?;
    let valid = validator.validate();
    tracing::info!(valid, failed_fields = validator.fails().len(), "Validation finished");

    let report = validator.report();
    match format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(if valid { EXIT_VALID } else { EXIT_INVALID })
}

fn print_text(report: &Report) {
    if report.valid {
        println!("OK: all rules passed");
        return;
    }

    for (field, failures) in &report.messages {
        for (rule, message) in failures {
            println!("{field} [{rule}]: {message}");
        }
    }
    println!("FAILED: {} field(s) invalid", report.fails.len());
}
