use serde_json::json;
use sqljudge_core::config::load_suite;
use sqljudge_core::validate::{codes, validate, Diagnostic, Severity, ValidateReport};

use super::exit_codes;
use crate::cli::args::{OutputFormat, ValidateArgs};

pub fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    let suite_path = args.workspace.suite_path();

    // 1. Load Suite
    let suite = match load_suite(&suite_path) {
        Ok(s) => s,
        Err(e) => {
            // Nothing else can be checked without a parsed suite.
            let diag = Diagnostic::error(codes::E_SUITE_PARSE, e.to_string());
            print_report(
                &ValidateReport {
                    diagnostics: vec![diag],
                },
                args.format,
            )?;
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };

    // 2. Apply schema and seeds
    let report = validate(&suite);
    print_report(&report, args.format)?;

    // Any error severity -> 2. Warnings only -> 0.
    if report.has_errors() {
        Ok(exit_codes::CONFIG_ERROR)
    } else {
        Ok(exit_codes::OK)
    }
}

fn print_report(report: &ValidateReport, format: OutputFormat) -> anyhow::Result<()> {
    let errors: Vec<&Diagnostic> = report
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .collect();
    let warnings: Vec<&Diagnostic> = report
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warn)
        .collect();

    if format == OutputFormat::Json {
        let output = json!({
            "schema_version": 1,
            "ok": errors.is_empty(),
            "errors": errors,
            "warnings": warnings,
            "summary": {
                "diagnostic_count": report.diagnostics.len()
            }
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !errors.is_empty() {
        eprintln!(
            "✖ Validation failed ({} error{}, {} warning{})",
            errors.len(),
            if errors.len() != 1 { "s" } else { "" },
            warnings.len(),
            if warnings.len() != 1 { "s" } else { "" }
        );
    } else if !warnings.is_empty() {
        eprintln!(
            "⚠️  Validation passed with warnings ({} warning{})",
            warnings.len(),
            if warnings.len() != 1 { "s" } else { "" }
        );
    } else {
        eprintln!("✔ Validation OK");
    }

    for d in &report.diagnostics {
        eprintln!("{}", d.format_terminal());
    }
    Ok(())
}
