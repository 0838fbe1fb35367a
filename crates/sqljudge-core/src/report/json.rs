use crate::fingerprint::Fingerprint;
use crate::model::RunSummary;
use serde_json::json;
use std::path::Path;

pub const REPORT_SCHEMA_VERSION: u32 = 1;

pub fn build_report(summary: &RunSummary, fingerprint: &Fingerprint) -> serde_json::Value {
    let cases: Vec<serde_json::Value> = summary
        .outcomes
        .iter()
        .map(|o| {
            json!({
                "name": o.name,
                "status": o.status,
                "duration_ms": o.duration_ms,
                "message": o.message(),
                "failure": o.failure,
            })
        })
        .collect();

    json!({
        "schema_version": REPORT_SCHEMA_VERSION,
        "success": summary.success(),
        "suite_sha256": fingerprint.suite_sha256,
        "solution_sha256": fingerprint.solution_sha256,
        "passed": summary.passed(),
        "failed": summary.failed(),
        "execution_time_ms": summary.outcomes.iter().map(|o| o.duration_ms).sum::<u64>(),
        "cases": cases,
    })
}

pub fn write_json(
    summary: &RunSummary,
    fingerprint: &Fingerprint,
    out: &Path,
) -> anyhow::Result<()> {
    let report = build_report(summary, fingerprint);
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
