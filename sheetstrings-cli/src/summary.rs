//! JSON report of an import run.

use std::path::Path;

use serde_json::{Value, json};
use sheetstrings::ImportReport;

/// Builds the JSON document describing `report`.
pub fn report_json(spreadsheet: &Path, root: &Path, dry_run: bool, report: &ImportReport) -> Value {
    let failed: Vec<Value> = report
        .failed
        .iter()
        .map(|failure| {
            json!({
                "resource_name": failure.resource_name,
                "language": failure.language,
                "path": failure.path,
                "error_kind": failure.error.kind(),
                "error": failure.error.to_string(),
            })
        })
        .collect();

    json!({
        "spreadsheet": spreadsheet,
        "resource_root": root,
        "dry_run": dry_run,
        "success": report.is_success(),
        "cancelled": report.cancelled,
        "summary": {
            "succeeded": report.succeeded.len(),
            "failed": report.failed.len(),
            "warnings": report.warnings.len(),
            "created": report.succeeded.iter().map(|o| o.created).sum::<usize>(),
            "updated": report.succeeded.iter().map(|o| o.updated).sum::<usize>(),
        },
        "succeeded": report.succeeded,
        "failed": failed,
        "warnings": report.warnings,
    })
}

/// Writes the JSON report to `path`.
pub fn write_report(
    path: &Path,
    spreadsheet: &Path,
    root: &Path,
    dry_run: bool,
    report: &ImportReport,
) -> Result<(), String> {
    let payload = report_json(spreadsheet, root, dry_run, report);
    let text = serde_json::to_string_pretty(&payload)
        .map_err(|e| format!("Failed to serialize report JSON: {}", e))?;
    std::fs::write(path, text)
        .map_err(|e| format!("Failed to write report JSON '{}': {}", path.display(), e))
}
