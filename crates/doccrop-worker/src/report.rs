//! Report assembly and ASCII-safe JSON output.

use std::path::Path;

use tracing::info;

use doccrop_models::BatchReport;

use crate::error::WorkerResult;

/// Serialize a report as pretty-printed, ASCII-safe JSON.
pub fn to_ascii_json(report: &BatchReport) -> WorkerResult<String> {
    Ok(escape_non_ascii(&serde_json::to_string_pretty(report)?))
}

/// Serialize a report as compact, ASCII-safe JSON (one line, for stdout).
pub fn to_ascii_json_compact(report: &BatchReport) -> WorkerResult<String> {
    Ok(escape_non_ascii(&serde_json::to_string(report)?))
}

/// Write the report file.
pub async fn write_report(path: &Path, report: &BatchReport) -> WorkerResult<()> {
    let json = to_ascii_json(report)?;
    tokio::fs::write(path, json).await?;
    info!(
        "Wrote report with {} rows and {} failures to {}",
        report.rows.len(),
        report.failures.len(),
        path.display()
    );
    Ok(())
}

/// Escape every non-ASCII character in a JSON document as `\uXXXX`,
/// using surrogate pairs for characters outside the BMP. The input is
/// already valid JSON, so this never needs to touch quoting.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut units = [0u16; 2];
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use doccrop_models::{DocumentId, ReportRow, RowFailure, RunId};

    fn sample_report() -> BatchReport {
        BatchReport::new(
            RunId::new(),
            vec![ReportRow::new(
                DocumentId::from_string("doc-1"),
                "https://bucket.s3.amazonaws.com/audit/doc-1_cropped.jpg",
                2,
                0.912_345,
            )],
            vec![RowFailure {
                document_uuid: DocumentId::from_string("doc-2"),
                error: "Download failed: não encontrado 🚫".to_string(),
            }],
        )
    }

    #[test]
    fn test_escape_non_ascii() {
        assert_eq!(escape_non_ascii(r#"{"plain": 1}"#), r#"{"plain": 1}"#);
        assert_eq!(escape_non_ascii("\"João\""), "\"Jo\\u00e3o\"");
        // Outside the BMP: one char, two UTF-16 units
        assert_eq!(escape_non_ascii("\"🚫\""), "\"\\ud83d\\udeab\"");
    }

    #[test]
    fn test_report_json_is_pure_ascii_and_still_parses() {
        let report = sample_report();
        let json = to_ascii_json(&report).unwrap();
        assert!(json.is_ascii());

        let parsed: BatchReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.failures[0].error, "Download failed: não encontrado 🚫");
        assert_eq!(parsed.rows[0].ssim_score, 0.9123);
        assert_eq!(parsed.rows[0].best_model, "2");
    }

    #[test]
    fn test_compact_output_is_single_line() {
        let report = sample_report();
        let json = to_ascii_json_compact(&report).unwrap();
        assert!(json.is_ascii());
        assert!(!json.contains('\n'));
    }

    #[tokio::test]
    async fn test_write_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        let report = sample_report();

        write_report(&path, &report).await.unwrap();

        let data = std::fs::read_to_string(&path).unwrap();
        assert!(data.is_ascii());
        let parsed: BatchReport = serde_json::from_str(&data).unwrap();
        assert_eq!(parsed.run_id, report.run_id);
        assert_eq!(parsed.rows.len(), 1);
    }
}
