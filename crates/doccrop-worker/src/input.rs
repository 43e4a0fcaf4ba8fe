//! Input feed parsing.
//!
//! The feed is a JSON array of `{document_uuid, file_url}` objects (a single
//! object is also accepted). Rows missing either field are dropped, values
//! are trimmed, duplicates are removed by uuid keeping the first occurrence,
//! and the result is truncated to the configured row limit.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use doccrop_models::InputRow;

use crate::error::{WorkerError, WorkerResult};

/// Parse the input feed from a JSON string.
pub fn parse_rows(data: &str, dedupe: bool, max_rows: usize) -> WorkerResult<Vec<InputRow>> {
    let value: Value = serde_json::from_str(data)?;

    let items: Vec<&Value> = match &value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![&value],
        _ => {
            return Err(WorkerError::invalid_input(
                "JSON must be an array of objects or a single object",
            ))
        }
    };

    let mut rows = Vec::new();
    for item in items {
        let document_uuid = item
            .get("document_uuid")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim();
        let file_url = item
            .get("file_url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim();
        if document_uuid.is_empty() || file_url.is_empty() {
            continue;
        }
        rows.push(InputRow::new(document_uuid, file_url));
    }

    if dedupe {
        let mut seen = std::collections::HashSet::new();
        rows.retain(|row| seen.insert(row.document_uuid.clone()));
    }

    rows.truncate(max_rows);
    debug!("Parsed {} input rows", rows.len());
    Ok(rows)
}

/// Read and parse the input feed from a file.
pub async fn read_rows(path: &Path, dedupe: bool, max_rows: usize) -> WorkerResult<Vec<InputRow>> {
    let data = tokio::fs::read_to_string(path).await.map_err(|e| {
        WorkerError::invalid_input(format!("Could not read {}: {}", path.display(), e))
    })?;
    parse_rows(&data, dedupe, max_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_array_of_objects() {
        let rows = parse_rows(
            r#"[
                {"document_uuid": "a", "file_url": "https://img/a.jpg"},
                {"document_uuid": "b", "file_url": "https://img/b.jpg"}
            ]"#,
            true,
            50,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].document_uuid.as_str(), "a");
        assert_eq!(rows[1].file_url, "https://img/b.jpg");
    }

    #[test]
    fn test_parses_single_object() {
        let rows = parse_rows(
            r#"{"document_uuid": "a", "file_url": "https://img/a.jpg"}"#,
            true,
            50,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_rejects_scalar_json() {
        let err = parse_rows("42", true, 50).unwrap_err();
        assert!(matches!(err, WorkerError::InvalidInput(_)));
    }

    #[test]
    fn test_trims_and_skips_incomplete_rows() {
        let rows = parse_rows(
            r#"[
                {"document_uuid": "  a  ", "file_url": " https://img/a.jpg "},
                {"document_uuid": "", "file_url": "https://img/x.jpg"},
                {"document_uuid": "c"},
                {"file_url": "https://img/y.jpg"},
                {"document_uuid": "   ", "file_url": "https://img/z.jpg"}
            ]"#,
            true,
            50,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].document_uuid.as_str(), "a");
        assert_eq!(rows[0].file_url, "https://img/a.jpg");
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let data = r#"[
            {"document_uuid": "a", "file_url": "https://img/first.jpg"},
            {"document_uuid": "a", "file_url": "https://img/second.jpg"},
            {"document_uuid": "b", "file_url": "https://img/b.jpg"}
        ]"#;

        let rows = parse_rows(data, true, 50).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].file_url, "https://img/first.jpg");

        let rows = parse_rows(data, false, 50).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_truncates_to_max_rows() {
        let items: Vec<String> = (0..60)
            .map(|i| format!(r#"{{"document_uuid": "doc-{i}", "file_url": "https://img/{i}.jpg"}}"#))
            .collect();
        let data = format!("[{}]", items.join(","));

        let rows = parse_rows(&data, true, 50).unwrap();
        assert_eq!(rows.len(), 50);
        assert_eq!(rows[49].document_uuid.as_str(), "doc-49");
    }
}
