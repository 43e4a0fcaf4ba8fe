//! Output report types.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{DocumentId, DocumentKind};

/// Unique identifier for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    /// Generate a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of one successfully processed row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReportRow {
    /// Document identifier from the input feed
    pub document_uuid: DocumentId,

    /// URL of the uploaded winning crop (presigned or public)
    pub cropped_file_url: String,

    /// Classification derived from the winning model, if any
    pub document_kind: Option<DocumentKind>,

    /// Winning crop model id
    pub best_model: String,

    /// Winning similarity score, rounded to 4 decimal places
    pub ssim_score: f64,
}

impl ReportRow {
    /// Build a row, rounding the score to report precision.
    pub fn new(
        document_uuid: DocumentId,
        cropped_file_url: impl Into<String>,
        best_model: u32,
        score: f64,
    ) -> Self {
        Self {
            document_uuid,
            cropped_file_url: cropped_file_url.into(),
            document_kind: DocumentKind::from_model_id(best_model),
            best_model: best_model.to_string(),
            ssim_score: round_score(score),
        }
    }
}

/// A row that could not be processed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RowFailure {
    /// Document identifier from the input feed
    pub document_uuid: DocumentId,

    /// Human-readable failure reason
    pub error: String,
}

/// Final report of one batch run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchReport {
    /// Unique id of this run
    pub run_id: RunId,

    /// When the report was assembled
    pub generated_at: DateTime<Utc>,

    /// Successfully processed rows
    pub rows: Vec<ReportRow>,

    /// Rows that failed, with reasons
    pub failures: Vec<RowFailure>,
}

impl BatchReport {
    pub fn new(run_id: RunId, rows: Vec<ReportRow>, failures: Vec<RowFailure>) -> Self {
        Self {
            run_id,
            generated_at: Utc::now(),
            rows,
            failures,
        }
    }
}

/// Round a similarity score to the 4 decimal places used in reports.
pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}
