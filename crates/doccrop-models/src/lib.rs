//! Shared data models for the DocCrop audit backend.
//!
//! This crate provides Serde-serializable types for:
//! - Document identifiers and classification kinds
//! - Batch input rows
//! - The output report (per-row results and failures)

pub mod document;
pub mod report;
pub mod row;

// Re-export common types
pub use document::{DocumentId, DocumentKind, DocumentKindParseError};
pub use report::{BatchReport, ReportRow, RowFailure, RunId};
pub use row::InputRow;
