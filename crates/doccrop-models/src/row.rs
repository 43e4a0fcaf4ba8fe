//! Batch input rows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::DocumentId;

/// One row of the batch input feed: a document to download and crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InputRow {
    /// Document identifier, unique within the feed
    pub document_uuid: DocumentId,

    /// Source image URL
    pub file_url: String,
}

impl InputRow {
    pub fn new(document_uuid: impl Into<String>, file_url: impl Into<String>) -> Self {
        Self {
            document_uuid: DocumentId::from_string(document_uuid),
            file_url: file_url.into(),
        }
    }
}
