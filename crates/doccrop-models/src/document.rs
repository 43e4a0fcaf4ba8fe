//! Document identifiers and classification kinds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a document, as supplied by the input feed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Brazilian identity document kinds recognized by the crop pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DocumentKind {
    /// Driver's license (digital or printed layout)
    #[serde(rename = "CNH")]
    Cnh,
    /// National identity card
    #[serde(rename = "CIN")]
    Cin,
    /// Legacy general registry card
    #[serde(rename = "RG")]
    Rg,
}

impl DocumentKind {
    /// Map a winning crop-model id to a document kind.
    ///
    /// Models 1-5 are CNH layout variants, model 6 is CIN, model 7 is RG.
    /// Any other id has no classification; extend this table deliberately
    /// when a new model is added.
    pub fn from_model_id(model_id: u32) -> Option<Self> {
        match model_id {
            1..=5 => Some(DocumentKind::Cnh),
            6 => Some(DocumentKind::Cin),
            7 => Some(DocumentKind::Rg),
            _ => None,
        }
    }

    /// Returns the kind name as used on the wire and in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Cnh => "CNH",
            DocumentKind::Cin => "CIN",
            DocumentKind::Rg => "RG",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = DocumentKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CNH" => Ok(DocumentKind::Cnh),
            "CIN" => Ok(DocumentKind::Cin),
            "RG" => Ok(DocumentKind::Rg),
            _ => Err(DocumentKindParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown document kind: {0}")]
pub struct DocumentKindParseError(String);
