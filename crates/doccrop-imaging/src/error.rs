//! Error types for imaging operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for imaging operations.
pub type ImagingResult<T> = Result<T, ImagingError>;

/// Errors that can occur while cropping, scoring or selecting.
#[derive(Debug, Error)]
pub enum ImagingError {
    #[error("Could not read image: {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "Invalid crop bounds for model {model_id}: x [{x_min}, {x_max}), y [{y_min}, {y_max})"
    )]
    InvalidGeometry {
        model_id: u32,
        x_min: u32,
        x_max: u32,
        y_min: u32,
        y_max: u32,
    },

    #[error("No reference mask for model {0}")]
    MissingMask(u32),

    #[error("Image sizes differ and resizing is disabled: {a_width}x{a_height} vs {b_width}x{b_height}")]
    DimensionMismatch {
        a_width: u32,
        a_height: u32,
        b_width: u32,
        b_height: u32,
    },

    #[error("No crop model produced a valid result")]
    NoValidCrop,

    #[error("Failed to write crop: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImagingError {
    /// Create a decode error for a path.
    pub fn decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for a path.
    pub fn write(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
