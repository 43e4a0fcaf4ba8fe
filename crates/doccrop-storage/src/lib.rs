//! S3 storage client for crop artifacts.
//!
//! This crate provides:
//! - File upload with content type
//! - Presigned and public URL generation
//! - Prefix listing and batched cleanup

pub mod client;
pub mod error;

pub use client::{ObjectInfo, S3Client, S3Config};
pub use error::{StorageError, StorageResult};
