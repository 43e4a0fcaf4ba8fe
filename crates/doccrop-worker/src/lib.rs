//! Batch audit worker.
//!
//! This crate provides:
//! - Batch configuration from the environment
//! - Input feed parsing (dedup, truncation)
//! - Source image download
//! - Per-row crop selection and upload
//! - Report assembly and ASCII-safe JSON output

pub mod config;
pub mod download;
pub mod error;
pub mod input;
pub mod processor;
pub mod report;

pub use config::BatchConfig;
pub use error::{WorkerError, WorkerResult};
pub use processor::BatchProcessor;
