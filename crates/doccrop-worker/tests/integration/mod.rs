//! Integration tests for the batch worker.
//!
//! `pipeline_tests` run entirely on local files; `batch_tests` require a
//! live S3 bucket and network access and are ignored by default.

pub mod batch_tests;
pub mod pipeline_tests;
