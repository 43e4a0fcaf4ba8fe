//! Batch processing logic.

use std::sync::Arc;

use reqwest::Client;
use tracing::{info, warn};

use doccrop_imaging::{select_best_crop, MaskCache, CROP_MODELS};
use doccrop_models::{BatchReport, InputRow, ReportRow, RowFailure, RunId};
use doccrop_storage::{S3Client, S3Config};

use crate::config::BatchConfig;
use crate::download;
use crate::error::{WorkerError, WorkerResult};
use crate::input;
use crate::report;

/// Batch processor: owns the storage and HTTP clients and the read-only
/// mask cache shared by every row.
pub struct BatchProcessor {
    config: BatchConfig,
    storage: S3Client,
    http: Client,
    masks: Arc<MaskCache>,
    run_id: RunId,
}

impl BatchProcessor {
    /// Create a processor, loading the mask cache once up front.
    pub async fn new(config: BatchConfig) -> WorkerResult<Self> {
        let storage = S3Client::new(S3Config::new(&config.bucket)).await?;

        let http = Client::builder()
            .timeout(config.download_timeout)
            .build()?;

        let masks_dir = config.masks_dir.clone();
        let masks =
            tokio::task::spawn_blocking(move || MaskCache::load(&masks_dir, CROP_MODELS))
                .await
                .map_err(|e| WorkerError::processing_failed(e.to_string()))??;
        if masks.is_empty() {
            warn!(
                "No reference masks found in {}; every row will fail selection",
                config.masks_dir.display()
            );
        }

        Ok(Self {
            config,
            storage,
            http,
            masks: Arc::new(masks),
            run_id: RunId::new(),
        })
    }

    /// Run the whole batch: read the feed, process each row sequentially,
    /// write the report.
    ///
    /// Row failures are collected into the report; only an unreadable input
    /// feed, an empty feed or an unwritable report fail the run itself.
    pub async fn run(&self) -> WorkerResult<BatchReport> {
        info!(run_id = %self.run_id, "Starting audit run");

        let rows = input::read_rows(
            &self.config.input_path,
            self.config.dedupe_by_uuid,
            self.config.max_rows,
        )
        .await?;
        if rows.is_empty() {
            return Err(WorkerError::invalid_input("No valid rows to process"));
        }

        self.prepare_temp_dir().await?;

        info!(
            "Cleaning s3://{}/{}",
            self.config.bucket, self.config.key_prefix
        );
        if let Err(e) = self.storage.cleanup_prefix(&self.config.key_prefix).await {
            warn!("Could not clean destination prefix: {}", e);
        }

        let mut report_rows = Vec::new();
        let mut failures = Vec::new();

        for row in &rows {
            match self.process_row(row).await {
                Ok(report_row) => report_rows.push(report_row),
                Err(e) => {
                    warn!("Failed {}: {}", row.document_uuid, e);
                    failures.push(RowFailure {
                        document_uuid: row.document_uuid.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let report = BatchReport::new(self.run_id.clone(), report_rows, failures);
        report::write_report(&self.config.output_path, &report).await?;
        println!("{}", report::to_ascii_json_compact(&report)?);

        if !report.failures.is_empty() {
            warn!("Failures: {}", report.failures.len());
            for failure in &report.failures {
                warn!("{} -> {}", failure.document_uuid, failure.error);
            }
        }

        Ok(report)
    }

    /// Create the temp directory and clear files left over from prior runs.
    async fn prepare_temp_dir(&self) -> WorkerResult<()> {
        tokio::fs::create_dir_all(&self.config.temp_dir).await?;

        let mut entries = tokio::fs::read_dir(&self.config.temp_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                tokio::fs::remove_file(entry.path()).await.ok();
            }
        }
        Ok(())
    }

    /// Process one row: download, select the best crop, upload, report.
    async fn process_row(&self, row: &InputRow) -> WorkerResult<ReportRow> {
        let uuid = row.document_uuid.as_str();
        let input_path = self.config.temp_dir.join(format!("{uuid}.jpg"));

        info!("Downloading {}...", row.file_url);
        download::download_image(
            &self.http,
            &row.file_url,
            &input_path,
            &self.config.download_headers,
        )
        .await?;

        let selection = {
            let input_path = input_path.clone();
            let temp_dir = self.config.temp_dir.clone();
            let row_id = uuid.to_string();
            let masks = Arc::clone(&self.masks);
            tokio::task::spawn_blocking(move || {
                select_best_crop(&input_path, &temp_dir, &row_id, CROP_MODELS, &masks)
            })
            .await
            .map_err(|e| WorkerError::processing_failed(e.to_string()))??
        };

        // Move the winner to its final name
        let output_path = self.config.temp_dir.join(format!("{uuid}_cropped.jpg"));
        if selection.crop_path != output_path {
            if output_path.is_file() {
                tokio::fs::remove_file(&output_path).await.ok();
            }
            tokio::fs::rename(&selection.crop_path, &output_path).await?;
        }

        let key = format!("{}{}_cropped.jpg", self.config.key_prefix, uuid);
        self.storage
            .upload_file(&output_path, &key, "image/jpeg")
            .await?;

        let url = if self.config.use_presigned_urls {
            self.storage
                .presign_get(&key, self.config.presign_expiry)
                .await?
        } else {
            self.storage.public_url(&key)
        };
        info!("Uploaded: {}", key);

        Ok(ReportRow::new(
            row.document_uuid.clone(),
            url,
            selection.model_id,
            selection.score,
        ))
    }
}
