//! Batch worker configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Batch worker configuration.
///
/// Everything is explicit here; nothing in the pipeline reads globals.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Destination S3 bucket
    pub bucket: String,
    /// Key prefix for uploaded crops (cleaned at startup)
    pub key_prefix: String,
    /// Path of the input JSON feed
    pub input_path: PathBuf,
    /// Path of the output report
    pub output_path: PathBuf,
    /// Directory for downloaded sources and candidate crops
    pub temp_dir: PathBuf,
    /// Directory holding mask_<id>.jpg reference images
    pub masks_dir: PathBuf,
    /// Maximum rows processed per run
    pub max_rows: usize,
    /// Deduplicate input rows by document uuid (first occurrence wins)
    pub dedupe_by_uuid: bool,
    /// Emit presigned GET URLs instead of public bucket URLs
    pub use_presigned_urls: bool,
    /// Presigned URL validity
    pub presign_expiry: Duration,
    /// Timeout for each source image download
    pub download_timeout: Duration,
    /// Extra headers sent with every download request
    pub download_headers: HashMap<String, String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            bucket: "doccrop-audit-prod".to_string(),
            key_prefix: "audit/".to_string(),
            input_path: PathBuf::from("input.json"),
            output_path: PathBuf::from("output.json"),
            temp_dir: PathBuf::from("temp"),
            masks_dir: PathBuf::from("masks"),
            max_rows: 50,
            dedupe_by_uuid: true,
            use_presigned_urls: true,
            presign_expiry: Duration::from_secs(3600),
            download_timeout: Duration::from_secs(30),
            download_headers: HashMap::new(),
        }
    }
}

impl BatchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bucket: std::env::var("DOCCROP_BUCKET").unwrap_or(defaults.bucket),
            key_prefix: std::env::var("DOCCROP_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            input_path: std::env::var("DOCCROP_INPUT_JSON")
                .map(PathBuf::from)
                .unwrap_or(defaults.input_path),
            output_path: std::env::var("DOCCROP_OUTPUT_JSON")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            temp_dir: std::env::var("DOCCROP_TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_dir),
            masks_dir: std::env::var("DOCCROP_MASKS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.masks_dir),
            max_rows: std::env::var("DOCCROP_MAX_ROWS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_rows),
            dedupe_by_uuid: std::env::var("DOCCROP_DEDUPE_BY_UUID")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.dedupe_by_uuid),
            use_presigned_urls: std::env::var("DOCCROP_PRESIGNED_URLS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.use_presigned_urls),
            presign_expiry: Duration::from_secs(
                std::env::var("DOCCROP_PRESIGN_EXPIRY_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
            download_timeout: Duration::from_secs(
                std::env::var("DOCCROP_DOWNLOAD_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            download_headers: std::env::var("DOCCROP_DOWNLOAD_HEADERS")
                .map(|s| parse_header_list(&s))
                .unwrap_or(defaults.download_headers),
        }
    }
}

/// Parse a `Name: value; Other: value` header list.
fn parse_header_list(raw: &str) -> HashMap<String, String> {
    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}
