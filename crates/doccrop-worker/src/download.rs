//! Source image download.

use std::collections::HashMap;
use std::path::Path;

use reqwest::Client;
use tracing::debug;

use crate::error::{WorkerError, WorkerResult};

/// Download a source image to a local file.
///
/// Any non-success status is a failure; the body is written as-is and
/// decoding is left to the imaging layer.
pub async fn download_image(
    client: &Client,
    url: &str,
    dest: &Path,
    headers: &HashMap<String, String>,
) -> WorkerResult<()> {
    debug!("Downloading {} to {}", url, dest.display());

    let mut request = client.get(url);
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request
        .send()
        .await
        .map_err(|e| WorkerError::download_failed(format!("{}: {}", url, e)))?
        .error_for_status()
        .map_err(|e| WorkerError::download_failed(format!("{}: {}", url, e)))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| WorkerError::download_failed(format!("{}: {}", url, e)))?;

    tokio::fs::write(dest, &bytes).await?;
    Ok(())
}
