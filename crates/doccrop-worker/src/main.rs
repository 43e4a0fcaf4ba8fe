//! Batch audit worker binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use doccrop_worker::{BatchConfig, BatchProcessor};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("doccrop_worker=info".parse().unwrap())
        .add_directive("doccrop_imaging=info".parse().unwrap())
        .add_directive("doccrop_storage=info".parse().unwrap())
        .add_directive("aws_config=warn".parse().unwrap())
        .add_directive("hyper=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting doccrop-worker");

    let config = BatchConfig::from_env();
    info!("Batch config: {:?}", config);

    let processor = match BatchProcessor::new(config).await {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to create batch processor: {}", e);
            std::process::exit(1);
        }
    };

    match processor.run().await {
        Ok(report) => {
            info!(
                "Run complete: {} rows processed, {} failures",
                report.rows.len(),
                report.failures.len()
            );
        }
        Err(e) => {
            error!("Batch run failed: {}", e);
            std::process::exit(1);
        }
    }
}
