//! Feed Server - poultry feed demand prediction service
//!
//! Loads the trained model artifact once at startup and serves single
//! record predictions over HTTP. A missing or corrupt artifact leaves the
//! process permanently unavailable until restart; the trainer must run
//! first to produce the artifact.

use anyhow::Result;
use estimator_lib::{EstimatorMetrics, FeedEstimator, StructuredLogger};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting feed-server");

    // Load configuration
    let config = config::ServerConfig::load()?;
    info!(artifact_path = %config.artifact_path, "Server configured");

    // Initialize metrics and structured logging
    let metrics = EstimatorMetrics::new();
    let logger = StructuredLogger::new("feed-server");
    logger.log_startup(SERVER_VERSION);

    // Load the model once; a failed load latches the service unavailable
    let estimator = Arc::new(FeedEstimator::load(Path::new(&config.artifact_path)));
    match estimator.model_version() {
        Some(version) => {
            metrics.set_model_loaded(true, version);
            logger.log_model_load(&config.artifact_path, true, version);
        }
        None => {
            metrics.set_model_loaded(false, "");
            logger.log_model_load(
                &config.artifact_path,
                false,
                estimator.unavailable_reason().unwrap_or("unknown"),
            );
        }
    }

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(estimator, metrics, logger.clone()));

    // Start the API server
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    api_handle.abort();
    Ok(())
}
