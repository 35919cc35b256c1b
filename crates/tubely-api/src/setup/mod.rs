//! Application setup and initialization
//!
//! Everything `main` needs to turn a [`Config`] into a running router, split so
//! tests can assemble the same router around fake collaborators.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::PgVideoRepository;
use tubely_processing::{FfprobeProbe, IngestionPipeline};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated successfully"
    );

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Setup storage
    let stores = storage::setup_storage(&config).await?;

    let pipeline = IngestionPipeline::new(
        stores,
        Arc::new(FfprobeProbe::new(config.ffprobe_path.clone())),
        Arc::new(PgVideoRepository::new(pool)),
        config.staging_dir.clone(),
    );
    let state = Arc::new(AppState::new(config.clone(), pipeline));

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
