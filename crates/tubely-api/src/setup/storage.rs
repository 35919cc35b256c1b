//! Storage setup

use anyhow::{Context, Result};
use tubely_core::Config;
use tubely_storage::{create_storages, AssetStores};

/// Build both asset backends and make sure the local ones have somewhere to write.
pub async fn setup_storage(config: &Config) -> Result<AssetStores> {
    tokio::fs::create_dir_all(&config.staging_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create staging directory {}",
                config.staging_dir.display()
            )
        })?;

    let stores = create_storages(config).context("Failed to configure storage backends")?;

    tracing::info!(
        staging_dir = %config.staging_dir.display(),
        "Storage initialized"
    );
    Ok(stores)
}
