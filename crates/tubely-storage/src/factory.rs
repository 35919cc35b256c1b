use crate::{LocalStorage, S3Config, S3Storage, Storage, StorageBackend, StorageResult};
use std::sync::Arc;
use tubely_core::{AssetKind, Config};

/// Both configured backends. Each asset kind is routed to exactly one of them.
#[derive(Clone)]
pub struct AssetStores {
    pub local: Arc<dyn Storage>,
    pub s3: Arc<dyn Storage>,
}

impl AssetStores {
    pub fn new(local: Arc<dyn Storage>, s3: Arc<dyn Storage>) -> Self {
        Self { local, s3 }
    }

    pub fn for_backend(&self, backend: StorageBackend) -> &Arc<dyn Storage> {
        match backend {
            StorageBackend::Local => &self.local,
            StorageBackend::S3 => &self.s3,
        }
    }

    /// Thumbnails go to local disk, videos to the bucket.
    pub fn for_kind(&self, kind: AssetKind) -> &Arc<dyn Storage> {
        self.for_backend(kind.backend())
    }
}

/// Create both storage backends from configuration
pub fn create_storages(config: &Config) -> StorageResult<AssetStores> {
    let local = LocalStorage::new(config.assets_root.clone(), config.assets_base_url());

    let s3 = S3Storage::new(S3Config {
        bucket: config.s3_bucket.clone(),
        region: config.s3_region.clone(),
        endpoint: config.s3_endpoint.clone(),
    })?;

    tracing::info!(
        assets_root = %config.assets_root.display(),
        bucket = %config.s3_bucket,
        region = %config.s3_region,
        "Storage backends configured"
    );

    Ok(AssetStores::new(Arc::new(local), Arc::new(s3)))
}
