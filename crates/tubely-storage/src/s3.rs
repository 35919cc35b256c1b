use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, AttributeValue, Attributes, ObjectStoreExt, Result as ObjectResult};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Bytes buffered in memory before the upload switches to multipart.
const DEFAULT_BUFFER_CAPACITY: usize = 10 * 1024 * 1024;

/// Connection settings for the remote bucket.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, LocalStack, ...)
    pub endpoint: Option<String>,
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn object_store::ObjectStore>,
    config: S3Config,
    buffer_capacity: usize,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// Credentials come from the environment (`AWS_ACCESS_KEY_ID`,
    /// `AWS_SECRET_ACCESS_KEY`, ...). No request is made until the first
    /// operation.
    pub fn new(config: S3Config) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(config.region.clone())
            .with_bucket_name(config.bucket.clone());

        if let Some(ref endpoint) = config.endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::with_store(Arc::new(store), config))
    }

    /// Wrap an already built object store. URLs are still rendered from
    /// `config`, so an in-memory store behaves like the real bucket.
    pub fn with_store(store: Arc<dyn object_store::ObjectStore>, config: S3Config) -> Self {
        S3Storage {
            store,
            config,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }

    pub fn with_buffer_capacity(mut self, bytes: usize) -> Self {
        self.buffer_capacity = bytes.max(1);
        self
    }

    /// Generate public URL for S3 object
    ///
    /// For AWS S3, uses the virtual-hosted format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path style under the endpoint.
    fn generate_url(&self, key: &str) -> String {
        match self.config.endpoint {
            Some(ref endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.config.bucket,
                key
            ),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.config.bucket, self.config.region, key
            ),
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn store(
        &self,
        storage_key: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<StoredObject> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );

        let mut writer =
            BufWriter::with_capacity(Arc::clone(&self.store), location, self.buffer_capacity)
                .with_attributes(attributes);

        let copied = async {
            let size = tokio::io::copy(reader, &mut writer).await?;
            writer.shutdown().await?;
            Ok::<u64, std::io::Error>(size)
        }
        .await;

        let size = match copied {
            Ok(size) => size,
            Err(e) => {
                // Drop any parts already sent so no partial object remains.
                let abort: ObjectResult<()> = writer.abort().await;
                if let Err(abort_err) = abort {
                    tracing::warn!(
                        error = %abort_err,
                        bucket = %self.config.bucket,
                        key = %storage_key,
                        "Failed to abort S3 multipart upload"
                    );
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.config.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream upload failed"
                );
                return Err(StorageError::upload(
                    format!("Failed to stream {} to bucket {}", storage_key, self.config.bucket),
                    e,
                ));
            }
        };

        tracing::info!(
            bucket = %self.config.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream upload successful"
        );

        Ok(StoredObject {
            key: storage_key.to_string(),
            url: self.generate_url(storage_key),
            size_bytes: size,
        })
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(storage_key.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.config.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                StorageError::download(format!("Failed to fetch {}", storage_key), other)
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| {
                StorageError::download(format!("Failed to read body of {}", storage_key), e)
            })?;

        tracing::debug!(
            bucket = %self.config.bucket,
            key = %storage_key,
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(bytes.to_vec())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;
        let start = std::time::Instant::now();
        let location = Path::from(storage_key.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.config.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::delete(format!("Failed to delete {}", storage_key), e));
            }
        }

        tracing::info!(
            bucket = %self.config.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        let location = Path::from(storage_key.to_string());
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::backend(format!("Failed to stat {}", storage_key), e)),
        }
    }

    fn url_for(&self, storage_key: &str) -> String {
        self.generate_url(storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
