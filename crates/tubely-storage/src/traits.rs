//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Boxed underlying cause carried by the I/O-facing variants
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {message}")]
    UploadFailed {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Download failed: {message}")]
    DownloadFailed {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Delete failed: {message}")]
    DeleteFailed {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {message}")]
    BackendError {
        message: String,
        #[source]
        source: BoxError,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    pub fn upload(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StorageError::UploadFailed {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn download(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StorageError::DownloadFailed {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn delete(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StorageError::DeleteFailed {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn backend(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        StorageError::BackendError {
            message: message.into(),
            source: source.into(),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A completely written asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Backend-relative key (path under the assets root, or object key)
    pub key: String,
    /// Public URL the asset can be retrieved from
    pub url: String,
    pub size_bytes: u64,
}

/// Storage abstraction trait
///
/// Both backends (local filesystem, S3) implement this trait so the ingestion
/// pipeline never branches on where bytes end up.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Stream `reader` to `storage_key` until EOF.
    ///
    /// Implementations copy through bounded buffers and never hold the whole
    /// payload in memory. On error nothing is left visible under `storage_key`.
    async fn store(
        &self,
        storage_key: &str,
        content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<StoredObject>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a file by its storage key. Deleting a missing key succeeds.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Public URL for a key, whether or not it has been written yet
    fn url_for(&self, storage_key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
