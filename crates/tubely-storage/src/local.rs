use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncRead;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

/// Removes a partially written file unless disarmed. Runs on error returns
/// and when the owning future is dropped mid-copy.
struct PartialFile {
    path: PathBuf,
    armed: bool,
}

impl PartialFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = std::fs::remove_file(&self.path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Failed to remove partial upload"
                    );
                }
            }
        }
    }
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// The root directory is not touched here; it is created on the first
    /// store if it does not exist yet.
    ///
    /// # Arguments
    /// * `base_path` - Root directory for asset files (e.g., "./assets")
    /// * `base_url` - Base URL the root is served under (e.g., "http://localhost:8091/assets")
    pub fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        LocalStorage {
            base_path: base_path.into(),
            base_url: base_url.into(),
        }
    }

    /// Convert storage key to filesystem path with security validation
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        Ok(self.base_path.join(storage_key))
    }

    /// Ensure parent directory exists (the root itself for flat keys)
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::upload(
                    format!("Failed to create directory {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

fn partial_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store(
        &self,
        storage_key: &str,
        _content_type: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> StorageResult<StoredObject> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        self.ensure_parent_dir(&path).await?;

        let partial_path = partial_path_for(&path);
        let mut partial = PartialFile::new(partial_path.clone());

        let mut file = fs::File::create(&partial_path).await.map_err(|e| {
            StorageError::upload(format!("Failed to create file {}", path.display()), e)
        })?;

        let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
            StorageError::upload(
                format!("Failed to write stream to file {}", path.display()),
                e,
            )
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::upload(format!("Failed to sync file {}", path.display()), e)
        })?;
        drop(file);

        fs::rename(&partial_path, &path).await.map_err(|e| {
            StorageError::upload(
                format!("Failed to move upload into place at {}", path.display()),
                e,
            )
        })?;
        partial.disarm();

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = bytes_copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(StoredObject {
            key: storage_key.to_string(),
            url: self.url_for(storage_key),
            size_bytes: bytes_copied,
        })
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::download(format!("Failed to read file {}", path.display()), e)
        })
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::delete(format!("Failed to delete file {}", path.display()), e)
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn url_for(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
