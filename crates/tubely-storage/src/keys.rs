//! Shared key generation and validation for storage backends.
//!
//! Key format: `{file_name}` for flat assets, `{partition}/{file_name}` for
//! partitioned ones.

use std::path::{Component, Path};

use crate::naming::AssetName;
use crate::traits::{StorageError, StorageResult};

/// Build the storage key for an asset, optionally under a partition prefix.
pub fn asset_key(partition: Option<&str>, name: &AssetName) -> String {
    match partition {
        Some(partition) => format!("{}/{}", partition, name.file_name()),
        None => name.file_name(),
    }
}

/// Reject keys that are empty, absolute, or that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            storage_key
        )));
    }
    if !Path::new(storage_key)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
    {
        return Err(StorageError::InvalidKey(format!(
            "Storage key resolves outside storage directory: {}",
            storage_key
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_key_layout() {
        let name = AssetName::generate("video/mp4");
        assert_eq!(
            asset_key(Some("landscape"), &name),
            format!("landscape/{}.mp4", name.id())
        );
        assert_eq!(asset_key(None, &name), format!("{}.mp4", name.id()));
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("portrait/abc.mp4").is_ok());
        assert!(validate_key("abc.png").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("/etc/passwd").is_err());
        assert!(validate_key("../../etc/passwd").is_err());
        assert!(validate_key("./abc.mp4").is_err());
    }

    #[test]
    fn test_crafted_extension_is_rejected_as_key() {
        let name = AssetName::generate("image/..");
        assert!(validate_key(&asset_key(None, &name)).is_err());
    }
}
