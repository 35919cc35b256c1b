//! Tubely Storage Library
//!
//! Asset naming, the [`Storage`] trait and its two backends: the local
//! filesystem (thumbnails, served by the API under `/assets`) and an
//! S3-compatible object store (videos).
//!
//! # Storage key format
//!
//! - **Thumbnails**: `{asset_id}{extension}` at the root of the assets directory
//! - **Videos**: `{partition}/{asset_id}{extension}` where the partition is
//!   `landscape`, `portrait` or `other`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in
//! the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
pub mod local;
pub mod naming;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{create_storages, AssetStores};
pub use local::LocalStorage;
pub use naming::AssetName;
pub use s3::{S3Config, S3Storage};
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
pub use tubely_core::StorageBackend;
