//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The moderation workflow only talks to the bucket through this trait, so the
/// services crate never depends on a specific backend. Keys are bucket-relative
/// object paths exactly as they appear in upload notifications.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Download an object into memory
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Download an object into a local file, overwriting it. Returns bytes written.
    ///
    /// The parent directory of `destination` must already exist.
    async fn download_to_file(&self, storage_key: &str, destination: &Path) -> StorageResult<u64>;

    /// Upload data to a specific storage key. Returns the object URL.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Upload a local file to a specific storage key. Returns the object URL.
    async fn upload_file(
        &self,
        source: &Path,
        storage_key: &str,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Delete an object by its storage key
    ///
    /// Deleting an object that does not exist is an error (`NotFound`).
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Generate a time-limited read URL (GET)
    async fn get_presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
