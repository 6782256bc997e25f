//! Storage abstraction trait
//!
//! This module defines the `ObjectStorage` trait that all storage
//! backends must implement.

use async_trait::async_trait;
use gridlens_core::StorageBackend;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("URL signing failed: {0}")]
    SigningFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// The upload pipeline depends on this trait rather than a concrete
/// client, so tests can run against a double and deployments can pick
/// S3 or local filesystem from configuration.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Prepare the backing container. Idempotent; invoked once during
    /// application setup so a misconfigured backend fails at startup
    /// rather than on the first upload.
    async fn ensure_container(&self) -> StorageResult<()>;

    /// Upload bytes under the key, attaching the content type and the
    /// metadata pairs in the same durable write.
    ///
    /// Returns the object's public (unsigned) URL.
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        metadata: &[(&'static str, String)],
        data: Vec<u8>,
    ) -> StorageResult<String>;

    /// Generate a time-bounded read URL for an uploaded object.
    async fn signed_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
