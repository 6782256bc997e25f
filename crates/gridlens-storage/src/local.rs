use crate::traits::{ObjectStorage, StorageError, StorageResult};
use async_trait::async_trait;
use gridlens_core::StorageBackend;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Object attributes (content type, capture metadata) are persisted in
/// a `{key}.meta.json` sidecar so the filesystem backend carries the
/// same metadata view as S3 object attributes.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/gridlens/images")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/images")
    pub fn new(base_path: impl Into<PathBuf>, base_url: String) -> Self {
        LocalStorage {
            base_path: base_path.into(),
            base_url,
        }
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys containing path traversal sequences that could
    /// escape the base storage directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// Generate public URL for file
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let mut file = fs::File::create(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for LocalStorage {
    /// Create the storage directory if absent. Idempotent.
    async fn ensure_container(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.base_path.display(), "Local storage directory ready");
        Ok(())
    }

    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        metadata: &[(&'static str, String)],
        data: Vec<u8>,
    ) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let size = data.len();

        let start = std::time::Instant::now();

        self.write_file(&path, &data).await?;

        // Sidecar with the attributes S3 would carry on the object.
        let sidecar = serde_json::json!({
            "contentType": content_type,
            "metadata": metadata
                .iter()
                .map(|(name, value)| (name.to_string(), serde_json::Value::String(value.clone())))
                .collect::<serde_json::Map<String, serde_json::Value>>(),
        });
        let sidecar_path = self.base_path.join(format!("{key}.meta.json"));
        self.write_file(&sidecar_path, sidecar.to_string().as_bytes())
            .await?;

        let url = self.generate_url(key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    async fn signed_url(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        self.key_to_path(key)?;
        Ok(self.generate_url(key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
