use std::sync::Arc;
use std::time::Duration;

use gridlens_core::models::{EnrichmentNotice, ImageRecord, UploadedFileInfo};
use gridlens_core::{exif, filename, AppError, Config, FilenamePolicy};
use gridlens_db::RecordStore;
use gridlens_queue::EnrichmentQueue;
use gridlens_storage::ObjectStorage;
use uuid::Uuid;

use super::hooks::post_commit;
use super::types::ExtractedFile;

/// Per-request behavior knobs, built once from configuration.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub filename_policy: FilenamePolicy,
    pub signed_url_ttl: Duration,
    pub post_commit_timeout: Duration,
    pub max_file_size: usize,
}

impl UploadPolicy {
    pub fn from_config(config: &Config) -> Self {
        UploadPolicy {
            filename_policy: config.filename_policy,
            signed_url_ttl: Duration::from_secs(config.signed_url_ttl_secs),
            post_commit_timeout: Duration::from_secs(config.post_commit_timeout_secs),
            max_file_size: config.max_file_size_bytes,
        }
    }
}

/// Image upload pipeline
///
/// Sequences one upload: derive the key, extract capture metadata,
/// store the bytes durably, run the best-effort secondary writes, sign
/// the access URL, assemble the response. All collaborators are
/// injected traits so the pipeline tests without real backends.
pub struct UploadPipeline {
    storage: Arc<dyn ObjectStorage>,
    records: Arc<dyn RecordStore>,
    queue: Arc<dyn EnrichmentQueue>,
    policy: UploadPolicy,
}

impl UploadPipeline {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        records: Arc<dyn RecordStore>,
        queue: Arc<dyn EnrichmentQueue>,
        policy: UploadPolicy,
    ) -> Self {
        Self {
            storage,
            records,
            queue,
            policy,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.policy.max_file_size
    }

    /// Run the pipeline for one extracted file.
    ///
    /// The generated id is the single identity for the request: storage
    /// key stem, record primary key, and notice correlation id.
    pub async fn run(&self, file: ExtractedFile) -> Result<UploadedFileInfo, AppError> {
        let ExtractedFile {
            filename,
            filename_hint,
            content_type,
            data,
        } = file;

        let record_id = Uuid::new_v4();
        let extension = filename::sanitized_extension(&filename);
        let object_key = format!("{}{}", record_id, extension);

        let capture = exif::extract_capture_metadata(&data);
        if !capture.is_empty() {
            tracing::debug!(
                record_id = %record_id,
                capture_date = ?capture.capture_date,
                latitude = ?capture.latitude,
                longitude = ?capture.longitude,
                "Extracted capture metadata"
            );
        }

        let object_metadata = capture.object_metadata();
        let file_size = data.len();

        tracing::info!(
            record_id = %record_id,
            key = %object_key,
            file_size = file_size,
            "Processing upload"
        );

        // Upload must complete before anything referencing the object runs.
        let media_url = self
            .storage
            .upload(&object_key, &content_type, &object_metadata, data)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, record_id = %record_id, "Failed to upload to storage");
                AppError::Storage(e.to_string())
            })?;

        let record = ImageRecord::new(record_id, media_url, &capture);
        let notice = EnrichmentNotice::for_record(record_id);

        // Best-effort secondary writes, concurrent and bounded. Either may
        // fail without affecting the response.
        let bound = self.policy.post_commit_timeout;
        let (record_outcome, notify_outcome) = tokio::join!(
            post_commit("record_write", record_id, bound, self.records.create(&record)),
            post_commit(
                "enrichment_notify",
                record_id,
                bound,
                self.queue.publish(&notice)
            ),
        );

        let file_url = self
            .storage
            .signed_url(&object_key, self.policy.signed_url_ttl)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, record_id = %record_id, "Failed to sign access URL");
                AppError::Signing(e.to_string())
            })?;

        tracing::info!(
            record_id = %record_id,
            key = %object_key,
            record_write = ?record_outcome,
            enrichment_notify = ?notify_outcome,
            "Upload pipeline completed"
        );

        Ok(UploadedFileInfo {
            file_name: self.display_name(record_id, filename_hint.as_deref(), &filename),
            file_extension: extension,
            content_type,
            file_url,
        })
    }

    /// Reported file name per the configured policy. The storage key is
    /// unaffected; it is always keyed by the record id.
    fn display_name(
        &self,
        record_id: Uuid,
        filename_hint: Option<&str>,
        declared_filename: &str,
    ) -> String {
        match self.policy.filename_policy {
            FilenamePolicy::Generated => record_id.to_string(),
            FilenamePolicy::Client => {
                let source = filename_hint.unwrap_or(declared_filename);
                let stem = filename::sanitized_stem(source);
                if stem.is_empty() {
                    record_id.to_string()
                } else {
                    stem
                }
            }
        }
    }
}
