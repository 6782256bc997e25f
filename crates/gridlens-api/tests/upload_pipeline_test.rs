//! End-to-end tests for the upload endpoint, driven through the router
//! with injected backend doubles. No storage, database, or queue
//! service is required.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use uuid::Uuid;

use gridlens_api::services::upload::{UploadPipeline, UploadPolicy};
use gridlens_api::setup::routes::build_router;
use gridlens_api::state::AppState;
use gridlens_core::models::{EnrichmentNotice, ImageRecord};
use gridlens_core::{Config, FilenamePolicy, StorageBackend};
use gridlens_db::{RecordStore, RecordStoreError};
use gridlens_queue::{EnrichmentQueue, NotifyError};
use gridlens_storage::{ObjectStorage, StorageError, StorageResult};

#[derive(Debug, Clone)]
struct UploadCall {
    key: String,
    content_type: String,
    metadata: Vec<(String, String)>,
    size: usize,
}

#[derive(Default)]
struct MockStorage {
    uploads: Mutex<Vec<UploadCall>>,
    fail_upload: bool,
    fail_signing: bool,
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn ensure_container(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        metadata: &[(&'static str, String)],
        data: Vec<u8>,
    ) -> StorageResult<String> {
        if self.fail_upload {
            return Err(StorageError::UploadFailed("injected upload failure".to_string()));
        }
        self.uploads.lock().unwrap().push(UploadCall {
            key: key.to_string(),
            content_type: content_type.to_string(),
            metadata: metadata
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            size: data.len(),
        });
        Ok(format!("https://storage.test/{key}"))
    }

    async fn signed_url(&self, key: &str, _expires_in: Duration) -> StorageResult<String> {
        if self.fail_signing {
            return Err(StorageError::SigningFailed("injected signing failure".to_string()));
        }
        Ok(format!("https://storage.test/{key}?sig=test"))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[derive(Default)]
struct MockRecordStore {
    records: Mutex<Vec<ImageRecord>>,
    fail: bool,
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn create(&self, record: &ImageRecord) -> Result<(), RecordStoreError> {
        if self.fail {
            return Err(RecordStoreError::Backend("injected record failure".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

#[derive(Default)]
struct MockQueue {
    notices: Mutex<Vec<EnrichmentNotice>>,
    fail: bool,
}

#[async_trait]
impl EnrichmentQueue for MockQueue {
    async fn publish(&self, notice: &EnrichmentNotice) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Send("injected queue failure".to_string()));
        }
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

fn test_config(filename_policy: FilenamePolicy) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        database_url: "postgres://unused".to_string(),
        db_max_connections: 1,
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: None,
        local_storage_base_url: None,
        queue_url: "https://sqs.test/unused".to_string(),
        queue_endpoint: None,
        max_file_size_bytes: 1024 * 1024,
        signed_url_ttl_secs: 3600,
        post_commit_timeout_secs: 1,
        filename_policy,
    }
}

struct Backends {
    storage: Arc<MockStorage>,
    records: Arc<MockRecordStore>,
    queue: Arc<MockQueue>,
}

impl Backends {
    fn healthy() -> Self {
        Backends {
            storage: Arc::new(MockStorage::default()),
            records: Arc::new(MockRecordStore::default()),
            queue: Arc::new(MockQueue::default()),
        }
    }
}

fn test_server(config: Config, backends: &Backends) -> TestServer {
    let pipeline = UploadPipeline::new(
        backends.storage.clone(),
        backends.records.clone(),
        backends.queue.clone(),
        UploadPolicy::from_config(&config),
    );
    let state = Arc::new(AppState { config, pipeline });
    TestServer::new(build_router(state)).expect("router should build")
}

fn image_form(filename: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(b"not really a jpeg".to_vec())
            .file_name(filename)
            .mime_type("image/jpeg"),
    )
}

#[tokio::test]
async fn upload_returns_id_keyed_object_and_signed_url() {
    let backends = Backends::healthy();
    let server = test_server(test_config(FilenamePolicy::Generated), &backends);

    let response = server
        .post("/api/v0/images")
        .multipart(image_form("bad:name*.jpg"))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let file_name = body["fileName"].as_str().unwrap();
    let record_id = Uuid::parse_str(file_name).expect("fileName should be the generated id");
    assert_eq!(body["fileExtension"], ".jpg");
    assert_eq!(body["contentType"], "image/jpeg");
    assert_eq!(
        body["fileURL"],
        format!("https://storage.test/{file_name}.jpg?sig=test")
    );

    // One upload, keyed by the returned id plus the sanitized extension.
    let uploads = backends.storage.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].key, format!("{file_name}.jpg"));
    assert_eq!(uploads[0].content_type, "image/jpeg");
    assert_eq!(uploads[0].size, b"not really a jpeg".len());

    // Record and notice share the same id.
    let records = backends.records.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, record_id);
    assert_eq!(
        records[0].media_url,
        format!("https://storage.test/{file_name}.jpg")
    );

    let notices = backends.queue.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].blob_name, file_name);
    assert_eq!(notices[0].document_id, file_name);
}

#[tokio::test]
async fn upload_without_exif_leaves_both_sinks_empty() {
    let backends = Backends::healthy();
    let server = test_server(test_config(FilenamePolicy::Generated), &backends);

    server
        .post("/api/v0/images")
        .multipart(image_form("plain.jpg"))
        .await
        .assert_status_ok();

    // Bytes with no EXIF block: no object metadata, no record EXIF fields.
    let uploads = backends.storage.uploads.lock().unwrap();
    assert!(uploads[0].metadata.is_empty());

    let records = backends.records.records.lock().unwrap();
    assert!(records[0].exif_capture_date.is_none());
    assert!(records[0].exif_capture_time.is_none());
    assert!(records[0].exif_lat_gps.is_none());
    assert!(records[0].exif_long_gps.is_none());

    // Enrichment placeholders are unset at creation.
    assert!(records[0].ocr_text.is_none());
    assert!(records[0].has_high_voltage_sign.is_none());
    assert!(records[0].is_on_fire.is_none());
    assert!(records[0].contains_pole.is_none());
}

#[tokio::test]
async fn multipart_without_file_part_is_rejected_before_any_backend_call() {
    let backends = Backends::healthy();
    let server = test_server(test_config(FilenamePolicy::Generated), &backends);

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = server.post("/api/v0/images").multipart(form).await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "no file to upload");

    assert!(backends.storage.uploads.lock().unwrap().is_empty());
    assert!(backends.records.records.lock().unwrap().is_empty());
    assert!(backends.queue.notices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_multipart_body_is_rejected() {
    let backends = Backends::healthy();
    let server = test_server(test_config(FilenamePolicy::Generated), &backends);

    let response = server.post("/api/v0/images").text("just some text").await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "no file to upload");
    assert!(backends.storage.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn record_and_queue_failures_never_change_the_response() {
    let backends = Backends {
        storage: Arc::new(MockStorage::default()),
        records: Arc::new(MockRecordStore {
            fail: true,
            ..Default::default()
        }),
        queue: Arc::new(MockQueue {
            fail: true,
            ..Default::default()
        }),
    };
    let server = test_server(test_config(FilenamePolicy::Generated), &backends);

    let response = server
        .post("/api/v0/images")
        .multipart(image_form("photo.jpg"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["fileURL"].as_str().unwrap().contains("?sig=test"));
    assert_eq!(backends.storage.uploads.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn storage_failure_aborts_before_secondary_writes() {
    let backends = Backends {
        storage: Arc::new(MockStorage {
            fail_upload: true,
            ..Default::default()
        }),
        records: Arc::new(MockRecordStore::default()),
        queue: Arc::new(MockQueue::default()),
    };
    let server = test_server(test_config(FilenamePolicy::Generated), &backends);

    let response = server
        .post("/api/v0/images")
        .multipart(image_form("photo.jpg"))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");

    assert!(backends.records.records.lock().unwrap().is_empty());
    assert!(backends.queue.notices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn signing_failure_surfaces_after_the_object_is_stored() {
    let backends = Backends {
        storage: Arc::new(MockStorage {
            fail_signing: true,
            ..Default::default()
        }),
        records: Arc::new(MockRecordStore::default()),
        queue: Arc::new(MockQueue::default()),
    };
    let server = test_server(test_config(FilenamePolicy::Generated), &backends);

    let response = server
        .post("/api/v0/images")
        .multipart(image_form("photo.jpg"))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "ACCESS_SIGNING_ERROR");

    // The object was stored and the secondary writes ran; only the link
    // could not be issued.
    assert_eq!(backends.storage.uploads.lock().unwrap().len(), 1);
    assert_eq!(backends.records.records.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn identical_uploads_get_distinct_keys() {
    let backends = Backends::healthy();
    let server = test_server(test_config(FilenamePolicy::Generated), &backends);

    for _ in 0..2 {
        server
            .post("/api/v0/images")
            .multipart(image_form("same.jpg"))
            .await
            .assert_status_ok();
    }

    let uploads = backends.storage.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 2);
    assert_ne!(uploads[0].key, uploads[1].key);
}

#[tokio::test]
async fn filename_without_extension_yields_empty_extension() {
    let backends = Backends::healthy();
    let server = test_server(test_config(FilenamePolicy::Generated), &backends);

    let response = server
        .post("/api/v0/images")
        .multipart(image_form("noextension"))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["fileExtension"], "");

    let uploads = backends.storage.uploads.lock().unwrap();
    assert_eq!(uploads[0].key, body["fileName"].as_str().unwrap());
}

#[tokio::test]
async fn client_filename_policy_reports_sanitized_stem() {
    let backends = Backends::healthy();
    let server = test_server(test_config(FilenamePolicy::Client), &backends);

    let response = server
        .post("/api/v0/images")
        .multipart(image_form("bad:name*.jpg"))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["fileName"], "badname");
    assert_eq!(body["fileExtension"], ".jpg");

    // The storage key is still the generated id, not the client name.
    let uploads = backends.storage.uploads.lock().unwrap();
    assert!(uploads[0].key.ends_with(".jpg"));
    assert!(!uploads[0].key.contains("badname"));
}

#[tokio::test]
async fn filename_hint_overrides_display_name_but_not_extension() {
    let backends = Backends::healthy();
    let server = test_server(test_config(FilenamePolicy::Client), &backends);

    let response = server
        .post("/api/v0/images")
        .add_query_param("filename", "field-report")
        .multipart(image_form("camera-upload.jpg"))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["fileName"], "field-report");
    assert_eq!(body["fileExtension"], ".jpg");
}

#[tokio::test]
async fn oversized_upload_is_rejected_without_backend_calls() {
    let mut config = test_config(FilenamePolicy::Generated);
    config.max_file_size_bytes = 8;
    let backends = Backends::healthy();
    let server = test_server(config, &backends);

    let response = server
        .post("/api/v0/images")
        .multipart(image_form("big.jpg"))
        .await;

    response.assert_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE);
    assert!(backends.storage.uploads.lock().unwrap().is_empty());
    assert!(backends.records.records.lock().unwrap().is_empty());
}
