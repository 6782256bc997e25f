//! Application initialization
//!
//! Wires configuration into concrete backends (storage, record store,
//! queue), verifies each is ready, and assembles the router.

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::Result;
use gridlens_core::Config;
use gridlens_db::PgRecordStore;
use gridlens_queue::{sqs::SqsConfig, SqsQueue};
use gridlens_storage::create_storage;

use crate::services::upload::{UploadPipeline, UploadPolicy};
use crate::state::AppState;

/// Initialize backends and build the router.
///
/// Backend readiness (container, schema) is checked here so a
/// misconfigured deployment fails at startup, not on the first upload.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let storage = create_storage(&config)?;
    storage.ensure_container().await?;
    tracing::info!(backend = %storage.backend_type(), "Storage ready");

    let records = PgRecordStore::connect(&config.database_url, config.db_max_connections).await?;
    records.ensure_schema().await?;
    tracing::info!("Record store ready");

    let mut sqs_config = SqsConfig::new(config.queue_url.clone());
    if let Some(ref region) = config.aws_region {
        sqs_config = sqs_config.with_region(region.clone());
    }
    if let Some(ref endpoint) = config.queue_endpoint {
        sqs_config = sqs_config.with_endpoint_url(endpoint.clone());
    }
    let queue = SqsQueue::new(sqs_config).await;
    tracing::info!(queue_url = %config.queue_url, "Notification queue ready");

    let pipeline = UploadPipeline::new(
        storage,
        Arc::new(records),
        Arc::new(queue),
        UploadPolicy::from_config(&config),
    );

    let state = Arc::new(AppState { config, pipeline });
    let router = routes::build_router(state.clone());

    Ok((state, router))
}
