//! Router assembly

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{health::health, image_upload::upload_image};
use crate::state::AppState;

/// Slack for multipart boundaries and headers on top of the configured
/// maximum file size.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.pipeline.max_file_size() + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/api/v0/images", post(upload_image))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
