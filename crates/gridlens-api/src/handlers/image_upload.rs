use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Query, State},
    Json,
};
use gridlens_core::models::UploadedFileInfo;
use gridlens_core::AppError;
use serde::Deserialize;

use crate::error::HttpAppError;
use crate::services::upload::extract_first_file;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Optional client-supplied name for the image. Consulted only when
    /// the filename policy honors client names.
    pub filename: Option<String>,
}

/// Upload image handler
///
/// Accepts a multipart/form-data body, delegates to the upload pipeline,
/// and returns the stored object's identity and signed access URL.
///
/// A non-multipart body or a body with no file part is rejected before
/// any storage, record, or queue call is made.
#[tracing::instrument(
    skip(state, multipart),
    fields(operation = "upload_image")
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadedFileInfo>, HttpAppError> {
    let multipart =
        multipart.map_err(|_| AppError::Validation("no file to upload".to_string()))?;

    let file = extract_first_file(
        multipart,
        query.filename,
        state.pipeline.max_file_size(),
    )
    .await?;

    let info = state.pipeline.run(file).await?;

    Ok(Json(info))
}
