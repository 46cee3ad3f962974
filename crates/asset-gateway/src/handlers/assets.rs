//! Digital asset upload and retrieval handlers

use crate::multipart::{extract_boundary, PartReader};
use crate::upload::UploadPipeline;
use crate::{ApiError, AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::TryStreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Success body of an upload request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Stored object names, in the order the file parts appeared
    pub file_names: Vec<String>,
}

/// POST /api/digitalAssets - stream every file part of a multipart
/// request into the object store
pub async fn upload_assets(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    // Reject non-multipart requests before touching the body.
    let boundary = extract_boundary(content_type, state.config.max_boundary_len)?;

    let stream = body.into_data_stream().map_err(std::io::Error::other);
    let mut reader = PartReader::new(stream, &boundary, state.config.max_part_header_bytes);

    let pipeline = UploadPipeline::new(Arc::clone(&state.store), state.config.container.clone());
    let file_names = pipeline.run(&mut reader).await?;

    tracing::info!(stored = file_names.len(), "upload complete");
    Ok((StatusCode::OK, Json(UploadResponse { file_names })).into_response())
}

/// GET /api/digitalAssets/server/{id} - stream a stored asset back
pub async fn serve_asset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let stream = state
        .store
        .get_stream(&state.config.container, &id)
        .await?;

    let content_type = mime_guess::from_path(&id).first_or_octet_stream();

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .body(Body::from_stream(stream))
        .unwrap())
}

/// HEAD / - Health check
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
