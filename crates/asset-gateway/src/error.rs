//! API error type and HTTP mapping

use crate::multipart::MultipartError;
use crate::upload::UploadError;
use asset_store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error surfaced to HTTP clients
///
/// Multipart faults are the client's, store faults are ours; the status
/// mapping keeps the two classes apart so callers can tell a bad
/// request from a broken backend.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Multipart(e) => Self::Multipart(e),
            UploadError::Store(e) => Self::Store(e),
        }
    }
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Multipart(_) => StatusCode::BAD_REQUEST,
            Self::Store(e) => match e {
                StoreError::NotFound { .. } | StoreError::ContainerNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                StoreError::InvalidKey(_) | StoreError::Source(_) => StatusCode::BAD_REQUEST,
                StoreError::Write { .. } | StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
