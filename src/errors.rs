//! HTTP-facing error type.
//!
//! [`ApiError`] implements [`axum::response::IntoResponse`] so handlers can
//! return `Err(ApiError::NotFound)` and get the status code and body shape
//! clients of the emulated API expect.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::backend::store::BackendError;
use crate::json::error_response;

/// Generate a 16-character hex request ID.
pub fn generate_request_id() -> String {
    let bytes: [u8; 8] = rand::random();
    hex::encode(bytes)
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body could not be decoded. Carries the parser message.
    #[error("{0}")]
    MalformedBody(String),

    /// The requested bucket does not exist.
    #[error("Not found")]
    NotFound,

    /// The backend failed. Carries the backend's error text verbatim.
    #[error("{0}")]
    Backend(String),
}

impl ApiError {
    /// Return the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound(_) => ApiError::NotFound,
            other => ApiError::Backend(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            // Only not-found gets a JSON envelope; the rest are plain text.
            ApiError::NotFound => {
                let body = error_response(status.as_u16(), &self.to_string(), &[]);
                (status, Json(body)).into_response()
            }
            ApiError::MalformedBody(_) | ApiError::Backend(_) => (
                status,
                [("content-type", "text/plain; charset=utf-8")],
                format!("{self}\n"),
            )
                .into_response(),
        }
    }
}
