//! Error handling for the backend API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::ai::GenerationError;
use crate::services::library::LibraryError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<flashdeck_core::SetError> for ApiError {
    fn from(err: flashdeck_core::SetError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            // Empty notes are a user mistake, everything else came from
            // the upstream model call.
            ApiError::Generation(GenerationError::EmptyNotes) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            ApiError::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_error"),
            ApiError::Library(LibraryError::DuplicateTopic(_)) => {
                (StatusCode::CONFLICT, "duplicate_topic")
            }
            ApiError::Library(LibraryError::Set(_)) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            ApiError::Library(LibraryError::Io(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
