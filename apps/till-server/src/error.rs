//! # API Error Types
//!
//! [`ApiError`] is what every handler returns on failure. It maps domain
//! errors to HTTP status codes and JSON bodies.
//!
//! ## Response Shapes
//! ```text
//! Validation        400  {"item_ids": ["item_ids is required"]}
//! BadRequest        400  {"detail": "..."}
//! NotFound          404  (empty body)
//! MethodNotAllowed  405  {"detail": "Method \"GET\" not allowed."}
//! UnsupportedMedia  415  {"detail": "..."}
//! Internal          500  {"detail": "A server error occurred."}
//! ```
//!
//! Internal error details are logged, never returned.

use axum::extract::rejection::JsonRejection;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::services::ServiceError;
use till_core::FieldErrors;
use till_db::DbError;
use till_media::MediaError;

/// Body of every non-validation error with a message.
#[derive(Debug, Serialize)]
pub struct Detail {
    pub detail: String,
}

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Per-field validation failures.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// The request body could not be parsed.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body is not declared as JSON.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Not found")]
    NotFound,

    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),

    /// Anything the client cannot fix. The message is only logged.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let detail = match self {
            ApiError::Validation(errors) => return (status, Json(errors)).into_response(),
            ApiError::NotFound => return status.into_response(),
            ApiError::MethodNotAllowed(method) => format!("Method \"{}\" not allowed.", method),
            ApiError::BadRequest(message) | ApiError::UnsupportedMediaType(message) => message,
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                "A server error occurred.".to_string()
            }
        };

        (status, Json(Detail { detail })).into_response()
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(err) => {
                ApiError::UnsupportedMediaType(err.body_text())
            }
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================
