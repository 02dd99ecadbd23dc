//! # API Route Modules
//!
//! - `items` - Item catalog: list and create.
//! - `receipts` - Receipt generation, answers with the QR image.
//! - `media` - Stored artifact retrieval.
//! - `health` - Liveness with a database check.
//!
//! Every path answers unsupported methods with a JSON 405 through
//! [`method_not_allowed`].

pub mod health;
pub mod items;
pub mod media;
pub mod receipts;

use axum::http::Method;

use crate::error::ApiError;

/// Fallback for a known path hit with an unsupported method.
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}
