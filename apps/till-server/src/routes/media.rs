//! # Artifact Retrieval Route
//!
//! - `GET {MEDIA_URL}{filename}` - Stored artifact bytes as a PDF download
//!
//! An unknown or malformed name answers 404 with an empty body. There is no
//! listing.

use axum::extract::{Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use super::method_not_allowed;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use till_core::{ArtifactKind, ArtifactName};

/// Router for `route`, e.g. `/media/{filename}`.
pub fn router(route: &str) -> Router<AppState> {
    Router::new().route(route, get(serve_artifact).fallback(method_not_allowed))
}

async fn serve_artifact(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let name = ArtifactName::parse(&filename).map_err(|_| ApiError::NotFound)?;

    let disposition = HeaderValue::try_from(format!("attachment; filename={}", name))
        .map_err(|_| ApiError::NotFound)?;

    let bytes = state.store.load(&name).await?.ok_or(ApiError::NotFound)?;

    tracing::debug!(name = %name, size = bytes.len(), "Serving artifact");

    let headers = [
        (
            CONTENT_TYPE,
            HeaderValue::from_static(ArtifactKind::Receipt.content_type()),
        ),
        (CONTENT_DISPOSITION, disposition),
    ];

    Ok((headers, bytes).into_response())
}
