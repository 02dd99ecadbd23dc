//! # Receipt Generation Route
//!
//! - `POST /generate_receipt/` - `{"item_ids": [1, 2, 3]}` → QR code PNG
//!
//! The PNG encodes the URL of the stored receipt PDF. The path is also
//! served without the trailing slash.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use super::method_not_allowed;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    let generate = post(generate_receipt).fallback(method_not_allowed);

    Router::new()
        .route("/generate_receipt/", generate.clone())
        .route("/generate_receipt", generate)
}

async fn generate_receipt(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(body) = body?;
    let generated = state.receipts.generate_receipt(&body).await?;
    let image = generated.code_image;

    let headers = [
        (CONTENT_TYPE, image.content_type.to_string()),
        (
            CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", image.filename),
        ),
    ];

    Ok((headers, image.bytes).into_response())
}
