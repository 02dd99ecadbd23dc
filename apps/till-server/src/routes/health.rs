//! Health check route.
//!
//! - `GET /health` - `{"status": "ok" | "degraded", "database": bool}`

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use super::method_not_allowed;
use crate::state::AppState;

/// Health report.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: bool,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health).fallback(method_not_allowed))
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let database = state.db.health_check().await;
    if !database {
        tracing::warn!("Database health check failed");
    }

    Json(HealthStatus {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}
