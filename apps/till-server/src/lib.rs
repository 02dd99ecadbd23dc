//! # Till Server
//!
//! HTTP API for the item catalog and receipt generation.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /items/             list items                                    │
//! │  POST /items/             create item                      → 201        │
//! │  POST /generate_receipt/  {"item_ids": [...]}              → PNG        │
//! │  GET  {MEDIA_URL}{name}   stored receipt                   → PDF        │
//! │  GET  /health             database check                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Environment configuration
//! - [`error`] - [`ApiError`](error::ApiError) and its HTTP mapping
//! - [`services`] - Receipt pipeline
//! - [`routes`] - Handlers, one module per resource
//! - [`state`] - Shared handler state

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use state::AppState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the application router.
pub fn app(state: AppState) -> Router {
    let media_route = state.config.media_route();

    Router::new()
        .merge(routes::items::router())
        .merge(routes::receipts::router())
        .merge(routes::media::router(&media_route))
        .merge(routes::health::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
