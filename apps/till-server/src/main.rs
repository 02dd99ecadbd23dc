//! # Till Server
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Till Server                                  │
//! │                                                                         │
//! │  Client ───► HTTP (8000) ───► routes ───► ReceiptService ───► SQLite   │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                                             MEDIA_ROOT                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use till_db::{Database, DbConfig};
use till_media::FsArtifactStore;
use till_server::{app, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(true)
        .init();

    info!("Starting Till server...");

    let config = ServerConfig::load()?;
    info!(
        addr = %config.bind_addr(),
        database = %config.database_path.display(),
        media_root = %config.media_root.display(),
        media_url = %config.media_url,
        "Configuration loaded"
    );

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    let store = FsArtifactStore::open(&config.media_root).await?;

    let addr = config.bind_addr();
    let state = AppState::new(db.clone(), Arc::new(store), config);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
