//! Shared application state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::ReceiptService;
use till_db::Database;
use till_media::ArtifactStore;
use till_render::{MiniJinjaTemplates, PdfEngine, QrEncoder, ReceiptRenderer};

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub receipts: Arc<ReceiptService>,
    pub store: Arc<dyn ArtifactStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wires the rendering engines selected by `config` into a
    /// [`ReceiptService`].
    pub fn new(db: Database, store: Arc<dyn ArtifactStore>, config: ServerConfig) -> Self {
        let renderer = ReceiptRenderer::new(
            Arc::new(MiniJinjaTemplates::new(config.template_dir.clone())),
            Arc::new(PdfEngine::default()),
        );
        let encoder = Arc::new(QrEncoder::new(config.qr_ec_level, config.qr_scale));

        let receipts = ReceiptService::new(
            db.clone(),
            renderer,
            encoder,
            Arc::clone(&store),
            config.site_url.clone(),
            config.media_url.clone(),
        );

        AppState {
            db,
            receipts: Arc::new(receipts),
            store,
            config: Arc::new(config),
        }
    }
}
