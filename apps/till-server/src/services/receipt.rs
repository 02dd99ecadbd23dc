//! Receipt generation service.
//!
//! Runs the whole pipeline for one request:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  payload {"item_ids": [...]}                                            │
//! │     │                                                                   │
//! │     ▼  1. validate_item_ids        ── FieldErrors → 400, nothing saved  │
//! │     ▼  2. db.items().get_by_ids    ── unknown ids dropped               │
//! │     ▼  3. ReceiptContext::build    ── exact totals, local timestamp     │
//! │     ▼  4. ReceiptRenderer::render  ── blocking pool                     │
//! │     ▼  5. store.save(receipt_{uuid}.pdf)                                │
//! │     ▼  6. receipt_url(site, media, name)                                │
//! │     ▼  7. CodeEncoder::encode      ── blocking pool                     │
//! │     ▼     store.save(qr_receipt_{uuid}.png)                             │
//! │     ▼  8. GeneratedReceipt { code_image: ArtifactPayload, ... }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failure after step 5 leaves the saved receipt in place; nothing is
//! rolled back.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde_json::Value;
use thiserror::Error;
use tokio::task;
use tracing::{debug, info};
use uuid::Uuid;

use till_core::artifact::receipt_url;
use till_core::validation::validate_item_ids;
use till_core::{ArtifactName, FieldErrors, Money, ReceiptContext};
use till_db::{Database, DbError};
use till_media::{ArtifactStore, MediaError};
use till_render::{CodeEncoder, ReceiptRenderer, RenderError};

/// Receipt pipeline errors.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request payload is invalid; nothing was written.
    #[error("Invalid request: {0}")]
    Validation(#[from] FieldErrors),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Media(#[from] MediaError),

    /// A blocking task panicked or was cancelled.
    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Bytes of a stored artifact with what a transport needs to send them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPayload {
    pub filename: ArtifactName,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Outcome of a successful receipt request.
#[derive(Debug, Clone)]
pub struct GeneratedReceipt {
    /// Name of the stored receipt document
    pub receipt_name: ArtifactName,
    /// URL encoded in the code image
    pub receipt_url: String,
    /// Grand total printed on the receipt
    pub total: Money,
    /// Number of resolved item lines
    pub line_count: usize,
    /// The code image, as stored
    pub code_image: ArtifactPayload,
}

/// Receipt generation service.
pub struct ReceiptService {
    db: Database,
    renderer: ReceiptRenderer,
    encoder: Arc<dyn CodeEncoder>,
    store: Arc<dyn ArtifactStore>,
    site_url: String,
    media_url: String,
}

impl ReceiptService {
    /// Create a new receipt service.
    ///
    /// `site_url` and `media_url` are used verbatim to build receipt URLs.
    pub fn new(
        db: Database,
        renderer: ReceiptRenderer,
        encoder: Arc<dyn CodeEncoder>,
        store: Arc<dyn ArtifactStore>,
        site_url: impl Into<String>,
        media_url: impl Into<String>,
    ) -> Self {
        ReceiptService {
            db,
            renderer,
            encoder,
            store,
            site_url: site_url.into(),
            media_url: media_url.into(),
        }
    }

    /// Generates a receipt stamped with the current local time.
    pub async fn generate_receipt(&self, payload: &Value) -> Result<GeneratedReceipt, ServiceError> {
        self.generate_receipt_at(payload, Local::now().naive_local())
            .await
    }

    /// Generates a receipt stamped with `generated_at`.
    pub async fn generate_receipt_at(
        &self,
        payload: &Value,
        generated_at: NaiveDateTime,
    ) -> Result<GeneratedReceipt, ServiceError> {
        let item_ids = validate_item_ids(payload)?;

        let items = self.db.items().get_by_ids(&item_ids).await?;
        let context = ReceiptContext::build(&items, generated_at);
        let total = context.total_price;
        let line_count = context.items.len();

        let renderer = self.renderer.clone();
        let document = task::spawn_blocking(move || renderer.render(&context))
            .await
            .map_err(|e| ServiceError::Worker(e.to_string()))??;

        let receipt_name = ArtifactName::receipt(Uuid::new_v4());
        let stored = self.store.save(&receipt_name, &document).await?;
        debug!(location = %stored.location, size = stored.size, "Receipt stored");

        let url = receipt_url(&self.site_url, &self.media_url, &receipt_name);

        let encoder = Arc::clone(&self.encoder);
        let payload_url = url.clone();
        let image = task::spawn_blocking(move || encoder.encode(&payload_url))
            .await
            .map_err(|e| ServiceError::Worker(e.to_string()))??;

        let image_name = ArtifactName::code_image_for(&receipt_name);
        self.store.save(&image_name, &image).await?;

        info!(
            receipt = %receipt_name,
            requested = item_ids.len(),
            lines = line_count,
            total = %total,
            "Receipt generated"
        );

        Ok(GeneratedReceipt {
            receipt_name,
            receipt_url: url,
            total,
            line_count,
            code_image: ArtifactPayload {
                filename: image_name,
                content_type: self.encoder.content_type(),
                bytes: image,
            },
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use till_core::NewItem;
    use till_db::DbConfig;
    use till_media::MemoryArtifactStore;
    use till_render::{QrEncoder, RenderResult};

    struct FailingEncoder;

    impl CodeEncoder for FailingEncoder {
        fn encode(&self, _: &str) -> RenderResult<Vec<u8>> {
            Err(RenderError::Encoding("data too long".to_string()))
        }

        fn content_type(&self) -> &'static str {
            "image/png"
        }
    }

    async fn service_with(
        encoder: Arc<dyn CodeEncoder>,
    ) -> (ReceiptService, Database, Arc<MemoryArtifactStore>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = Arc::new(MemoryArtifactStore::new());
        let service = ReceiptService::new(
            db.clone(),
            ReceiptRenderer::builtin(),
            encoder,
            store.clone(),
            "http://localhost:8000",
            "/media/",
        );
        (service, db, store)
    }

    async fn add_item(db: &Database, title: &str, price: &str, quantity: i64) -> i64 {
        let item = NewItem {
            title: title.to_string(),
            price: price.parse().unwrap(),
            quantity,
        };
        db.items().insert(&item).await.unwrap().id
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_generate_receipt_exact_total() {
        let (service, db, store) = service_with(Arc::new(QrEncoder::default())).await;
        let tea = add_item(&db, "Green tea", "19.99", 2).await;
        let cups = add_item(&db, "Paper cups", "5.50", 3).await;

        let generated = service
            .generate_receipt_at(&json!({ "item_ids": [tea, cups] }), noon())
            .await
            .unwrap();

        assert_eq!(generated.total.to_string(), "56.48");
        assert_eq!(generated.line_count, 2);
        assert_eq!(
            generated.receipt_url,
            format!("http://localhost:8000/media/{}", generated.receipt_name)
        );
        assert_eq!(generated.code_image.content_type, "image/png");
        assert_eq!(
            generated.code_image.filename,
            ArtifactName::code_image_for(&generated.receipt_name)
        );

        let pdf = store.load(&generated.receipt_name).await.unwrap().unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        let png = store.load(&generated.code_image.filename).await.unwrap().unwrap();
        assert_eq!(png, generated.code_image.bytes);
    }

    #[tokio::test]
    async fn test_unknown_ids_give_empty_receipt() {
        let (service, _db, store) = service_with(Arc::new(QrEncoder::default())).await;

        let generated = service
            .generate_receipt(&json!({ "item_ids": [404, 405] }))
            .await
            .unwrap();

        assert!(generated.total.is_zero());
        assert_eq!(generated.line_count, 0);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_ids_collapse() {
        let (service, db, _store) = service_with(Arc::new(QrEncoder::default())).await;
        let tea = add_item(&db, "Green tea", "19.99", 1).await;

        let generated = service
            .generate_receipt(&json!({ "item_ids": [tea, tea, tea] }))
            .await
            .unwrap();

        assert_eq!(generated.line_count, 1);
        assert_eq!(generated.total.to_string(), "19.99");
    }

    #[tokio::test]
    async fn test_validation_failure_writes_nothing() {
        let (service, _db, store) = service_with(Arc::new(QrEncoder::default())).await;

        for payload in [json!({}), json!({ "item_ids": [1, "x"] }), json!({ "item_ids": "1" })] {
            let err = service.generate_receipt(&payload).await.unwrap_err();
            match err {
                ServiceError::Validation(errors) => assert!(errors.contains("item_ids")),
                other => panic!("unexpected error: {other}"),
            }
        }
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_encoder_failure_leaves_orphan_receipt() {
        let (service, db, store) = service_with(Arc::new(FailingEncoder)).await;
        let tea = add_item(&db, "Green tea", "19.99", 1).await;

        let err = service
            .generate_receipt(&json!({ "item_ids": [tea] }))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Render(RenderError::Encoding(_))));
        let names = store.names().await;
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("receipt_"));
    }

    #[tokio::test]
    async fn test_receipt_names_are_unique_per_request() {
        let (service, _db, _store) = service_with(Arc::new(QrEncoder::default())).await;
        let payload = json!({ "item_ids": [] });

        let first = service.generate_receipt_at(&payload, noon()).await.unwrap();
        let second = service.generate_receipt_at(&payload, noon()).await.unwrap();

        assert_ne!(first.receipt_name, second.receipt_name);
    }
}
