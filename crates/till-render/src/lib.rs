//! # till-render: Receipt Rendering Engines
//!
//! Turns a priced [`ReceiptContext`] into a PDF and a receipt URL into a
//! QR code image.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ReceiptRenderer                                │
//! │                                                                         │
//! │  ReceiptContext ──► TemplateEngine ──► markup ──► DocumentEngine ──►   │
//! │                     (MiniJinja)                   (PdfEngine)    PDF    │
//! │                                                                         │
//! │  receipt URL ─────► CodeEncoder (QrEncoder) ─────────────────────► PNG  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`template`] - [`TemplateEngine`] and the minijinja implementation
//! - [`document`] - [`DocumentEngine`] and the printpdf implementation
//! - [`code`] - [`CodeEncoder`] and the QR implementation
//! - [`error`] - Render error types
//!
//! Engines are synchronous and CPU-bound. Async callers should run them
//! with `tokio::task::spawn_blocking`.

pub mod code;
pub mod document;
pub mod error;
pub mod template;

pub use code::{CodeEncoder, ErrorCorrection, QrEncoder};
pub use document::{DocumentEngine, PdfEngine};
pub use error::{RenderError, RenderResult};
pub use template::{MiniJinjaTemplates, TemplateEngine, RECEIPT_TEMPLATE};

use std::sync::Arc;

use till_core::ReceiptContext;
use tracing::debug;

/// Composes a template engine and a document engine into one step.
#[derive(Clone)]
pub struct ReceiptRenderer {
    templates: Arc<dyn TemplateEngine>,
    document: Arc<dyn DocumentEngine>,
}

impl ReceiptRenderer {
    pub fn new(templates: Arc<dyn TemplateEngine>, document: Arc<dyn DocumentEngine>) -> Self {
        ReceiptRenderer {
            templates,
            document,
        }
    }

    /// Built-in template and the default PDF layout.
    pub fn builtin() -> Self {
        ReceiptRenderer::new(
            Arc::new(MiniJinjaTemplates::builtin()),
            Arc::new(PdfEngine::default()),
        )
    }

    /// Renders `context` into document bytes.
    ///
    /// ## Errors
    /// Any context, template or conversion failure; nothing is retried.
    pub fn render(&self, context: &ReceiptContext) -> RenderResult<Vec<u8>> {
        let values = context.to_template_context()?;
        let markup = self.templates.render(RECEIPT_TEMPLATE, &values)?;
        debug!(lines = markup.lines().count(), "Receipt markup rendered");

        self.document.convert(&markup)
    }

    /// MIME type of the documents this renderer produces.
    pub fn content_type(&self) -> &'static str {
        self.document.content_type()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
