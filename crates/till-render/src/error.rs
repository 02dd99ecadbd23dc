//! # Render Error Types
//!
//! Every failure here is fatal for the request that triggered it: the
//! caller aborts the pipeline and answers with a server error.

use thiserror::Error;

/// Template, document and code rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The named template does not exist.
    ///
    /// ## When This Occurs
    /// - Template directory override lacks the receipt template
    /// - Typo in a template name
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    /// The receipt context could not be turned into template values.
    #[error("Template context failed: {0}")]
    Context(String),

    /// Template syntax or evaluation failed.
    ///
    /// ## When This Occurs
    /// - Syntax error in a template file
    /// - Unknown filter, wrong filter arguments
    #[error("Template error in {name}: {message}")]
    Template { name: String, message: String },

    /// Markup could not be turned into a document.
    #[error("Document conversion failed: {0}")]
    Document(String),

    /// Payload could not be encoded as a scannable code.
    ///
    /// ## When This Occurs
    /// - Payload longer than the largest QR version holds
    #[error("Code encoding failed: {0}")]
    Encoding(String),

    /// Raster image could not be written.
    #[error("Image encoding failed: {0}")]
    Image(String),
}

impl RenderError {
    pub(crate) fn from_template(name: &str, err: minijinja::Error) -> Self {
        match err.kind() {
            minijinja::ErrorKind::TemplateNotFound => RenderError::TemplateNotFound {
                name: name.to_string(),
            },
            _ => RenderError::Template {
                name: name.to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::Context(err.to_string())
    }
}

impl From<printpdf::Error> for RenderError {
    fn from(err: printpdf::Error) -> Self {
        RenderError::Document(err.to_string())
    }
}

impl From<qrcode::types::QrError> for RenderError {
    fn from(err: qrcode::types::QrError) -> Self {
        RenderError::Encoding(err.to_string())
    }
}

impl From<image::ImageError> for RenderError {
    fn from(err: image::ImageError) -> Self {
        RenderError::Image(err.to_string())
    }
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_failure_is_context_error() {
        let err = serde_json::from_str::<serde_json::Value>("{\"items\": [").unwrap_err();

        let err = RenderError::from(err);

        assert!(matches!(err, RenderError::Context(_)));
        assert!(err.to_string().starts_with("Template context failed: "));
    }
}
