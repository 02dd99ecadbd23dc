//! # Template Engine
//!
//! Renders a context mapping into receipt markup.
//!
//! ## Template Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_template("receipt.txt.j2")                                        │
//! │       │                                                                 │
//! │       ├── TEMPLATE_DIR set and file exists?  ──► use the file          │
//! │       │                                                                 │
//! │       ├── built-in template with that name?  ──► use the built-in      │
//! │       │                                                                 │
//! │       └── otherwise ──► RenderError::TemplateNotFound                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Markup
//! Templates produce plain text, one printed line per text line. A line
//! starting with `# ` is a heading. Two filters help with columns:
//! `ljust(width)` and `rjust(width)`.

use std::path::PathBuf;

use minijinja::{path_loader, Environment, Value};
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// Name of the receipt template.
pub const RECEIPT_TEMPLATE: &str = "receipt.txt.j2";

const BUILTIN_RECEIPT: &str = include_str!("../templates/receipt.txt.j2");

/// Renders a named template with a context mapping.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> RenderResult<String>;
}

/// Built-in template sources by name.
fn builtin_source(name: &str) -> Option<&'static str> {
    match name {
        RECEIPT_TEMPLATE => Some(BUILTIN_RECEIPT),
        _ => None,
    }
}

// =============================================================================
// MiniJinja
// =============================================================================

/// [`TemplateEngine`] backed by minijinja.
pub struct MiniJinjaTemplates {
    env: Environment<'static>,
}

impl MiniJinjaTemplates {
    /// Only the templates compiled into the binary.
    pub fn builtin() -> Self {
        let mut env = base_environment();
        env.set_loader(|name| Ok(builtin_source(name).map(str::to_owned)));
        MiniJinjaTemplates { env }
    }

    /// Templates from `dir`, falling back to the built-ins for names the
    /// directory does not provide.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        debug!(dir = %dir.display(), "Loading templates from directory");

        let files = path_loader(dir);
        let mut env = base_environment();
        env.set_loader(move |name| match files(name)? {
            Some(source) => Ok(Some(source)),
            None => Ok(builtin_source(name).map(str::to_owned)),
        });
        MiniJinjaTemplates { env }
    }

    /// Uses `dir` when given, the built-ins otherwise.
    pub fn new(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }
}

impl TemplateEngine for MiniJinjaTemplates {
    fn render(&self, template: &str, context: &serde_json::Value) -> RenderResult<String> {
        let compiled = self
            .env
            .get_template(template)
            .map_err(|e| RenderError::from_template(template, e))?;

        compiled
            .render(context)
            .map_err(|e| RenderError::from_template(template, e))
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_filter("ljust", ljust);
    env.add_filter("rjust", rjust);
    env
}

fn ljust(value: &Value, width: usize) -> String {
    format!("{:<width$}", value.to_string(), width = width)
}

fn rjust(value: &Value, width: usize) -> String {
    format!("{:>width$}", value.to_string(), width = width)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn receipt_context() -> serde_json::Value {
        json!({
            "items": [
                { "id": 1, "title": "Green tea", "price": "19.99", "quantity": 2, "line_total": "39.98" },
                { "id": 2, "title": "Paper cups", "price": "5.50", "quantity": 3, "line_total": "16.50" }
            ],
            "total_price": "56.48",
            "created_at": "17.10.2026 14:05"
        })
    }

    #[test]
    fn test_builtin_receipt_template() {
        let markup = MiniJinjaTemplates::builtin()
            .render(RECEIPT_TEMPLATE, &receipt_context())
            .unwrap();

        assert!(markup.starts_with("# RECEIPT"));
        assert!(markup.contains("17.10.2026 14:05"));
        assert!(markup.contains("Green tea"));
        assert!(markup.contains("2 x 19.99"));
        assert!(markup.contains("39.98"));
        assert!(markup.lines().any(|l| l.starts_with("# TOTAL") && l.ends_with("56.48")));
    }

    #[test]
    fn test_empty_receipt() {
        let context = json!({ "items": [], "total_price": "0.00", "created_at": "01.01.2026 00:00" });
        let markup = MiniJinjaTemplates::builtin()
            .render(RECEIPT_TEMPLATE, &context)
            .unwrap();

        assert!(markup.contains("No items"));
        assert!(markup.contains("0.00"));
    }

    #[test]
    fn test_missing_template() {
        let err = MiniJinjaTemplates::builtin()
            .render("missing.j2", &json!({}))
            .unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_syntax_error_is_template_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.j2"), "{% for %}").unwrap();

        let err = MiniJinjaTemplates::from_dir(dir.path())
            .render("broken.j2", &json!({}))
            .unwrap_err();
        assert!(matches!(err, RenderError::Template { .. }));
    }

    #[test]
    fn test_directory_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RECEIPT_TEMPLATE), "TOTAL={{ total_price }}").unwrap();

        let markup = MiniJinjaTemplates::from_dir(dir.path())
            .render(RECEIPT_TEMPLATE, &receipt_context())
            .unwrap();
        assert_eq!(markup, "TOTAL=56.48");
    }

    #[test]
    fn test_directory_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let markup = MiniJinjaTemplates::from_dir(dir.path())
            .render(RECEIPT_TEMPLATE, &receipt_context())
            .unwrap();
        assert!(markup.starts_with("# RECEIPT"));
    }

    #[test]
    fn test_justify_filters() {
        assert_eq!(rjust(&Value::from("5.50"), 6), "  5.50");
        assert_eq!(ljust(&Value::from("ab"), 4), "ab  ");
    }
}
