//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  till-core errors (this file)                                           │
//! │  ├── CoreError        - Malformed amounts                              │
//! │  ├── ValidationError  - One input validation failure                   │
//! │  └── FieldErrors      - All failures of a request, grouped by field    │
//! │                                                                         │
//! │  till-db / till-render / till-media errors (separate crates)           │
//! │                                                                         │
//! │  HTTP errors (in till-server)                                          │
//! │  └── ApiError         - What clients see (status + JSON body)          │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → ServiceError → ApiError         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every [`ValidationError`] names the field it belongs to, which is how
//! [`FieldErrors`] groups them into a response body.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors from parsing domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A monetary amount could not be parsed.
    ///
    /// ## When This Occurs
    /// - `"abc"` or `""` given as a price
    /// - More than two fractional digits (`"1.999"`)
    /// - Value too large to represent in cents
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// One rejected input value.
///
/// Raised before any side effect runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or null.
    #[error("{field} is required")]
    Required { field: String },

    /// Text longer than allowed.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Integer outside its inclusive bounds.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (not a list, not a number, bad file name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// One element of a list field is invalid.
    #[error("{field}[{index}] {reason}")]
    InvalidElement {
        field: String,
        index: usize,
        reason: String,
    },
}

impl ValidationError {
    /// Returns the name of the field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::InvalidElement { field, .. } => field,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Validation failures grouped by field name.
///
/// ## Serialization
/// This is the body of a `400 Bad Request`:
/// ```json
/// {
///   "item_ids": ["item_ids[1] must be an integer"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Records an error under its field.
    pub fn push(&mut self, err: ValidationError) {
        self.0
            .entry(err.field().to_string())
            .or_default()
            .push(err.to_string());
    }

    /// Returns true when no error has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true when at least one error names `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for `field`.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Yields `value` when empty, otherwise the collected errors.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(err: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(err);
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "item_ids".to_string(),
        };
        assert_eq!(err.to_string(), "item_ids is required");

        let err = ValidationError::InvalidElement {
            field: "item_ids".to_string(),
            index: 2,
            reason: "must be an integer".to_string(),
        };
        assert_eq!(err.to_string(), "item_ids[2] must be an integer");
        assert_eq!(err.field(), "item_ids");
    }

    #[test]
    fn test_field_errors_group_by_field() {
        let mut errors = FieldErrors::new();
        assert!(errors.is_empty());

        errors.push(ValidationError::Required {
            field: "title".to_string(),
        });
        errors.push(ValidationError::Negative {
            field: "price".to_string(),
        });
        errors.push(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "at most 2 decimal places".to_string(),
        });

        assert!(errors.contains("title"));
        assert_eq!(errors.messages("price").len(), 2);
        assert!(!errors.contains("quantity"));

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["title"][0], "title is required");
        assert_eq!(json["price"][0], "price must not be negative");
    }

    #[test]
    fn test_field_errors_into_result() {
        assert_eq!(FieldErrors::new().into_result(5).unwrap(), 5);

        let errors: FieldErrors = ValidationError::Required {
            field: "item_ids".to_string(),
        }
        .into();
        assert!(errors.into_result(5).is_err());
    }
}
