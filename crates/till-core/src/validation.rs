//! # Validation Module
//!
//! Request validation for Till.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  ├── Content type, well-formed JSON                                    │
//! │  └── 415 / 400 {"detail": ...}                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field shape (list of integers, decimal price, ...)               │
//! │  └── 400 {"<field>": ["message", ...]}                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK constraints (price >= 0, quantity range)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators take the raw JSON body so that every problem is reported
//! at once, grouped by field, before any side effect happens.
//!
//! ## Usage
//! ```rust
//! use serde_json::json;
//! use till_core::validation::validate_item_ids;
//!
//! let ids = validate_item_ids(&json!({ "item_ids": [1, "2", 3.0] })).unwrap();
//! assert_eq!(ids, vec![1, 2, 3]);
//!
//! let errors = validate_item_ids(&json!({ "item_ids": [1, "x"] })).unwrap_err();
//! assert!(errors.contains("item_ids"));
//! ```

use serde_json::{Map, Value};

use crate::error::{FieldErrors, ValidationError};
use crate::money::Money;
use crate::types::NewItem;
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_DIGITS, MAX_TITLE_LENGTH};

/// Result type for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Field carrying the requested item ids.
pub const ITEM_IDS_FIELD: &str = "item_ids";

/// Field used when the body itself has the wrong shape.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

// =============================================================================
// Receipt Request
// =============================================================================

/// Validates a receipt request body and returns its `item_ids`.
///
/// ## Rules
/// - Body must be a JSON object with an `item_ids` key
/// - `item_ids` must be a list (an empty list is allowed)
/// - Each element must be an integer: a JSON integer, an integral number
///   such as `3.0`, or a string holding an integer such as `"3"`
/// - Booleans, fractions, nulls, lists and objects are rejected
///
/// Every bad element is reported, each with its index.
pub fn validate_item_ids(body: &Value) -> Result<Vec<i64>, FieldErrors> {
    let object = expect_object(body)?;

    let elements = match object.get(ITEM_IDS_FIELD) {
        None | Some(Value::Null) => {
            return Err(ValidationError::Required {
                field: ITEM_IDS_FIELD.to_string(),
            }
            .into())
        }
        Some(Value::Array(elements)) => elements,
        Some(_) => {
            return Err(ValidationError::InvalidFormat {
                field: ITEM_IDS_FIELD.to_string(),
                reason: "expected a list of integers".to_string(),
            }
            .into())
        }
    };

    let mut errors = FieldErrors::new();
    let mut ids = Vec::with_capacity(elements.len());

    for (index, element) in elements.iter().enumerate() {
        match integer_value(element) {
            Some(id) => ids.push(id),
            None => errors.push(ValidationError::InvalidElement {
                field: ITEM_IDS_FIELD.to_string(),
                index,
                reason: "must be an integer".to_string(),
            }),
        }
    }

    errors.into_result(ids)
}

/// Interprets one JSON value as an integer.
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => {
            if let Some(n) = number.as_i64() {
                return Some(n);
            }
            let float = number.as_f64()?;
            if float.fract() == 0.0 && float >= i64::MIN as f64 && float <= i64::MAX as f64 {
                Some(float as i64)
            } else {
                None
            }
        }
        Value::String(text) => parse_integer_text(text),
        _ => None,
    }
}

/// Parses `"42"`, `" 42 "` and `"42.000"`; rejects `"4.2"`.
fn parse_integer_text(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = match text.split_once('.') {
        Some((whole, zeros)) if zeros.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => text,
    };
    digits.parse().ok()
}

// =============================================================================
// Item Creation
// =============================================================================

/// Validates an item creation body.
///
/// ## Rules
/// - `title`: required string, at most [`MAX_TITLE_LENGTH`] characters
/// - `price`: required decimal (string or number), not negative, at most
///   two decimal places and [`MAX_PRICE_DIGITS`] digits
/// - `quantity`: required integer in `0..=MAX_ITEM_QUANTITY`
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use till_core::validation::validate_new_item;
///
/// let item = validate_new_item(&json!({
///     "title": "Tea", "price": "19.99", "quantity": 2
/// })).unwrap();
/// assert_eq!(item.price.cents(), 1999);
/// ```
pub fn validate_new_item(body: &Value) -> Result<NewItem, FieldErrors> {
    let object = expect_object(body)?;
    let mut errors = FieldErrors::new();

    let title = record(&mut errors, validate_title(object.get("title")));
    let price = record(&mut errors, validate_price(object.get("price")));
    let quantity = record(&mut errors, validate_quantity(object.get("quantity")));

    match (title, price, quantity) {
        (Some(title), Some(price), Some(quantity)) if errors.is_empty() => Ok(NewItem {
            title,
            price,
            quantity,
        }),
        _ => Err(errors),
    }
}

/// Validates an item title.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use till_core::validation::validate_title;
///
/// assert_eq!(validate_title(Some(&json!("  Tea "))).unwrap(), "Tea");
/// assert!(validate_title(Some(&json!(""))).is_err());
/// assert!(validate_title(None).is_err());
/// ```
pub fn validate_title(value: Option<&Value>) -> ValidationResult<String> {
    let title = match value {
        None | Some(Value::Null) => return Err(required("title")),
        Some(Value::String(text)) => text.trim(),
        Some(_) => {
            return Err(ValidationError::InvalidFormat {
                field: "title".to_string(),
                reason: "expected a string".to_string(),
            })
        }
    };

    if title.is_empty() {
        return Err(required("title"));
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LENGTH,
        });
    }

    Ok(title.to_string())
}

/// Validates a price given as a decimal string or a JSON number.
pub fn validate_price(value: Option<&Value>) -> ValidationResult<Money> {
    let text = match value {
        None | Some(Value::Null) => return Err(required("price")),
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(_) => return Err(price_format("a valid number is required")),
    };

    let price = Money::parse_decimal(&text).map_err(|err| match err {
        crate::error::CoreError::InvalidAmount { reason, .. } => price_format(&reason),
    })?;

    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if price.digit_count() > MAX_PRICE_DIGITS {
        return Err(price_format(&format!(
            "at most {} digits in total are allowed",
            MAX_PRICE_DIGITS
        )));
    }

    Ok(price)
}

/// Validates a per-line quantity.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use till_core::validation::validate_quantity;
///
/// assert_eq!(validate_quantity(Some(&json!(3))).unwrap(), 3);
/// assert!(validate_quantity(Some(&json!(-1))).is_err());
/// ```
pub fn validate_quantity(value: Option<&Value>) -> ValidationResult<i64> {
    let quantity = match value {
        None | Some(Value::Null) => return Err(required("quantity")),
        Some(Value::Bool(_)) => None,
        Some(other) => integer_value(other),
    }
    .ok_or_else(|| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: "expected an integer".to_string(),
    })?;

    if !(0..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(quantity)
}

// =============================================================================
// Helpers
// =============================================================================

fn expect_object(body: &Value) -> Result<&Map<String, Value>, FieldErrors> {
    body.as_object().ok_or_else(|| {
        ValidationError::InvalidFormat {
            field: NON_FIELD_ERRORS.to_string(),
            reason: "expected a JSON object".to_string(),
        }
        .into()
    })
}

fn record<T>(errors: &mut FieldErrors, result: ValidationResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

fn required(field: &str) -> ValidationError {
    ValidationError::Required {
        field: field.to_string(),
    }
}

fn price_format(reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_ids_accepts_integers_in_order() {
        let ids = validate_item_ids(&json!({ "item_ids": [3, 1, 2] })).unwrap();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_item_ids_accepts_integer_strings_and_integral_floats() {
        let ids = validate_item_ids(&json!({ "item_ids": ["7", " 8 ", 9.0, "10.00"] })).unwrap();
        assert_eq!(ids, vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_item_ids_empty_list_is_valid() {
        let ids = validate_item_ids(&json!({ "item_ids": [] })).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_item_ids_missing_or_null() {
        for body in [json!({}), json!({ "item_ids": null })] {
            let errors = validate_item_ids(&body).unwrap_err();
            assert_eq!(errors.messages("item_ids"), ["item_ids is required"]);
        }
    }

    #[test]
    fn test_item_ids_not_a_list() {
        for value in [json!(5), json!("1,2"), json!({ "id": 1 })] {
            let errors = validate_item_ids(&json!({ "item_ids": value })).unwrap_err();
            assert!(errors.contains("item_ids"));
        }
    }

    #[test]
    fn test_item_ids_reports_every_bad_element() {
        let body = json!({ "item_ids": [1, "abc", true, 2.5, null, [1], 4] });
        let errors = validate_item_ids(&body).unwrap_err();

        let messages = errors.messages("item_ids");
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0], "item_ids[1] must be an integer");
        assert_eq!(messages[4], "item_ids[5] must be an integer");
    }

    #[test]
    fn test_item_ids_body_must_be_object() {
        let errors = validate_item_ids(&json!([1, 2])).unwrap_err();
        assert!(errors.contains(NON_FIELD_ERRORS));
    }

    #[test]
    fn test_new_item_valid() {
        let item = validate_new_item(&json!({
            "title": "Green tea",
            "price": "5.50",
            "quantity": 3
        }))
        .unwrap();

        assert_eq!(item.title, "Green tea");
        assert_eq!(item.price.cents(), 550);
        assert_eq!(item.quantity, 3);
    }

    #[test]
    fn test_new_item_numeric_price() {
        let item = validate_new_item(&json!({ "title": "Tea", "price": 19.99, "quantity": 1 })).unwrap();
        assert_eq!(item.price.cents(), 1999);

        let item = validate_new_item(&json!({ "title": "Tea", "price": 4, "quantity": 1 })).unwrap();
        assert_eq!(item.price.cents(), 400);
    }

    #[test]
    fn test_new_item_collects_all_field_errors() {
        let errors = validate_new_item(&json!({
            "title": "",
            "price": "1.999",
            "quantity": -4
        }))
        .unwrap_err();

        assert!(errors.contains("title"));
        assert!(errors.contains("price"));
        assert!(errors.contains("quantity"));
    }

    #[test]
    fn test_price_rules() {
        assert!(validate_price(Some(&json!("-1.00"))).is_err());
        assert!(validate_price(Some(&json!("abc"))).is_err());
        assert!(validate_price(Some(&json!("123456789.00"))).is_err());
        assert!(validate_price(Some(&json!("99999999.99"))).is_ok());
        assert!(validate_price(Some(&json!(true))).is_err());
        assert_eq!(validate_price(Some(&json!("0"))).unwrap().cents(), 0);
    }

    #[test]
    fn test_title_too_long() {
        let long = "x".repeat(MAX_TITLE_LENGTH + 1);
        let err = validate_title(Some(&json!(long))).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { .. }));
    }

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(validate_quantity(Some(&json!(0))).unwrap(), 0);
        assert_eq!(validate_quantity(Some(&json!(MAX_ITEM_QUANTITY))).unwrap(), MAX_ITEM_QUANTITY);
        assert!(validate_quantity(Some(&json!(MAX_ITEM_QUANTITY + 1))).is_err());
        assert!(validate_quantity(Some(&json!(true))).is_err());
        assert!(validate_quantity(Some(&json!(1.5))).is_err());
    }
}
