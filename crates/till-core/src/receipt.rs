//! # Receipt Context
//!
//! Prices a resolved item list and assembles the mapping handed to the
//! receipt template.
//!
//! ## Pipeline Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  item_ids ──► Item Store ──► Vec<Item>                                  │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                  ReceiptContext::build(items, now) ← THIS MODULE        │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │             { items: [...], total_price: "56.48",                       │
//! │               created_at: "17.10.2026 14:05" }                          │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                          template ──► PDF                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Building a context never fails: an empty item list produces a receipt
//! with no lines and a total of `0.00`.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::money::{self, Money};
use crate::types::Item;

/// Timestamp pattern printed on receipts: `DD.MM.YYYY HH:MM`.
pub const RECEIPT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

/// One priced line of a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptLine {
    pub id: i64,
    pub title: String,
    #[serde(with = "money::decimal")]
    pub price: Money,
    pub quantity: i64,
    #[serde(with = "money::decimal")]
    pub line_total: Money,
}

impl From<&Item> for ReceiptLine {
    fn from(item: &Item) -> Self {
        ReceiptLine {
            id: item.id,
            title: item.title.clone(),
            price: item.price(),
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

/// Everything the receipt template needs.
///
/// Serializes to the template mapping (`items`, `total_price`,
/// `created_at`); money values become decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptContext {
    pub items: Vec<ReceiptLine>,
    #[serde(with = "money::decimal")]
    pub total_price: Money,
    pub created_at: String,
}

impl ReceiptContext {
    /// Prices `items` and stamps the context with `generated_at`.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use till_core::{Item, ReceiptContext};
    ///
    /// let items = vec![
    ///     Item { id: 1, title: "Pen".into(), price_cents: 1999, quantity: 2 },
    ///     Item { id: 2, title: "Ink".into(), price_cents: 550, quantity: 3 },
    /// ];
    /// let now = NaiveDate::from_ymd_opt(2026, 10, 17)
    ///     .unwrap()
    ///     .and_hms_opt(14, 5, 0)
    ///     .unwrap();
    ///
    /// let context = ReceiptContext::build(&items, now);
    /// assert_eq!(context.total_price.to_string(), "56.48");
    /// assert_eq!(context.created_at, "17.10.2026 14:05");
    /// ```
    pub fn build(items: &[Item], generated_at: NaiveDateTime) -> Self {
        let lines: Vec<ReceiptLine> = items.iter().map(ReceiptLine::from).collect();
        let total_price = lines.iter().map(|line| line.line_total).sum();

        ReceiptContext {
            items: lines,
            total_price,
            created_at: generated_at.format(RECEIPT_TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// True when no item resolved.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The context as a template mapping.
    ///
    /// ## Errors
    /// Returns the serializer's error instead of an empty mapping, so a
    /// receipt is never rendered without its lines.
    pub fn to_template_context(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, day)
            .unwrap()
            .and_hms_opt(hour, minute, 42)
            .unwrap()
    }

    fn item(id: i64, title: &str, price_cents: i64, quantity: i64) -> Item {
        Item {
            id,
            title: title.to_string(),
            price_cents,
            quantity,
        }
    }

    #[test]
    fn test_total_is_exact_for_fractional_prices() {
        let items = vec![item(1, "Tea", 1999, 2), item(2, "Cup", 550, 3)];
        let context = ReceiptContext::build(&items, at(1, 9, 30));

        assert_eq!(context.total_price.cents(), 5648);
        assert_eq!(context.items[0].line_total.cents(), 3998);
        assert_eq!(context.items[1].line_total.cents(), 1650);
    }

    #[test]
    fn test_empty_items_yield_zero_total() {
        let context = ReceiptContext::build(&[], at(1, 9, 30));

        assert!(context.is_empty());
        assert!(context.total_price.is_zero());
        assert_eq!(context.created_at, "01.03.2026 09:30");
    }

    #[test]
    fn test_timestamp_is_zero_padded_and_drops_seconds() {
        let context = ReceiptContext::build(&[], at(7, 4, 3));
        assert_eq!(context.created_at, "07.03.2026 04:03");
    }

    #[test]
    fn test_template_context_uses_decimal_strings() {
        let items = vec![item(5, "Bread", 250, 4)];
        let value = ReceiptContext::build(&items, at(2, 12, 0))
            .to_template_context()
            .unwrap();

        assert_eq!(value["total_price"], "10.00");
        assert_eq!(value["created_at"], "02.03.2026 12:00");
        assert_eq!(value["items"][0]["title"], "Bread");
        assert_eq!(value["items"][0]["price"], "2.50");
        assert_eq!(value["items"][0]["quantity"], 4);
        assert_eq!(value["items"][0]["line_total"], "10.00");
    }
}
