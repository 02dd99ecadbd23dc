//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   validate    ┌─────────────────┐                  │
//! │  │    NewItem      │ ────────────► │      Item       │                  │
//! │  │  ─────────────  │    insert     │  ─────────────  │                  │
//! │  │  title          │               │  id (store)     │                  │
//! │  │  price_cents    │               │  title          │                  │
//! │  │  quantity       │               │  price_cents    │                  │
//! │  └─────────────────┘               │  quantity       │                  │
//! │                                    └─────────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Items are identified by a numeric id assigned by the store. Receipt
//! requests reference items by that id.

use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Item
// =============================================================================

/// A sellable item in the catalog.
///
/// `quantity` is the number of units printed on a receipt line that
/// references this item. It is not remaining stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Store-assigned identifier, immutable.
    pub id: i64,

    /// Display title printed on the receipt.
    pub title: String,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units per receipt line.
    pub quantity: i64,
}

impl Item {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns `price × quantity`.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// New Item
// =============================================================================

/// A validated item waiting to be inserted. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub price: Money,
    pub quantity: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_line_total() {
        let item = Item {
            id: 1,
            title: "Notebook".to_string(),
            price_cents: 1999,
            quantity: 2,
        };
        assert_eq!(item.price().to_string(), "19.99");
        assert_eq!(item.line_total().cents(), 3998);
    }

    #[test]
    fn test_zero_quantity_line_is_free() {
        let item = Item {
            id: 2,
            title: "Sample".to_string(),
            price_cents: 550,
            quantity: 0,
        };
        assert!(item.line_total().is_zero());
    }
}
