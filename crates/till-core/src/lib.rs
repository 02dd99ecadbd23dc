//! # till-core: Pure Business Logic for Till
//!
//! This crate is the **heart** of Till. It contains the receipt math,
//! input validation and artifact naming rules as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Till Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (till-server)                       │   │
//! │  │    POST /items/ ──► POST /generate_receipt/ ──► GET /media/…   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  receipt  │  │ validation│  │   │
//! │  │   │   Item    │  │   Money   │  │  Context  │  │  item_ids │  │   │
//! │  │   │  NewItem  │  │  decimal  │  │   Lines   │  │  new item │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                         ┌───────────┐                           │   │
//! │  │                         │ artifact  │ names + code reference    │   │
//! │  │                         └───────────┘                           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           till-db / till-render / till-media                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, NewItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`receipt`] - Rendering context for a receipt (lines, total, timestamp)
//! - [`artifact`] - Artifact names and the code reference URL
//! - [`error`] - Domain error types
//! - [`validation`] - Request validation
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::money::Money;
//!
//! let price: Money = "19.99".parse().unwrap();
//! let line = price.multiply_quantity(2);
//!
//! assert_eq!(line.to_string(), "39.98");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod artifact;
pub mod error;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use artifact::{ArtifactKind, ArtifactName};
pub use error::{CoreError, FieldErrors, ValidationError};
pub use money::Money;
pub use receipt::{ReceiptContext, ReceiptLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity recorded on a single item.
///
/// ## Business Reason
/// Keeps `price × quantity` for any line far below `i64::MAX` cents, so
/// receipt totals never overflow.
pub const MAX_ITEM_QUANTITY: i64 = 10_000;

/// Maximum number of digits in a price (integer + fractional part).
pub const MAX_PRICE_DIGITS: usize = 10;

/// Maximum length of an item title, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;
