//! # till-db: Database Layer for Till
//!
//! Item catalog storage: SQLite through sqlx.
//!
//! ## Layout
//! ```text
//!  POST /items/             ──┐
//!  GET  /items/             ──┤                     ┌─► insert, list
//!  POST /generate_receipt/  ──┼──► Database::items() ┤
//!  GET  /health             ──┘    (SqlitePool)      └─► get_by_ids
//!                                       │
//!                                       ▼
//!                     ./till.db  ◄── migrations/sqlite (embedded)
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - [`DbConfig`] and the [`Database`] handle
//! - [`migrations`] - Schema embedded at compile time
//! - [`error`] - [`DbError`] and the sqlx mapping
//! - [`repository`] - Queries, one repository per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./till.db")).await?;
//!
//! // Resolve the items of a receipt request
//! let items = db.items().get_by_ids(&[1, 2, 3]).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::item::ItemRepository;
