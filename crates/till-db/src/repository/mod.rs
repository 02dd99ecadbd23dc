//! # Repository Module
//!
//! Database repository implementations for Till.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler / ReceiptService                                         │
//! │       │                                                                 │
//! │       │  db.items().get_by_ids(&[1, 2, 3])                              │
//! │       ▼                                                                 │
//! │  ItemRepository                                                        │
//! │  ├── insert(&self, new_item)                                           │
//! │  ├── list(&self)                                                       │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── get_by_ids(&self, ids)                                            │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`item::ItemRepository`] - Item catalog

pub mod item;
