//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError / ApiError (till-server)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  500 with a generic body, details only in the log                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Errors raised by the item database.
#[derive(Debug, Error)]
pub enum DbError {
    /// A `fetch_one` query matched no row.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// CHECK constraint violation.
    ///
    /// ## When This Occurs
    /// - Negative price or quantity reaching the database
    /// - Title longer than the column allows
    ///
    /// Validation in till-core runs first, so this signals a bug.
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// The pool could not be opened.
    ///
    /// ## When This Occurs
    /// - `DATABASE_PATH` points into a missing or read-only directory
    /// - The pool was closed during shutdown
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The embedded schema could not be applied.
    ///
    /// ## When This Occurs
    /// - The file was migrated by a newer build with unknown versions
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected a statement for another reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → ConstraintViolation for CHECK failures
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Row".to_string(),
                id: "?".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "CHECK constraint failed: <expr>" / "NOT NULL constraint failed: <col>"
                if msg.contains("constraint failed") {
                    DbError::ConstraintViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result alias used across till-db.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================
