//! # Item Repository
//!
//! Database operations for catalog items.
//!
//! ## Id-Set Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  requested ids:   [3, 1, 3, 99]                                        │
//! │       │                                                                 │
//! │       ▼  dedupe                                                         │
//! │  {1, 3, 99}                                                            │
//! │       │                                                                 │
//! │       ▼  SELECT ... WHERE id IN (?, ?, ?) ORDER BY id                   │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ 1  | Tea   | 1999 | 2                   │                           │
//! │  │ 3  | Cups  |  550 | 3                   │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  99 is silently dropped; 3 appears once                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use till_core::{Item, NewItem};

/// Bind parameters per `IN (...)` query, well below SQLite's variable limit.
const ID_CHUNK_SIZE: usize = 500;

const SELECT_ITEM: &str = "SELECT id, title, price_cents, quantity FROM items";

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ItemRepository::new(pool);
///
/// let created = repo.insert(&new_item).await?;
/// let found = repo.get_by_ids(&[created.id]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts a validated item and returns it with its assigned id.
    pub async fn insert(&self, item: &NewItem) -> DbResult<Item> {
        debug!(title = %item.title, price = %item.price, "Inserting item");

        let created = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (title, price_cents, quantity)
            VALUES (?1, ?2, ?3)
            RETURNING id, title, price_cents, quantity
            "#,
        )
        .bind(&item.title)
        .bind(item.price.cents())
        .bind(item.quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Lists every item, oldest first.
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!("{} ORDER BY id", SELECT_ITEM))
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Gets an item by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!("{} WHERE id = ?1", SELECT_ITEM))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Gets every item whose id is in `ids`.
    ///
    /// Set semantics: unknown ids are dropped, duplicates collapse, and the
    /// result is ordered by id regardless of request order. An empty `ids`
    /// never touches the database.
    pub async fn get_by_ids(&self, ids: &[i64]) -> DbResult<Vec<Item>> {
        let unique: Vec<i64> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

        let mut items = Vec::with_capacity(unique.len());
        for chunk in unique.chunks(ID_CHUNK_SIZE) {
            let mut query = QueryBuilder::<Sqlite>::new(SELECT_ITEM);
            query.push(" WHERE id IN (");
            let mut separated = query.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(") ORDER BY id");

            items.extend(query.build_query_as::<Item>().fetch_all(&self.pool).await?);
        }

        debug!(
            requested = ids.len(),
            resolved = items.len(),
            "Resolved items by id"
        );
        Ok(items)
    }

    /// Counts all items (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
