//! # Item Catalog Routes
//!
//! - `GET  /items/` - List every item, oldest first
//! - `POST /items/` - Create an item from `{"title", "price", "quantity"}`
//!
//! Both paths are also served without the trailing slash. Prices travel as
//! decimal strings (`"19.99"`) in both directions; a JSON number is
//! accepted on input.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;

use super::method_not_allowed;
use crate::error::ApiResult;
use crate::state::AppState;
use till_core::validation::validate_new_item;
use till_core::{Item, Money};

/// Item as exposed over HTTP.
#[derive(Debug, Serialize)]
pub struct ItemDto {
    pub id: i64,
    pub title: String,
    #[serde(with = "till_core::money::decimal")]
    pub price: Money,
    pub quantity: i64,
}

impl From<Item> for ItemDto {
    fn from(item: Item) -> Self {
        ItemDto {
            price: item.price(),
            id: item.id,
            title: item.title,
            quantity: item.quantity,
        }
    }
}

pub fn router() -> Router<AppState> {
    let items = get(list_items)
        .post(create_item)
        .fallback(method_not_allowed);

    Router::new()
        .route("/items/", items.clone())
        .route("/items", items)
}

async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<ItemDto>>> {
    let items = state.db.items().list().await?;
    Ok(Json(items.into_iter().map(ItemDto::from).collect()))
}

async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ItemDto>)> {
    let Json(body) = body?;
    let new_item = validate_new_item(&body)?;

    let item = state.db.items().insert(&new_item).await?;
    tracing::info!(id = item.id, title = %item.title, "Item created");

    Ok((StatusCode::CREATED, Json(item.into())))
}
