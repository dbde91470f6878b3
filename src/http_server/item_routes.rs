//! Item HTTP Routes
//!
//! CRUD endpoints over the item resource. Field validation (required
//! `name`, optional `description`/`price`) lives here, at the transport
//! layer; the store treats field values as opaque.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::store::{DocumentStore, FieldMap, Record};

use super::errors::{ApiError, ApiResult};

// ==================
// Shared State
// ==================

/// Item state shared across handlers
pub struct ItemState {
    pub store: Arc<DocumentStore>,
}

impl ItemState {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl ItemCreate {
    /// All three domain fields, absent ones stored as explicit nulls.
    pub fn into_field_map(self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("name".to_string(), Value::String(self.name));
        fields.insert("description".to_string(), opt_string(self.description));
        fields.insert("price".to_string(), opt_number(self.price));
        fields
    }
}

/// Partial update: only fields present as `Some` are merged; absent keys
/// leave the stored value untouched.
#[derive(Debug, Default, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl ItemUpdate {
    pub fn into_field_map(self) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Some(name) = self.name {
            fields.insert("name".to_string(), Value::String(name));
        }
        if let Some(description) = self.description {
            fields.insert("description".to_string(), Value::String(description));
        }
        if let Some(price) = self.price {
            fields.insert("price".to_string(), opt_number(Some(price)));
        }
        fields
    }
}

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Record> for ItemResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id,
            name: record
                .fields
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            description: record
                .fields
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            price: record.fields.get("price").and_then(Value::as_f64),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

fn opt_string(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

fn opt_number(value: Option<f64>) -> Value {
    value
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

// ==================
// Item Routes
// ==================

/// Create item routes
pub fn item_routes(state: Arc<ItemState>) -> Router {
    Router::new()
        .route(
            "/items",
            get(list_items_handler).post(create_item_handler),
        )
        .route(
            "/items/:id",
            get(get_item_handler)
                .put(update_item_handler)
                .delete(delete_item_handler),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn create_item_handler(
    State(state): State<Arc<ItemState>>,
    Json(payload): Json<ItemCreate>,
) -> ApiResult<(StatusCode, Json<ItemResponse>)> {
    info!(name = %payload.name, "creating new item");

    let record = state.store.create(payload.into_field_map())?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

async fn list_items_handler(
    State(state): State<Arc<ItemState>>,
) -> ApiResult<Json<Vec<ItemResponse>>> {
    info!("retrieving all items");

    let records = state.store.list()?;
    Ok(Json(records.into_iter().map(ItemResponse::from).collect()))
}

async fn get_item_handler(
    State(state): State<Arc<ItemState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<ItemResponse>> {
    info!(id, "retrieving item");

    let record = state.store.get(id)?.ok_or(ApiError::NotFound(id))?;
    Ok(Json(record.into()))
}

async fn update_item_handler(
    State(state): State<Arc<ItemState>>,
    Path(id): Path<u64>,
    Json(payload): Json<ItemUpdate>,
) -> ApiResult<Json<ItemResponse>> {
    info!(id, "updating item");

    let partial = payload.into_field_map();
    if partial.is_empty() {
        return Err(ApiError::EmptyUpdate);
    }

    let record = state
        .store
        .update(id, &partial)?
        .ok_or(ApiError::NotFound(id))?;
    Ok(Json(record.into()))
}

async fn delete_item_handler(
    State(state): State<Arc<ItemState>>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    info!(id, "deleting item");

    if state.store.delete(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}
