//! Item HTTP Routes
//!
//! CRUD, filtering and per-email aggregation over inventory items.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use super::extract::ApiJson;
use super::response::{EmailCount, ItemUpdatedResponse, MessageResponse};
use super::state::AppState;
use crate::allocator::ITEM_SEQUENCE;
use crate::errors::{ApiError, ApiResult};
use crate::records::{Item, ItemFilter, NewItem, UpdateItem};

/// Create item routes
pub fn item_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/items/", post(create_item_handler))
        .route("/items/filter", get(filter_items_handler))
        .route("/items/aggregate", get(aggregate_items_handler))
        .route(
            "/items/:id",
            get(get_item_handler)
                .put(update_item_handler)
                .delete(delete_item_handler),
        )
        .with_state(state)
}

async fn create_item_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<NewItem>,
) -> ApiResult<(StatusCode, Json<Item>)> {
    payload.validate()?;

    let id = state.ids.next(ITEM_SEQUENCE).await?;
    let document = payload.into_document(id, Utc::now().date_naive());
    state.items.insert(&document).await?;

    tracing::info!(id, email = %document.email, "item created");
    Ok((StatusCode::CREATED, Json(Item::from(document))))
}

async fn get_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Item>> {
    match state.items.get(id).await? {
        Some(document) => Ok(Json(Item::from(document))),
        None => Err(ApiError::not_found("Item not found")),
    }
}

async fn update_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ApiJson(update): ApiJson<UpdateItem>,
) -> ApiResult<Json<ItemUpdatedResponse>> {
    update.validate()?;

    let modified = state.items.update(id, update.set_fields()).await?;
    if modified == 0 {
        return Err(ApiError::not_found("Item not found"));
    }

    tracing::info!(id, "item updated");
    Ok(Json(ItemUpdatedResponse {
        message: "Item updated".to_string(),
        updated_fields: update,
    }))
}

async fn delete_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if state.items.delete(id).await? == 0 {
        return Err(ApiError::not_found("Item not found"));
    }

    tracing::info!(id, "item deleted");
    Ok(Json(MessageResponse::new("Item deleted")))
}

async fn filter_items_handler(
    State(state): State<Arc<AppState>>,
    Query(criteria): Query<ItemFilter>,
) -> ApiResult<Json<Vec<Item>>> {
    let filter = criteria.to_filter()?;
    tracing::debug!(terms = filter.len(), "filtering items");

    let documents = state.items.find(&filter).await?;
    Ok(Json(documents.into_iter().map(Item::from).collect()))
}

async fn aggregate_items_handler(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<EmailCount>>> {
    let groups = state.items.group_by("email").await?;

    Ok(Json(
        groups
            .into_iter()
            .map(|group| EmailCount {
                email: group.value.as_str().map(str::to_owned),
                count: group.count,
            })
            .collect(),
    ))
}
