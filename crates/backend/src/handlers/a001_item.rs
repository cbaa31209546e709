use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_item::{Item, ItemDto};
use contracts::shared::api_error::ApiError;
use contracts::shared::pagination::Page;
use serde::Deserialize;
use serde_json::json;

use super::bad_request;
use crate::domain::a001_item;
use crate::shared::data::db::get_connection;

#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    pub page: Option<i64>,
}

/// GET /api/items
pub async fn list_paginated(
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<Page<Item>>, StatusCode> {
    match a001_item::service::list_paginated(get_connection(), query.page).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list items: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/items/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Item>, StatusCode> {
    let uuid = uuid::Uuid::parse_str(&id).map_err(|_| StatusCode::BAD_REQUEST)?;
    match a001_item::service::get_by_id(get_connection(), uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load item {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/items
pub async fn create(
    Json(dto): Json<ItemDto>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ApiError>)> {
    a001_item::service::create(get_connection(), dto)
        .await
        .map(|id| Json(json!({"id": id.to_string()})))
        .map_err(bad_request)
}

/// PUT /api/items/:id
pub async fn update(
    Path(id): Path<String>,
    Json(mut dto): Json<ItemDto>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    dto.id = Some(id);
    match a001_item::service::update(get_connection(), dto).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::new("not_found", "Item not found")),
        )),
        Err(e) => Err(bad_request(e)),
    }
}

/// DELETE /api/items/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let uuid = uuid::Uuid::parse_str(&id).map_err(|_| StatusCode::BAD_REQUEST)?;
    match a001_item::service::delete(get_connection(), uuid).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete item {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
