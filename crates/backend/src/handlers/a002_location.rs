use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a002_location::{Location, LocationDto};
use contracts::shared::api_error::ApiError;
use contracts::shared::pagination::Page;
use serde::Deserialize;
use serde_json::json;

use super::bad_request;
use crate::domain::a002_location;
use crate::shared::data::db::get_connection;

#[derive(Debug, Deserialize)]
pub struct ListLocationsQuery {
    pub page: Option<i64>,
}

/// GET /api/locations
pub async fn list_paginated(
    Query(query): Query<ListLocationsQuery>,
) -> Result<Json<Page<Location>>, StatusCode> {
    match a002_location::service::list_paginated(get_connection(), query.page).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list locations: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/locations
pub async fn create(
    Json(dto): Json<LocationDto>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ApiError>)> {
    a002_location::service::create(get_connection(), dto)
        .await
        .map(|id| Json(json!({"id": id.to_string()})))
        .map_err(bad_request)
}

/// DELETE /api/locations/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let uuid = uuid::Uuid::parse_str(&id).map_err(|_| StatusCode::BAD_REQUEST)?;
    match a002_location::service::delete(get_connection(), uuid).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete location {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
