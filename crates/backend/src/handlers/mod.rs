pub mod a001_item;
pub mod a002_location;
pub mod a003_stock_movement;
pub mod d400_overview;
pub mod p900_stock_balance;

use axum::http::StatusCode;
use axum::Json;
use contracts::shared::api_error::ApiError;

/// Ошибка валидации/дубликата из сервиса каталога
pub(crate) fn bad_request(e: anyhow::Error) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError::new("invalid_input", e.to_string())),
    )
}
