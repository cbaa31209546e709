use axum::{http::StatusCode, Json};
use contracts::projections::p900_stock_balance::StockBalanceDto;

use crate::projections::p900_stock_balance;
use crate::shared::data::db::get_connection;

/// GET /api/stock
pub async fn list_balances() -> Result<Json<Vec<StockBalanceDto>>, StatusCode> {
    match p900_stock_balance::service::list_balances(get_connection()).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list stock balances: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
