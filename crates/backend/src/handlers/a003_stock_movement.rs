use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a003_stock_movement::{
    ApplyMovementDto, MovementReportPage, MovementReportQuery, StockMovement,
};
use contracts::shared::api_error::ApiError;
use serde::Deserialize;

use crate::domain::a003_stock_movement::{self, LedgerError};
use crate::shared::data::db::get_connection;
use crate::system::auth::CurrentActor;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn status_for(error: &LedgerError) -> StatusCode {
    match error {
        LedgerError::InvalidInput(_)
        | LedgerError::InvalidItem(_)
        | LedgerError::InvalidLocation(_) => StatusCode::BAD_REQUEST,
        LedgerError::MovementNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::InsufficientStock { .. }
        | LedgerError::NoStockRecord { .. }
        | LedgerError::NegativeStockOnReversal { .. }
        | LedgerError::BalanceOverflow { .. } => StatusCode::CONFLICT,
        LedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn ledger_error(error: LedgerError) -> (StatusCode, Json<ApiError>) {
    let status = status_for(&error);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Ledger database failure: {}", error);
    }
    (status, Json(ApiError::new(error.kind(), error.to_string())))
}

/// POST /api/stock-movements
pub async fn apply(
    CurrentActor(actor): CurrentActor,
    Json(dto): Json<ApplyMovementDto>,
) -> ApiResult<(StatusCode, Json<StockMovement>)> {
    a003_stock_movement::service::apply_movement(get_connection(), &dto, &actor)
        .await
        .map(|movement| (StatusCode::CREATED, Json(movement)))
        .map_err(ledger_error)
}

/// DELETE /api/stock-movements/:id
pub async fn reverse(Path(id): Path<String>) -> ApiResult<StatusCode> {
    a003_stock_movement::service::reverse_movement(get_connection(), &id)
        .await
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(ledger_error)
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub actor: Option<String>,
    pub limit: Option<u64>,
}

/// GET /api/stock-movements/recent
pub async fn recent(Query(query): Query<RecentQuery>) -> Result<Json<Vec<StockMovement>>, StatusCode> {
    match a003_stock_movement::service::list_recent(
        get_connection(),
        query.limit,
        query.actor.as_deref(),
    )
    .await
    {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list recent movements: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/stock-movements/report
pub async fn report(Query(query): Query<MovementReportQuery>) -> ApiResult<Json<MovementReportPage>> {
    // некорректные даты отсекаются до обращения к БД
    if let Err(e) = a003_stock_movement::service::build_filter(&query) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("invalid_input", e.to_string())),
        ));
    }
    match a003_stock_movement::service::report(get_connection(), &query).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to build movement report: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("database", e.to_string())),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_each_kind() {
        let key = || ("HP 85A".to_string(), "Toner".to_string());
        let (item_name, item_type) = key();
        assert_eq!(
            status_for(&LedgerError::InvalidInput("quantity".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&LedgerError::InvalidLocation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&LedgerError::MovementNotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&LedgerError::InsufficientStock {
                item_name,
                item_type,
                available: 2,
                requested: 5,
            }),
            StatusCode::CONFLICT
        );
        let (item_name, item_type) = key();
        assert_eq!(
            status_for(&LedgerError::NoStockRecord {
                item_name,
                item_type
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&LedgerError::BalanceOverflow {
                item_name: "HP 85A".into(),
                item_type: "Toner".into(),
                current: 1,
                delta: i64::MAX,
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&LedgerError::Database(sea_orm::DbErr::Custom("boom".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
