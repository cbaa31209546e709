use axum::{http::StatusCode, Json};
use contracts::dashboards::d400_overview::OverviewTotals;

use crate::dashboards::d400_overview;
use crate::shared::data::db::get_connection;

/// GET /api/overview
pub async fn totals() -> Result<Json<OverviewTotals>, StatusCode> {
    match d400_overview::service::totals(get_connection()).await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to compute overview totals: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
