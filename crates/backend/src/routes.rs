use axum::{
    routing::{delete, get},
    Router,
};

use crate::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // CATALOG
        // ========================================
        .route(
            "/api/items",
            get(handlers::a001_item::list_paginated).post(handlers::a001_item::create),
        )
        .route(
            "/api/items/:id",
            get(handlers::a001_item::get_by_id)
                .put(handlers::a001_item::update)
                .delete(handlers::a001_item::delete),
        )
        .route(
            "/api/locations",
            get(handlers::a002_location::list_paginated).post(handlers::a002_location::create),
        )
        .route(
            "/api/locations/:id",
            delete(handlers::a002_location::delete),
        )
        // ========================================
        // STOCK LEDGER
        // ========================================
        .route(
            "/api/stock",
            get(handlers::p900_stock_balance::list_balances),
        )
        .route(
            "/api/stock-movements",
            axum::routing::post(handlers::a003_stock_movement::apply),
        )
        .route(
            "/api/stock-movements/recent",
            get(handlers::a003_stock_movement::recent),
        )
        .route(
            "/api/stock-movements/report",
            get(handlers::a003_stock_movement::report),
        )
        .route(
            "/api/stock-movements/:id",
            delete(handlers::a003_stock_movement::reverse),
        )
        // ========================================
        // DASHBOARDS
        // ========================================
        .route("/api/overview", get(handlers::d400_overview::totals))
}
