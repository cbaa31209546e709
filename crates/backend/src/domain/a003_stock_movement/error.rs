use sea_orm::DbErr;
use thiserror::Error;

/// Ошибки журнала движений
///
/// Любая ошибка до `commit` откатывает транзакцию; повторять запрос
/// (с исправленными данными) должен вызывающий.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Item not found: {0}")]
    InvalidItem(String),

    #[error("Location not found: {0}")]
    InvalidLocation(String),

    #[error(
        "Insufficient stock for {item_name} ({item_type}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        item_name: String,
        item_type: String,
        available: i64,
        requested: i64,
    },

    #[error("No stock record for {item_name} ({item_type})")]
    NoStockRecord { item_name: String, item_type: String },

    #[error("Movement not found: {0}")]
    MovementNotFound(String),

    #[error(
        "Cannot reverse movement {movement_id}: stock of {item_name} ({item_type}) would become {resulting}"
    )]
    NegativeStockOnReversal {
        movement_id: String,
        item_name: String,
        item_type: String,
        resulting: i64,
    },

    #[error("Stock of {item_name} ({item_type}) would exceed the storable maximum: {current} + {delta}")]
    BalanceOverflow {
        item_name: String,
        item_type: String,
        current: i64,
        delta: i64,
    },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl LedgerError {
    /// Стабильный код ошибки для API
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InvalidInput(_) => "invalid_input",
            LedgerError::InvalidItem(_) => "invalid_item",
            LedgerError::InvalidLocation(_) => "invalid_location",
            LedgerError::InsufficientStock { .. } => "insufficient_stock",
            LedgerError::NoStockRecord { .. } => "no_stock_record",
            LedgerError::MovementNotFound(_) => "movement_not_found",
            LedgerError::NegativeStockOnReversal { .. } => "negative_stock_on_reversal",
            LedgerError::BalanceOverflow { .. } => "balance_overflow",
            LedgerError::Database(_) => "database",
        }
    }
}
