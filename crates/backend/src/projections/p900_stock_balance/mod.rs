pub mod repository;
pub mod service;

/// Регистр остатков: одна строка на пару (наименование, категория)
pub const STOCK_BALANCE_TABLE: &str = "p900_stock_balance";
