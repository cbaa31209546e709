pub mod dto;

pub use dto::{category_rank, StockBalanceDto};
