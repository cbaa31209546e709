pub mod common;

pub mod a001_item;
pub mod a002_location;
pub mod a003_stock_movement;
