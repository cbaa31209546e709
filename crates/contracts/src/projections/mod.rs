pub mod p900_stock_balance;
