use contracts::domain::a001_item::Item;
use contracts::domain::a002_location::Location;
use contracts::domain::a003_stock_movement::StockMovement;
use contracts::domain::common::AggregateRoot;
use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};
use std::path::Path;

use crate::projections::p900_stock_balance::STOCK_BALANCE_TABLE;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

fn build_sqlite_url(path: &Path) -> String {
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// DDL всех таблиц: (имя таблицы, CREATE ... IF NOT EXISTS)
fn schema_statements() -> Vec<(String, String)> {
    let item = Item::full_name();
    let location = Location::full_name();
    let movement = StockMovement::full_name();
    let balance = STOCK_BALANCE_TABLE.to_string();

    vec![
        (
            item.clone(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {item} (
                    id TEXT PRIMARY KEY NOT NULL,
                    name TEXT NOT NULL UNIQUE,
                    item_type TEXT NOT NULL,
                    description TEXT,
                    created_at TEXT NOT NULL
                );
                "#
            ),
        ),
        (
            location.clone(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {location} (
                    id TEXT PRIMARY KEY NOT NULL,
                    name TEXT NOT NULL UNIQUE,
                    created_at TEXT NOT NULL
                );
                "#
            ),
        ),
        (
            movement.clone(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {movement} (
                    id TEXT PRIMARY KEY NOT NULL,
                    item_name TEXT NOT NULL,
                    item_type TEXT NOT NULL,
                    quantity INTEGER NOT NULL CHECK (quantity > 0),
                    direction TEXT NOT NULL CHECK (direction IN ('entrada', 'saida')),
                    actor TEXT NOT NULL,
                    location_name TEXT,
                    moved_at TEXT NOT NULL,
                    seq INTEGER NOT NULL UNIQUE
                );
                CREATE INDEX IF NOT EXISTS idx_{movement}_moved_at ON {movement} (moved_at, seq);
                "#
            ),
        ),
        (
            balance.clone(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {balance} (
                    id TEXT PRIMARY KEY NOT NULL,
                    item_name TEXT NOT NULL,
                    item_type TEXT NOT NULL,
                    quantity INTEGER NOT NULL CHECK (quantity >= 0),
                    updated_at TEXT NOT NULL,
                    UNIQUE (item_name, item_type)
                );
                "#
            ),
        ),
    ]
}

/// Создать недостающие таблицы (идемпотентно)
pub async fn apply_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for (table, ddl) in schema_statements() {
        // SQLite выполняет по одному выражению за раз
        for sql in ddl.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            conn.execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                sql.to_string(),
            ))
            .await?;
        }
        tracing::debug!("Table {} is ready", table);
    }
    Ok(())
}

/// Открыть файл БД, создать схему и сохранить подключение для обработчиков
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    let db_url = build_sqlite_url(&absolute_path);
    tracing::info!("Opening database {}", absolute_path.display());

    let conn = Database::connect(&db_url).await?;
    apply_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Отдельная БД в памяти со схемой (для тестов)
#[cfg(test)]
pub async fn connect_in_memory() -> DatabaseConnection {
    use sea_orm::ConnectOptions;

    // Одно соединение: каждое новое соединение к :memory: видит пустую БД
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options)
        .await
        .expect("in-memory sqlite");
    apply_schema(&conn).await.expect("schema");
    conn
}

/// БД в файле с пулом на несколько соединений (для тестов конкурентного доступа)
#[cfg(test)]
pub async fn connect_file(db_file: &Path, max_connections: u32) -> DatabaseConnection {
    use sea_orm::ConnectOptions;

    let mut options = ConnectOptions::new(build_sqlite_url(db_file));
    options
        .max_connections(max_connections)
        .sqlx_logging(false);
    let conn = Database::connect(options).await.expect("file sqlite");
    apply_schema(&conn).await.expect("schema");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sqlite_url() {
        assert_eq!(
            build_sqlite_url(Path::new("/var/lib/keeper/keeper.db")),
            "sqlite:///var/lib/keeper/keeper.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\keeper.db")),
            "sqlite:///C:/data/keeper.db?mode=rwc"
        );
    }

    #[tokio::test]
    async fn test_apply_schema_is_idempotent() {
        let conn = connect_in_memory().await;
        apply_schema(&conn).await.unwrap();

        let rows = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name".to_string(),
            ))
            .await
            .unwrap();
        let names: Vec<String> = rows
            .iter()
            .map(|r| r.try_get::<String>("", "name").unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "a001_item",
                "a002_location",
                "a003_stock_movement",
                "p900_stock_balance"
            ]
        );
    }
}
