use contracts::domain::a002_location::{Location, LocationDto};
use contracts::shared::pagination::{Page, Pagination};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::repository;

pub const LOCATIONS_PER_PAGE: u64 = 7;

/// Создание места хранения
pub async fn create(db: &DatabaseConnection, dto: LocationDto) -> anyhow::Result<Uuid> {
    let mut aggregate = Location::new_for_insert(dto.name);
    aggregate.before_write();
    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    if repository::find_by_name(db, &aggregate.name).await?.is_some() {
        anyhow::bail!("Location '{}' already exists", aggregate.name);
    }

    let id = repository::insert(db, &aggregate).await?;
    tracing::info!("Created location {} '{}'", id, aggregate.name);
    Ok(id)
}

/// Удаление места хранения; движения хранят снимок имени и не меняются
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<bool> {
    let deleted = repository::delete(db, id).await?;
    if deleted {
        tracing::info!("Deleted location {}", id);
    }
    Ok(deleted)
}

pub async fn get_by_id(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<Option<Location>> {
    Ok(repository::get_by_id(db, id).await?)
}

pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<Location>> {
    Ok(repository::list_all(db).await?)
}

pub async fn list_paginated(
    db: &DatabaseConnection,
    page: Option<i64>,
) -> anyhow::Result<Page<Location>> {
    let total = repository::count(db).await?;
    let pagination = Pagination::clamp(page, LOCATIONS_PER_PAGE, total);
    let items = repository::list_page(db, pagination.offset(), pagination.per_page).await?;
    Ok(Page { items, pagination })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    #[tokio::test]
    async fn test_create_and_delete() {
        let db = connect_in_memory().await;
        let id = create(&db, LocationDto { name: " TI ".into() }).await.unwrap();

        let loc = get_by_id(&db, id).await.unwrap().unwrap();
        assert_eq!(loc.name, "TI");

        assert!(create(&db, LocationDto { name: "TI".into() }).await.is_err());
        assert!(create(&db, LocationDto { name: "".into() }).await.is_err());

        assert!(delete(&db, id).await.unwrap());
        assert!(list_all(&db).await.unwrap().is_empty());
    }
}
