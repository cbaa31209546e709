use contracts::domain::a001_item::{Item, ItemDto};
use contracts::shared::pagination::{Page, Pagination};
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use super::repository;
use crate::projections::p900_stock_balance;

/// Позиций на странице каталога
pub const ITEMS_PER_PAGE: u64 = 7;

/// Создание новой позиции
pub async fn create(db: &DatabaseConnection, dto: ItemDto) -> anyhow::Result<Uuid> {
    let mut aggregate = Item::new_for_insert(dto.name, dto.item_type, dto.description);

    // Before write
    aggregate.before_write();

    // Валидация
    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    if repository::find_by_name(db, &aggregate.name).await?.is_some() {
        anyhow::bail!("Item '{}' already exists", aggregate.name);
    }

    let id = repository::insert(db, &aggregate).await?;
    tracing::info!(
        "Created item {} '{}' ({})",
        id,
        aggregate.name,
        aggregate.item_type
    );
    Ok(id)
}

/// Обновление существующей позиции
///
/// Остатки не переносятся: строка регистра со старым (name, type) остаётся.
/// Возвращает false, если позиции с таким id нет.
pub async fn update(db: &DatabaseConnection, dto: ItemDto) -> anyhow::Result<bool> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let Some(mut aggregate) = repository::get_by_id(db, id).await? else {
        return Ok(false);
    };
    let previous = (aggregate.name.clone(), aggregate.item_type.clone());

    aggregate.update(&dto);
    aggregate.before_write();
    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    if let Some(other) = repository::find_by_name(db, &aggregate.name).await? {
        if other.id != aggregate.id {
            anyhow::bail!("Item '{}' already exists", aggregate.name);
        }
    }

    repository::update(db, &aggregate).await?;

    if previous != (aggregate.name.clone(), aggregate.item_type.clone()) {
        tracing::warn!(
            "Item {} renamed from '{}' ({}) to '{}' ({}); existing stock stays under the old key",
            id,
            previous.0,
            previous.1,
            aggregate.name,
            aggregate.item_type
        );
    }
    Ok(true)
}

/// Удаление позиции вместе с её строкой остатков
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<bool> {
    let txn = db.begin().await?;

    let Some(item) = repository::get_by_id(&txn, id).await? else {
        return Ok(false);
    };

    let removed =
        p900_stock_balance::repository::delete_by_key(&txn, &item.name, &item.item_type).await?;
    repository::delete(&txn, id).await?;
    txn.commit().await?;

    tracing::info!(
        "Deleted item {} '{}' ({}) and {} stock row(s)",
        id,
        item.name,
        item.item_type,
        removed
    );
    Ok(true)
}

pub async fn get_by_id(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<Option<Item>> {
    Ok(repository::get_by_id(db, id).await?)
}

/// Все позиции по алфавиту (для выпадающего списка в форме движения)
pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<Item>> {
    Ok(repository::list_all(db).await?)
}

pub async fn list_paginated(
    db: &DatabaseConnection,
    page: Option<i64>,
) -> anyhow::Result<Page<Item>> {
    let total = repository::count(db).await?;
    let pagination = Pagination::clamp(page, ITEMS_PER_PAGE, total);
    let items = repository::list_page(db, pagination.offset(), pagination.per_page).await?;
    Ok(Page { items, pagination })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    fn dto(name: &str, item_type: &str) -> ItemDto {
        ItemDto {
            id: None,
            name: name.into(),
            item_type: item_type.into(),
            description: Some("Printer supply".into()),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_blank_fields() {
        let db = connect_in_memory().await;
        create(&db, dto("HP 85A", "Toner")).await.unwrap();

        let err = create(&db, dto(" HP 85A ", "Toner")).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));

        assert!(create(&db, dto("", "Toner")).await.is_err());
        assert!(create(&db, dto("DR-2340", "  ")).await.is_err());
        assert_eq!(list_all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_stock_row() {
        let db = connect_in_memory().await;
        let id = create(&db, dto("HP 85A", "Toner")).await.unwrap();
        p900_stock_balance::repository::insert(&db, "HP 85A", "Toner", 6)
            .await
            .unwrap();

        assert!(delete(&db, id).await.unwrap());
        assert!(get_by_id(&db, id).await.unwrap().is_none());
        assert_eq!(
            p900_stock_balance::service::quantity_of(&db, "HP 85A", "Toner")
                .await
                .unwrap(),
            None
        );
        assert!(!delete(&db, id).await.unwrap());
    }

    #[tokio::test]
    async fn test_rename_leaves_stock_under_old_key() {
        let db = connect_in_memory().await;
        let id = create(&db, dto("HP 85A", "Toner")).await.unwrap();
        p900_stock_balance::repository::insert(&db, "HP 85A", "Toner", 6)
            .await
            .unwrap();

        let mut renamed = dto("HP CE285A", "Toner");
        renamed.id = Some(id.to_string());
        assert!(update(&db, renamed).await.unwrap());

        assert_eq!(
            p900_stock_balance::service::quantity_of(&db, "HP 85A", "Toner")
                .await
                .unwrap(),
            Some(6)
        );
        assert_eq!(
            p900_stock_balance::service::quantity_of(&db, "HP CE285A", "Toner")
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_update_missing_item_returns_false() {
        let db = connect_in_memory().await;
        let mut missing = dto("HP 85A", "Toner");
        missing.id = Some(Uuid::new_v4().to_string());
        assert!(!update(&db, missing).await.unwrap());

        let mut bad_id = dto("HP 85A", "Toner");
        bad_id.id = Some("42".into());
        assert!(update(&db, bad_id).await.is_err());
    }

    #[tokio::test]
    async fn test_list_paginated_clamps_page() {
        let db = connect_in_memory().await;
        for i in 0..9 {
            create(&db, dto(&format!("Item {:02}", i), "Toner"))
                .await
                .unwrap();
        }

        let page = list_paginated(&db, Some(5)).await.unwrap();
        assert_eq!(page.pagination.page, 2);
        assert_eq!(page.pagination.total_pages, 2);
        let names: Vec<_> = page.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Item 07", "Item 08"]);
    }
}
