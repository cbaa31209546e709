use std::collections::HashMap;

use contracts::domain::a003_stock_movement::{MovementDirection, StockMovement};
use contracts::projections::p900_stock_balance::{category_rank, StockBalanceDto};
use sea_orm::{ConnectionTrait, DbErr};

use super::repository;
use crate::domain::a001_item;
use crate::domain::a003_stock_movement::error::LedgerError;

/// Провести движение по регистру остатков
///
/// Вызывается внутри транзакции движения. Возвращает остаток после проведения.
pub async fn post_movement<C: ConnectionTrait>(
    db: &C,
    movement: &StockMovement,
) -> Result<i64, LedgerError> {
    let row = repository::find_by_key(db, &movement.item_name, &movement.item_type).await?;

    match row {
        Some(row) => post_to_row(db, movement, &row).await,
        None => match movement.direction {
            MovementDirection::Saida => Err(no_stock_record(movement)),
            MovementDirection::Entrada => {
                let created = repository::insert(
                    db,
                    &movement.item_name,
                    &movement.item_type,
                    movement.quantity,
                )
                .await?;
                Ok(created.quantity)
            }
        },
    }
}

/// Проведение по прочитанной строке; `row` может уже устареть
async fn post_to_row<C: ConnectionTrait>(
    db: &C,
    movement: &StockMovement,
    row: &repository::Model,
) -> Result<i64, LedgerError> {
    let delta = movement.balance_delta();
    let resulting = checked_balance(movement, row.quantity, delta)?;
    if resulting < 0 {
        return Err(insufficient_stock(movement, row.quantity));
    }

    if !repository::apply_delta(db, &row.id, delta).await? {
        // остаток успел измениться между чтением и записью
        let available = current_quantity(db, &row.id).await?;
        checked_balance(movement, available, delta)?;
        return Err(insufficient_stock(movement, available));
    }

    current_quantity(db, &row.id).await.map_err(Into::into)
}

/// Отменить проведение движения (сторно)
///
/// Возвращает новый остаток или None, если строки остатков нет и
/// сторнируется поступление: корректировать нечего.
pub async fn unpost_movement<C: ConnectionTrait>(
    db: &C,
    movement: &StockMovement,
) -> Result<Option<i64>, LedgerError> {
    let row = repository::find_by_key(db, &movement.item_name, &movement.item_type).await?;

    match row {
        Some(row) => unpost_from_row(db, movement, &row).await.map(Some),
        None => match movement.direction {
            MovementDirection::Saida => Err(no_stock_record(movement)),
            MovementDirection::Entrada => Ok(None),
        },
    }
}

/// Сторно по прочитанной строке; `row` может уже устареть
async fn unpost_from_row<C: ConnectionTrait>(
    db: &C,
    movement: &StockMovement,
    row: &repository::Model,
) -> Result<i64, LedgerError> {
    let delta = movement.reversal_delta();
    let resulting = checked_balance(movement, row.quantity, delta)?;
    if resulting < 0 {
        return Err(negative_on_reversal(movement, resulting));
    }

    if !repository::apply_delta(db, &row.id, delta).await? {
        let current = current_quantity(db, &row.id).await?;
        let resulting = checked_balance(movement, current, delta)?;
        return Err(negative_on_reversal(movement, resulting));
    }

    Ok(current_quantity(db, &row.id).await?)
}

/// Остаток после изменения на `delta` без переполнения i64
fn checked_balance(movement: &StockMovement, current: i64, delta: i64) -> Result<i64, LedgerError> {
    current
        .checked_add(delta)
        .ok_or_else(|| LedgerError::BalanceOverflow {
            item_name: movement.item_name.clone(),
            item_type: movement.item_type.clone(),
            current,
            delta,
        })
}

fn insufficient_stock(movement: &StockMovement, available: i64) -> LedgerError {
    LedgerError::InsufficientStock {
        item_name: movement.item_name.clone(),
        item_type: movement.item_type.clone(),
        available,
        requested: movement.quantity,
    }
}

fn negative_on_reversal(movement: &StockMovement, resulting: i64) -> LedgerError {
    LedgerError::NegativeStockOnReversal {
        movement_id: movement.to_string_id(),
        item_name: movement.item_name.clone(),
        item_type: movement.item_type.clone(),
        resulting,
    }
}

fn no_stock_record(movement: &StockMovement) -> LedgerError {
    LedgerError::NoStockRecord {
        item_name: movement.item_name.clone(),
        item_type: movement.item_type.clone(),
    }
}

async fn current_quantity<C: ConnectionTrait>(db: &C, id: &str) -> Result<i64, DbErr> {
    Ok(repository::get_by_id(db, id)
        .await?
        .map(|m| m.quantity)
        .unwrap_or(0))
}

/// Текущий остаток по (наименование, категория); None, если строки нет
pub async fn quantity_of<C: ConnectionTrait>(
    db: &C,
    item_name: &str,
    item_type: &str,
) -> Result<Option<i64>, DbErr> {
    Ok(repository::find_by_key(db, item_name, item_type)
        .await?
        .map(|m| m.quantity))
}

/// Экран остатков: все строки регистра с описанием позиции
///
/// Описание подтягивается по наименованию позиции. Сортировка: основные
/// категории (Toner, Cilindro, Etiqueta, Ribbon), затем остальные, внутри по имени.
pub async fn list_balances<C: ConnectionTrait>(db: &C) -> anyhow::Result<Vec<StockBalanceDto>> {
    let descriptions: HashMap<String, Option<String>> = a001_item::repository::list_all(db)
        .await?
        .into_iter()
        .map(|item| (item.name, item.description))
        .collect();

    let mut rows: Vec<StockBalanceDto> = repository::list_all(db)
        .await?
        .into_iter()
        .map(|m| StockBalanceDto {
            description: descriptions.get(&m.item_name).cloned().flatten(),
            item_name: m.item_name,
            item_type: m.item_type,
            quantity: m.quantity,
        })
        .collect();

    rows.sort_by(|a, b| {
        category_rank(&a.item_type)
            .cmp(&category_rank(&b.item_type))
            .then_with(|| a.item_name.cmp(&b.item_name))
    });
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    fn movement(direction: MovementDirection, quantity: i64) -> StockMovement {
        StockMovement::record(
            "HP 85A".into(),
            "Toner".into(),
            quantity,
            direction,
            "ana".into(),
            None,
        )
    }

    #[tokio::test]
    async fn test_post_creates_row_only_for_entrada() {
        let db = connect_in_memory().await;

        let err = post_movement(&db, &movement(MovementDirection::Saida, 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "no_stock_record");
        assert_eq!(quantity_of(&db, "HP 85A", "Toner").await.unwrap(), None);

        let qty = post_movement(&db, &movement(MovementDirection::Entrada, 4))
            .await
            .unwrap();
        assert_eq!(qty, 4);
        assert_eq!(quantity_of(&db, "HP 85A", "Toner").await.unwrap(), Some(4));
    }

    #[tokio::test]
    async fn test_unpost_entrada_without_row_is_noop() {
        let db = connect_in_memory().await;
        let result = unpost_movement(&db, &movement(MovementDirection::Entrada, 3))
            .await
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(quantity_of(&db, "HP 85A", "Toner").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_post_overflowing_entrada_is_rejected() {
        let db = connect_in_memory().await;
        post_movement(&db, &movement(MovementDirection::Entrada, 1))
            .await
            .unwrap();

        let err = post_movement(&db, &movement(MovementDirection::Entrada, i64::MAX))
            .await
            .unwrap_err();
        match err {
            LedgerError::BalanceOverflow { current, delta, .. } => {
                assert_eq!((current, delta), (1, i64::MAX))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(quantity_of(&db, "HP 85A", "Toner").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_unpost_overflowing_saida_is_rejected() {
        let db = connect_in_memory().await;
        repository::insert(&db, "HP 85A", "Toner", i64::MAX - 1)
            .await
            .unwrap();

        let err = unpost_movement(&db, &movement(MovementDirection::Saida, 5))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "balance_overflow");
        assert_eq!(
            quantity_of(&db, "HP 85A", "Toner").await.unwrap(),
            Some(i64::MAX - 1)
        );
    }

    #[tokio::test]
    async fn test_post_with_stale_row_reports_current_stock() {
        let db = connect_in_memory().await;
        let stale = repository::insert(&db, "HP 85A", "Toner", 5).await.unwrap();
        // другой запрос списал 4 после нашего чтения
        assert!(repository::apply_delta(&db, &stale.id, -4).await.unwrap());

        let err = post_to_row(&db, &movement(MovementDirection::Saida, 3), &stale)
            .await
            .unwrap_err();
        match err {
            LedgerError::InsufficientStock {
                available,
                requested,
                ..
            } => assert_eq!((available, requested), (1, 3)),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(quantity_of(&db, "HP 85A", "Toner").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_unpost_with_stale_row_reports_resulting_stock() {
        let db = connect_in_memory().await;
        let stale = repository::insert(&db, "HP 85A", "Toner", 5).await.unwrap();
        assert!(repository::apply_delta(&db, &stale.id, -4).await.unwrap());

        let err = unpost_from_row(&db, &movement(MovementDirection::Entrada, 3), &stale)
            .await
            .unwrap_err();
        match err {
            LedgerError::NegativeStockOnReversal { resulting, .. } => assert_eq!(resulting, -2),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(quantity_of(&db, "HP 85A", "Toner").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_apply_delta_refuses_negative() {
        let db = connect_in_memory().await;
        let row = repository::insert(&db, "Zebra 50x30", "Etiqueta", 2)
            .await
            .unwrap();
        assert!(!repository::apply_delta(&db, &row.id, -3).await.unwrap());
        assert!(repository::apply_delta(&db, &row.id, -2).await.unwrap());
        assert_eq!(current_quantity(&db, &row.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_balances_orders_by_category_then_name() {
        let db = connect_in_memory().await;
        repository::insert(&db, "Papel A4", "Papel", 10).await.unwrap();
        repository::insert(&db, "Ribbon 110", "Ribbon", 1).await.unwrap();
        repository::insert(&db, "HP 85A", "Toner", 3).await.unwrap();
        repository::insert(&db, "Brother TN", "Toner", 5).await.unwrap();
        repository::insert(&db, "DR-2340", "Cilindro", 2).await.unwrap();

        let names: Vec<String> = list_balances(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.item_name)
            .collect();
        assert_eq!(
            names,
            vec!["Brother TN", "HP 85A", "DR-2340", "Ribbon 110", "Papel A4"]
        );
    }
}
