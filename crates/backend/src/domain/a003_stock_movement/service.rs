use chrono::{Duration, NaiveDate};
use contracts::domain::a003_stock_movement::{
    ApplyMovementDto, MovementDirection, MovementReportPage, MovementReportQuery, StockMovement,
};
use contracts::shared::pagination::Pagination;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use super::error::LedgerError;
use super::repository::{self, MovementFilter};
use crate::domain::{a001_item, a002_location};
use crate::projections::p900_stock_balance;

/// Строк на странице отчёта
pub const REPORT_PER_PAGE: u64 = 10;
/// Сколько последних движений показывать под формой
pub const RECENT_DEFAULT_LIMIT: u64 = 5;

/// Зарегистрировать движение
///
/// Проверка формы выполняется до обращения к БД. Проведение по регистру
/// остатков и запись в журнал идут в одной транзакции: при любой ошибке
/// транзакция откатывается и ничего не сохраняется.
pub async fn apply_movement(
    db: &DatabaseConnection,
    dto: &ApplyMovementDto,
    actor: &str,
) -> Result<StockMovement, LedgerError> {
    let request = dto.parse().map_err(LedgerError::InvalidInput)?;
    let actor = actor.trim();
    if actor.is_empty() {
        return Err(LedgerError::InvalidInput("Acting user is required".into()));
    }

    let txn = db.begin().await?;

    let item_id = Uuid::parse_str(&request.item_id)
        .map_err(|_| LedgerError::InvalidItem(request.item_id.clone()))?;
    let item = a001_item::repository::get_by_id(&txn, item_id)
        .await?
        .ok_or_else(|| LedgerError::InvalidItem(request.item_id.clone()))?;

    let location_name = match &request.location_id {
        Some(location_id) => {
            let location = match Uuid::parse_str(location_id) {
                Ok(uuid) => a002_location::repository::get_by_id(&txn, uuid).await?,
                Err(_) => None,
            };
            let location =
                location.ok_or_else(|| LedgerError::InvalidLocation(location_id.clone()))?;
            Some(location.name)
        }
        None => None,
    };

    let movement = StockMovement::record(
        item.name,
        item.item_type,
        request.quantity,
        request.direction,
        actor.to_string(),
        location_name,
    );

    let balance = match p900_stock_balance::service::post_movement(&txn, &movement).await {
        Ok(balance) => balance,
        Err(e) => {
            tracing::warn!(
                "Rejected {} of {}x {} ({}) by {}: {}",
                movement.direction,
                movement.quantity,
                movement.item_name,
                movement.item_type,
                movement.actor,
                e
            );
            return Err(e);
        }
    };
    repository::insert(&txn, &movement).await?;
    txn.commit().await?;

    tracing::info!(
        "Movement {} registered: {} of {}x {} ({}){} by {}, balance now {}",
        movement.id,
        movement.direction,
        movement.quantity,
        movement.item_name,
        movement.item_type,
        movement
            .location_name
            .as_ref()
            .map(|l| format!(" at {}", l))
            .unwrap_or_default(),
        movement.actor,
        balance
    );
    Ok(movement)
}

/// Сторнировать движение: обратная корректировка остатка и удаление записи
///
/// Отказ, если остаток после корректировки стал бы отрицательным (например,
/// поступление уже частично израсходовано более поздними движениями).
pub async fn reverse_movement(db: &DatabaseConnection, movement_id: &str) -> Result<(), LedgerError> {
    let id = Uuid::parse_str(movement_id.trim())
        .map_err(|_| LedgerError::MovementNotFound(movement_id.to_string()))?;

    let txn = db.begin().await?;

    let movement = repository::get_by_id(&txn, id)
        .await?
        .ok_or_else(|| LedgerError::MovementNotFound(movement_id.to_string()))?;

    let balance = match p900_stock_balance::service::unpost_movement(&txn, &movement).await {
        Ok(balance) => balance,
        Err(e) => {
            tracing::warn!("Rejected reversal of movement {}: {}", movement.id, e);
            return Err(e);
        }
    };
    repository::delete(&txn, id).await?;
    txn.commit().await?;

    match balance {
        Some(quantity) => tracing::info!(
            "Movement {} reversed: {} ({}) balance now {}",
            movement.id,
            movement.item_name,
            movement.item_type,
            quantity
        ),
        None => tracing::info!(
            "Movement {} reversed without stock row for {} ({})",
            movement.id,
            movement.item_name,
            movement.item_type
        ),
    }
    Ok(())
}

pub async fn get_by_id(db: &DatabaseConnection, id: Uuid) -> anyhow::Result<Option<StockMovement>> {
    Ok(repository::get_by_id(db, id).await?)
}

/// Последние движения для экрана регистрации
pub async fn list_recent(
    db: &DatabaseConnection,
    limit: Option<u64>,
    actor: Option<&str>,
) -> anyhow::Result<Vec<StockMovement>> {
    let limit = limit.filter(|l| *l > 0).unwrap_or(RECENT_DEFAULT_LIMIT);
    let actor = actor.map(str::trim).filter(|a| !a.is_empty());
    Ok(repository::list_recent(db, limit, actor).await?)
}

fn parse_date(value: &Option<String>, field: &str) -> anyhow::Result<Option<NaiveDate>> {
    match value.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", field, s, e)),
    }
}

/// Собрать фильтр из параметров отчёта
///
/// Неизвестное направление не фильтрует; даты включительные.
pub fn build_filter(query: &MovementReportQuery) -> anyhow::Result<MovementFilter> {
    let direction = query
        .direction
        .as_deref()
        .and_then(|d| d.parse::<MovementDirection>().ok());
    let from = parse_date(&query.date_from, "date_from")?;
    let to = parse_date(&query.date_to, "date_to")?;

    Ok(MovementFilter {
        direction,
        from: from.map(|d| d.format("%Y-%m-%d").to_string()),
        until: to.map(|d| (d + Duration::days(1)).format("%Y-%m-%d").to_string()),
    })
}

/// Отчёт по поступлениям и расходам
pub async fn report(
    db: &DatabaseConnection,
    query: &MovementReportQuery,
) -> anyhow::Result<MovementReportPage> {
    let filter = build_filter(query)?;
    let total = repository::count_filtered(db, &filter).await?;
    let pagination = Pagination::clamp(query.page, REPORT_PER_PAGE, total);
    let items =
        repository::list_filtered(db, &filter, pagination.offset(), pagination.per_page).await?;
    Ok(MovementReportPage { items, pagination })
}
