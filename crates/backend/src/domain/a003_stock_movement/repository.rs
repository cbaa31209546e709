use chrono::{DateTime, SecondsFormat, Utc};
use contracts::domain::a003_stock_movement::{MovementDirection, StockMovement, StockMovementId};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_stock_movement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub item_name: String,
    pub item_type: String,
    pub quantity: i64,
    pub direction: String,
    pub actor: String,
    pub location_name: Option<String>,
    /// RFC 3339, UTC, микросекунды: строковый порядок совпадает с хронологическим
    pub moved_at: String,
    /// Порядковый номер записи: упорядочивает движения с одинаковым moved_at
    pub seq: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Ключ времени движения в БД
pub fn moved_at_key(moved_at: &DateTime<Utc>) -> String {
    moved_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl TryFrom<Model> for StockMovement {
    type Error = DbErr;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(&m.id)
            .map_err(|e| DbErr::Type(format!("movement id '{}': {}", m.id, e)))?;
        let direction = m
            .direction
            .parse::<MovementDirection>()
            .map_err(DbErr::Type)?;
        let moved_at = DateTime::parse_from_rfc3339(&m.moved_at)
            .map_err(|e| DbErr::Type(format!("moved_at '{}': {}", m.moved_at, e)))?
            .with_timezone(&Utc);

        Ok(StockMovement {
            id: StockMovementId::new(uuid),
            item_name: m.item_name,
            item_type: m.item_type,
            quantity: m.quantity,
            direction,
            actor: m.actor,
            location_name: m.location_name,
            moved_at,
        })
    }
}

fn into_movements(models: Vec<Model>) -> Result<Vec<StockMovement>, DbErr> {
    models.into_iter().map(StockMovement::try_from).collect()
}

/// Фильтр отчёта по движениям
#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub direction: Option<MovementDirection>,
    /// Нижняя граница moved_at включительно (YYYY-MM-DD)
    pub from: Option<String>,
    /// Верхняя граница moved_at не включительно (YYYY-MM-DD следующего дня)
    pub until: Option<String>,
}

impl MovementFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(direction) = self.direction {
            condition = condition.add(Column::Direction.eq(direction.as_str()));
        }
        if let Some(from) = &self.from {
            condition = condition.add(Column::MovedAt.gte(from.as_str()));
        }
        if let Some(until) = &self.until {
            condition = condition.add(Column::MovedAt.lt(until.as_str()));
        }
        condition
    }
}

/// Добавить запись в журнал
///
/// `seq` вычисляется тем же INSERT, поэтому номера строго растут в порядке записи.
pub async fn insert<C: ConnectionTrait>(db: &C, movement: &StockMovement) -> Result<(), DbErr> {
    let next_seq = Expr::cust(format!(
        "(SELECT COALESCE(MAX(seq), 0) + 1 FROM {})",
        Entity.table_name()
    ));
    let mut stmt = Query::insert();
    stmt.into_table(Entity)
        .columns([
            Column::Id,
            Column::ItemName,
            Column::ItemType,
            Column::Quantity,
            Column::Direction,
            Column::Actor,
            Column::LocationName,
            Column::MovedAt,
            Column::Seq,
        ])
        .values([
            movement.to_string_id().into(),
            movement.item_name.clone().into(),
            movement.item_type.clone().into(),
            movement.quantity.into(),
            movement.direction.as_str().into(),
            movement.actor.clone().into(),
            movement.location_name.clone().into(),
            moved_at_key(&movement.moved_at).into(),
            next_seq,
        ])
        .map_err(|e| DbErr::Custom(format!("movement insert: {}", e)))?;

    db.execute(db.get_database_backend().build(&stmt)).await?;
    Ok(())
}

pub async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<Option<StockMovement>, DbErr> {
    Entity::find_by_id(id.to_string())
        .one(db)
        .await?
        .map(StockMovement::try_from)
        .transpose()
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    Entity::find().count(db).await
}

/// Последние движения (новые сверху), при необходимости только одного пользователя
pub async fn list_recent<C: ConnectionTrait>(
    db: &C,
    limit: u64,
    actor: Option<&str>,
) -> Result<Vec<StockMovement>, DbErr> {
    let mut query = Entity::find();
    if let Some(actor) = actor {
        query = query.filter(Column::Actor.eq(actor));
    }
    let models = query
        .order_by_desc(Column::MovedAt)
        .order_by_desc(Column::Seq)
        .limit(limit)
        .all(db)
        .await?;
    into_movements(models)
}

pub async fn count_filtered<C: ConnectionTrait>(
    db: &C,
    filter: &MovementFilter,
) -> Result<u64, DbErr> {
    Entity::find().filter(filter.condition()).count(db).await
}

/// Страница отчёта, новые сверху
pub async fn list_filtered<C: ConnectionTrait>(
    db: &C,
    filter: &MovementFilter,
    offset: u64,
    limit: u64,
) -> Result<Vec<StockMovement>, DbErr> {
    let models = Entity::find()
        .filter(filter.condition())
        .order_by_desc(Column::MovedAt)
        .order_by_desc(Column::Seq)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;
    into_movements(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    fn movement_at(moved_at: DateTime<Utc>, actor: &str) -> StockMovement {
        let mut m = StockMovement::record(
            "HP 85A".into(),
            "Toner".into(),
            1,
            MovementDirection::Entrada,
            actor.into(),
            None,
        );
        m.moved_at = moved_at;
        m
    }

    #[tokio::test]
    async fn test_same_timestamp_keeps_insertion_order() {
        let db = connect_in_memory().await;
        let moved_at = Utc::now();
        for actor in ["first", "second", "third"] {
            insert(&db, &movement_at(moved_at, actor)).await.unwrap();
        }

        let actors: Vec<String> = list_recent(&db, 10, None)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.actor)
            .collect();
        assert_eq!(actors, vec!["third", "second", "first"]);

        let page = list_filtered(&db, &MovementFilter::default(), 0, 2)
            .await
            .unwrap();
        assert_eq!(page[0].actor, "third");
        assert_eq!(page[1].actor, "second");
    }

    #[tokio::test]
    async fn test_seq_stays_monotonic_after_delete() {
        let db = connect_in_memory().await;
        let moved_at = Utc::now();
        let first = movement_at(moved_at, "first");
        let second = movement_at(moved_at, "second");
        insert(&db, &first).await.unwrap();
        insert(&db, &second).await.unwrap();
        assert!(delete(&db, first.id.value()).await.unwrap());
        insert(&db, &movement_at(moved_at, "third")).await.unwrap();

        let actors: Vec<String> = list_recent(&db, 10, None)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.actor)
            .collect();
        assert_eq!(actors, vec!["third", "second"]);
    }
}
