use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "p900_stock_balance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub item_name: String,
    pub item_type: String,
    pub quantity: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Строка остатков по natural key (наименование, категория)
pub async fn find_by_key<C: ConnectionTrait>(
    db: &C,
    item_name: &str,
    item_type: &str,
) -> Result<Option<Model>, DbErr> {
    Entity::find()
        .filter(Column::ItemName.eq(item_name))
        .filter(Column::ItemType.eq(item_type))
        .one(db)
        .await
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: &str) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id.to_string()).one(db).await
}

/// Создать строку остатков (только при первом поступлении)
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    item_name: &str,
    item_type: &str,
    quantity: i64,
) -> Result<Model, DbErr> {
    let model = Model {
        id: Uuid::new_v4().to_string(),
        item_name: item_name.to_string(),
        item_type: item_type.to_string(),
        quantity,
        updated_at: Utc::now(),
    };
    let active = ActiveModel {
        id: Set(model.id.clone()),
        item_name: Set(model.item_name.clone()),
        item_type: Set(model.item_type.clone()),
        quantity: Set(model.quantity),
        updated_at: Set(model.updated_at),
    };
    Entity::insert(active).exec(db).await?;
    Ok(model)
}

/// Изменить остаток на `delta`, только если результат не уходит в минус
///
/// Проверка и запись выполняются одним UPDATE. Возвращает false, если
/// строка не найдена или остаток стал бы отрицательным.
pub async fn apply_delta<C: ConnectionTrait>(db: &C, id: &str, delta: i64) -> Result<bool, DbErr> {
    let result = Entity::update_many()
        .col_expr(Column::Quantity, Expr::col(Column::Quantity).add(delta))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id))
        .filter(Expr::expr(Expr::col(Column::Quantity).add(delta)).gte(0))
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Удалить остатки позиции (при удалении позиции каталога)
pub async fn delete_by_key<C: ConnectionTrait>(
    db: &C,
    item_name: &str,
    item_type: &str,
) -> Result<u64, DbErr> {
    let result = Entity::delete_many()
        .filter(Column::ItemName.eq(item_name))
        .filter(Column::ItemType.eq(item_type))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
    Entity::find().all(db).await
}
