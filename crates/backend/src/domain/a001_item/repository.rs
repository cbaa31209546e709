use contracts::domain::a001_item::{Item, ItemId};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub name: String,
    pub item_type: String,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Item {
    fn from(m: Model) -> Self {
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        Item {
            id: ItemId::new(uuid),
            name: m.name,
            item_type: m.item_type,
            description: m.description,
            created_at: m.created_at,
        }
    }
}

pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Item>, DbErr> {
    let result = Entity::find_by_id(id.to_string()).one(db).await?;
    Ok(result.map(Into::into))
}

pub async fn find_by_name<C: ConnectionTrait>(db: &C, name: &str) -> Result<Option<Item>, DbErr> {
    let result = Entity::find()
        .filter(Column::Name.eq(name))
        .one(db)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn list_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Item>, DbErr> {
    let items = Entity::find()
        .order_by_asc(Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    Entity::find().count(db).await
}

/// Страница списка, упорядоченного по наименованию
pub async fn list_page<C: ConnectionTrait>(
    db: &C,
    offset: u64,
    limit: u64,
) -> Result<Vec<Item>, DbErr> {
    let items = Entity::find()
        .order_by_asc(Column::Name)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn insert<C: ConnectionTrait>(db: &C, aggregate: &Item) -> Result<Uuid, DbErr> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        name: Set(aggregate.name.clone()),
        item_type: Set(aggregate.item_type.clone()),
        description: Set(aggregate.description.clone()),
        created_at: Set(aggregate.created_at),
    };
    Entity::insert(active).exec(db).await?;
    Ok(uuid)
}

pub async fn update<C: ConnectionTrait>(db: &C, aggregate: &Item) -> Result<(), DbErr> {
    let active = ActiveModel {
        id: Set(aggregate.id.value().to_string()),
        name: Set(aggregate.name.clone()),
        item_type: Set(aggregate.item_type.clone()),
        description: Set(aggregate.description.clone()),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    Entity::update(active).exec(db).await?;
    Ok(())
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}
