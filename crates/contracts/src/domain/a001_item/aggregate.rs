use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, AggregateRoot};
use crate::uuid_aggregate_id;

// ============================================================================
// ID Type
// ============================================================================

uuid_aggregate_id!(
    /// Уникальный идентификатор позиции каталога
    ItemId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Позиция каталога (расходник: тонер, барабан, этикетки и т.п.)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Уникальное наименование
    pub name: String,
    /// Категория в свободной форме (например, "Toner")
    #[serde(rename = "type")]
    pub item_type: String,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Создать новую позицию для вставки в БД
    pub fn new_for_insert(name: String, item_type: String, description: Option<String>) -> Self {
        Self {
            id: ItemId::new_v4(),
            name,
            item_type,
            description,
            created_at: Utc::now(),
        }
    }

    /// Получить ID как строку
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Обновить данные из DTO
    ///
    /// Остатки ведутся по паре (name, type), поэтому переименование
    /// оставляет прежнюю строку остатков без владельца.
    pub fn update(&mut self, dto: &ItemDto) {
        self.name = dto.name.clone();
        self.item_type = dto.item_type.clone();
        self.description = dto.description.clone();
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Item name must not be empty".into());
        }
        if self.item_type.trim().is_empty() {
            return Err("Item type must not be empty".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.name = self.name.trim().to_string();
        self.item_type = self.item_type.trim().to_string();
        self.description = self
            .description
            .take()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
    }
}

impl AggregateRoot for Item {
    type Id = ItemId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "item"
    }

    fn element_name() -> &'static str {
        "Item"
    }

    fn list_name() -> &'static str {
        "Items"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления позиции
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ItemDto {
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_before_write_trims_and_drops_blank_description() {
        let mut item = Item::new_for_insert(
            "  HP 85A ".into(),
            " Toner ".into(),
            Some("   ".into()),
        );
        item.before_write();
        assert_eq!(item.name, "HP 85A");
        assert_eq!(item.item_type, "Toner");
        assert_eq!(item.description, None);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_name_and_type() {
        let item = Item::new_for_insert(" ".into(), "Toner".into(), None);
        assert!(item.validate().is_err());
        let item = Item::new_for_insert("HP 85A".into(), "".into(), None);
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_table_name() {
        assert_eq!(Item::full_name(), "a001_item");
    }
}
