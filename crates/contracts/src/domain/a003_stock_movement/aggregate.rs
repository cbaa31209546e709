use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::common::{AggregateId, AggregateRoot};
use crate::uuid_aggregate_id;

uuid_aggregate_id!(
    /// Уникальный идентификатор движения
    StockMovementId
);

// ============================================================================
// Direction
// ============================================================================

/// Направление движения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    /// Поступление (увеличивает остаток)
    Entrada,
    /// Расход (уменьшает остаток)
    Saida,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::Entrada => "entrada",
            MovementDirection::Saida => "saida",
        }
    }

    /// Изменение остатка при проведении движения на `quantity`
    pub fn signed(&self, quantity: i64) -> i64 {
        match self {
            MovementDirection::Entrada => quantity,
            MovementDirection::Saida => -quantity,
        }
    }
}

impl FromStr for MovementDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "entrada" => Ok(MovementDirection::Entrada),
            "saida" => Ok(MovementDirection::Saida),
            other => Err(format!(
                "Direction must be 'entrada' or 'saida', got '{}'",
                other
            )),
        }
    }
}

impl std::fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Запись журнала движений
///
/// Наименование, категория позиции и место хранения копируются в момент
/// записи и больше не пересчитываются. После создания запись не меняется,
/// её можно только сторнировать (удалить с обратной корректировкой остатка).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: StockMovementId,
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(rename = "itemType")]
    pub item_type: String,
    pub quantity: i64,
    pub direction: MovementDirection,
    pub actor: String,
    #[serde(rename = "locationName")]
    pub location_name: Option<String>,
    #[serde(rename = "movedAt")]
    pub moved_at: DateTime<Utc>,
}

impl StockMovement {
    /// Новое движение со снимком позиции и временем записи (с точностью до микросекунд)
    pub fn record(
        item_name: String,
        item_type: String,
        quantity: i64,
        direction: MovementDirection,
        actor: String,
        location_name: Option<String>,
    ) -> Self {
        Self {
            id: StockMovementId::new_v4(),
            item_name,
            item_type,
            quantity,
            direction,
            actor,
            location_name,
            moved_at: Utc::now().trunc_subsecs(6),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Влияние движения на остаток
    pub fn balance_delta(&self) -> i64 {
        self.direction.signed(self.quantity)
    }

    /// Корректировка остатка при сторнировании
    pub fn reversal_delta(&self) -> i64 {
        -self.balance_delta()
    }
}

impl AggregateRoot for StockMovement {
    type Id = StockMovementId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "stock_movement"
    }

    fn element_name() -> &'static str {
        "Stock movement"
    }

    fn list_name() -> &'static str {
        "Stock movements"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Наибольшее количество в одном движении
pub const MAX_MOVEMENT_QUANTITY: i64 = i32::MAX as i64;

/// Запрос на регистрацию движения (как приходит из формы)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApplyMovementDto {
    #[serde(rename = "itemId")]
    pub item_id: String,
    pub quantity: i64,
    pub direction: String,
    #[serde(rename = "locationId", default)]
    pub location_id: Option<String>,
}

/// Проверенный запрос на движение
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRequest {
    pub item_id: String,
    pub quantity: i64,
    pub direction: MovementDirection,
    /// None, если место не указано (пустая строка тоже считается "не указано")
    pub location_id: Option<String>,
}

impl ApplyMovementDto {
    /// Проверка формы до любых обращений к БД
    pub fn parse(&self) -> Result<MovementRequest, String> {
        let item_id = self.item_id.trim();
        if item_id.is_empty() {
            return Err("Item must be selected".into());
        }
        if self.quantity <= 0 {
            return Err(format!(
                "Quantity must be a positive integer, got {}",
                self.quantity
            ));
        }
        if self.quantity > MAX_MOVEMENT_QUANTITY {
            return Err(format!(
                "Quantity must not exceed {}, got {}",
                MAX_MOVEMENT_QUANTITY, self.quantity
            ));
        }
        let direction = self.direction.parse::<MovementDirection>()?;
        let location_id = self
            .location_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(MovementRequest {
            item_id: item_id.to_string(),
            quantity: self.quantity,
            direction,
            location_id,
        })
    }
}

/// Фильтры отчёта по движениям
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MovementReportQuery {
    /// "entrada" | "saida"; любое другое значение не фильтрует
    pub direction: Option<String>,
    /// Дата начала периода включительно, YYYY-MM-DD
    pub date_from: Option<String>,
    /// Дата окончания периода включительно, YYYY-MM-DD
    pub date_to: Option<String>,
    pub page: Option<i64>,
}

/// Страница отчёта по движениям
pub type MovementReportPage = crate::shared::pagination::Page<StockMovement>;

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(item_id: &str, quantity: i64, direction: &str, location: Option<&str>) -> ApplyMovementDto {
        ApplyMovementDto {
            item_id: item_id.into(),
            quantity,
            direction: direction.into(),
            location_id: location.map(Into::into),
        }
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(dto("", 1, "entrada", None).parse().is_err());
        assert!(dto("x", 0, "entrada", None).parse().is_err());
        assert!(dto("x", -3, "saida", None).parse().is_err());
        assert!(dto("x", 1, "transfer", None).parse().is_err());
        assert!(dto("x", 1, "Entrada", None).parse().is_err());
        assert!(dto("x", i64::MAX, "entrada", None).parse().is_err());
        assert!(dto("x", MAX_MOVEMENT_QUANTITY + 1, "entrada", None).parse().is_err());
        assert_eq!(
            dto("x", MAX_MOVEMENT_QUANTITY, "entrada", None)
                .parse()
                .unwrap()
                .quantity,
            MAX_MOVEMENT_QUANTITY
        );
    }

    #[test]
    fn test_parse_treats_blank_location_as_none() {
        let req = dto("x", 2, "saida", Some("  ")).parse().unwrap();
        assert_eq!(req.location_id, None);
        assert_eq!(req.direction, MovementDirection::Saida);

        let req = dto("x", 2, "entrada", Some("loc")).parse().unwrap();
        assert_eq!(req.location_id.as_deref(), Some("loc"));
    }

    #[test]
    fn test_reversal_delta_is_inverse() {
        let m = StockMovement::record(
            "HP 85A".into(),
            "Toner".into(),
            5,
            MovementDirection::Entrada,
            "ana".into(),
            None,
        );
        assert_eq!(m.balance_delta(), 5);
        assert_eq!(m.reversal_delta(), -5);
        assert_eq!(MovementDirection::Saida.signed(3), -3);
    }

    #[test]
    fn test_direction_serde_uses_lowercase_words() {
        let json = serde_json::to_string(&MovementDirection::Saida).unwrap();
        assert_eq!(json, "\"saida\"");
    }
}
