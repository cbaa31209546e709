use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, AggregateRoot};
use crate::uuid_aggregate_id;

uuid_aggregate_id!(
    /// Уникальный идентификатор места хранения
    LocationId
);

/// Место хранения / подразделение
///
/// В движениях хранится только снимок наименования, поэтому удаление
/// места не меняет историю.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new_for_insert(name: String) -> Self {
        Self {
            id: LocationId::new_v4(),
            name,
            created_at: Utc::now(),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Location name must not be empty".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.name = self.name.trim().to_string();
    }
}

impl AggregateRoot for Location {
    type Id = LocationId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "location"
    }

    fn element_name() -> &'static str {
        "Location"
    }

    fn list_name() -> &'static str {
        "Locations"
    }
}

/// DTO для создания места хранения
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocationDto {
    pub name: String,
}
