use serde::{Deserialize, Serialize};

/// Карточки с итогами на главной панели
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewTotals {
    pub items: u64,
    pub movements: u64,
    pub locations: u64,
}
