use serde::{Deserialize, Serialize};

/// Строка регистра остатков для экрана "Estoque"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockBalanceDto {
    // NK (Natural Key)
    #[serde(rename = "itemName")]
    pub item_name: String,
    #[serde(rename = "itemType")]
    pub item_type: String,

    pub quantity: i64,
    /// Описание позиции каталога (если позиция с таким именем ещё существует)
    pub description: Option<String>,
}

/// Порядок категорий на экране остатков: сначала основные расходники
pub fn category_rank(item_type: &str) -> u8 {
    match item_type {
        "Toner" => 1,
        "Cilindro" => 2,
        "Etiqueta" => 3,
        "Ribbon" => 4,
        _ => 99,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_rank() {
        assert!(category_rank("Toner") < category_rank("Cilindro"));
        assert!(category_rank("Etiqueta") < category_rank("Ribbon"));
        assert_eq!(category_rank("Papel"), 99);
        assert_eq!(category_rank("toner"), 99);
    }
}
