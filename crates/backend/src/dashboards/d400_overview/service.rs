use contracts::dashboards::d400_overview::OverviewTotals;
use sea_orm::DatabaseConnection;

use crate::domain::{a001_item, a002_location, a003_stock_movement};

/// Итоги для главной панели
pub async fn totals(db: &DatabaseConnection) -> anyhow::Result<OverviewTotals> {
    let items = a001_item::repository::count(db).await?;
    let movements = a003_stock_movement::repository::count(db).await?;
    let locations = a002_location::repository::count(db).await?;

    Ok(OverviewTotals {
        items,
        movements,
        locations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_item::ItemDto;
    use contracts::domain::a002_location::LocationDto;
    use contracts::domain::a003_stock_movement::ApplyMovementDto;

    use crate::shared::data::db::connect_in_memory;

    #[tokio::test]
    async fn test_totals_count_each_table() {
        let db = connect_in_memory().await;
        assert_eq!(totals(&db).await.unwrap(), OverviewTotals::default());

        let item = a001_item::service::create(
            &db,
            ItemDto {
                id: None,
                name: "Zebra 100x50".into(),
                item_type: "Etiqueta".into(),
                description: None,
            },
        )
        .await
        .unwrap();
        a002_location::service::create(&db, LocationDto { name: "Almoxarifado".into() })
            .await
            .unwrap();
        for _ in 0..3 {
            a003_stock_movement::service::apply_movement(
                &db,
                &ApplyMovementDto {
                    item_id: item.to_string(),
                    quantity: 1,
                    direction: "entrada".into(),
                    location_id: None,
                },
                "ana",
            )
            .await
            .unwrap();
        }

        assert_eq!(
            totals(&db).await.unwrap(),
            OverviewTotals {
                items: 1,
                movements: 3,
                locations: 1,
            }
        );
    }
}
