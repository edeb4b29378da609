//! Equipment persistence

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info};

use super::{EquipmentRepository, Repository};
use crate::db::models::{Brand, Equipment, EquipmentType, NewEquipment, Price};
use crate::search;
use crate::{Error, Result};

/// Columns for brand-joined reads; `e` is Equipments, `b` is Brands
const SELECT_WITH_BRAND: &str = r#"
    SELECT e.Id, e.ModelName, e.Type, e.Price, e.PurchaseDate, e.ReviewScore,
           e.Notes, e.BrandId, b.Name AS BrandName, b.Country AS BrandCountry
    FROM Equipments e
    JOIN Brands b ON b.Id = e.BrandId
"#;

/// Equipment repository backed by SQLite
#[derive(Debug, Clone)]
pub struct SqliteEquipmentRepository {
    pool: SqlitePool,
}

impl SqliteEquipmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_with_brand(&self, filter: &str, bind_id: Option<i64>) -> Result<Vec<Equipment>> {
        let sql = format!("{} {} ORDER BY e.Id", SELECT_WITH_BRAND, filter);
        let mut query = sqlx::query(&sql);
        if let Some(id) = bind_id {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(equipment_from_row).collect()
    }
}

/// Map a brand-joined row
fn equipment_from_row(row: &SqliteRow) -> Result<Equipment> {
    let brand_id: i64 = row.try_get("BrandId")?;
    let kind: i64 = row.try_get("Type")?;
    let price: i64 = row.try_get("Price")?;
    let purchase_date: Option<NaiveDate> = row.try_get("PurchaseDate")?;

    Ok(Equipment {
        id: row.try_get("Id")?,
        model_name: row.try_get("ModelName")?,
        kind: EquipmentType::try_from(kind)?,
        price: Price::from_cents(price)?,
        purchase_date,
        review_score: row.try_get("ReviewScore")?,
        notes: row.try_get("Notes")?,
        brand_id,
        brand: Some(Brand {
            id: brand_id,
            name: row.try_get("BrandName")?,
            country: row.try_get("BrandCountry")?,
        }),
    })
}

#[async_trait]
impl Repository<Equipment> for SqliteEquipmentRepository {
    async fn get_all(&self) -> Result<Vec<Equipment>> {
        self.get_all_with_brand().await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Equipment>> {
        let mut found = self.fetch_with_brand("WHERE e.Id = ?", Some(id)).await?;
        Ok(found.pop())
    }

    async fn add(&self, equipment: NewEquipment) -> Result<Equipment> {
        let id = sqlx::query(
            r#"
            INSERT INTO Equipments
                (ModelName, Type, Price, PurchaseDate, ReviewScore, Notes, BrandId)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&equipment.model_name)
        .bind(equipment.kind.as_i64())
        .bind(equipment.price.cents())
        .bind(equipment.purchase_date)
        .bind(equipment.review_score)
        .bind(&equipment.notes)
        .bind(equipment.brand_id)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        info!("Added equipment {} ({})", id, equipment.model_name);
        Ok(equipment.into_equipment(id))
    }

    async fn update(&self, equipment: &Equipment) -> Result<()> {
        let affected = sqlx::query(
            r#"
            UPDATE Equipments
            SET ModelName = ?, Type = ?, Price = ?, PurchaseDate = ?,
                ReviewScore = ?, Notes = ?, BrandId = ?
            WHERE Id = ?
            "#,
        )
        .bind(&equipment.model_name)
        .bind(equipment.kind.as_i64())
        .bind(equipment.price.cents())
        .bind(equipment.purchase_date)
        .bind(equipment.review_score)
        .bind(&equipment.notes)
        .bind(equipment.brand_id)
        .bind(equipment.id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(Error::Concurrency(format!(
                "equipment {} no longer exists",
                equipment.id
            )));
        }

        info!("Updated equipment {}", equipment.id);
        Ok(())
    }

    async fn delete(&self, equipment: &Equipment) -> Result<()> {
        let affected = sqlx::query("DELETE FROM Equipments WHERE Id = ?")
            .bind(equipment.id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(Error::Concurrency(format!(
                "equipment {} no longer exists",
                equipment.id
            )));
        }

        info!("Deleted equipment {} ({})", equipment.id, equipment.model_name);
        Ok(())
    }
}

#[async_trait]
impl EquipmentRepository for SqliteEquipmentRepository {
    async fn get_all_with_brand(&self) -> Result<Vec<Equipment>> {
        let all = self.fetch_with_brand("", None).await?;
        debug!("Loaded {} equipment rows", all.len());
        Ok(all)
    }

    async fn search(&self, term: &str) -> Result<Vec<Equipment>> {
        let all = self.get_all_with_brand().await?;
        if term.trim().is_empty() {
            return Ok(all);
        }

        let hits: Vec<Equipment> = all
            .into_iter()
            .filter(|e| search::matches(e, term))
            .collect();
        debug!("Search '{}' matched {} equipment rows", term, hits.len());
        Ok(hits)
    }

    async fn list_by_brand(&self, brand_id: i64) -> Result<Vec<Equipment>> {
        self.fetch_with_brand("WHERE e.BrandId = ?", Some(brand_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_database;
    use crate::repository::SqliteBrandRepository;

    async fn setup() -> (SqliteBrandRepository, SqliteEquipmentRepository) {
        let pool = init_memory_database()
            .await
            .expect("Failed to create in-memory database");
        (
            SqliteBrandRepository::new(pool.clone()),
            SqliteEquipmentRepository::new(pool),
        )
    }

    fn new_cable(brand_id: i64) -> NewEquipment {
        NewEquipment {
            model_name: "Silver Dragon".to_string(),
            kind: EquipmentType::Cable,
            price: "1,299.99".parse().unwrap(),
            purchase_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            review_score: 7.5,
            notes: None,
            brand_id,
        }
    }

    #[tokio::test]
    async fn test_get_all_with_brand_joins_brand() {
        let (_, repo) = setup().await;

        let all = repo.get_all_with_brand().await.unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|e| e.brand.is_some()));

        let dac = all.iter().find(|e| e.id == 4).unwrap();
        assert_eq!(dac.model_name, "DAC3 HGC");
        assert_eq!(dac.kind, EquipmentType::Dac);
        assert_eq!(dac.brand_name(), Some("Benchmark"));
        assert_eq!(dac.price, Price::from_units(60_000).unwrap());
        assert_eq!(dac.purchase_date, NaiveDate::from_ymd_opt(2025, 12, 25));
    }

    #[tokio::test]
    async fn test_add_round_trips_all_fields() {
        let (_, repo) = setup().await;

        let added = repo.add(new_cable(2)).await.unwrap();
        let loaded = repo.get_by_id(added.id).await.unwrap().unwrap();

        assert_eq!(loaded.model_name, "Silver Dragon");
        assert_eq!(loaded.kind, EquipmentType::Cable);
        assert_eq!(loaded.price.cents(), 129_999);
        assert_eq!(loaded.purchase_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(loaded.notes, None);
        assert_eq!(loaded.brand_name(), Some("Sony"));
    }

    #[tokio::test]
    async fn test_add_with_unknown_brand_fails() {
        let (_, repo) = setup().await;
        assert!(repo.add(new_cable(42)).await.is_err());
    }

    #[tokio::test]
    async fn test_update_and_concurrency_conflict() {
        let (_, repo) = setup().await;

        let mut utopia = repo.get_by_id(1).await.unwrap().unwrap();
        utopia.review_score = 10.0;
        utopia.notes = Some("Endgame".to_string());
        repo.update(&utopia).await.unwrap();

        let reloaded = repo.get_by_id(1).await.unwrap().unwrap();
        assert_eq!(reloaded.review_score, 10.0);
        assert_eq!(reloaded.notes.as_deref(), Some("Endgame"));

        repo.delete(&reloaded).await.unwrap();
        let err = repo.update(&utopia).await.unwrap_err();
        assert!(err.is_concurrency());
    }

    #[tokio::test]
    async fn test_search_matches_model_or_brand_case_insensitively() {
        let (_, repo) = setup().await;

        let by_brand = repo.search("fOcAl").await.unwrap();
        let mut ids: Vec<i64> = by_brand.iter().map(|e| e.id).collect();
        ids.sort();
        assert_eq!(ids, [1, 2]);

        let by_model = repo.search("m9").await.unwrap();
        assert_eq!(by_model.len(), 1);
        assert_eq!(by_model[0].model_name, "IER-M9");

        assert!(repo.search("nothing-like-this").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_returns_everything() {
        let (_, repo) = setup().await;
        assert_eq!(repo.search("   ").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_deleting_brand_cascades_to_equipment() {
        let (brands, repo) = setup().await;

        let focal = brands.get_by_id(1).await.unwrap().unwrap();
        brands.delete(&focal).await.unwrap();

        assert!(repo.list_by_brand(1).await.unwrap().is_empty());
        assert!(repo.get_by_id(1).await.unwrap().is_none());
        assert!(repo.get_by_id(2).await.unwrap().is_none());
        assert_eq!(repo.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_by_brand() {
        let (_, repo) = setup().await;

        let focal = repo.list_by_brand(1).await.unwrap();
        let models: Vec<&str> = focal.iter().map(|e| e.model_name.as_str()).collect();
        assert_eq!(models, ["Utopia", "Clear MG"]);
    }
}
