//! Brand persistence

use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info};

use super::Repository;
use crate::db::models::{Brand, NewBrand};
use crate::{Error, Result};

/// Brand repository backed by SQLite
#[derive(Debug, Clone)]
pub struct SqliteBrandRepository {
    pool: SqlitePool,
}

impl SqliteBrandRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn brand_from_row(row: &SqliteRow) -> Result<Brand> {
    Ok(Brand {
        id: row.try_get("Id")?,
        name: row.try_get("Name")?,
        country: row.try_get("Country")?,
    })
}

#[async_trait]
impl Repository<Brand> for SqliteBrandRepository {
    async fn get_all(&self) -> Result<Vec<Brand>> {
        let rows = sqlx::query("SELECT Id, Name, Country FROM Brands ORDER BY Id")
            .fetch_all(&self.pool)
            .await?;

        debug!("Loaded {} brands", rows.len());
        rows.iter().map(brand_from_row).collect()
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Brand>> {
        let row = sqlx::query("SELECT Id, Name, Country FROM Brands WHERE Id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(brand_from_row).transpose()
    }

    async fn add(&self, brand: NewBrand) -> Result<Brand> {
        let id = sqlx::query("INSERT INTO Brands (Name, Country) VALUES (?, ?)")
            .bind(&brand.name)
            .bind(&brand.country)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();

        info!("Added brand {} ({})", id, brand.name);
        Ok(Brand {
            id,
            name: brand.name,
            country: brand.country,
        })
    }

    async fn update(&self, brand: &Brand) -> Result<()> {
        let affected = sqlx::query("UPDATE Brands SET Name = ?, Country = ? WHERE Id = ?")
            .bind(&brand.name)
            .bind(&brand.country)
            .bind(brand.id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(Error::Concurrency(format!("brand {} no longer exists", brand.id)));
        }

        info!("Updated brand {}", brand.id);
        Ok(())
    }

    /// Equipment owned by the brand goes with it (ON DELETE CASCADE)
    async fn delete(&self, brand: &Brand) -> Result<()> {
        let affected = sqlx::query("DELETE FROM Brands WHERE Id = ?")
            .bind(brand.id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(Error::Concurrency(format!("brand {} no longer exists", brand.id)));
        }

        info!("Deleted brand {} ({})", brand.id, brand.name);
        Ok(())
    }
}
