//! Database schema migrations
//!
//! Versioned, idempotent migrations tracked in the `schema_version` table.
//! Tables themselves are created by `init`; migrations carry everything that
//! must happen exactly once, such as the seed catalog. A seed row the user
//! deletes stays deleted because v1 never runs again.
//!
//! # Migration Guidelines
//!
//! 1. **Never modify existing migrations** - databases in the wild already ran them
//! 2. **Always add new migrations** - bump `CURRENT_SCHEMA_VERSION` with each one
//! 3. **Use ALTER TABLE** - prefer it over DROP/CREATE to preserve data

use crate::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding new migrations
const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Get current schema version from database
///
/// Returns 0 if schema_version table doesn't exist or has no rows
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    let table_exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name='schema_version'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        warn!("This may indicate a downgrade. Proceeding with caution.");
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("✓ Migration v1 completed");
    }

    info!("All migrations completed successfully");
    Ok(())
}

/// Migration v1: Seed catalog (3 brands, 4 equipment rows)
///
/// Ids are fixed so tests can rely on them. INSERT OR IGNORE keeps the
/// migration idempotent if the version row was lost.
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v1: Seed catalog");

    let mut tx = pool.begin().await?;

    let brands: [(i64, &str, &str); 3] = [
        (1, "Focal", "France"),
        (2, "Sony", "Japan"),
        (3, "Benchmark", "USA"),
    ];
    for (id, name, country) in brands {
        sqlx::query("INSERT OR IGNORE INTO Brands (Id, Name, Country) VALUES (?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(country)
            .execute(&mut *tx)
            .await?;
    }

    // (Id, BrandId, ModelName, Type, Price in cents, PurchaseDate, ReviewScore, Notes)
    let equipment: [(i64, i64, &str, i64, i64, Option<&str>, f64, &str); 4] = [
        (1, 1, "Utopia", 0, 13_000_000, None, 9.8, "大烏，主力耳機"),
        (2, 1, "Clear MG", 0, 4_500_000, None, 9.0, "偏暖厚、密度高"),
        (3, 2, "IER-M9", 0, 2_800_000, None, 8.5, "監聽入耳式"),
        (4, 3, "DAC3 HGC", 1, 6_000_000, Some("2025-12-25"), 8.8, "借用中"),
    ];
    for (id, brand_id, model, kind, price, purchased, score, notes) in equipment {
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO Equipments
                (Id, BrandId, ModelName, Type, Price, PurchaseDate, ReviewScore, Notes)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(brand_id)
        .bind(model)
        .bind(kind)
        .bind(price)
        .bind(purchased)
        .bind(score)
        .bind(notes)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!("  ✓ Seeded {} brands and {} equipment rows", brands.len(), equipment.len());
    Ok(())
}
