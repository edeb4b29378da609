//! Repository traits over the catalog store
//!
//! Handlers depend on these traits rather than on `SqlitePool`, so the web
//! layer can be exercised against in-memory fakes.

use async_trait::async_trait;

use crate::db::models::{Brand, Equipment, NewBrand, NewEquipment};
use crate::Result;

mod brands;
mod equipment;

pub use brands::SqliteBrandRepository;
pub use equipment::SqliteEquipmentRepository;

/// A persisted record with a database-generated integer id
pub trait Entity: Send + Sync + 'static {
    /// Insert payload (everything except the id)
    type New: Send + 'static;

    /// Human-readable kind, used in log and error messages
    const KIND: &'static str;

    fn id(&self) -> i64;
}

impl Entity for Brand {
    type New = NewBrand;
    const KIND: &'static str = "brand";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Entity for Equipment {
    type New = NewEquipment;
    const KIND: &'static str = "equipment";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Generic CRUD contract
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    async fn get_all(&self) -> Result<Vec<T>>;

    /// `Ok(None)` when no record has this id
    async fn get_by_id(&self, id: i64) -> Result<Option<T>>;

    /// Insert and return the persisted record with its generated id
    async fn add(&self, entity: T::New) -> Result<T>;

    /// Overwrite the stored record with the same id
    ///
    /// Fails with `Error::Concurrency` if the record no longer exists.
    async fn update(&self, entity: &T) -> Result<()>;

    /// Fails with `Error::Concurrency` if nothing was removed
    async fn delete(&self, entity: &T) -> Result<()>;

    async fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.get_by_id(id).await?.is_some())
    }
}

/// Equipment-specific reads on top of the generic contract
#[async_trait]
pub trait EquipmentRepository: Repository<Equipment> {
    /// All equipment with `brand` populated
    async fn get_all_with_brand(&self) -> Result<Vec<Equipment>>;

    /// Case-insensitive substring match on model or brand name
    ///
    /// A blank term returns everything (same as `get_all_with_brand`).
    /// Results are not ranked; see `search::rank`.
    async fn search(&self, term: &str) -> Result<Vec<Equipment>>;

    /// Equipment owned by one brand, with `brand` populated
    async fn list_by_brand(&self, brand_id: i64) -> Result<Vec<Equipment>>;
}
