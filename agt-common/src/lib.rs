//! # Audio Gear Tracker Common Library
//!
//! Shared code for the gear tracker service:
//! - Entity models (brands, equipment)
//! - Database initialization, migrations and seed data
//! - Repository traits and their SQLite implementations
//! - Ranked equipment search
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod repository;
pub mod search;

pub use db::models::{Brand, Equipment, EquipmentType, NewBrand, NewEquipment, Price};
pub use error::{Error, Result};
pub use repository::{EquipmentRepository, Repository};
