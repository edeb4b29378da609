//! agt-web library - Audio Gear Tracker web service
//!
//! CRUD pages for brands and equipment plus the quick-search JSON endpoint.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use agt_common::repository::{SqliteBrandRepository, SqliteEquipmentRepository};
use agt_common::{Brand, EquipmentRepository, Repository};

pub mod api;
pub mod error;
pub mod forms;
pub mod views;

/// Application state shared across HTTP handlers
///
/// Repositories sit behind trait objects so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub brands: Arc<dyn Repository<Brand>>,
    pub equipment: Arc<dyn EquipmentRepository>,
}

impl AppState {
    pub fn new(brands: Arc<dyn Repository<Brand>>, equipment: Arc<dyn EquipmentRepository>) -> Self {
        Self { brands, equipment }
    }

    /// SQLite-backed repositories sharing one pool
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self::new(
            Arc::new(SqliteBrandRepository::new(pool.clone())),
            Arc::new(SqliteEquipmentRepository::new(pool)),
        )
    }
}

/// Build application router
///
/// Routes follow `/{Controller}/{Action}/{id}`.
pub fn build_router(state: AppState) -> Router {
    use axum::response::Redirect;
    use axum::routing::get;

    let brands: Router<AppState> = Router::new()
        .route("/Brands", get(api::brands::index))
        .route("/Brands/Index", get(api::brands::index))
        .route("/Brands/Details/:id", get(api::brands::details))
        .route(
            "/Brands/Create",
            get(api::brands::create_form).post(api::brands::create),
        )
        .route(
            "/Brands/Edit/:id",
            get(api::brands::edit_form).post(api::brands::edit),
        )
        .route(
            "/Brands/Delete/:id",
            get(api::brands::delete_confirm).post(api::brands::delete),
        );

    let equipments: Router<AppState> = Router::new()
        .route("/Equipments", get(api::equipments::index))
        .route("/Equipments/Index", get(api::equipments::index))
        .route("/Equipments/SearchJson", get(api::equipments::search_json))
        .route("/Equipments/Details/:id", get(api::equipments::details))
        .route(
            "/Equipments/Create",
            get(api::equipments::create_form).post(api::equipments::create),
        )
        .route(
            "/Equipments/Edit/:id",
            get(api::equipments::edit_form).post(api::equipments::edit),
        )
        .route(
            "/Equipments/Delete/:id",
            get(api::equipments::delete_confirm).post(api::equipments::delete),
        );

    Router::new()
        .route("/", get(|| async { Redirect::to("/Equipments") }))
        .merge(brands)
        .merge(equipments)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
