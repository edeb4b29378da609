//! HTTP handlers for agt-web
//!
//! Handlers map a verb and route onto repository calls and pick a view.
//! They own no business logic beyond existence checks and mapping errors to
//! status codes.

pub mod brands;
pub mod equipments;
pub mod health;

pub use health::health_routes;
