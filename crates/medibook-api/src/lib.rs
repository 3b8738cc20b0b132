//! Medibook HTTP layer.
//!
//! Wires the domain crate to the outside world:
//! - axum router with the three role-scoped route groups
//! - per-role authorization gates
//! - credential hashing and stateless token signing
//! - blob store and payment gateway collaborators
//! - environment configuration

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

pub mod blob;
pub mod config;
pub mod credentials;
pub mod gates;
pub mod payment;
pub mod response;
pub mod routes;
pub mod state;
pub mod validate;

pub use config::AppConfig;
pub use state::AppState;

/// Build the full application router: role groups under `/api`, a
/// liveness probe at the root, permissive CORS for the panels.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "API WORKING" }))
        .nest("/api/admin", routes::admin::router(state.clone()))
        .nest("/api/doctor", routes::doctor::router(state.clone()))
        .nest("/api/user", routes::patient::router(state))
        .layer(CorsLayer::permissive())
}
