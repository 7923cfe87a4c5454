//! PropVault server library
//!
//! Backend-for-frontend over the tokenization gateway: valuation and
//! portfolio logic, schema normalization, sessions, and the HTTP facade.

pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod normalize;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Full application router. CORS is added by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .merge(routes::auth_routes())
        .merge(routes::calculator_routes())
        .merge(routes::property_routes())
        .merge(routes::investment_routes())
        .merge(routes::wallet_routes())
        .merge(routes::organization_routes())
        .merge(routes::user_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(TraceLayer::new_for_http())
}

async fn root() -> &'static str {
    "PropVault API Server"
}
