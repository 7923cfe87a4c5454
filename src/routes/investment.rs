//! Investment, portfolio and dashboard routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::investment;
use crate::state::AppState;

pub fn investment_routes() -> Router<AppState> {
    Router::new()
        .route("/api/investments", post(investment::create_investment))
        .route("/api/portfolio", get(investment::portfolio))
        .route("/api/dashboard", get(investment::dashboard))
}
