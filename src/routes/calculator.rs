//! Calculator routes

use axum::{routing::post, Router};

use crate::handlers::calculator;
use crate::state::AppState;

pub fn calculator_routes() -> Router<AppState> {
    Router::new()
        .route("/api/calculator/quote", post(calculator::quote))
        .route("/api/calculator/tokens", post(calculator::tokens))
        .route("/api/calculator/amount", post(calculator::amount))
        .route("/api/calculator/breakdown", post(calculator::breakdown))
        .route("/api/calculator/projection", post(calculator::projection))
}
