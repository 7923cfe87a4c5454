use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub gateway: String,
    pub version: &'static str,
}

/// GET /health - Always 200; reports whether the gateway answers
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, gateway) = match state.gateway.ping().await {
        Ok(()) => ("healthy", "connected".to_string()),
        Err(e) => ("degraded", format!("error: {}", e)),
    };

    Json(HealthResponse {
        status,
        gateway,
        version: env!("CARGO_PKG_VERSION"),
    })
}
