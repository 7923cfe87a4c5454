//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::gateway::GatewayClient;
use crate::services::DashboardService;
use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub gateway: GatewayClient,
    pub sessions: Arc<SessionStore>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(gateway: GatewayClient, sessions: Arc<SessionStore>) -> Self {
        Self {
            dashboard: Arc::new(DashboardService::new(gateway.clone())),
            gateway,
            sessions,
        }
    }
}

impl FromRef<AppState> for Arc<SessionStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for GatewayClient {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.gateway.clone()
    }
}

impl FromRef<AppState> for Arc<DashboardService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dashboard.clone()
    }
}
