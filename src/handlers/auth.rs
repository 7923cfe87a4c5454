//! Authentication HTTP handlers
//!
//! Credentials go straight to the gateway. A successful login issues a local
//! session token that maps to the gateway credential.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use validator::Validate;

use crate::error::ApiResult;
use crate::middleware::{AuthenticatedSession, OptionalSession};
use crate::models::{ApiResponse, LoginRequest};
use crate::session::Session;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub session: Session,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginResponse>>> {
    req.validate()?;

    let mut outcome = state.gateway.login(&req).await?;
    let gateway_token = outcome.token.take();
    let session = Session::from_login(outcome, req.portal)?;
    let token = state
        .sessions
        .issue(session.clone(), gateway_token)
        .await?;

    tracing::info!(
        portal = %req.portal.as_str(),
        user_id = ?session.user_id(),
        "User logged in"
    );

    Ok(Json(ApiResponse::ok(LoginResponse {
        token,
        token_type: "Bearer",
        session,
    })))
}

/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthenticatedSession,
) -> ApiResult<StatusCode> {
    state.sessions.revoke(&auth.token).await?;
    tracing::info!(user_id = ?auth.session.user_id(), "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/session - The current session, anonymous when none
pub async fn current_session(auth: OptionalSession) -> Json<ApiResponse<Session>> {
    let session = auth.0.map(|a| a.session).unwrap_or_default();
    Json(ApiResponse::ok(session))
}
