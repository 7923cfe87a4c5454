//! User profile HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::middleware::{AdminSession, AuthenticatedSession};
use crate::models::{ApiResponse, User};
use crate::session::{has_role, Role};
use crate::state::AppState;

/// Admins may act on anyone; everyone else only on themselves.
fn ensure_self_or_admin(auth: &AuthenticatedSession, user_id: &str) -> ApiResult<()> {
    if has_role(&auth.session, Role::Admin) || auth.session.user_id() == Some(user_id) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You can only access your own profile".to_string(),
        ))
    }
}

/// GET /api/users - Admin only
pub async fn list_users(
    State(state): State<AppState>,
    AdminSession(auth): AdminSession,
) -> ApiResult<Json<ApiResponse<Vec<User>>>> {
    let users = state
        .gateway
        .authorized(auth.bearer())
        .list_users()
        .await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthenticatedSession,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    ensure_self_or_admin(&auth, &id)?;
    let user = state
        .gateway
        .authorized(auth.bearer())
        .get_user(&id)
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/users/:id - Profile fields are forwarded unchanged
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthenticatedSession,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ApiResponse<User>>> {
    ensure_self_or_admin(&auth, &id)?;
    let user = state
        .gateway
        .authorized(auth.bearer())
        .update_user(&id, &body)
        .await?;

    tracing::info!(user_id = %id, "User profile updated");
    Ok(Json(ApiResponse::ok(user)))
}
