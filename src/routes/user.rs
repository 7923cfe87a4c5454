//! User routes

use axum::{routing::get, Router};

use crate::handlers::user;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(user::list_users))
        .route("/api/users/:id", get(user::get_user).put(user::update_user))
}
