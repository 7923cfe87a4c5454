//! Organization routes

use axum::{routing::get, Router};

use crate::handlers::organization;
use crate::state::AppState;

pub fn organization_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/organizations",
            get(organization::list_organizations).post(organization::create_organization),
        )
        .route(
            "/api/organizations/:id",
            get(organization::get_organization)
                .put(organization::update_organization)
                .delete(organization::delete_organization),
        )
        .route(
            "/api/organizations/:id/investments",
            get(organization::organization_investments),
        )
}
