//! Property routes

use axum::{
    routing::{get, patch},
    Router,
};

use crate::handlers::property;
use crate::state::AppState;

pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/properties",
            get(property::list_properties).post(property::create_property),
        )
        .route("/api/properties/featured", get(property::featured_properties))
        .route("/api/properties/filter-options", get(property::filter_options))
        .route(
            "/api/properties/:id",
            get(property::get_property)
                .put(property::update_property)
                .delete(property::delete_property),
        )
        .route("/api/properties/:id/quote", get(property::property_quote))
        .route(
            "/api/properties/:id/status",
            patch(property::update_property_status),
        )
}
