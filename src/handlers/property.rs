//! Property HTTP handlers
//!
//! Listings and details come from the gateway with funding figures derived
//! locally. Writes are admin-only and forwarded as-is.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::middleware::{AdminSession, OptionalSession};
use crate::models::{ApiResponse, PropertyFilter, PropertyQuoteQuery, PropertyStatusRequest};
use crate::services::valuation::{
    self, assess_property, PropertyValuation, ReconciledQuote, TokenEconomics, ValuationError,
    DEFAULT_HORIZON_YEARS,
};
use crate::state::AppState;

/// GET /api/properties - List properties with optional filters
pub async fn list_properties(
    State(state): State<AppState>,
    auth: OptionalSession,
    Query(filter): Query<PropertyFilter>,
) -> ApiResult<Json<ApiResponse<Vec<PropertyValuation>>>> {
    let properties = state
        .gateway
        .authorized(auth.bearer())
        .list_properties(&filter)
        .await?;

    Ok(Json(ApiResponse::ok(
        properties.into_iter().map(assess_property).collect(),
    )))
}

/// GET /api/properties/featured
pub async fn featured_properties(
    State(state): State<AppState>,
    auth: OptionalSession,
) -> ApiResult<Json<ApiResponse<Vec<PropertyValuation>>>> {
    let properties = state
        .gateway
        .authorized(auth.bearer())
        .featured_properties()
        .await?;

    Ok(Json(ApiResponse::ok(
        properties.into_iter().map(assess_property).collect(),
    )))
}

/// GET /api/properties/filter-options
pub async fn filter_options(
    State(state): State<AppState>,
    auth: OptionalSession,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let options = state
        .gateway
        .authorized(auth.bearer())
        .property_filter_options()
        .await?;
    Ok(Json(ApiResponse::ok(options)))
}

/// GET /api/properties/:id
pub async fn get_property(
    State(state): State<AppState>,
    auth: OptionalSession,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<PropertyValuation>>> {
    let property = state
        .gateway
        .authorized(auth.bearer())
        .get_property(&id)
        .await?;
    Ok(Json(ApiResponse::ok(assess_property(property))))
}

/// GET /api/properties/:id/quote?amount= - Local quote reconciled with the
/// gateway calculator
pub async fn property_quote(
    State(state): State<AppState>,
    auth: OptionalSession,
    Path(id): Path<String>,
    Query(query): Query<PropertyQuoteQuery>,
) -> ApiResult<Json<ApiResponse<ReconciledQuote>>> {
    query.validate()?;
    if !query.amount.is_finite() || query.amount <= 0.0 {
        return Err(ValuationError::NonPositiveAmount(query.amount).into());
    }
    let horizon = query.horizon_years.unwrap_or(DEFAULT_HORIZON_YEARS);
    let gateway = state.gateway.authorized(auth.bearer());

    let property = gateway.get_property(&id).await?;
    let local = valuation::quote(&TokenEconomics::from(&property), query.amount, horizon)?;

    // The local quote stands on its own when the calculator is unavailable.
    let server = match gateway.calculate_roi(&property.id, query.amount, horizon).await {
        Ok(server) => Some(server),
        Err(e) => {
            tracing::info!(property_id = %property.id, error = %e, "Gateway quote unavailable");
            None
        }
    };

    Ok(Json(ApiResponse::ok(valuation::reconcile_quote(
        local, server,
    ))))
}

/// POST /api/properties - Admin only
pub async fn create_property(
    State(state): State<AppState>,
    AdminSession(auth): AdminSession,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<ApiResponse<PropertyValuation>>)> {
    let property = state
        .gateway
        .authorized(auth.bearer())
        .create_property(&body)
        .await?;

    tracing::info!(property_id = %property.id, "Property created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(assess_property(property))),
    ))
}

/// PUT /api/properties/:id - Admin only
pub async fn update_property(
    State(state): State<AppState>,
    AdminSession(auth): AdminSession,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ApiResponse<PropertyValuation>>> {
    let property = state
        .gateway
        .authorized(auth.bearer())
        .update_property(&id, &body)
        .await?;
    Ok(Json(ApiResponse::ok(assess_property(property))))
}

/// PATCH /api/properties/:id/status - Admin only
pub async fn update_property_status(
    State(state): State<AppState>,
    AdminSession(auth): AdminSession,
    Path(id): Path<String>,
    Json(req): Json<PropertyStatusRequest>,
) -> ApiResult<Json<ApiResponse<PropertyValuation>>> {
    let property = state
        .gateway
        .authorized(auth.bearer())
        .update_property_status(&id, req.status)
        .await?;

    tracing::info!(property_id = %id, status = %req.status.as_str(), "Property status changed");
    Ok(Json(ApiResponse::ok(assess_property(property))))
}

/// DELETE /api/properties/:id - Admin only, refused once tokens have sold
pub async fn delete_property(
    State(state): State<AppState>,
    AdminSession(auth): AdminSession,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let gateway = state.gateway.authorized(auth.bearer());
    let valuation = assess_property(gateway.get_property(&id).await?);

    if !valuation.can_delete {
        return Err(ApiError::Conflict(format!(
            "Property is {:.4}% funded and cannot be deleted",
            valuation.funding_percentage
        )));
    }

    gateway.delete_property(&id).await?;
    tracing::info!(property_id = %id, "Property deleted");
    Ok(StatusCode::NO_CONTENT)
}
