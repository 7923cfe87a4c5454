//! Organization HTTP handlers
//!
//! Organizations are addressed by id or display code. Property counts are
//! computed from the property listing on every request.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::gateway::GatewayClient;
use crate::middleware::{AdminSession, OptionalSession, OrganizationSession};
use crate::models::{ApiResponse, Organization, Property, PropertyFilter};
use crate::services::dashboard::{portfolio_view, PortfolioView};
use crate::services::organization::{
    count_properties, find_by_reference, matches_reference, with_property_counts,
};
use crate::session::Session;
use crate::state::AppState;

async fn organizations_with_counts(gateway: &GatewayClient) -> ApiResult<Vec<Organization>> {
    let (organizations, properties) = load_directory(gateway).await?;
    Ok(with_property_counts(organizations, &properties))
}

async fn load_directory(gateway: &GatewayClient) -> ApiResult<(Vec<Organization>, Vec<Property>)> {
    let filter = PropertyFilter::default();
    let (organizations, properties) = tokio::join!(
        gateway.list_organizations(),
        gateway.list_properties(&filter),
    );
    Ok((organizations?, properties?))
}

/// Find an organization by id or display code. References the listing does
/// not cover are looked up directly.
async fn resolve_organization(gateway: &GatewayClient, reference: &str) -> ApiResult<Organization> {
    let (organizations, properties) = load_directory(gateway).await?;

    let mut organization = match find_by_reference(&organizations, reference) {
        Some(found) => found.clone(),
        None => gateway.get_organization(reference).await?,
    };
    organization.property_count = count_properties(&organization, &properties);
    Ok(organization)
}

/// GET /api/organizations
pub async fn list_organizations(
    State(state): State<AppState>,
    auth: OptionalSession,
) -> ApiResult<Json<ApiResponse<Vec<Organization>>>> {
    let gateway = state.gateway.authorized(auth.bearer());
    Ok(Json(ApiResponse::ok(
        organizations_with_counts(&gateway).await?,
    )))
}

/// GET /api/organizations/:id - `id` may also be the display code
pub async fn get_organization(
    State(state): State<AppState>,
    auth: OptionalSession,
    Path(reference): Path<String>,
) -> ApiResult<Json<ApiResponse<Organization>>> {
    let gateway = state.gateway.authorized(auth.bearer());
    Ok(Json(ApiResponse::ok(
        resolve_organization(&gateway, &reference).await?,
    )))
}

/// GET /api/organizations/:id/investments - Investments in the
/// organization's properties. Organization sessions only see their own.
pub async fn organization_investments(
    State(state): State<AppState>,
    OrganizationSession(auth): OrganizationSession,
    Path(reference): Path<String>,
) -> ApiResult<Json<ApiResponse<PortfolioView>>> {
    let gateway = state.gateway.authorized(auth.bearer());
    let organization = resolve_organization(&gateway, &reference).await?;

    if let Session::Organization {
        organization_id, ..
    } = &auth.session
    {
        if !matches_reference(&organization, organization_id) {
            return Err(ApiError::Forbidden(
                "Organization sessions may only view their own investments".to_string(),
            ));
        }
    }

    let investments = gateway.investments_for_organization(&organization.id).await?;
    Ok(Json(ApiResponse::ok(portfolio_view(investments))))
}

/// POST /api/organizations - Admin only
pub async fn create_organization(
    State(state): State<AppState>,
    AdminSession(auth): AdminSession,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Organization>>)> {
    let organization = state
        .gateway
        .authorized(auth.bearer())
        .create_organization(&body)
        .await?;

    tracing::info!(organization_id = %organization.id, "Organization created");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(organization))))
}

/// PUT /api/organizations/:id - Admin only
pub async fn update_organization(
    State(state): State<AppState>,
    AdminSession(auth): AdminSession,
    Path(reference): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ApiResponse<Organization>>> {
    let gateway = state.gateway.authorized(auth.bearer());
    let existing = resolve_organization(&gateway, &reference).await?;

    let mut updated = gateway.update_organization(&existing.id, &body).await?;
    updated.property_count = existing.property_count;
    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/organizations/:id - Admin only, refused while the
/// organization still owns properties
pub async fn delete_organization(
    State(state): State<AppState>,
    AdminSession(auth): AdminSession,
    Path(reference): Path<String>,
) -> ApiResult<StatusCode> {
    let gateway = state.gateway.authorized(auth.bearer());
    let organization = resolve_organization(&gateway, &reference).await?;

    if organization.property_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Organization still owns {} properties",
            organization.property_count
        )));
    }

    gateway.delete_organization(&organization.id).await?;
    tracing::info!(organization_id = %organization.id, "Organization deleted");
    Ok(StatusCode::NO_CONTENT)
}
