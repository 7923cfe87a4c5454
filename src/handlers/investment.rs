//! Investment, portfolio and dashboard handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::error::ApiResult;
use crate::middleware::InvestorSession;
use crate::models::{ApiResponse, CreateInvestmentRequest, Investment, NewInvestment};
use crate::services::valuation::validate_purchase;
use crate::services::{Dashboard, PortfolioView};
use crate::state::AppState;

/// POST /api/investments - Buy tokens in a property
///
/// The purchase is checked against the property's current status and supply
/// before it is sent; the gateway still has the final say.
pub async fn create_investment(
    State(state): State<AppState>,
    InvestorSession(auth): InvestorSession,
    Json(req): Json<CreateInvestmentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Investment>>)> {
    req.validate()?;
    let user_id = auth.user_id()?;
    let gateway = state.gateway.authorized(auth.bearer());

    let property = gateway.get_property(&req.property_id).await?;
    let tokens = validate_purchase(&property, req.amount)?;

    let investment = gateway
        .create_investment(&NewInvestment {
            user_id: user_id.to_string(),
            property_id: property.id.clone(),
            amount: req.amount,
            tokens,
        })
        .await?;

    tracing::info!(
        user_id = %user_id,
        property_id = %property.id,
        amount = req.amount,
        tokens,
        "Investment created"
    );
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(investment))))
}

/// GET /api/portfolio
pub async fn portfolio(
    State(state): State<AppState>,
    InvestorSession(auth): InvestorSession,
) -> ApiResult<Json<ApiResponse<PortfolioView>>> {
    let view = state
        .dashboard
        .portfolio(auth.bearer(), auth.user_id()?)
        .await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// GET /api/dashboard - Sections load independently; a failed section is
/// reported inside the payload rather than failing the request
pub async fn dashboard(
    State(state): State<AppState>,
    InvestorSession(auth): InvestorSession,
) -> ApiResult<Json<ApiResponse<Dashboard>>> {
    let dashboard = state
        .dashboard
        .dashboard(auth.bearer(), auth.user_id()?)
        .await;
    Ok(Json(ApiResponse::ok(dashboard)))
}
