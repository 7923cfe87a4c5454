//! Investment calculator HTTP handlers
//!
//! Stateless: every figure is computed locally from the request body.

use axum::Json;
use serde::Serialize;
use validator::Validate;

use crate::error::ApiResult;
use crate::models::{
    AmountRequest, ApiResponse, BreakdownRequest, ProjectionRequest, QuoteRequest, TokensRequest,
};
use crate::services::valuation::{
    self, CostBreakdown, InvestmentQuote, ProjectedReturn, TokenEconomics, DEFAULT_HORIZON_YEARS,
};

#[derive(Debug, Serialize)]
pub struct TokensResponse {
    pub tokens: f64,
    pub price_per_token: f64,
}

#[derive(Debug, Serialize)]
pub struct AmountResponse {
    pub amount: f64,
    pub price_per_token: f64,
}

/// POST /api/calculator/quote - Full quote for an amount
pub async fn quote(Json(req): Json<QuoteRequest>) -> ApiResult<Json<ApiResponse<InvestmentQuote>>> {
    req.validate()?;

    let economics = TokenEconomics {
        total_tokens: req.total_tokens.unwrap_or(0.0),
        available_tokens: req.available_tokens.unwrap_or(0.0),
        price_per_token: req.price_per_token,
        expected_roi: req.expected_roi,
    };
    let quote = valuation::quote(
        &economics,
        req.amount,
        req.horizon_years.unwrap_or(DEFAULT_HORIZON_YEARS),
    )?;

    Ok(Json(ApiResponse::ok(quote)))
}

/// POST /api/calculator/tokens - Tokens bought for an amount
pub async fn tokens(Json(req): Json<TokensRequest>) -> ApiResult<Json<ApiResponse<TokensResponse>>> {
    req.validate()?;
    let tokens = valuation::tokens_from_amount(req.amount, req.price_per_token)?;
    Ok(Json(ApiResponse::ok(TokensResponse {
        tokens,
        price_per_token: req.price_per_token,
    })))
}

/// POST /api/calculator/amount - Cost of a token count
pub async fn amount(Json(req): Json<AmountRequest>) -> ApiResult<Json<ApiResponse<AmountResponse>>> {
    req.validate()?;
    Ok(Json(ApiResponse::ok(AmountResponse {
        amount: valuation::amount_from_tokens(req.tokens, req.price_per_token),
        price_per_token: req.price_per_token,
    })))
}

/// POST /api/calculator/breakdown
pub async fn breakdown(
    Json(req): Json<BreakdownRequest>,
) -> ApiResult<Json<ApiResponse<CostBreakdown>>> {
    req.validate()?;
    Ok(Json(ApiResponse::ok(valuation::cost_breakdown(req.amount))))
}

/// POST /api/calculator/projection
pub async fn projection(
    Json(req): Json<ProjectionRequest>,
) -> ApiResult<Json<ApiResponse<Vec<ProjectedReturn>>>> {
    req.validate()?;
    Ok(Json(ApiResponse::ok(valuation::projected_returns(
        req.amount,
        req.expected_roi,
        req.horizon_years.unwrap_or(DEFAULT_HORIZON_YEARS),
    ))))
}
