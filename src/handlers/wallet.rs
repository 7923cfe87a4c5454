//! Wallet HTTP handlers
//!
//! Balances belong to the signed-in user; nobody else's wallet is reachable
//! from here.

use axum::{extract::State, Json};
use validator::Validate;

use crate::error::ApiResult;
use crate::middleware::InvestorSession;
use crate::models::{ApiResponse, Transaction, WalletMovementRequest};
use crate::services::portfolio::{wallet_figures, WalletFigures};
use crate::state::AppState;

/// GET /api/wallet - Balances, with missing aggregates derived from the
/// portfolio when it can be loaded
pub async fn get_wallet(
    State(state): State<AppState>,
    InvestorSession(auth): InvestorSession,
) -> ApiResult<Json<ApiResponse<WalletFigures>>> {
    let user_id = auth.user_id()?;
    let gateway = state.gateway.authorized(auth.bearer());

    let (wallet, portfolio) = tokio::join!(
        gateway.wallet(user_id),
        state.dashboard.portfolio(auth.bearer(), user_id),
    );
    let summary = portfolio.ok().map(|p| p.summary);

    Ok(Json(ApiResponse::ok(wallet_figures(
        &wallet?,
        summary.as_ref(),
    ))))
}

/// GET /api/wallet/transactions
pub async fn transactions(
    State(state): State<AppState>,
    InvestorSession(auth): InvestorSession,
) -> ApiResult<Json<ApiResponse<Vec<Transaction>>>> {
    let transactions = state
        .gateway
        .authorized(auth.bearer())
        .transactions(auth.user_id()?)
        .await?;
    Ok(Json(ApiResponse::ok(transactions)))
}

/// POST /api/wallet/deposit
pub async fn deposit(
    State(state): State<AppState>,
    InvestorSession(auth): InvestorSession,
    Json(req): Json<WalletMovementRequest>,
) -> ApiResult<Json<ApiResponse<WalletFigures>>> {
    req.validate()?;
    let user_id = auth.user_id()?;
    let wallet = state
        .gateway
        .authorized(auth.bearer())
        .deposit(user_id, &req)
        .await?;

    tracing::info!(user_id = %user_id, amount = req.amount, "Deposit submitted");
    Ok(Json(ApiResponse::ok(wallet_figures(&wallet, None))))
}

/// POST /api/wallet/withdraw
pub async fn withdraw(
    State(state): State<AppState>,
    InvestorSession(auth): InvestorSession,
    Json(req): Json<WalletMovementRequest>,
) -> ApiResult<Json<ApiResponse<WalletFigures>>> {
    req.validate()?;
    let user_id = auth.user_id()?;
    let wallet = state
        .gateway
        .authorized(auth.bearer())
        .withdraw(user_id, &req)
        .await?;

    tracing::info!(user_id = %user_id, amount = req.amount, "Withdrawal submitted");
    Ok(Json(ApiResponse::ok(wallet_figures(&wallet, None))))
}
