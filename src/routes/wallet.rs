//! Wallet routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::wallet;
use crate::state::AppState;

pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route("/api/wallet", get(wallet::get_wallet))
        .route("/api/wallet/transactions", get(wallet::transactions))
        .route("/api/wallet/deposit", post(wallet::deposit))
        .route("/api/wallet/withdraw", post(wallet::withdraw))
}
