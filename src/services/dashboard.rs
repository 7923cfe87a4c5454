//! Dashboard and portfolio views
//!
//! Each view fans out to several gateway endpoints at once. A failing section
//! is reported in place so the rest of the dashboard still renders.

use std::collections::HashMap;

use futures_util::future::join_all;
use serde::Serialize;

use crate::error::ApiError;
use crate::gateway::{GatewayClient, GatewayError};
use crate::models::{Investment, Property, Transaction, User};
use crate::services::portfolio::{
    estimate_monthly_income, holdings, summarize, wallet_figures, Holding, PortfolioSummary,
    WalletFigures,
};

/// Transactions shown on the dashboard, newest first
pub const RECENT_TRANSACTIONS: usize = 10;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PortfolioView {
    pub summary: PortfolioSummary,
    pub holdings: Vec<Holding>,
    pub estimated_monthly_income: f64,
    pub investments: Vec<Investment>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SectionError {
    pub code: &'static str,
    pub message: String,
}

/// One independently loaded part of a view
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready { data: T },
    Failed { error: SectionError },
}

impl<T> Section<T> {
    pub fn from_result(result: Result<T, GatewayError>) -> Self {
        match result {
            Ok(data) => Section::Ready { data },
            Err(e) => {
                let err = ApiError::from(e);
                tracing::warn!(error = %err, "Dashboard section failed");
                Section::Failed {
                    error: SectionError {
                        code: err.error_code(),
                        message: err.user_message(),
                    },
                }
            }
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Section::Ready { data } => Some(data),
            Section::Failed { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready { .. })
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Dashboard {
    pub profile: Section<User>,
    pub portfolio: Section<PortfolioView>,
    pub wallet: Section<WalletFigures>,
    pub recent_transactions: Section<Vec<Transaction>>,
}

/// Dashboard service
pub struct DashboardService {
    gateway: GatewayClient,
}

impl DashboardService {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    /// Investments for `user_id` with summary, holdings and income estimate.
    pub async fn portfolio(
        &self,
        bearer: Option<&str>,
        user_id: &str,
    ) -> Result<PortfolioView, GatewayError> {
        let gateway = self.gateway.authorized(bearer);
        let investments = gateway.investments_for_user(user_id).await?;
        let investments = enrich_investments(&gateway, investments).await;
        Ok(portfolio_view(investments))
    }

    /// Load every dashboard section concurrently.
    pub async fn dashboard(&self, bearer: Option<&str>, user_id: &str) -> Dashboard {
        let gateway = self.gateway.authorized(bearer);
        let (profile, portfolio, wallet, transactions) = tokio::join!(
            gateway.get_user(user_id),
            self.portfolio(bearer, user_id),
            gateway.wallet(user_id),
            gateway.transactions(user_id),
        );

        let portfolio = Section::from_result(portfolio);
        let summary = portfolio.data().map(|p| p.summary);
        let wallet = Section::from_result(wallet.map(|w| wallet_figures(&w, summary.as_ref())));

        Dashboard {
            profile: Section::from_result(profile),
            portfolio,
            wallet,
            recent_transactions: Section::from_result(transactions.map(recent_transactions)),
        }
    }
}

pub fn portfolio_view(investments: Vec<Investment>) -> PortfolioView {
    PortfolioView {
        summary: summarize(&investments),
        holdings: holdings(&investments),
        estimated_monthly_income: estimate_monthly_income(&investments),
        investments,
    }
}

/// Newest first, at most [`RECENT_TRANSACTIONS`]. Undated entries sort last.
pub fn recent_transactions(mut transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    transactions.truncate(RECENT_TRANSACTIONS);
    transactions
}

/// Fill in property ROI and title for investments whose embedded property
/// lacked them, fetching each distinct property once. Lookups that fail leave
/// the investment as it was.
async fn enrich_investments(
    gateway: &GatewayClient,
    mut investments: Vec<Investment>,
) -> Vec<Investment> {
    let mut missing: Vec<String> = investments
        .iter()
        .filter(|inv| inv.property.expected_roi.is_none() && !inv.property.id.is_empty())
        .map(|inv| inv.property.id.clone())
        .collect();
    missing.sort();
    missing.dedup();

    if missing.is_empty() {
        return investments;
    }

    let fetched = join_all(missing.iter().map(|id| gateway.get_property(id))).await;
    let properties: HashMap<String, Property> = missing
        .into_iter()
        .zip(fetched)
        .filter_map(|(id, result)| match result {
            Ok(property) => Some((id, property)),
            Err(e) => {
                tracing::warn!(
                    property_id = %id,
                    error = %e,
                    "Could not load property for investment"
                );
                None
            }
        })
        .collect();

    apply_properties(&mut investments, &properties);
    investments
}

pub fn apply_properties(investments: &mut [Investment], properties: &HashMap<String, Property>) {
    for inv in investments.iter_mut() {
        let Some(property) = properties.get(&inv.property.id) else {
            continue;
        };
        if inv.property.expected_roi.is_none() {
            inv.property.expected_roi = Some(property.expected_roi);
        }
        if inv.property.title.is_none() && !property.title.is_empty() {
            inv.property.title = Some(property.title.clone());
        }
        if inv.property.price_per_token.is_none() && property.price_per_token > 0.0 {
            inv.property.price_per_token = Some(property.price_per_token);
        }
    }
}
