//! Portfolio aggregation
//!
//! Folds a user's investments into the dashboard and portfolio figures. Inputs
//! are already normalized, but every figure is still passed through a finite
//! check so a stray `NaN` can never reach a total.

use serde::{Deserialize, Serialize};

use crate::models::{Investment, InvestmentStatus, Wallet};
use crate::services::valuation::{monthly_income, round_to, TOKEN_DECIMALS};

/// Summary figures for a list of investments
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct PortfolioSummary {
    pub total_invested: f64,
    pub total_current_value: f64,
    /// Current value minus invested; negative on a loss
    pub total_earnings: f64,
    /// Earnings as a percentage of the invested total
    pub total_roi: f64,
    pub active_count: usize,
    pub investment_count: usize,
}

/// Tokens held in one property, summed across investments
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Holding {
    pub property_id: String,
    pub title: Option<String>,
    pub tokens: f64,
    pub amount_invested: f64,
    pub current_value: f64,
    pub investment_count: usize,
}

/// Wallet balances with the aggregates the gateway omitted filled in
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct WalletFigures {
    pub available_balance: f64,
    pub locked_balance: f64,
    pub total_balance: f64,
    pub total_deposited: f64,
    pub total_withdrawn: f64,
    pub net_deposits: f64,
    pub total_invested: f64,
    pub total_returns: f64,
    /// True when at least one figure was computed here rather than reported
    pub derived: bool,
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Reduce investments to summary figures. An empty list gives all zeros.
pub fn summarize(investments: &[Investment]) -> PortfolioSummary {
    let (total_invested, total_current_value) =
        investments
            .iter()
            .fold((0.0, 0.0), |(invested, current), inv| {
                let amount = finite_or_zero(inv.amount_invested);
                let value = inv
                    .current_value
                    .filter(|v| v.is_finite())
                    .unwrap_or(amount);
                (invested + amount, current + value)
            });

    let total_earnings = total_current_value - total_invested;
    let total_roi = if total_invested > 0.0 {
        total_earnings / total_invested * 100.0
    } else {
        0.0
    };

    PortfolioSummary {
        total_invested,
        total_current_value,
        total_earnings,
        total_roi,
        active_count: investments
            .iter()
            .filter(|inv| inv.status == InvestmentStatus::Active)
            .count(),
        investment_count: investments.len(),
    }
}

/// Approximate monthly income: each investment's annual expected return
/// spread evenly over twelve months. Investments whose property ROI is
/// unknown contribute nothing. This is an estimate, not an accounting figure.
pub fn estimate_monthly_income(investments: &[Investment]) -> f64 {
    investments
        .iter()
        .map(|inv| {
            let roi = inv.property.expected_roi.unwrap_or(0.0);
            monthly_income(inv.amount_invested, roi)
        })
        .sum()
}

/// Group token-holding investments by property, in first-seen order.
pub fn holdings(investments: &[Investment]) -> Vec<Holding> {
    let mut holdings: Vec<Holding> = Vec::new();

    for inv in investments.iter().filter(|i| i.status.holds_tokens()) {
        let amount = finite_or_zero(inv.amount_invested);
        let value = inv.current_value.filter(|v| v.is_finite()).unwrap_or(amount);
        let tokens = finite_or_zero(inv.tokens_purchased);

        match holdings.iter_mut().find(|h| h.property_id == inv.property.id) {
            Some(holding) => {
                holding.tokens = round_to(holding.tokens + tokens, TOKEN_DECIMALS);
                holding.amount_invested += amount;
                holding.current_value += value;
                holding.investment_count += 1;
                if holding.title.is_none() {
                    holding.title = inv.property.title.clone();
                }
            }
            None => holdings.push(Holding {
                property_id: inv.property.id.clone(),
                title: inv.property.title.clone(),
                tokens: round_to(tokens, TOKEN_DECIMALS),
                amount_invested: amount,
                current_value: value,
                investment_count: 1,
            }),
        }
    }

    holdings
}

/// Fill in wallet aggregates the gateway left out. `summary` supplies the
/// invested and earnings totals when the wallet payload has none.
pub fn wallet_figures(wallet: &Wallet, summary: Option<&PortfolioSummary>) -> WalletFigures {
    let mut derived = false;

    let total_balance = wallet.total_balance.unwrap_or_else(|| {
        derived = true;
        wallet.available_balance + wallet.locked_balance
    });

    let total_invested = match (wallet.total_invested, summary) {
        (Some(reported), _) => reported,
        (None, Some(s)) => {
            derived = true;
            s.total_invested
        }
        (None, None) => 0.0,
    };

    let total_returns = match (wallet.total_returns, summary) {
        (Some(reported), _) => reported,
        (None, Some(s)) => {
            derived = true;
            s.total_earnings
        }
        (None, None) => 0.0,
    };

    WalletFigures {
        available_balance: wallet.available_balance,
        locked_balance: wallet.locked_balance,
        total_balance,
        total_deposited: wallet.total_deposited,
        total_withdrawn: wallet.total_withdrawn,
        net_deposits: wallet.total_deposited - wallet.total_withdrawn,
        total_invested,
        total_returns,
        derived,
    }
}
