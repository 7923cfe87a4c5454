//! Valuation engine for tokenized properties
//!
//! Pure functions that turn a property's token economics and an investment
//! amount into token quantities, fees, growth projections and funding
//! figures. The ROI calculator, the token-purchase flow and the admin
//! property view all go through these so they agree on the formulas.
//!
//! When the gateway's calculator endpoint answers, its figures win; the local
//! computation is for instant feedback before submission (see
//! [`reconcile_quote`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Property, ServerQuote};

// ============================================================================
// Configuration Constants
// ============================================================================

/// One-off fee charged on purchase
pub const PURCHASE_FEE_RATE: f64 = 0.02;

/// Property running/management fee
pub const RUNNING_FEE_RATE: f64 = 0.01;

/// Payment processing fee
pub const TRANSACTION_FEE_RATE: f64 = 0.005;

/// Years projected when the caller does not choose a horizon
pub const DEFAULT_HORIZON_YEARS: u32 = 5;

/// Longest horizon a projection will cover
pub const MAX_HORIZON_YEARS: u32 = 50;

/// Below this funding percentage a property counts as unfunded. Fractional
/// token sales leave float residue, so exact zero is not required.
pub const DELETE_FUNDING_THRESHOLD: f64 = 0.0001;

/// Fractional tokens are tracked to 6 decimal places
pub const TOKEN_DECIMALS: u32 = 6;

/// Currency amounts are tracked to cents
pub const CURRENCY_DECIMALS: u32 = 2;

/// Local and gateway quotes further apart than this are reported as diverged
pub const QUOTE_DIVERGENCE_TOLERANCE: f64 = 0.01;

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    #[error("Price per token must be greater than zero, got {0}")]
    InvalidPrice(f64),

    #[error("Investment amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    #[error("Property is {0} and not open for investment")]
    PropertyNotOpen(&'static str),

    #[error("Requested {requested} tokens but only {available} are available")]
    InsufficientTokens { requested: f64, available: f64 },
}

// ============================================================================
// Data Models
// ============================================================================

/// The subset of a property needed to price an investment
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TokenEconomics {
    pub total_tokens: f64,
    pub available_tokens: f64,
    pub price_per_token: f64,
    pub expected_roi: f64,
}

impl From<&Property> for TokenEconomics {
    fn from(property: &Property) -> Self {
        Self {
            total_tokens: property.total_tokens,
            available_tokens: property.available_tokens,
            price_per_token: property.price_per_token,
            expected_roi: property.expected_roi,
        }
    }
}

/// Fees applied on top of an investment amount
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    pub investment_amount: f64,
    pub purchase_fee: f64,
    pub running_fee: f64,
    pub transaction_fee: f64,
    pub total_fees: f64,
    /// `investment_amount` plus every fee
    pub total_cost: f64,
}

/// Projected value at the end of a given year
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ProjectedReturn {
    pub year: u32,
    pub value: f64,
}

/// Everything the calculator and purchase widget show for one amount
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InvestmentQuote {
    pub amount: f64,
    pub price_per_token: f64,
    pub tokens: f64,
    pub expected_roi: f64,
    pub cost_breakdown: CostBreakdown,
    pub projections: Vec<ProjectedReturn>,
    pub estimated_monthly_income: f64,
    pub funding_percentage: f64,
    /// Funding after this purchase, assuming it settles
    pub funding_percentage_after: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Local,
    Gateway,
}

/// A local quote alongside the gateway's answer, when there is one
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReconciledQuote {
    pub source: QuoteSource,
    pub tokens: f64,
    pub total_cost: f64,
    pub final_projected_value: Option<f64>,
    pub diverged: bool,
    pub local: InvestmentQuote,
    pub gateway: Option<ServerQuote>,
}

// ============================================================================
// Engine
// ============================================================================

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Tokens bought for `amount`, to 6 decimal places.
pub fn tokens_from_amount(amount: f64, price_per_token: f64) -> Result<f64, ValuationError> {
    if !price_per_token.is_finite() || price_per_token <= 0.0 {
        return Err(ValuationError::InvalidPrice(price_per_token));
    }
    Ok(round_to(
        finite_or_zero(amount) / price_per_token,
        TOKEN_DECIMALS,
    ))
}

/// Cost of `tokens`, to the cent.
pub fn amount_from_tokens(tokens: f64, price_per_token: f64) -> f64 {
    round_to(
        finite_or_zero(tokens) * finite_or_zero(price_per_token),
        CURRENCY_DECIMALS,
    )
}

/// Fixed-rate fees on `investment_amount`. Rates do not vary by property.
pub fn cost_breakdown(investment_amount: f64) -> CostBreakdown {
    let amount = finite_or_zero(investment_amount);
    let purchase_fee = amount * PURCHASE_FEE_RATE;
    let running_fee = amount * RUNNING_FEE_RATE;
    let transaction_fee = amount * TRANSACTION_FEE_RATE;

    CostBreakdown {
        investment_amount: amount,
        purchase_fee,
        running_fee,
        transaction_fee,
        total_fees: purchase_fee + running_fee + transaction_fee,
        total_cost: amount + purchase_fee + running_fee + transaction_fee,
    }
}

/// Compound annual growth at `expected_roi` percent, years 1 through
/// `horizon_years` (capped at [`MAX_HORIZON_YEARS`]). Zero or negative
/// returns are projected as given.
pub fn projected_returns(
    investment_amount: f64,
    expected_roi: f64,
    horizon_years: u32,
) -> Vec<ProjectedReturn> {
    let amount = finite_or_zero(investment_amount);
    let growth = 1.0 + finite_or_zero(expected_roi) / 100.0;

    (1..=horizon_years.min(MAX_HORIZON_YEARS))
        .map(|year| ProjectedReturn {
            year,
            value: amount * growth.powi(year as i32),
        })
        .collect()
}

/// Share of the supply sold, in percent.
///
/// Not clamped: `available_tokens > total_tokens` yields a negative figure so
/// the upstream inconsistency stays visible.
pub fn funding_percentage(total_tokens: f64, available_tokens: f64) -> f64 {
    let total = finite_or_zero(total_tokens);
    if total <= 0.0 {
        return 0.0;
    }
    (total - finite_or_zero(available_tokens)) / total * 100.0
}

/// Gate for the delete affordance. The gateway makes the final call.
pub fn can_delete_property(funding_percentage: f64) -> bool {
    funding_percentage < DELETE_FUNDING_THRESHOLD
}

/// Monthly share of the annual return on `amount`.
pub fn monthly_income(amount: f64, expected_roi: f64) -> f64 {
    finite_or_zero(amount) * (finite_or_zero(expected_roi) / 100.0) / 12.0
}

/// Price an investment of `amount` in a property.
pub fn quote(
    economics: &TokenEconomics,
    amount: f64,
    horizon_years: u32,
) -> Result<InvestmentQuote, ValuationError> {
    let tokens = tokens_from_amount(amount, economics.price_per_token)?;
    let amount = finite_or_zero(amount);

    let funding_percentage =
        funding_percentage(economics.total_tokens, economics.available_tokens);
    let funding_percentage_after = if economics.total_tokens > 0.0 {
        funding_percentage + tokens / economics.total_tokens * 100.0
    } else {
        0.0
    };

    Ok(InvestmentQuote {
        amount,
        price_per_token: economics.price_per_token,
        tokens,
        expected_roi: economics.expected_roi,
        cost_breakdown: cost_breakdown(amount),
        projections: projected_returns(amount, economics.expected_roi, horizon_years),
        estimated_monthly_income: monthly_income(amount, economics.expected_roi),
        funding_percentage,
        funding_percentage_after,
    })
}

/// Check a purchase before it is submitted and return the tokens it buys.
pub fn validate_purchase(property: &Property, amount: f64) -> Result<f64, ValuationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValuationError::NonPositiveAmount(amount));
    }
    if !property.status.accepts_investments() {
        return Err(ValuationError::PropertyNotOpen(property.status.as_str()));
    }

    let tokens = tokens_from_amount(amount, property.price_per_token)?;
    if tokens > property.available_tokens {
        return Err(ValuationError::InsufficientTokens {
            requested: tokens,
            available: property.available_tokens,
        });
    }
    Ok(tokens)
}

/// Prefer the gateway's figures when present, falling back field by field to
/// the local quote.
pub fn reconcile_quote(local: InvestmentQuote, gateway: Option<ServerQuote>) -> ReconciledQuote {
    let local_final = local.projections.last().map(|p| p.value);

    let Some(server) = gateway else {
        return ReconciledQuote {
            source: QuoteSource::Local,
            tokens: local.tokens,
            total_cost: local.cost_breakdown.total_cost,
            final_projected_value: local_final,
            diverged: false,
            local,
            gateway: None,
        };
    };

    let token_gap = server
        .tokens
        .map(|t| (t - local.tokens).abs() * local.price_per_token)
        .unwrap_or(0.0);
    let cost_gap = server
        .total_cost
        .map(|c| (c - local.cost_breakdown.total_cost).abs())
        .unwrap_or(0.0);
    let diverged = token_gap > QUOTE_DIVERGENCE_TOLERANCE || cost_gap > QUOTE_DIVERGENCE_TOLERANCE;

    if diverged {
        tracing::warn!(
            local_tokens = local.tokens,
            gateway_tokens = ?server.tokens,
            local_total_cost = local.cost_breakdown.total_cost,
            gateway_total_cost = ?server.total_cost,
            "Gateway quote diverges from local calculation"
        );
    }

    ReconciledQuote {
        source: QuoteSource::Gateway,
        tokens: server.tokens.unwrap_or(local.tokens),
        total_cost: server.total_cost.unwrap_or(local.cost_breakdown.total_cost),
        final_projected_value: server.projected_value.or(local_final),
        diverged,
        local,
        gateway: Some(server),
    }
}

/// Funding figures shown next to a property in the admin and detail views
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PropertyValuation {
    #[serde(flatten)]
    pub property: Property,
    pub sold_tokens: f64,
    pub funding_percentage: f64,
    pub can_delete: bool,
    /// Total tokens times price, which may disagree with `total_value`
    pub token_value: f64,
    pub value_mismatch: bool,
}

/// Derive funding figures for a property.
pub fn assess_property(property: Property) -> PropertyValuation {
    let funding = funding_percentage(property.total_tokens, property.available_tokens);
    let token_value = property.token_value();
    let value_mismatch = (token_value - property.total_value).abs() > QUOTE_DIVERGENCE_TOLERANCE;
    if value_mismatch {
        tracing::debug!(
            property_id = %property.id,
            total_value = property.total_value,
            token_value,
            "Property value disagrees with token economics"
        );
    }

    PropertyValuation {
        sold_tokens: property.sold_tokens(),
        funding_percentage: funding,
        can_delete: can_delete_property(funding),
        token_value,
        value_mismatch,
        property,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
