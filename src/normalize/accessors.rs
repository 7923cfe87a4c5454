//! Named accessors with their priority-ordered alias lists
//!
//! Each list is tried front to back. New aliases go at the end unless the
//! gateway starts preferring them.

use serde_json::Value;

use super::{first_bool, first_f64, first_string, to_quantity};

const PROPERTY_TOTAL_TOKENS: &[&str] = &[
    "totalTokens",
    "total_tokens",
    "tokenization.totalTokens",
    "tokenization.total_tokens",
    "tokenization_total_tokens",
    "tokens_total",
    "totalSupply",
    "total_supply",
];

const PROPERTY_AVAILABLE_TOKENS: &[&str] = &[
    "availableTokens",
    "available_tokens",
    "tokenization.availableTokens",
    "tokenization.available_tokens",
    "tokenization_available_tokens",
    "tokensAvailable",
    "remainingTokens",
    "remaining_tokens",
];

const PROPERTY_PRICE_PER_TOKEN: &[&str] = &[
    "pricePerToken",
    "price_per_token",
    "pricePerTokenUSDT",
    "pricing.pricePerToken",
    "pricing.price_per_token",
    "pricing_price_per_token",
    "tokenization.pricePerToken",
    "tokenPrice",
    "token_price",
];

const PROPERTY_EXPECTED_ROI: &[&str] = &[
    "expectedROI",
    "expectedRoi",
    "expected_roi",
    "pricing.expectedROI",
    "pricing.expected_roi",
    "pricing_expected_roi",
    "roi",
    "annualReturn",
    "annual_return",
];

const PROPERTY_TOTAL_VALUE: &[&str] = &[
    "totalValueUSDT",
    "pricing_total_value",
    "pricing.totalValue",
    "pricing.total_value",
    "totalValue",
    "total_value",
];

const PROPERTY_ORGANIZATION: &[&str] = &[
    "organizationId",
    "organization_id",
    "orgId",
    "org_id",
    "organization.id",
    "organization._id",
    "organization.displayCode",
    "organization",
];

const INVESTMENT_AMOUNT: &[&str] = &[
    "amountInvested",
    "amount_invested",
    "investmentAmount",
    "investment_amount",
    "amountUSDT",
    "amount",
    "totalInvested",
];

const INVESTMENT_TOKENS: &[&str] = &[
    "tokensPurchased",
    "tokens_purchased",
    "tokenCount",
    "token_count",
    "tokens",
    "quantity",
];

const INVESTMENT_CURRENT_VALUE: &[&str] = &[
    "currentValue",
    "current_value",
    "currentValueUSDT",
    "marketValue",
    "market_value",
];

const INVESTMENT_PROPERTY_ID: &[&str] = &[
    "propertyId",
    "property_id",
    "property.id",
    "property._id",
    "property",
];

const INVESTMENT_USER_ID: &[&str] = &[
    "userId",
    "user_id",
    "investorId",
    "investor_id",
    "user.id",
    "user._id",
    "user",
];

const WALLET_AVAILABLE: &[&str] = &[
    "availableBalance",
    "available_balance",
    "availableBalanceUSDT",
    "balance",
    "available",
];

const WALLET_TOTAL: &[&str] = &["totalBalance", "total_balance", "totalBalanceUSDT"];

const WALLET_LOCKED: &[&str] = &[
    "lockedBalance",
    "locked_balance",
    "locked",
    "pendingBalance",
    "pending_balance",
];

const WALLET_DEPOSITED: &[&str] = &["totalDeposited", "total_deposited", "totalDeposits"];

const WALLET_WITHDRAWN: &[&str] = &["totalWithdrawn", "total_withdrawn", "totalWithdrawals"];

const WALLET_INVESTED: &[&str] = &["totalInvested", "total_invested"];

const WALLET_RETURNS: &[&str] = &[
    "totalReturns",
    "total_returns",
    "totalEarnings",
    "total_earnings",
];

pub(crate) const ID: &[&str] = &["id", "_id", "uuid"];

pub(crate) const CREATED_AT: &[&str] = &["createdAt", "created_at", "timestamp", "date"];

pub(crate) const ACTIVE_FLAG: &[&str] = &["isActive", "is_active", "active"];

pub fn property_total_tokens(raw: &Value) -> f64 {
    to_quantity(first_f64(raw, PROPERTY_TOTAL_TOKENS).unwrap_or(0.0))
}

pub fn property_available_tokens(raw: &Value) -> f64 {
    to_quantity(first_f64(raw, PROPERTY_AVAILABLE_TOKENS).unwrap_or(0.0))
}

pub fn property_price_per_token(raw: &Value) -> f64 {
    first_f64(raw, PROPERTY_PRICE_PER_TOKEN).unwrap_or(0.0)
}

/// `None` when no alias carries a figure, so embedded property data can be
/// told apart from an explicit 0% return.
pub fn property_expected_roi(raw: &Value) -> Option<f64> {
    first_f64(raw, PROPERTY_EXPECTED_ROI)
}

/// Reported total value, falling back to tokens × price.
pub fn property_total_value(raw: &Value) -> f64 {
    first_f64(raw, PROPERTY_TOTAL_VALUE).unwrap_or_else(|| {
        property_total_tokens(raw) * property_price_per_token(raw)
    })
}

pub fn property_organization_id(raw: &Value) -> Option<String> {
    first_string(raw, PROPERTY_ORGANIZATION)
}

pub fn investment_amount(raw: &Value) -> f64 {
    first_f64(raw, INVESTMENT_AMOUNT).unwrap_or(0.0)
}

pub fn investment_tokens(raw: &Value) -> f64 {
    first_f64(raw, INVESTMENT_TOKENS).unwrap_or(0.0)
}

pub fn investment_current_value(raw: &Value) -> Option<f64> {
    first_f64(raw, INVESTMENT_CURRENT_VALUE)
}

pub fn investment_property_id(raw: &Value) -> Option<String> {
    first_string(raw, INVESTMENT_PROPERTY_ID)
}

pub fn investment_user_id(raw: &Value) -> Option<String> {
    first_string(raw, INVESTMENT_USER_ID)
}

pub fn wallet_available_balance(raw: &Value) -> f64 {
    first_f64(raw, WALLET_AVAILABLE).unwrap_or(0.0)
}

pub fn wallet_total_balance(raw: &Value) -> Option<f64> {
    first_f64(raw, WALLET_TOTAL)
}

pub fn wallet_locked_balance(raw: &Value) -> f64 {
    first_f64(raw, WALLET_LOCKED).unwrap_or(0.0)
}

pub fn wallet_total_deposited(raw: &Value) -> f64 {
    first_f64(raw, WALLET_DEPOSITED).unwrap_or(0.0)
}

pub fn wallet_total_withdrawn(raw: &Value) -> f64 {
    first_f64(raw, WALLET_WITHDRAWN).unwrap_or(0.0)
}

pub fn wallet_total_invested(raw: &Value) -> Option<f64> {
    first_f64(raw, WALLET_INVESTED)
}

pub fn wallet_total_returns(raw: &Value) -> Option<f64> {
    first_f64(raw, WALLET_RETURNS)
}

/// Records default to active unless the gateway says otherwise.
pub fn is_active(raw: &Value) -> bool {
    first_bool(raw, ACTIVE_FLAG).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_value_alias_priority() {
        let raw = json!({
            "totalValue": 1.0,
            "pricing_total_value": 2.0,
            "totalValueUSDT": 3.0,
        });
        assert_eq!(property_total_value(&raw), 3.0);

        let raw = json!({ "totalValue": 1.0, "pricing_total_value": 2.0 });
        assert_eq!(property_total_value(&raw), 2.0);
    }

    #[test]
    fn test_total_value_falls_back_to_token_economics() {
        let raw = json!({ "total_tokens": 1000, "pricing": { "pricePerToken": "50" } });
        assert_eq!(property_total_value(&raw), 50_000.0);
    }

    #[test]
    fn test_nested_tokenization_block() {
        let raw = json!({
            "tokenization": { "totalTokens": 500, "availableTokens": 120 }
        });
        assert_eq!(property_total_tokens(&raw), 500.0);
        assert_eq!(property_available_tokens(&raw), 120.0);
    }

    #[test]
    fn test_fractional_token_supply_is_kept() {
        let raw = json!({ "totalTokens": 1000, "availableTokens": "999.6" });
        assert_eq!(property_total_tokens(&raw), 1000.0);
        assert_eq!(property_available_tokens(&raw), 999.6);
    }

    #[test]
    fn test_expected_roi_absent_vs_zero() {
        assert_eq!(property_expected_roi(&json!({})), None);
        assert_eq!(property_expected_roi(&json!({ "roi": 0 })), Some(0.0));
    }

    #[test]
    fn test_investment_property_id_from_embedded_object() {
        let raw = json!({ "property": { "_id": "abc123", "title": "Loft" } });
        assert_eq!(investment_property_id(&raw), Some("abc123".to_string()));

        let raw = json!({ "property": "p-9" });
        assert_eq!(investment_property_id(&raw), Some("p-9".to_string()));
    }

    #[test]
    fn test_is_active_defaults_true() {
        assert!(is_active(&json!({})));
        assert!(!is_active(&json!({ "is_active": false })));
        assert!(!is_active(&json!({ "active": "no" })));
    }
}
