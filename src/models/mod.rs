//! Data models for PropVault
//!
//! Every entity here is a read-only view of a record owned by the backend
//! gateway. Values are built by [`crate::normalize`] from raw gateway JSON and
//! discarded once the response that needed them has been served.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod requests;
pub use requests::*;

/// Lowercase and fold `_`/space separators into `-` so `ON_HOLD`,
/// `on_hold` and `On Hold` all compare equal to `on-hold`.
fn fold_label(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}

/// Property lifecycle status
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyStatus {
    #[default]
    Planning,
    ComingSoon,
    Construction,
    Active,
    OnHold,
    SoldOut,
    Completed,
}

impl PropertyStatus {
    /// Parse a gateway label; unknown labels fall back to `Planning`.
    pub fn from_label(raw: &str) -> Self {
        match fold_label(raw).as_str() {
            "coming-soon" | "comingsoon" | "upcoming" => PropertyStatus::ComingSoon,
            "construction" | "under-construction" => PropertyStatus::Construction,
            "active" | "live" | "open" => PropertyStatus::Active,
            "on-hold" | "onhold" | "paused" => PropertyStatus::OnHold,
            "sold-out" | "soldout" | "funded" => PropertyStatus::SoldOut,
            "completed" | "complete" => PropertyStatus::Completed,
            _ => PropertyStatus::Planning,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Planning => "planning",
            PropertyStatus::ComingSoon => "coming-soon",
            PropertyStatus::Construction => "construction",
            PropertyStatus::Active => "active",
            PropertyStatus::OnHold => "on-hold",
            PropertyStatus::SoldOut => "sold-out",
            PropertyStatus::Completed => "completed",
        }
    }

    /// Whether tokens can currently be bought
    pub fn accepts_investments(&self) -> bool {
        matches!(self, PropertyStatus::Active)
    }
}

/// Property type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    #[default]
    Residential,
    Commercial,
    MixedUse,
}

impl PropertyType {
    pub fn from_label(raw: &str) -> Self {
        match fold_label(raw).as_str() {
            "commercial" => PropertyType::Commercial,
            "mixed-use" | "mixeduse" | "mixed" => PropertyType::MixedUse,
            _ => PropertyType::Residential,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl Location {
    /// "City, State, Country" with missing parts skipped
    pub fn display(&self) -> String {
        [&self.city, &self.state, &self.country]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Tokenized property
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Property {
    pub id: String,
    /// Human-readable code, e.g. `PROP-0042`
    pub display_code: Option<String>,
    pub title: String,
    pub location: Location,
    pub status: PropertyStatus,
    pub property_type: PropertyType,
    pub total_tokens: f64,
    pub available_tokens: f64,
    pub price_per_token: f64,
    /// Annual percentage, e.g. `12.0` for 12%
    pub expected_roi: f64,
    /// Monetary value as reported by the gateway, or tokens × price when absent
    pub total_value: f64,
    pub organization_id: Option<String>,
    pub featured: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Property {
    /// Tokens sold so far; negative when the gateway reports more available
    /// than total tokens.
    pub fn sold_tokens(&self) -> f64 {
        self.total_tokens - self.available_tokens
    }

    /// Value implied by the token economics, independent of `total_value`.
    pub fn token_value(&self) -> f64 {
        self.total_tokens * self.price_per_token
    }
}

/// Property data embedded in an investment record
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PropertyRef {
    pub id: String,
    pub title: Option<String>,
    pub expected_roi: Option<f64>,
    pub price_per_token: Option<f64>,
}

/// Investment status
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvestmentStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Cancelled,
    Failed,
}

impl InvestmentStatus {
    pub fn from_label(raw: &str) -> Self {
        match fold_label(raw).as_str() {
            "active" | "confirmed" => InvestmentStatus::Active,
            "completed" | "complete" => InvestmentStatus::Completed,
            "cancelled" | "canceled" => InvestmentStatus::Cancelled,
            "failed" | "rejected" => InvestmentStatus::Failed,
            _ => InvestmentStatus::Pending,
        }
    }

    /// Cancelled and failed investments hold no tokens
    pub fn holds_tokens(&self) -> bool {
        !matches!(self, InvestmentStatus::Cancelled | InvestmentStatus::Failed)
    }
}

/// A user's position in one property
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Investment {
    pub id: String,
    pub user_id: Option<String>,
    pub property: PropertyRef,
    pub amount_invested: f64,
    /// Fractional tokens are allowed (6 dp)
    pub tokens_purchased: f64,
    pub status: InvestmentStatus,
    /// Missing means "valued at cost"
    pub current_value: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Investment {
    pub fn valuation(&self) -> f64 {
        self.current_value.unwrap_or(self.amount_invested)
    }
}

/// Wallet balances
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Wallet {
    pub user_id: Option<String>,
    pub available_balance: f64,
    /// Absent when the gateway omits it; see `services::portfolio::wallet_figures`
    pub total_balance: Option<f64>,
    pub locked_balance: f64,
    pub total_deposited: f64,
    pub total_withdrawn: f64,
    pub total_invested: Option<f64>,
    pub total_returns: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl KycStatus {
    pub fn from_label(raw: &str) -> Self {
        match fold_label(raw).as_str() {
            "verified" | "approved" => KycStatus::Verified,
            "rejected" | "denied" => KycStatus::Rejected,
            _ => KycStatus::Pending,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub kyc_status: KycStatus,
    pub is_active: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Organization {
    pub id: String,
    /// Human-readable code; either this or `id` may be used to refer to the org
    pub display_code: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    /// Derived by scanning properties, never taken from the gateway
    pub property_count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Investment,
    Return,
    Fee,
    Other,
}

impl TransactionKind {
    pub fn from_label(raw: &str) -> Self {
        match fold_label(raw).as_str() {
            "deposit" => TransactionKind::Deposit,
            "withdrawal" | "withdraw" => TransactionKind::Withdrawal,
            "investment" | "purchase" | "token-purchase" => TransactionKind::Investment,
            "return" | "dividend" | "payout" => TransactionKind::Return,
            "fee" => TransactionKind::Fee,
            _ => TransactionKind::Other,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: f64,
    pub status: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Figures returned by the gateway's ROI calculator; any of them may be missing
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct ServerQuote {
    pub tokens: Option<f64>,
    pub total_cost: Option<f64>,
    /// Value at the end of the projection horizon
    pub projected_value: Option<f64>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels_accept_several_spellings() {
        assert_eq!(PropertyStatus::from_label("ON_HOLD"), PropertyStatus::OnHold);
        assert_eq!(PropertyStatus::from_label("sold out"), PropertyStatus::SoldOut);
        assert_eq!(PropertyStatus::from_label("coming-soon"), PropertyStatus::ComingSoon);
        assert_eq!(PropertyStatus::from_label("???"), PropertyStatus::Planning);
        assert_eq!(PropertyType::from_label("Mixed_Use"), PropertyType::MixedUse);
        assert_eq!(InvestmentStatus::from_label("Canceled"), InvestmentStatus::Cancelled);
        assert_eq!(KycStatus::from_label("APPROVED"), KycStatus::Verified);
    }

    #[test]
    fn test_property_status_serializes_kebab_case() {
        let json = serde_json::to_string(&PropertyStatus::ComingSoon).unwrap();
        assert_eq!(json, "\"coming-soon\"");
        assert_eq!(PropertyStatus::SoldOut.as_str(), "sold-out");
    }

    #[test]
    fn test_location_display_skips_missing() {
        let location = Location {
            city: Some("Austin".to_string()),
            state: None,
            country: Some("USA".to_string()),
        };
        assert_eq!(location.display(), "Austin, USA");
    }

    #[test]
    fn test_investment_valued_at_cost_without_current_value() {
        let investment = Investment {
            id: "inv-1".to_string(),
            user_id: None,
            property: PropertyRef::default(),
            amount_invested: 250.0,
            tokens_purchased: 2.5,
            status: InvestmentStatus::Active,
            current_value: None,
            created_at: None,
        };
        assert_eq!(investment.valuation(), 250.0);
    }
}
