//! Request and query DTOs accepted by the HTTP facade

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::PropertyStatus;

/// Request body for POST /api/calculator/quote
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteRequest {
    #[validate(range(min = 0.0))]
    pub amount: f64,
    pub price_per_token: f64,
    pub expected_roi: f64,
    #[validate(range(max = 50))]
    pub horizon_years: Option<u32>,
    #[validate(range(min = 0.0))]
    pub total_tokens: Option<f64>,
    #[validate(range(min = 0.0))]
    pub available_tokens: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TokensRequest {
    #[validate(range(min = 0.0))]
    pub amount: f64,
    pub price_per_token: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AmountRequest {
    #[validate(range(min = 0.0))]
    pub tokens: f64,
    pub price_per_token: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BreakdownRequest {
    #[validate(range(min = 0.0))]
    pub amount: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProjectionRequest {
    #[validate(range(min = 0.0))]
    pub amount: f64,
    pub expected_roi: f64,
    #[validate(range(max = 50))]
    pub horizon_years: Option<u32>,
}

/// Query for GET /api/properties/:id/quote
#[derive(Debug, Deserialize, Validate)]
pub struct PropertyQuoteQuery {
    pub amount: f64,
    #[validate(range(max = 50))]
    pub horizon_years: Option<u32>,
}

/// Filters forwarded to the gateway property listing
#[derive(Debug, Deserialize, Default, Clone)]
pub struct PropertyFilter {
    pub status: Option<String>,
    pub property_type: Option<String>,
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub organization_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PropertyFilter {
    /// Query pairs for the gateway, skipping unset filters
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        let text = [
            ("status", &self.status),
            ("propertyType", &self.property_type),
            ("city", &self.city),
            ("search", &self.search),
            ("organizationId", &self.organization_id),
        ];
        for (key, value) in text {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                query.push((key, v.to_string()));
            }
        }
        if let Some(min) = self.min_price {
            query.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            query.push(("maxPrice", max.to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

/// Request body for PATCH /api/properties/:id/status
#[derive(Debug, Deserialize, Serialize)]
pub struct PropertyStatusRequest {
    pub status: PropertyStatus,
}

/// Request body for POST /api/investments
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvestmentRequest {
    #[validate(length(min = 1))]
    pub property_id: String,
    #[validate(range(min = 0.01))]
    pub amount: f64,
}

/// Body sent to the gateway once a purchase has been validated locally
#[derive(Debug, Serialize)]
pub struct NewInvestment {
    pub user_id: String,
    pub property_id: String,
    pub amount: f64,
    pub tokens: f64,
}

/// Deposit or withdrawal
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct WalletMovementRequest {
    #[validate(range(min = 0.01))]
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Which portal a login is for
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    #[default]
    Investor,
    Organization,
    Admin,
}

impl Portal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Portal::Investor => "investor",
            Portal::Organization => "organization",
            Portal::Admin => "admin",
        }
    }
}

/// Request body for POST /api/auth/login; credentials are forwarded as-is
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    #[serde(default)]
    pub portal: Portal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_query_skips_blank_values() {
        let filter = PropertyFilter {
            status: Some("active".to_string()),
            city: Some("  ".to_string()),
            min_price: Some(10.0),
            limit: Some(20),
            ..PropertyFilter::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![
                ("status", "active".to_string()),
                ("minPrice", "10".to_string()),
                ("limit", "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_login_portal_defaults_to_investor() {
        let req: LoginRequest =
            serde_json::from_str(r#"{ "email": "a@b.co", "password": "x" }"#).unwrap();
        assert_eq!(req.portal, Portal::Investor);
    }

    #[test]
    fn test_property_quote_horizon_is_bounded() {
        let query: PropertyQuoteQuery =
            serde_json::from_str(r#"{ "amount": 1.0, "horizon_years": 4000000000 }"#).unwrap();
        let errors = query.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("horizon_years"));

        let query: PropertyQuoteQuery =
            serde_json::from_str(r#"{ "amount": 1.0, "horizon_years": 10 }"#).unwrap();
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_create_investment_validation() {
        let req = CreateInvestmentRequest {
            property_id: String::new(),
            amount: 0.0,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("property_id"));
        assert!(errors.field_errors().contains_key("amount"));
    }
}
