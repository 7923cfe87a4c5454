//! Builders from raw gateway JSON into typed models

use serde_json::Value;

use super::accessors::{self, ACTIVE_FLAG, CREATED_AT, ID};
use super::{first_bool, first_datetime, first_f64, first_string, lookup};
use crate::models::{
    Investment, InvestmentStatus, KycStatus, Location, Organization, Property, PropertyRef,
    PropertyStatus, PropertyType, ServerQuote, Transaction, TransactionKind, User, Wallet,
};

pub fn property_from_raw(raw: &Value) -> Property {
    Property {
        id: first_string(raw, ID)
            .or_else(|| first_string(raw, &["propertyId", "property_id"]))
            .unwrap_or_default(),
        display_code: first_string(
            raw,
            &["displayCode", "display_code", "propertyCode", "property_code", "code"],
        ),
        title: first_string(raw, &["title", "name", "propertyName", "property_name"])
            .unwrap_or_default(),
        location: Location {
            city: first_string(raw, &["location.city", "city", "address.city"]),
            state: first_string(raw, &["location.state", "state", "address.state"]),
            country: first_string(raw, &["location.country", "country", "address.country"]),
        },
        status: first_string(raw, &["status", "propertyStatus", "property_status"])
            .map(|s| PropertyStatus::from_label(&s))
            .unwrap_or_default(),
        property_type: first_string(raw, &["propertyType", "property_type", "type"])
            .map(|s| PropertyType::from_label(&s))
            .unwrap_or_default(),
        total_tokens: accessors::property_total_tokens(raw),
        available_tokens: accessors::property_available_tokens(raw),
        price_per_token: accessors::property_price_per_token(raw),
        expected_roi: accessors::property_expected_roi(raw).unwrap_or(0.0),
        total_value: accessors::property_total_value(raw),
        organization_id: accessors::property_organization_id(raw),
        featured: first_bool(raw, &["featured", "isFeatured", "is_featured"]).unwrap_or(false),
        created_at: first_datetime(raw, CREATED_AT),
    }
}

/// Property data as embedded in an investment; the embedded object may be
/// missing entirely, in which case only the id is known.
fn property_ref_from_investment(raw: &Value) -> PropertyRef {
    let id = accessors::investment_property_id(raw).unwrap_or_default();
    match lookup(raw, "property").filter(|p| p.is_object()) {
        Some(embedded) => PropertyRef {
            id,
            title: first_string(embedded, &["title", "name"]),
            expected_roi: accessors::property_expected_roi(embedded)
                .or_else(|| accessors::property_expected_roi(raw)),
            price_per_token: Some(accessors::property_price_per_token(embedded))
                .filter(|p| *p > 0.0),
        },
        None => PropertyRef {
            id,
            title: first_string(raw, &["propertyTitle", "property_title", "propertyName"]),
            expected_roi: accessors::property_expected_roi(raw),
            price_per_token: first_f64(raw, &["pricePerToken", "price_per_token", "tokenPrice"])
                .filter(|p| *p > 0.0),
        },
    }
}

pub fn investment_from_raw(raw: &Value) -> Investment {
    Investment {
        id: first_string(raw, ID)
            .or_else(|| first_string(raw, &["investmentId", "investment_id"]))
            .unwrap_or_default(),
        user_id: accessors::investment_user_id(raw),
        property: property_ref_from_investment(raw),
        amount_invested: accessors::investment_amount(raw),
        tokens_purchased: accessors::investment_tokens(raw),
        status: first_string(raw, &["status", "investmentStatus", "investment_status"])
            .map(|s| InvestmentStatus::from_label(&s))
            .unwrap_or_default(),
        current_value: accessors::investment_current_value(raw),
        created_at: first_datetime(raw, CREATED_AT),
    }
}

pub fn wallet_from_raw(raw: &Value) -> Wallet {
    Wallet {
        user_id: first_string(raw, &["userId", "user_id", "user"]),
        available_balance: accessors::wallet_available_balance(raw),
        total_balance: accessors::wallet_total_balance(raw),
        locked_balance: accessors::wallet_locked_balance(raw),
        total_deposited: accessors::wallet_total_deposited(raw),
        total_withdrawn: accessors::wallet_total_withdrawn(raw),
        total_invested: accessors::wallet_total_invested(raw),
        total_returns: accessors::wallet_total_returns(raw),
    }
}

pub fn user_from_raw(raw: &Value) -> User {
    let name = first_string(raw, &["name", "fullName", "full_name"]).or_else(|| {
        let first = first_string(raw, &["firstName", "first_name"]);
        let last = first_string(raw, &["lastName", "last_name"]);
        match (first, last) {
            (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
            (f, l) => f.or(l),
        }
    });

    User {
        id: first_string(raw, ID)
            .or_else(|| first_string(raw, &["userId", "user_id"]))
            .unwrap_or_default(),
        name,
        email: first_string(raw, &["email", "emailAddress", "email_address"]),
        phone: first_string(raw, &["phone", "phoneNumber", "phone_number", "mobile"]),
        kyc_status: first_string(raw, &["kycStatus", "kyc_status", "kyc.status"])
            .map(|s| KycStatus::from_label(&s))
            .unwrap_or_default(),
        is_active: first_bool(raw, ACTIVE_FLAG).unwrap_or(true),
    }
}

/// `property_count` starts at 0; see `services::organization`.
pub fn organization_from_raw(raw: &Value) -> Organization {
    Organization {
        id: first_string(raw, ID)
            .or_else(|| first_string(raw, &["organizationId", "organization_id"]))
            .unwrap_or_default(),
        display_code: first_string(
            raw,
            &["displayCode", "display_code", "orgCode", "org_code", "code"],
        ),
        name: first_string(raw, &["name", "organizationName", "organization_name"])
            .unwrap_or_default(),
        description: first_string(raw, &["description", "about"]),
        website: first_string(raw, &["website", "websiteUrl", "website_url", "url"]),
        is_active: accessors::is_active(raw),
        property_count: 0,
    }
}

pub fn transaction_from_raw(raw: &Value) -> Transaction {
    Transaction {
        id: first_string(raw, ID)
            .or_else(|| first_string(raw, &["transactionId", "transaction_id", "txHash"]))
            .unwrap_or_default(),
        kind: first_string(raw, &["type", "transactionType", "transaction_type", "kind"])
            .map(|s| TransactionKind::from_label(&s))
            .unwrap_or(TransactionKind::Other),
        amount: first_f64(raw, &["amount", "amountUSDT", "value"]).unwrap_or(0.0),
        status: first_string(raw, &["status"]),
        description: first_string(raw, &["description", "note", "memo"]),
        created_at: first_datetime(raw, CREATED_AT),
    }
}

pub fn server_quote_from_raw(raw: &Value) -> ServerQuote {
    ServerQuote {
        tokens: first_f64(
            raw,
            &["tokens", "tokenCount", "tokensPurchased", "tokens_purchased", "tokenAmount"],
        ),
        total_cost: first_f64(
            raw,
            &["totalCost", "total_cost", "totalAmount", "total_amount", "costBreakdown.total"],
        ),
        projected_value: first_f64(
            raw,
            &[
                "projectedValue",
                "projected_value",
                "futureValue",
                "future_value",
                "totalReturn",
            ],
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_property_from_mixed_shapes() {
        let raw = json!({
            "_id": "prop-1",
            "propertyCode": "PV-001",
            "name": "Harbor Lofts",
            "location": { "city": "Lisbon", "country": "Portugal" },
            "status": "ACTIVE",
            "property_type": "mixed_use",
            "tokenization": { "totalTokens": "1000", "availableTokens": 250 },
            "pricing": { "pricePerToken": 50, "expectedROI": "8.5" },
            "organization": { "id": "org-7" },
            "isFeatured": true,
            "createdAt": "2024-01-15T09:30:00Z"
        });
        let property = property_from_raw(&raw);
        assert_eq!(property.id, "prop-1");
        assert_eq!(property.display_code.as_deref(), Some("PV-001"));
        assert_eq!(property.title, "Harbor Lofts");
        assert_eq!(property.status, PropertyStatus::Active);
        assert_eq!(property.property_type, PropertyType::MixedUse);
        assert_eq!(property.total_tokens, 1000.0);
        assert_eq!(property.available_tokens, 250.0);
        assert_eq!(property.price_per_token, 50.0);
        assert_eq!(property.expected_roi, 8.5);
        assert_eq!(property.total_value, 50_000.0);
        assert_eq!(property.organization_id.as_deref(), Some("org-7"));
        assert!(property.featured);
        assert!(property.created_at.is_some());
    }

    #[test]
    fn test_property_from_empty_object_is_all_defaults() {
        let property = property_from_raw(&json!({}));
        assert_eq!(property.total_tokens, 0.0);
        assert_eq!(property.price_per_token, 0.0);
        assert_eq!(property.total_value, 0.0);
        assert_eq!(property.status, PropertyStatus::Planning);
    }

    #[test]
    fn test_investment_with_embedded_property() {
        let raw = json!({
            "id": 42,
            "user": "u-1",
            "property": { "id": "p-1", "title": "Loft", "expectedROI": 12, "pricePerToken": 100 },
            "amountInvested": "5000",
            "tokensPurchased": 50,
            "status": "active",
            "currentValue": null
        });
        let investment = investment_from_raw(&raw);
        assert_eq!(investment.id, "42");
        assert_eq!(investment.user_id.as_deref(), Some("u-1"));
        assert_eq!(investment.property.id, "p-1");
        assert_eq!(investment.property.expected_roi, Some(12.0));
        assert_eq!(investment.property.price_per_token, Some(100.0));
        assert_eq!(investment.amount_invested, 5000.0);
        assert_eq!(investment.current_value, None);
        assert_eq!(investment.status, InvestmentStatus::Active);
    }

    #[test]
    fn test_investment_with_flat_property_fields() {
        let raw = json!({
            "investment_id": "i-9",
            "property_id": "p-2",
            "property_title": "Mill House",
            "amount": 300,
            "tokens": "3.25",
            "expected_roi": 6
        });
        let investment = investment_from_raw(&raw);
        assert_eq!(investment.id, "i-9");
        assert_eq!(investment.property.id, "p-2");
        assert_eq!(investment.property.title.as_deref(), Some("Mill House"));
        assert_eq!(investment.property.expected_roi, Some(6.0));
        assert_eq!(investment.tokens_purchased, 3.25);
        assert_eq!(investment.status, InvestmentStatus::Pending);
    }

    #[test]
    fn test_user_name_from_parts() {
        let user = user_from_raw(&json!({
            "id": "u-1",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "kycStatus": "approved"
        }));
        assert_eq!(user.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.kyc_status, KycStatus::Verified);
        assert!(user.is_active);
    }

    #[test]
    fn test_transaction_kind_defaults_to_other() {
        let tx = transaction_from_raw(&json!({ "id": "t1", "amount": "20" }));
        assert_eq!(tx.kind, TransactionKind::Other);
        assert_eq!(tx.amount, 20.0);
    }
}
