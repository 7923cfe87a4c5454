//! HTTP client for the backend gateway
//!
//! Reads are retried `read_retries` times on transport failures and 5xx
//! answers; mutations are sent exactly once.

use std::time::Duration;

use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::envelope::{classify, extract_list, extract_record};
use super::GatewayError;
use crate::config::Config;
use crate::models::{
    Investment, LoginRequest, NewInvestment, Organization, Portal, Property, PropertyFilter,
    PropertyStatus, ServerQuote, Transaction, User, Wallet, WalletMovementRequest,
};
use crate::normalize::{self, first_string};

/// What the gateway returns for a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: Option<String>,
    pub user: User,
    pub role: Option<String>,
    pub organization_id: Option<String>,
}

/// Backend gateway client
#[derive(Clone)]
pub struct GatewayClient {
    base_url: Url,
    client: reqwest::Client,
    read_retries: u32,
    bearer: Option<String>,
}

impl GatewayClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        read_retries: u32,
    ) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| GatewayError::Decode(format!("invalid gateway URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::Decode(format!(
                "gateway URL cannot be a base: {}",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            read_retries,
            bearer: None,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        Self::new(
            &config.gateway_url,
            config.gateway_timeout,
            config.gateway_read_retries,
        )
    }

    /// A copy of this client that sends `token` as a bearer credential.
    pub fn authorized(&self, token: Option<&str>) -> Self {
        Self {
            bearer: token.map(str::to_string),
            ..self.clone()
        }
    }

    /// Base URL with `segments` appended, each percent-encoded.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ========================================================================
    // Transport
    // ========================================================================

    async fn send_once(
        &self,
        method: &Method,
        url: &Url,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, GatewayError> {
        let mut request = self.client.request(method.clone(), url.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let payload = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        classify(status, *method == Method::GET, url.path(), payload)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value, GatewayError> {
        let url = self.url(segments);
        let attempts = if method == Method::GET {
            1 + self.read_retries
        } else {
            1
        };

        let mut attempt = 1;
        loop {
            debug!(method = %method, path = %url.path(), attempt, "Gateway request");
            match self.send_once(&method, &url, query, body).await {
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(
                        method = %method,
                        path = %url.path(),
                        attempt,
                        error = %e,
                        "Gateway read failed, retrying"
                    );
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn get(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value, GatewayError> {
        self.send(Method::GET, segments, query, None).await
    }

    async fn write<B: Serialize>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Value, GatewayError> {
        let body = serde_json::to_value(body).map_err(|e| GatewayError::Decode(e.to_string()))?;
        self.send(method, segments, &[], Some(&body)).await
    }

    /// Any answer from the gateway's health endpoint counts as reachable,
    /// including a 404 from gateways that do not expose one.
    pub async fn ping(&self) -> Result<(), GatewayError> {
        match self.get(&["health"], &[]).await {
            Ok(_) | Err(GatewayError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Properties
    // ========================================================================

    pub async fn list_properties(
        &self,
        filter: &PropertyFilter,
    ) -> Result<Vec<Property>, GatewayError> {
        let payload = self.get(&["properties"], &filter.to_query()).await?;
        Ok(extract_list(payload, "properties")
            .iter()
            .map(normalize::property_from_raw)
            .collect())
    }

    pub async fn featured_properties(&self) -> Result<Vec<Property>, GatewayError> {
        let payload = self.get(&["properties", "featured"], &[]).await?;
        Ok(extract_list(payload, "properties")
            .iter()
            .map(normalize::property_from_raw)
            .collect())
    }

    /// Filter choices (cities, types, price bounds) exactly as the gateway
    /// lists them
    pub async fn property_filter_options(&self) -> Result<Value, GatewayError> {
        self.get(&["properties", "filter-options"], &[]).await
    }

    pub async fn get_property(&self, id: &str) -> Result<Property, GatewayError> {
        let payload = self.get(&["properties", id], &[]).await?;
        Ok(normalize::property_from_raw(&extract_record(
            payload, "property",
        )))
    }

    pub async fn create_property(&self, body: &Value) -> Result<Property, GatewayError> {
        let payload = self.write(Method::POST, &["properties"], body).await?;
        Ok(normalize::property_from_raw(&extract_record(
            payload, "property",
        )))
    }

    pub async fn update_property(&self, id: &str, body: &Value) -> Result<Property, GatewayError> {
        let payload = self.write(Method::PUT, &["properties", id], body).await?;
        Ok(normalize::property_from_raw(&extract_record(
            payload, "property",
        )))
    }

    pub async fn update_property_status(
        &self,
        id: &str,
        status: PropertyStatus,
    ) -> Result<Property, GatewayError> {
        let body = json!({ "status": status.as_str() });
        let payload = self
            .write(Method::PATCH, &["properties", id, "status"], &body)
            .await?;
        Ok(normalize::property_from_raw(&extract_record(
            payload, "property",
        )))
    }

    pub async fn delete_property(&self, id: &str) -> Result<(), GatewayError> {
        self.send(Method::DELETE, &["properties", id], &[], None)
            .await
            .map(|_| ())
    }

    // ========================================================================
    // Investments
    // ========================================================================

    pub async fn create_investment(
        &self,
        investment: &NewInvestment,
    ) -> Result<Investment, GatewayError> {
        let payload = self
            .write(Method::POST, &["investments"], investment)
            .await?;
        Ok(normalize::investment_from_raw(&extract_record(
            payload,
            "investment",
        )))
    }

    pub async fn investments_for_user(&self, user_id: &str) -> Result<Vec<Investment>, GatewayError> {
        let payload = self.get(&["investments", "user", user_id], &[]).await?;
        Ok(extract_list(payload, "investments")
            .iter()
            .map(normalize::investment_from_raw)
            .collect())
    }

    pub async fn investments_for_organization(
        &self,
        organization_ref: &str,
    ) -> Result<Vec<Investment>, GatewayError> {
        let payload = self
            .get(&["investments", "organization", organization_ref], &[])
            .await?;
        Ok(extract_list(payload, "investments")
            .iter()
            .map(normalize::investment_from_raw)
            .collect())
    }

    /// Gateway-side mirror of the local quote
    pub async fn calculate_roi(
        &self,
        property_id: &str,
        amount: f64,
        horizon_years: u32,
    ) -> Result<ServerQuote, GatewayError> {
        let body = json!({
            "propertyId": property_id,
            "amount": amount,
            "years": horizon_years,
        });
        let payload = self
            .write(Method::POST, &["calculator", "roi"], &body)
            .await?;
        Ok(normalize::server_quote_from_raw(&payload))
    }

    // ========================================================================
    // Wallet
    // ========================================================================

    pub async fn wallet(&self, user_id: &str) -> Result<Wallet, GatewayError> {
        let payload = self.get(&["wallets", user_id], &[]).await?;
        Ok(normalize::wallet_from_raw(&extract_record(payload, "wallet")))
    }

    pub async fn transactions(&self, user_id: &str) -> Result<Vec<Transaction>, GatewayError> {
        let payload = self
            .get(&["wallets", user_id, "transactions"], &[])
            .await?;
        Ok(extract_list(payload, "transactions")
            .iter()
            .map(normalize::transaction_from_raw)
            .collect())
    }

    pub async fn deposit(
        &self,
        user_id: &str,
        request: &WalletMovementRequest,
    ) -> Result<Wallet, GatewayError> {
        let payload = self
            .write(Method::POST, &["wallets", user_id, "deposit"], request)
            .await?;
        Ok(normalize::wallet_from_raw(&extract_record(payload, "wallet")))
    }

    pub async fn withdraw(
        &self,
        user_id: &str,
        request: &WalletMovementRequest,
    ) -> Result<Wallet, GatewayError> {
        let payload = self
            .write(Method::POST, &["wallets", user_id, "withdraw"], request)
            .await?;
        Ok(normalize::wallet_from_raw(&extract_record(payload, "wallet")))
    }

    // ========================================================================
    // Users and organizations
    // ========================================================================

    pub async fn list_users(&self) -> Result<Vec<User>, GatewayError> {
        let payload = self.get(&["users"], &[]).await?;
        Ok(extract_list(payload, "users")
            .iter()
            .map(normalize::user_from_raw)
            .collect())
    }

    pub async fn get_user(&self, id: &str) -> Result<User, GatewayError> {
        let payload = self.get(&["users", id], &[]).await?;
        Ok(normalize::user_from_raw(&extract_record(payload, "user")))
    }

    pub async fn update_user(&self, id: &str, body: &Value) -> Result<User, GatewayError> {
        let payload = self.write(Method::PUT, &["users", id], body).await?;
        Ok(normalize::user_from_raw(&extract_record(payload, "user")))
    }

    pub async fn list_organizations(&self) -> Result<Vec<Organization>, GatewayError> {
        let payload = self.get(&["organizations"], &[]).await?;
        Ok(extract_list(payload, "organizations")
            .iter()
            .map(normalize::organization_from_raw)
            .collect())
    }

    pub async fn get_organization(&self, reference: &str) -> Result<Organization, GatewayError> {
        let payload = self.get(&["organizations", reference], &[]).await?;
        Ok(normalize::organization_from_raw(&extract_record(
            payload,
            "organization",
        )))
    }

    pub async fn create_organization(&self, body: &Value) -> Result<Organization, GatewayError> {
        let payload = self.write(Method::POST, &["organizations"], body).await?;
        Ok(normalize::organization_from_raw(&extract_record(
            payload,
            "organization",
        )))
    }

    pub async fn update_organization(
        &self,
        id: &str,
        body: &Value,
    ) -> Result<Organization, GatewayError> {
        let payload = self
            .write(Method::PUT, &["organizations", id], body)
            .await?;
        Ok(normalize::organization_from_raw(&extract_record(
            payload,
            "organization",
        )))
    }

    pub async fn delete_organization(&self, id: &str) -> Result<(), GatewayError> {
        self.send(Method::DELETE, &["organizations", id], &[], None)
            .await
            .map(|_| ())
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// Verify credentials with the gateway. No credentials are checked or
    /// stored locally.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginOutcome, GatewayError> {
        let path = match request.portal {
            Portal::Admin => &["auth", "admin", "login"][..],
            Portal::Organization => &["auth", "organization", "login"][..],
            Portal::Investor => &["auth", "login"][..],
        };
        let payload = self.write(Method::POST, path, request).await?;
        Ok(login_outcome_from_raw(&payload))
    }
}

/// Normalize a login response: `{ token, user: {...}, organization: {...} }`
/// or a flat user object carrying the token.
pub fn login_outcome_from_raw(raw: &Value) -> LoginOutcome {
    let user_raw = raw.get("user").filter(|u| u.is_object()).unwrap_or(raw);
    LoginOutcome {
        token: first_string(raw, &["token", "accessToken", "access_token", "jwt"]),
        user: normalize::user_from_raw(user_raw),
        role: first_string(raw, &["role", "user.role", "userType", "user.userType"]),
        organization_id: first_string(
            raw,
            &[
                "organizationId",
                "organization_id",
                "organization.id",
                "organization._id",
                "user.organizationId",
                "user.organization_id",
            ],
        ),
    }
}
