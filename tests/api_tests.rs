use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use propvault_server::gateway::GatewayClient;
use propvault_server::models::{KycStatus, User};
use propvault_server::session::{Session, SessionStore};
use propvault_server::state::AppState;

// Nothing listens on the discard port, so every gateway call fails fast.
const UNREACHABLE_GATEWAY: &str = "http://127.0.0.1:9";

fn state() -> AppState {
    let gateway = GatewayClient::new(UNREACHABLE_GATEWAY, Duration::from_secs(2), 0).unwrap();
    let sessions = Arc::new(SessionStore::in_memory(chrono::Duration::hours(1)));
    AppState::new(gateway, sessions)
}

fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        name: Some("Test User".to_string()),
        email: Some("test@example.com".to_string()),
        phone: None,
        kyc_status: KycStatus::Verified,
        is_active: true,
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check_reports_gateway() {
    let (status, body) = send(propvault_server::app(state()), get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_breakdown_endpoint() {
    let (status, body) = send(
        propvault_server::app(state()),
        post_json("/api/calculator/breakdown", json!({ "amount": 5000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["purchase_fee"], 100.0);
    assert_eq!(body["data"]["running_fee"], 50.0);
    assert_eq!(body["data"]["transaction_fee"], 25.0);
    assert_eq!(body["data"]["total_cost"], 5175.0);
}

#[tokio::test]
async fn test_quote_endpoint_defaults_to_five_years() {
    let (status, body) = send(
        propvault_server::app(state()),
        post_json(
            "/api/calculator/quote",
            json!({ "amount": 10000, "price_per_token": 100, "expected_roi": 12 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tokens"], 100.0);
    assert_eq!(body["data"]["projections"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_tokens_endpoint_rejects_zero_price() {
    let (status, body) = send(
        propvault_server::app(state()),
        post_json(
            "/api/calculator/tokens",
            json!({ "amount": 100, "price_per_token": 0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_negative_amount_is_a_validation_error() {
    let (status, body) = send(
        propvault_server::app(state()),
        post_json("/api/calculator/breakdown", json!({ "amount": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"].is_array());
}

#[tokio::test]
async fn test_property_quote_rejects_unbounded_horizon() {
    let (status, body) = send(
        propvault_server::app(state()),
        get(
            "/api/properties/p-1/quote?amount=1&horizon_years=4000000000",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_session_endpoint_is_anonymous_without_token() {
    let (status, body) = send(
        propvault_server::app(state()),
        get("/api/auth/session", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kind"], "anonymous");
}

#[tokio::test]
async fn test_issued_session_resolves_and_logs_out() {
    let state = state();
    let token = state
        .sessions
        .issue(Session::Investor { user: user("u-1") }, None)
        .await
        .unwrap();

    let (_, body) = send(
        propvault_server::app(state.clone()),
        get("/api/auth/session", Some(&token)),
    )
    .await;
    assert_eq!(body["data"]["kind"], "investor");
    assert_eq!(body["data"]["user"]["id"], "u-1");

    let logout = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(propvault_server::app(state.clone()), logout).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(
        propvault_server::app(state),
        get("/api/auth/session", Some(&token)),
    )
    .await;
    assert_eq!(body["data"]["kind"], "anonymous");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let (status, body) = send(propvault_server::app(state()), get("/api/portfolio", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_admin_route_forbidden_for_investor() {
    let state = state();
    let token = state
        .sessions
        .issue(Session::Investor { user: user("u-1") }, None)
        .await
        .unwrap();

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/properties/p-1")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(propvault_server::app(state), request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_unreachable_gateway_is_service_unavailable() {
    let state = state();
    let token = state
        .sessions
        .issue(Session::Investor { user: user("u-1") }, None)
        .await
        .unwrap();

    let (status, body) = send(
        propvault_server::app(state),
        get("/api/portfolio", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_dashboard_sections_fail_independently() {
    let state = state();
    let token = state
        .sessions
        .issue(Session::Investor { user: user("u-1") }, None)
        .await
        .unwrap();

    let (status, body) = send(
        propvault_server::app(state),
        get("/api/dashboard", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    for section in ["profile", "portfolio", "wallet", "recent_transactions"] {
        assert_eq!(body["data"][section]["status"], "failed", "{}", section);
        assert_eq!(
            body["data"][section]["error"]["code"], "SERVICE_UNAVAILABLE",
            "{}",
            section
        );
    }
}
