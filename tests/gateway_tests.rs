use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, Request, StatusCode, Uri},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use propvault_server::gateway::GatewayClient;
use propvault_server::models::{KycStatus, User};
use propvault_server::session::{Session, SessionStore};
use propvault_server::state::AppState;

const READ_RETRIES: u32 = 2;

/// In-process gateway that records every request it receives
#[derive(Clone, Default)]
struct StubGateway {
    hits: Arc<Mutex<Vec<String>>>,
}

impl StubGateway {
    fn hits(&self, method: &str, path: &str) -> usize {
        let key = format!("{} {}", method, path);
        self.hits.lock().unwrap().iter().filter(|hit| **hit == key).count()
    }
}

fn property(id: &str, available_tokens: f64) -> Value {
    json!({
        "id": id,
        "title": "Harbour Lofts",
        "status": "active",
        "totalTokens": 1000,
        "availableTokens": available_tokens,
        "pricePerToken": 100,
    })
}

async fn respond(
    State(stub): State<StubGateway>,
    method: Method,
    uri: Uri,
) -> (StatusCode, Json<Value>) {
    stub.hits
        .lock()
        .unwrap()
        .push(format!("{} {}", method, uri.path()));

    match (method.as_str(), uri.path()) {
        ("GET", "/properties/p-1") => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": { "property": property("p-1", 1000.0) } })),
        ),
        ("GET", "/properties/p-sold") => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": property("p-sold", 999.6) })),
        ),
        ("GET", "/properties/p-flaky") | ("POST", "/wallets/u-1/deposit") => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "warming up" })),
        ),
        ("GET", "/organizations") => (
            StatusCode::OK,
            Json(json!({ "data": { "organizations": [
                { "id": "org-1", "name": "Acme Estates" },
                { "id": "org-2", "name": "Bare Holdings" },
            ] } })),
        ),
        ("GET", "/properties") => {
            let mut owned = property("p-1", 1000.0);
            owned["organizationId"] = json!("org-1");
            (StatusCode::OK, Json(json!({ "success": true, "data": [owned] })))
        }
        ("POST", "/properties") => (
            StatusCode::OK,
            Json(json!({
                "success": false,
                "errors": [{ "field": "title", "message": "is required" }],
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Cannot find route" })),
        ),
    }
}

async fn spawn_gateway() -> (String, StubGateway) {
    let stub = StubGateway::default();
    let router = Router::new().fallback(respond).with_state(stub.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), stub)
}

async fn state() -> (AppState, StubGateway) {
    let (url, stub) = spawn_gateway().await;
    let gateway = GatewayClient::new(&url, Duration::from_secs(5), READ_RETRIES).unwrap();
    let sessions = Arc::new(SessionStore::in_memory(chrono::Duration::hours(1)));
    (AppState::new(gateway, sessions), stub)
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

async fn admin_token(state: &AppState) -> String {
    state
        .sessions
        .issue(Session::Admin { user: user("admin-1") }, Some("gw-admin".to_string()))
        .await
        .unwrap()
}

async fn investor_token(state: &AppState) -> String {
    state
        .sessions
        .issue(Session::Investor { user: user("u-1") }, Some("gw-investor".to_string()))
        .await
        .unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = propvault_server::app(state).oneshot(request).await.unwrap();
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

#[tokio::test]
async fn test_property_is_unwrapped_from_envelope() {
    let (state, stub) = state().await;
    let (status, body) = send(
        state,
        request(Method::GET, "/api/properties/p-1", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "p-1");
    assert_eq!(body["data"]["funding_percentage"], 0.0);
    assert_eq!(body["data"]["can_delete"], true);
    assert_eq!(stub.hits("GET", "/properties/p-1"), 1);
}

#[tokio::test]
async fn test_failing_read_is_retried() {
    let (state, stub) = state().await;
    let (status, body) = send(
        state,
        request(Method::GET, "/api/properties/p-flaky", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "EXTERNAL_SERVICE_ERROR");
    assert_eq!(
        stub.hits("GET", "/properties/p-flaky"),
        1 + READ_RETRIES as usize
    );
}

#[tokio::test]
async fn test_failing_mutation_is_sent_once() {
    let (state, stub) = state().await;
    let token = investor_token(&state).await;
    let (status, _) = send(
        state,
        request(
            Method::POST,
            "/api/wallet/deposit",
            Some(&token),
            Some(json!({ "amount": 100 })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(stub.hits("POST", "/wallets/u-1/deposit"), 1);
}

#[tokio::test]
async fn test_missing_read_is_not_found() {
    let (state, stub) = state().await;
    let (status, body) = send(
        state,
        request(Method::GET, "/api/properties/p-gone", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(stub.hits("GET", "/properties/p-gone"), 1);
}

#[tokio::test]
async fn test_missing_mutation_is_feature_unavailable() {
    let (state, stub) = state().await;
    let token = admin_token(&state).await;
    let (status, body) = send(
        state,
        request(
            Method::PATCH,
            "/api/properties/p-1/status",
            Some(&token),
            Some(json!({ "status": "sold-out" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["error"]["code"], "FEATURE_UNAVAILABLE");
    assert_eq!(stub.hits("PATCH", "/properties/p-1/status"), 1);
}

#[tokio::test]
async fn test_unsuccessful_envelope_is_validation_error() {
    let (state, stub) = state().await;
    let token = admin_token(&state).await;
    let (status, body) = send(
        state,
        request(
            Method::POST,
            "/api/properties",
            Some(&token),
            Some(json!({ "description": "no title" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"][0], "title: is required");
    assert_eq!(stub.hits("POST", "/properties"), 1);
}

#[tokio::test]
async fn test_fractionally_sold_property_cannot_be_deleted() {
    let (state, stub) = state().await;
    let token = admin_token(&state).await;
    let (status, body) = send(
        state,
        request(Method::DELETE, "/api/properties/p-sold", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(stub.hits("DELETE", "/properties/p-sold"), 0);
}

#[tokio::test]
async fn test_organization_directory_counts_properties() {
    let (state, stub) = state().await;
    let (status, body) = send(
        state,
        request(Method::GET, "/api/organizations", None, None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], "org-1");
    assert_eq!(body["data"][0]["property_count"], 1);
    assert_eq!(body["data"][1]["property_count"], 0);
    assert_eq!(stub.hits("GET", "/organizations"), 1);
    assert_eq!(stub.hits("GET", "/properties"), 1);
}
