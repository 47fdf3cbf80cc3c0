use super::*;
use axum::Json;
use axum::Router;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};

// =============================================================================
// Fake backend
// =============================================================================

async fn fake_login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["username"] == "admin" && body["password"] == "admin123" {
        (StatusCode::OK, Json(json!({ "token": "abc", "user": { "username": "admin", "role": "admin" } })))
    } else if body["username"] == "admin" {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid credentials" })))
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "Failed to generate token" })))
    }
}

async fn fake_stats(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some("Bearer abc") => (StatusCode::OK, Json(json!({ "total_users": 120 }))),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))),
    }
}

async fn spawn_backend() -> HttpAdminApi {
    let app = Router::new()
        .route(LOGIN_PATH, post(fake_login))
        .route(STATS_PATH, get(fake_stats));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    HttpAdminApi::new(&format!("http://{addr}/"), HttpTimeouts { request_secs: 5, connect_secs: 2 }).unwrap()
}

// =============================================================================
// parse_response
// =============================================================================

#[test]
fn parse_success_body() {
    let resp: LoginResponse = parse_response(200, r#"{"token":"abc"}"#).unwrap();
    assert_eq!(resp.token.as_deref(), Some("abc"));
    assert!(resp.user.is_none());
}

#[test]
fn parse_error_status_keeps_server_message() {
    let err = parse_response::<LoginResponse>(401, r#"{"error":"Invalid credentials"}"#).unwrap_err();
    assert_eq!(err, ApiError::Status { status: 401, message: Some("Invalid credentials".into()) });
    assert!(err.is_auth_rejected());
}

#[test]
fn parse_error_status_without_json_body() {
    let err = parse_response::<LoginResponse>(502, "<html>bad gateway</html>").unwrap_err();
    assert_eq!(err, ApiError::Status { status: 502, message: None });
    assert!(!err.is_auth_rejected());
    assert!(err.to_string().contains("502"));
}

#[test]
fn parse_malformed_success_body() {
    let err = parse_response::<StatsSnapshot>(200, "not json").unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

// =============================================================================
// HttpAdminApi against a fake backend
// =============================================================================

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let api = HttpAdminApi::new("http://localhost:8080/", HttpTimeouts { request_secs: 1, connect_secs: 1 }).unwrap();
    assert_eq!(api.base_url(), "http://localhost:8080");
    assert_eq!(api.url(LOGIN_PATH), "http://localhost:8080/api/admin/login");
}

#[tokio::test]
async fn http_login_success() {
    let api = spawn_backend().await;
    let resp = api.login(&Credentials::new("admin", "admin123")).await.unwrap();
    assert_eq!(resp.token.as_deref(), Some("abc"));
    assert_eq!(resp.user.unwrap().role, "admin");
}

#[tokio::test]
async fn http_login_rejected() {
    let api = spawn_backend().await;
    let err = api.login(&Credentials::new("admin", "wrong")).await.unwrap_err();
    assert_eq!(err, ApiError::Status { status: 401, message: Some("Invalid credentials".into()) });
}

#[tokio::test]
async fn http_login_server_error() {
    let api = spawn_backend().await;
    let err = api.login(&Credentials::new("someone", "x")).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn http_stats_sends_bearer_token() {
    let api = spawn_backend().await;
    let snapshot = api.stats("abc").await.unwrap();
    assert_eq!(snapshot.total_users, Some(120));
    assert_eq!(snapshot.active_users_7d, None);
}

#[tokio::test]
async fn http_stats_rejects_unknown_token() {
    let api = spawn_backend().await;
    let err = api.stats("stale").await.unwrap_err();
    assert!(err.is_auth_rejected());
}

#[tokio::test]
async fn http_unreachable_backend_is_request_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpAdminApi::new(&format!("http://{addr}"), HttpTimeouts { request_secs: 2, connect_secs: 1 }).unwrap();
    let err = api.stats("abc").await.unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
}
