#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE, USER_AGENT};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use ledger_api::auth::session::{SeededRandom, SessionManager, UuidSessionManager};
use ledger_api::config::{LogFormat, ServerConfig};
use ledger_api::router::build_app_router;
use ledger_api::state::AppState;
use ledger_db::MemoryStore;
use tower::ServiceExt;

/// User agent sent by every helper request.
pub const TEST_USER_AGENT: &str = "ledger-tests/1.0";
/// Client IP sent by every helper request via `X-Forwarded-For`.
pub const TEST_CLIENT_IP: &str = "203.0.113.10";
/// Session window used by [`test_config`].
pub const SESSION_SECS: i64 = 1800;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        database_url: "postgres://unused".into(),
        db_max_connections: 1,
        cors_origins: vec!["http://localhost:3000".parse().unwrap()],
        request_timeout_secs: 30,
        session_duration_secs: SESSION_SECS,
        trust_forwarded_headers: true,
        log_format: LogFormat::Pretty,
    }
}

/// Full application router over an in-memory store and a seeded issuer.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    let sessions = UuidSessionManager::new(store.clone(), Arc::new(SeededRandom::from_seed(7)));
    build_test_app_with_sessions(store, Arc::new(sessions))
}

/// Full application router with a substituted session manager.
pub fn build_test_app_with_sessions(
    store: Arc<MemoryStore>,
    sessions: Arc<dyn SessionManager>,
) -> Router {
    let state = AppState {
        store,
        sessions,
        config: Arc::new(test_config()),
    };
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn request(method: Method, uri: &str, body: Option<serde_json::Value>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_AGENT, TEST_USER_AGENT)
        .header("x-forwarded-for", TEST_CLIENT_IP);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send an arbitrary request through the router.
pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, Some(cookie))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(body), None)).await
}

pub async fn post_json_with_cookie(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: &str,
) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(body), Some(cookie))).await
}

pub async fn post_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, None, Some(cookie))).await
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Collect and parse a JSON response body.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The raw `Set-Cookie` header for the session cookie, if one was set.
pub fn set_cookie_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .map(str::to_string)
}

/// `session=<id>` as a request `Cookie` header value.
pub fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    set_cookie_header(response).and_then(|v| v.split(';').next().map(str::to_string))
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn register_body(name: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "username": name,
        "password": "secret1",
        "email": email,
        "age": 30,
        "balance": 0,
    })
}

/// Register a user through the API. Returns the user id and the
/// `session=<id>` cookie pair.
pub async fn register(app: Router, name: &str, email: &str) -> (i64, String) {
    let response = post_json(app, "/users", register_body(name, email)).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let cookie = session_cookie_pair(&response).expect("register sets a session cookie");
    let json = body_json(response).await;
    (json["id"].as_i64().unwrap(), cookie)
}
