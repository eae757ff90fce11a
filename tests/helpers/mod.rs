#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pagesmith::config::Config;
use pagesmith::state::AppState;

pub const SECRET: &str = "integration-secret";
pub const ACCOUNT: &str = "octo";

/// Config pointing both external APIs at the given mock servers.
///
/// Retries are kept short so failing-callback tests finish quickly.
pub fn test_config(gemini: &MockServer, github: &MockServer) -> Config {
    Config {
        listen: "127.0.0.1:0".into(),
        shared_secret: Some(SECRET.into()),
        gemini_api_key: "test-key".into(),
        gemini_api_url: gemini.uri(),
        gemini_model: "gemini-test".into(),
        github_token: "test-token".into(),
        github_username: ACCOUNT.into(),
        github_api_url: github.uri(),
        github_timeout: Duration::from_secs(5),
        pages_branch: "main".into(),
        recreate_delay: Duration::ZERO,
        notify_max_attempts: 5,
        notify_initial_backoff: Duration::from_millis(1),
        notify_timeout: Duration::from_secs(5),
        max_body_bytes: 1024 * 1024,
    }
}

pub fn test_state(config: Config) -> AppState {
    AppState::from_config(config).expect("state wiring failed")
}

/// Build the full API router with the given state.
pub fn test_router(state: AppState) -> Router {
    pagesmith::api::router().with_state(state)
}

pub fn build_body(evaluation_url: &str, round: u8) -> Value {
    serde_json::json!({
        "secret": SECRET,
        "email": "student@example.com",
        "task": "Sales Summary",
        "round": round,
        "nonce": "nonce-42",
        "brief": "Show the total of the sales column in #total",
        "checks": ["#total shows the sum"],
        "evaluation_url": evaluation_url,
        "attachments": [{"name": "data.csv", "url": "data:text/csv;base64,YSxi"}],
    })
}

// ---------------------------------------------------------------------------
// External API stubs
// ---------------------------------------------------------------------------

pub fn gemini_reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    }))
}

pub const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

/// Answer page prompts with `page` and README prompts with `readme`.
pub async fn mount_gemini(server: &MockServer, page: &str, readme: &str) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("Project Name"))
        .respond_with(gemini_reply(readme))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("single-page HTML application"))
        .respond_with(gemini_reply(page))
        .mount(server)
        .await;
}

pub fn put_reply(commit: &str) -> ResponseTemplate {
    ResponseTemplate::new(201).set_body_json(serde_json::json!({
        "content": {},
        "commit": { "sha": commit }
    }))
}

pub async fn mount_pages(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/repos/octo/sales-summary/pages"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
