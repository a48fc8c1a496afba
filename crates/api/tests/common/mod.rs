#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use bob_api::auth::jwt::JwtConfig;
use bob_api::config::ServerConfig;
use bob_api::router::build_app_router;
use bob_api::state::AppState;
use bob_pipeline::testing::{Harness, TEST_ENCRYPTION_SECRET};
use bob_pipeline::{WorkflowConfig, WorkflowStore};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-jwt-secret".to_string(),
            access_token_expiry_mins: 15,
        },
        encryption_secret: TEST_ENCRYPTION_SECRET.to_string(),
        uploads_dir: PathBuf::from("./target/test-uploads"),
        public_base_path: "/uploads".to_string(),
        generator_timeout_secs: 5,
        require_offered_domain: false,
    }
}

/// The router plus the in-memory harness behind it, so tests can flip
/// generator knobs and inspect stored artifacts.
pub struct TestApp {
    pub router: Router,
    pub harness: Harness,
}

/// Build the full application router over an in-memory store and fake
/// generators, with the same middleware stack production uses.
pub fn build_test_app() -> TestApp {
    build_test_app_with(WorkflowConfig::default())
}

pub fn build_test_app_with(workflow_config: WorkflowConfig) -> TestApp {
    let config = test_config();
    let harness = Harness::with_config(workflow_config);
    let store: Arc<dyn WorkflowStore> = harness.store.clone();

    let state = AppState {
        store,
        workflow: harness.workflow.clone(),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        harness,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register an account through the API and return its access token.
pub async fn register_user(app: &Router, email: &str) -> String {
    let body = serde_json::json!({
        "email": email,
        "name": "Test Founder",
        "password": "correct-horse-battery",
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Create a project through the API and return its id.
pub async fn create_project(app: &Router, token: &str) -> i64 {
    let body = serde_json::json!({
        "title": "Acme",
        "pitch": "Eco-friendly pet toys",
        "target_user": "Dog owners",
    });
    let response = post_json_auth(app, "/api/v1/projects", token, body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
