//! HTTP-level tests for registration, login, and Bearer enforcement.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get, get_auth, post_json, post_json_auth, register_user};
use serde_json::json;

#[tokio::test]
async fn register_returns_token_and_user() {
    let app = build_test_app();

    let body = json!({
        "email": "  Founder@Example.com ",
        "name": "Ada",
        "password": "correct-horse-battery",
    });
    let response = post_json(&app.router, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["email"], "founder@example.com");
    assert_eq!(json["user"]["name"], "Ada");
    assert!(json["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = build_test_app();
    register_user(&app.router, "dup@example.com").await;

    let body = json!({ "email": "DUP@example.com", "password": "another-password" });
    let response = post_json(&app.router, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "An account with this email already exists");
}

#[tokio::test]
async fn weak_password_is_rejected() {
    let app = build_test_app();

    let body = json!({ "email": "weak@example.com", "password": "short" });
    let response = post_json(&app.router, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let app = build_test_app();

    let body = json!({ "email": "not-an-email", "password": "correct-horse-battery" });
    let response = post_json(&app.router, "/api/v1/auth/register", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn login_with_registered_credentials() {
    let app = build_test_app();
    register_user(&app.router, "login@example.com").await;

    let body = json!({ "email": "login@example.com", "password": "correct-horse-battery" });
    let response = post_json(&app.router, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap();

    let response = get_auth(&app.router, "/api/v1/projects", token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = build_test_app();
    register_user(&app.router, "known@example.com").await;

    let wrong = post_json(
        &app.router,
        "/api/v1/auth/login",
        json!({ "email": "known@example.com", "password": "wrong-password" }),
    )
    .await;
    let unknown = post_json(
        &app.router,
        "/api/v1/auth/login",
        json!({ "email": "nobody@example.com", "password": "wrong-password" }),
    )
    .await;

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(wrong).await["error"], body_json(unknown).await["error"]);
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

async fn login_status(app: &axum::Router, email: &str, password: &str) -> StatusCode {
    post_json(app, "/api/v1/auth/login", json!({ "email": email, "password": password }))
        .await
        .status()
}

#[tokio::test]
async fn change_password_replaces_the_login_secret() {
    let app = build_test_app();
    let token = register_user(&app.router, "rotate@example.com").await;

    let response = post_json_auth(
        &app.router,
        "/api/v1/user/settings/password",
        &token,
        json!({ "old_password": "correct-horse-battery", "new_password": "staple-battery-horse" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        login_status(&app.router, "rotate@example.com", "correct-horse-battery").await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        login_status(&app.router, "rotate@example.com", "staple-battery-horse").await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn change_password_with_wrong_old_password_is_unauthorized() {
    let app = build_test_app();
    let token = register_user(&app.router, "guess@example.com").await;

    let response = post_json_auth(
        &app.router,
        "/api/v1/user/settings/password",
        &token,
        json!({ "old_password": "not-my-password", "new_password": "staple-battery-horse" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Current password is incorrect");

    assert_eq!(
        login_status(&app.router, "guess@example.com", "correct-horse-battery").await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn change_password_enforces_strength_and_auth() {
    let app = build_test_app();
    let token = register_user(&app.router, "short@example.com").await;
    let body = json!({ "old_password": "correct-horse-battery", "new_password": "short" });

    let response =
        post_json_auth(&app.router, "/api/v1/user/settings/password", &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(&app.router, "/api/v1/user/settings/password", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn project_routes_require_a_token() {
    let app = build_test_app();

    let response = get(&app.router, "/api/v1/projects").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = get_auth(&app.router, "/api/v1/projects", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = build_test_app();

    let response = get(&app.router, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
