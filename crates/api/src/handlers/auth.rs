//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bob_core::error::CoreError;
use bob_db::models::user::{CreateUser, User, UserResponse};
use bob_pipeline::StoreError;
use serde::{Deserialize, Serialize};

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account and return an access token for it.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let email = normalize_email(&input.email)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH).map_err(AppError::BadRequest)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        email,
        name: input
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        password_hash,
    };
    let user = state.store.create_user(&create).await.map_err(|e| match e {
        StoreError::Duplicate(_) => AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )),
        other => AppError::Store(other),
    })?;

    tracing::info!(user_id = user.id, "User registered");
    Ok((StatusCode::CREATED, Json(auth_response(&state, &user)?)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let email = input.email.trim().to_ascii_lowercase();
    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(auth_response(&state, &user)?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let issued = state
        .config
        .jwt
        .issue(user.id)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token: issued.token,
        expires_in: issued.expires_in,
        user: UserResponse::from(user),
    })
}

fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_ascii_lowercase();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed {
        return Err(AppError::Core(CoreError::Validation(format!(
            "'{email}' is not a valid email address"
        ))));
    }
    Ok(email)
}
