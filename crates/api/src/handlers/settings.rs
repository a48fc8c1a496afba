//! Handlers for the caller's settings, personal API keys and password.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bob_core::credentials::Service;
use bob_core::error::CoreError;
use serde::{Deserialize, Serialize};

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for the settings endpoints. Never contains a key.
#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub email: String,
    pub name: Option<String>,
    /// Whether a personal key is stored, per user-configurable service.
    pub keys: BTreeMap<&'static str, bool>,
}

/// Request body for `PUT /user/settings/keys`.
///
/// An omitted field leaves the key unchanged; an empty string clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateKeysRequest {
    pub openai: Option<String>,
    pub pexels: Option<String>,
}

/// Request body for `POST /user/settings/password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// GET /api/v1/user/settings
pub async fn get_settings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<SettingsResponse>>> {
    Ok(Json(DataResponse {
        data: load_settings(&state, &auth).await?,
    }))
}

/// PUT /api/v1/user/settings/keys
pub async fn update_keys(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateKeysRequest>,
) -> AppResult<Json<DataResponse<SettingsResponse>>> {
    let updates = [
        (Service::OpenAi, input.openai),
        (Service::Pexels, input.pexels),
    ];
    state
        .workflow
        .credentials()
        .update_keys(auth.user_id, &updates)
        .await?;

    Ok(Json(DataResponse {
        data: load_settings(&state, &auth).await?,
    }))
}

/// POST /api/v1/user/settings/password
///
/// Replace the caller's password after checking the current one. Issued
/// tokens stay valid until they expire.
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = state
        .store
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let old_valid = verify_password(&input.old_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !old_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current password is incorrect".into(),
        )));
    }
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    if !state.store.update_password_hash(user.id, &password_hash).await? {
        return Err(AppError::Core(CoreError::Unauthorized("User no longer exists".into())));
    }

    tracing::info!(user_id = user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

async fn load_settings(state: &AppState, auth: &AuthUser) -> AppResult<SettingsResponse> {
    let user = state
        .store
        .find_user(auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let configured = state
        .workflow
        .credentials()
        .configured_services(auth.user_id)
        .await?;
    let keys = Service::USER_CONFIGURABLE
        .into_iter()
        .map(|service| (service.as_str(), configured.contains(&service)))
        .collect();

    Ok(SettingsResponse {
        email: user.email,
        name: user.name,
        keys,
    })
}
