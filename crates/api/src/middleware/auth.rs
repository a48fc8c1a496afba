//! Bearer-token identity for handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use bob_core::error::CoreError;
use bob_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The caller, resolved from `Authorization: Bearer <token>`.
///
/// Every project read and write is scoped to `user_id`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: DbId,
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.to_string()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| unauthorized("Missing Authorization header"))?
            .to_str()
            .map_err(|_| unauthorized("Malformed Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized("Expected 'Authorization: Bearer <token>'"))?;

        let claims = state.config.jwt.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
