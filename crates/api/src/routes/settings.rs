//! Route definitions for the caller's settings, mounted at `/user`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::settings;
use crate::state::AppState;

/// Routes mounted at `/user`.
///
/// ```text
/// GET  /settings          -> get_settings
/// PUT  /settings/keys     -> update_keys
/// POST /settings/password -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", get(settings::get_settings))
        .route("/settings/keys", put(settings::update_keys))
        .route("/settings/password", post(settings::change_password))
}
