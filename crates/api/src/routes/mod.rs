pub mod auth;
pub mod chat;
pub mod health;
pub mod projects;
pub mod settings;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
///
/// /projects                                        list, create
/// /projects/{id}                                   full project view
/// /projects/{id}/validate                          validate (POST)
/// /projects/{id}/override-verdict                  override a Bounce verdict (PATCH)
/// /projects/{id}/cross-qa                          record an answer (POST)
/// /projects/{id}/domains                           candidates (GET ?mode=), select (POST)
/// /projects/{id}/logo-options                      logo options (GET)
/// /projects/{id}/brand-kit                         generate brand kit (POST)
/// /projects/{id}/brand-kit/business-card           fill in the business card (POST)
/// /projects/{id}/website                           generate website (POST)
///
/// /chat/{project_id}/history                       coach message log (GET)
/// /chat/{project_id}/message                       ask the coach (POST)
///
/// /user/settings                                   settings (GET)
/// /user/settings/keys                              personal API keys (PUT)
/// /user/settings/password                          change password (POST)
/// ```
///
/// Everything except `/auth/*` requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", projects::router())
        .nest("/chat", chat::router())
        .nest("/user", settings::router())
}
