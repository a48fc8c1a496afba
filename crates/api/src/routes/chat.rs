//! Route definitions for the `/chat` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chat;
use crate::state::AppState;

/// Routes mounted at `/chat`.
///
/// ```text
/// GET  /{project_id}/history -> history
/// POST /{project_id}/message -> send_message
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{project_id}/history", get(chat::history))
        .route("/{project_id}/message", post(chat::send_message))
}
