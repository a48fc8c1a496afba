//! Handlers for the per-project coach conversation.

use axum::extract::{Path, State};
use axum::Json;
use bob_core::types::DbId;
use bob_db::models::chat_message::ChatMessage;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /chat/{project_id}/message`.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

/// GET /api/v1/chat/{project_id}/history
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ChatMessage>>>> {
    let messages = state.workflow.chat_history(auth.user_id, project_id).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/chat/{project_id}/message
///
/// Returns the coach's reply. Both messages are appended to the log.
pub async fn send_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<MessageRequest>,
) -> AppResult<Json<DataResponse<ChatMessage>>> {
    let reply = state
        .workflow
        .send_coach_message(auth.user_id, project_id, &input.message)
        .await?;
    Ok(Json(DataResponse { data: reply }))
}
