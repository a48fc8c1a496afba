//! Coach chat messages.

use serde::Serialize;
use sqlx::FromRow;
use bob_core::types::{DbId, Timestamp};

/// A row from the `chat_messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub content: String,
    pub created_at: Timestamp,
}

/// DTO for appending a message.
#[derive(Debug, Clone)]
pub struct CreateChatMessage {
    pub project_id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub content: String,
}
