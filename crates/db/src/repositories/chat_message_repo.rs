//! Repository for the `chat_messages` table.

use sqlx::PgPool;
use bob_core::types::DbId;

use crate::models::chat_message::{ChatMessage, CreateChatMessage};

const COLUMNS: &str = "id, project_id, user_id, role, content, created_at";

/// Append-only log of coach conversations, scoped by project and user.
pub struct ChatMessageRepo;

impl ChatMessageRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateChatMessage,
    ) -> Result<ChatMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_messages (project_id, user_id, role, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(input.project_id)
            .bind(input.user_id)
            .bind(&input.role)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Full history for one user on one project, oldest first.
    pub async fn list(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM chat_messages
             WHERE project_id = $1 AND user_id = $2
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// The `limit` most recent messages, returned oldest first.
    pub async fn list_recent(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM (
                SELECT {COLUMNS} FROM chat_messages
                WHERE project_id = $1 AND user_id = $2
                ORDER BY id DESC
                LIMIT $3
             ) recent
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
