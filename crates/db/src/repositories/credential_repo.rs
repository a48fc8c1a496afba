//! Repository for the `user_credentials` table.

use sqlx::PgPool;
use bob_core::types::DbId;

use crate::models::user_credential::UserCredential;

const COLUMNS: &str = "user_id, service, ciphertext, updated_at";

/// Stores encrypted per-user API keys, one row per service.
pub struct CredentialRepo;

impl CredentialRepo {
    /// Insert or replace the key for `(user_id, service)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        service: &str,
        ciphertext: &str,
    ) -> Result<UserCredential, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_credentials (user_id, service, ciphertext)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id, service)
             DO UPDATE SET ciphertext = EXCLUDED.ciphertext, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserCredential>(&query)
            .bind(user_id)
            .bind(service)
            .bind(ciphertext)
            .fetch_one(pool)
            .await
    }

    /// Remove the key for `(user_id, service)`. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, user_id: DbId, service: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_credentials WHERE user_id = $1 AND service = $2")
            .bind(user_id)
            .bind(service)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All stored keys for a user.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<UserCredential>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_credentials WHERE user_id = $1 ORDER BY service"
        );
        sqlx::query_as::<_, UserCredential>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
