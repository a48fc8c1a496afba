//! Encrypted per-user API keys.

use sqlx::FromRow;
use bob_core::types::{DbId, Timestamp};

/// A row from `user_credentials`. `ciphertext` is produced by
/// `bob_core::crypto::SecretCipher`.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredential {
    pub user_id: DbId,
    pub service: String,
    pub ciphertext: String,
    pub updated_at: Timestamp,
}
