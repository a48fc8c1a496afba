//! User entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bob_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Name shown on generated material: the user's name, or the local part
    /// of their e-mail address.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>) -> User {
        User {
            id: 1,
            email: "ada@example.com".into(),
            name: name.map(String::from),
            password_hash: String::new(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn display_name_prefers_name() {
        assert_eq!(user(Some("Ada Lovelace")).display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        assert_eq!(user(None).display_name(), "ada");
        assert_eq!(user(Some("  ")).display_name(), "ada");
    }
}
