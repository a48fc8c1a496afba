//! Conversational coach message types.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of recent messages sent to the coach as history.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Longest user message accepted, in characters.
pub const MAX_MESSAGE_CHARS: usize = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(CoreError::Validation(format!(
                "Invalid chat role '{s}'. Must be one of: user, assistant"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One prior message handed to the coach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Trim and bound a user message.
pub fn validate_message(raw: &str) -> Result<String, CoreError> {
    let message = raw.trim();
    if message.is_empty() {
        return Err(CoreError::Validation("Message must not be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(CoreError::Validation(format!(
            "Message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        for role in [ChatRole::User, ChatRole::Assistant] {
            assert_eq!(ChatRole::from_str_db(role.as_str()).unwrap(), role);
        }
        assert!(ChatRole::from_str_db("system").is_err());
    }

    #[test]
    fn message_bounds() {
        assert_eq!(validate_message("  hi  ").unwrap(), "hi");
        assert!(validate_message("   ").is_err());
        assert!(validate_message(&"x".repeat(MAX_MESSAGE_CHARS + 1)).is_err());
    }
}
