//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts

pub mod artifact;
pub mod chat_message;
pub mod offer;
pub mod project;
pub mod user;
pub mod user_credential;
