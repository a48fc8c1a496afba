//! Generic artifact rows.

use serde::Serialize;
use sqlx::FromRow;
use bob_core::types::{DbId, Timestamp};

/// A row from the `artifacts` table. `payload` is opaque to the store.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Artifact {
    pub id: DbId,
    pub project_id: DbId,
    pub kind: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an artifact.
#[derive(Debug, Clone)]
pub struct NewArtifact {
    pub kind: String,
    pub payload: serde_json::Value,
}
