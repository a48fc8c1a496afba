//! Persistence seam for the workflow.
//!
//! [`WorkflowStore`] is the only way the engine touches durable state.
//! [`PgStore`] backs it with the `bob-db` repositories; [`MemoryStore`]
//! keeps everything in process for tests and local runs.

use async_trait::async_trait;
use bob_core::types::DbId;
use bob_db::models::artifact::{Artifact, NewArtifact};
use bob_db::models::chat_message::{ChatMessage, CreateChatMessage};
use bob_db::models::project::{CreateProject, Project, StageTransition, TransitionOutcome};
use bob_db::models::user::{CreateUser, User};
use bob_db::models::user_credential::UserCredential;

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

/// Failure of a store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// A unique constraint was violated (names the constraint).
    #[error("duplicate value violates unique constraint: {0}")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                return StoreError::Duplicate(db_err.constraint().unwrap_or("unknown").to_string());
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Whether the backing store answers at all.
    async fn ping(&self) -> StoreResult<()>;

    // ---- users ----

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;
    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Replace the stored password hash. `false` when the user does not exist.
    async fn update_password_hash(&self, user_id: DbId, password_hash: &str) -> StoreResult<bool>;

    // ---- credentials ----

    async fn upsert_credential(&self, user_id: DbId, service: &str, ciphertext: &str) -> StoreResult<()>;
    async fn delete_credential(&self, user_id: DbId, service: &str) -> StoreResult<bool>;
    async fn list_credentials(&self, user_id: DbId) -> StoreResult<Vec<UserCredential>>;

    // ---- projects ----

    async fn create_project(&self, owner_id: DbId, input: &CreateProject) -> StoreResult<Project>;
    /// A project visible to `owner_id`. Other owners' projects are `None`.
    async fn find_project(&self, id: DbId, owner_id: DbId) -> StoreResult<Option<Project>>;
    async fn list_projects(&self, owner_id: DbId) -> StoreResult<Vec<Project>>;

    /// Apply a guarded change atomically. See [`StageTransition`].
    async fn commit_transition(
        &self,
        project_id: DbId,
        transition: &StageTransition,
    ) -> StoreResult<TransitionOutcome>;

    // ---- artifacts ----

    /// All artifacts of a project in insertion order.
    async fn project_artifacts(&self, project_id: DbId) -> StoreResult<Vec<Artifact>>;
    async fn create_artifact(&self, project_id: DbId, input: &NewArtifact) -> StoreResult<Artifact>;
    async fn update_artifact_payload(
        &self,
        artifact_id: DbId,
        payload: &serde_json::Value,
    ) -> StoreResult<Option<Artifact>>;

    // ---- offers ----

    /// Replace the remembered batch of `kind` offers for a project.
    async fn replace_offers(&self, project_id: DbId, kind: &str, values: &[String]) -> StoreResult<()>;
    async fn list_offers(&self, project_id: DbId, kind: &str) -> StoreResult<Vec<String>>;

    // ---- coach ----

    async fn append_chat_message(&self, input: &CreateChatMessage) -> StoreResult<ChatMessage>;
    async fn chat_messages(&self, project_id: DbId, user_id: DbId) -> StoreResult<Vec<ChatMessage>>;
    /// The `limit` most recent messages, oldest first.
    async fn recent_chat_messages(
        &self,
        project_id: DbId,
        user_id: DbId,
        limit: usize,
    ) -> StoreResult<Vec<ChatMessage>>;
}
