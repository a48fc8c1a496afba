//! [`WorkflowStore`] over PostgreSQL.

use async_trait::async_trait;
use bob_core::types::DbId;
use bob_db::models::artifact::{Artifact, NewArtifact};
use bob_db::models::chat_message::{ChatMessage, CreateChatMessage};
use bob_db::models::project::{CreateProject, Project, StageTransition, TransitionOutcome};
use bob_db::models::user::{CreateUser, User};
use bob_db::models::user_credential::UserCredential;
use bob_db::repositories::{
    ArtifactRepo, ChatMessageRepo, CredentialRepo, OfferRepo, ProjectRepo, UserRepo,
};
use bob_db::DbPool;

use super::{StoreResult, WorkflowStore};

/// Delegates every operation to the `bob-db` repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl WorkflowStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(bob_db::health_check(&self.pool).await?)
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn update_password_hash(&self, user_id: DbId, password_hash: &str) -> StoreResult<bool> {
        Ok(UserRepo::update_password(&self.pool, user_id, password_hash).await?)
    }

    async fn upsert_credential(&self, user_id: DbId, service: &str, ciphertext: &str) -> StoreResult<()> {
        CredentialRepo::upsert(&self.pool, user_id, service, ciphertext).await?;
        Ok(())
    }

    async fn delete_credential(&self, user_id: DbId, service: &str) -> StoreResult<bool> {
        Ok(CredentialRepo::delete(&self.pool, user_id, service).await?)
    }

    async fn list_credentials(&self, user_id: DbId) -> StoreResult<Vec<UserCredential>> {
        Ok(CredentialRepo::list_for_user(&self.pool, user_id).await?)
    }

    async fn create_project(&self, owner_id: DbId, input: &CreateProject) -> StoreResult<Project> {
        Ok(ProjectRepo::create(&self.pool, owner_id, input).await?)
    }

    async fn find_project(&self, id: DbId, owner_id: DbId) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::find_owned(&self.pool, id, owner_id).await?)
    }

    async fn list_projects(&self, owner_id: DbId) -> StoreResult<Vec<Project>> {
        Ok(ProjectRepo::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn commit_transition(
        &self,
        project_id: DbId,
        transition: &StageTransition,
    ) -> StoreResult<TransitionOutcome> {
        Ok(ProjectRepo::commit_transition(&self.pool, project_id, transition).await?)
    }

    async fn project_artifacts(&self, project_id: DbId) -> StoreResult<Vec<Artifact>> {
        Ok(ArtifactRepo::list_for_project(&self.pool, project_id).await?)
    }

    async fn create_artifact(&self, project_id: DbId, input: &NewArtifact) -> StoreResult<Artifact> {
        Ok(ArtifactRepo::create(&self.pool, project_id, input).await?)
    }

    async fn update_artifact_payload(
        &self,
        artifact_id: DbId,
        payload: &serde_json::Value,
    ) -> StoreResult<Option<Artifact>> {
        Ok(ArtifactRepo::update_payload(&self.pool, artifact_id, payload).await?)
    }

    async fn replace_offers(&self, project_id: DbId, kind: &str, values: &[String]) -> StoreResult<()> {
        Ok(OfferRepo::replace_batch(&self.pool, project_id, kind, values).await?)
    }

    async fn list_offers(&self, project_id: DbId, kind: &str) -> StoreResult<Vec<String>> {
        let offers = OfferRepo::list(&self.pool, project_id, kind).await?;
        Ok(offers.into_iter().map(|o| o.value).collect())
    }

    async fn append_chat_message(&self, input: &CreateChatMessage) -> StoreResult<ChatMessage> {
        Ok(ChatMessageRepo::create(&self.pool, input).await?)
    }

    async fn chat_messages(&self, project_id: DbId, user_id: DbId) -> StoreResult<Vec<ChatMessage>> {
        Ok(ChatMessageRepo::list(&self.pool, project_id, user_id).await?)
    }

    async fn recent_chat_messages(
        &self,
        project_id: DbId,
        user_id: DbId,
        limit: usize,
    ) -> StoreResult<Vec<ChatMessage>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(ChatMessageRepo::list_recent(&self.pool, project_id, user_id, limit).await?)
    }
}
