//! In-process [`WorkflowStore`].
//!
//! One mutex guards all state, so every operation (including
//! `commit_transition`) is atomic with respect to every other. Commit
//! failures can be injected to exercise the no-partial-commit path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use bob_core::types::DbId;
use bob_db::models::artifact::{Artifact, NewArtifact};
use bob_db::models::chat_message::{ChatMessage, CreateChatMessage};
use bob_db::models::offer::Offer;
use bob_db::models::project::{CreateProject, Project, StageTransition, TransitionOutcome};
use bob_db::models::user::{CreateUser, User};
use bob_db::models::user_credential::UserCredential;
use chrono::Utc;

use super::{StoreError, StoreResult, WorkflowStore};

#[derive(Default)]
struct State {
    next_id: DbId,
    users: Vec<User>,
    credentials: Vec<UserCredential>,
    projects: Vec<Project>,
    artifacts: Vec<Artifact>,
    offers: Vec<Offer>,
    chat_messages: Vec<ChatMessage>,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    failing_commits: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` calls to `commit_transition` fail without
    /// writing anything.
    pub fn fail_next_commits(&self, count: usize) {
        self.failing_commits.store(count, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn take_commit_failure(&self) -> bool {
        self.failing_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

fn insert_artifact(state: &mut State, project_id: DbId, input: &NewArtifact) -> Artifact {
    let now = Utc::now();
    let artifact = Artifact {
        id: state.next_id(),
        project_id,
        kind: input.kind.clone(),
        payload: input.payload.clone(),
        created_at: now,
        updated_at: now,
    };
    state.artifacts.push(artifact.clone());
    artifact
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut state = self.lock();
        if state.users.iter().any(|u| u.email == input.email) {
            return Err(StoreError::Duplicate("uq_users_email".to_string()));
        }
        let now = Utc::now();
        let user = User {
            id: state.next_id(),
            email: input.email.clone(),
            name: input.name.clone(),
            password_hash: input.password_hash.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_password_hash(&self, user_id: DbId, password_hash: &str) -> StoreResult<bool> {
        let mut state = self.lock();
        let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(false);
        };
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn upsert_credential(&self, user_id: DbId, service: &str, ciphertext: &str) -> StoreResult<()> {
        let mut state = self.lock();
        let now = Utc::now();
        match state
            .credentials
            .iter_mut()
            .find(|c| c.user_id == user_id && c.service == service)
        {
            Some(existing) => {
                existing.ciphertext = ciphertext.to_string();
                existing.updated_at = now;
            }
            None => state.credentials.push(UserCredential {
                user_id,
                service: service.to_string(),
                ciphertext: ciphertext.to_string(),
                updated_at: now,
            }),
        }
        Ok(())
    }

    async fn delete_credential(&self, user_id: DbId, service: &str) -> StoreResult<bool> {
        let mut state = self.lock();
        let before = state.credentials.len();
        state
            .credentials
            .retain(|c| !(c.user_id == user_id && c.service == service));
        Ok(state.credentials.len() < before)
    }

    async fn list_credentials(&self, user_id: DbId) -> StoreResult<Vec<UserCredential>> {
        let mut creds: Vec<_> = self
            .lock()
            .credentials
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        creds.sort_by(|a, b| a.service.cmp(&b.service));
        Ok(creds)
    }

    async fn create_project(&self, owner_id: DbId, input: &CreateProject) -> StoreResult<Project> {
        let mut state = self.lock();
        let now = Utc::now();
        let project = Project {
            id: state.next_id(),
            owner_id,
            title: input.title.clone(),
            pitch: input.pitch.clone(),
            problem: input.problem.clone(),
            target_user: input.target_user.clone(),
            channels: input.channels.clone(),
            monetization: input.monetization.clone(),
            stage: "idea".to_string(),
            verdict_overridden: false,
            selected_domain_name: None,
            created_at: now,
            updated_at: now,
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn find_project(&self, id: DbId, owner_id: DbId) -> StoreResult<Option<Project>> {
        Ok(self
            .lock()
            .projects
            .iter()
            .find(|p| p.id == id && p.owner_id == owner_id)
            .cloned())
    }

    async fn list_projects(&self, owner_id: DbId) -> StoreResult<Vec<Project>> {
        let mut projects: Vec<_> = self
            .lock()
            .projects
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(projects)
    }

    async fn commit_transition(
        &self,
        project_id: DbId,
        transition: &StageTransition,
    ) -> StoreResult<TransitionOutcome> {
        let mut state = self.lock();

        let Some(index) = state.projects.iter().position(|p| p.id == project_id) else {
            return Ok(TransitionOutcome::Missing);
        };
        if !transition.guard_holds(&state.projects[index]) {
            return Ok(TransitionOutcome::Rejected {
                current: state.projects[index].clone(),
            });
        }
        if self.take_commit_failure() {
            return Err(StoreError::Unavailable(
                "injected commit failure".to_string(),
            ));
        }

        let artifact = transition
            .artifact
            .as_ref()
            .map(|input| insert_artifact(&mut state, project_id, input));

        let project = &mut state.projects[index];
        if let Some(stage) = &transition.next_stage {
            project.stage = stage.clone();
        }
        if let Some(overridden) = transition.set_verdict_overridden {
            project.verdict_overridden = overridden;
        }
        if let Some(domain) = &transition.selected_domain_name {
            project.selected_domain_name = Some(domain.clone());
        }
        project.updated_at = Utc::now();

        Ok(TransitionOutcome::Committed {
            project: project.clone(),
            artifact,
        })
    }

    async fn project_artifacts(&self, project_id: DbId) -> StoreResult<Vec<Artifact>> {
        Ok(self
            .lock()
            .artifacts
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_artifact(&self, project_id: DbId, input: &NewArtifact) -> StoreResult<Artifact> {
        Ok(insert_artifact(&mut self.lock(), project_id, input))
    }

    async fn update_artifact_payload(
        &self,
        artifact_id: DbId,
        payload: &serde_json::Value,
    ) -> StoreResult<Option<Artifact>> {
        let mut state = self.lock();
        Ok(state
            .artifacts
            .iter_mut()
            .find(|a| a.id == artifact_id)
            .map(|artifact| {
                artifact.payload = payload.clone();
                artifact.updated_at = Utc::now();
                artifact.clone()
            }))
    }

    async fn replace_offers(&self, project_id: DbId, kind: &str, values: &[String]) -> StoreResult<()> {
        let mut state = self.lock();
        state
            .offers
            .retain(|o| !(o.project_id == project_id && o.kind == kind));
        let now = Utc::now();
        for (position, value) in values.iter().enumerate() {
            let id = state.next_id();
            state.offers.push(Offer {
                id,
                project_id,
                kind: kind.to_string(),
                value: value.clone(),
                position: position as i32,
                created_at: now,
            });
        }
        Ok(())
    }

    async fn list_offers(&self, project_id: DbId, kind: &str) -> StoreResult<Vec<String>> {
        let state = self.lock();
        let mut offers: Vec<_> = state
            .offers
            .iter()
            .filter(|o| o.project_id == project_id && o.kind == kind)
            .collect();
        offers.sort_by_key(|o| o.position);
        Ok(offers.into_iter().map(|o| o.value.clone()).collect())
    }

    async fn append_chat_message(&self, input: &CreateChatMessage) -> StoreResult<ChatMessage> {
        let mut state = self.lock();
        let message = ChatMessage {
            id: state.next_id(),
            project_id: input.project_id,
            user_id: input.user_id,
            role: input.role.clone(),
            content: input.content.clone(),
            created_at: Utc::now(),
        };
        state.chat_messages.push(message.clone());
        Ok(message)
    }

    async fn chat_messages(&self, project_id: DbId, user_id: DbId) -> StoreResult<Vec<ChatMessage>> {
        Ok(self
            .lock()
            .chat_messages
            .iter()
            .filter(|m| m.project_id == project_id && m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn recent_chat_messages(
        &self,
        project_id: DbId,
        user_id: DbId,
        limit: usize,
    ) -> StoreResult<Vec<ChatMessage>> {
        let all = self.chat_messages(project_id, user_id).await?;
        let skip = all.len().saturating_sub(limit);
        Ok(all.into_iter().skip(skip).collect())
    }
}
