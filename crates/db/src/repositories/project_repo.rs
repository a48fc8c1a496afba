//! Repository for the `projects` table.
//!
//! Stage changes only happen through [`ProjectRepo::commit_transition`], which
//! locks the row, re-checks the expected stage, writes the artifact and the
//! new stage, and commits them together.

use sqlx::PgPool;
use bob_core::types::DbId;

use crate::models::project::{CreateProject, Project, StageTransition, TransitionOutcome};
use crate::repositories::ArtifactRepo;

const COLUMNS: &str = "id, owner_id, title, pitch, problem, target_user, channels, monetization, \
                       stage, verdict_overridden, selected_domain_name, created_at, updated_at";

/// Provides project CRUD and guarded stage transitions.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project in stage `idea`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (owner_id, title, pitch, problem, target_user, channels, monetization)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.pitch)
            .bind(&input.problem)
            .bind(&input.target_user)
            .bind(&input.channels)
            .bind(&input.monetization)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID, regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project owned by `owner_id`. Returns `None` for other owners' projects.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List an owner's projects, most recently created first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Apply a guarded change in one transaction.
    ///
    /// The row is locked with `FOR UPDATE`, so of two concurrent transitions
    /// expecting the same stage exactly one commits; the other sees the new
    /// stage and is rejected without writing anything.
    pub async fn commit_transition(
        pool: &PgPool,
        project_id: DbId,
        transition: &StageTransition,
    ) -> Result<TransitionOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(current) = current else {
            tx.rollback().await?;
            return Ok(TransitionOutcome::Missing);
        };

        if !transition.guard_holds(&current) {
            tx.rollback().await?;
            return Ok(TransitionOutcome::Rejected { current });
        }

        let artifact = match &transition.artifact {
            Some(new_artifact) => {
                Some(ArtifactRepo::insert_with(&mut *tx, project_id, new_artifact).await?)
            }
            None => None,
        };

        let query = format!(
            "UPDATE projects SET
                stage = COALESCE($2, stage),
                verdict_overridden = COALESCE($3, verdict_overridden),
                selected_domain_name = COALESCE($4, selected_domain_name),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .bind(&transition.next_stage)
            .bind(transition.set_verdict_overridden)
            .bind(&transition.selected_domain_name)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            project_id,
            from = %current.stage,
            to = %project.stage,
            "Project transition committed",
        );

        Ok(TransitionOutcome::Committed { project, artifact })
    }
}
