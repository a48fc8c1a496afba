//! Repository for the `artifacts` table.
//!
//! Artifacts written as part of a stage change go through
//! [`ProjectRepo::commit_transition`](crate::repositories::ProjectRepo::commit_transition);
//! this repo covers the rest.

use sqlx::PgPool;
use bob_core::types::DbId;

use crate::models::artifact::{Artifact, NewArtifact};

pub(crate) const COLUMNS: &str = "id, project_id, kind, payload, created_at, updated_at";

/// Provides insert and lookup operations for artifacts.
pub struct ArtifactRepo;

impl ArtifactRepo {
    /// Insert an artifact, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &NewArtifact,
    ) -> Result<Artifact, sqlx::Error> {
        Self::insert_with(pool, project_id, input).await
    }

    /// Insert on any executor so the transition path can reuse it inside a transaction.
    pub(crate) async fn insert_with<'e, E>(
        executor: E,
        project_id: DbId,
        input: &NewArtifact,
    ) -> Result<Artifact, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO artifacts (project_id, kind, payload)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artifact>(&query)
            .bind(project_id)
            .bind(&input.kind)
            .bind(&input.payload)
            .fetch_one(executor)
            .await
    }

    /// All artifacts of a kind for a project, oldest first.
    pub async fn list_by_kind(
        pool: &PgPool,
        project_id: DbId,
        kind: &str,
    ) -> Result<Vec<Artifact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM artifacts
             WHERE project_id = $1 AND kind = $2
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Artifact>(&query)
            .bind(project_id)
            .bind(kind)
            .fetch_all(pool)
            .await
    }

    /// All artifacts for a project, oldest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Artifact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM artifacts WHERE project_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, Artifact>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Replace an artifact's payload. Returns `None` if the row does not exist.
    pub async fn update_payload(
        pool: &PgPool,
        id: DbId,
        payload: &serde_json::Value,
    ) -> Result<Option<Artifact>, sqlx::Error> {
        let query = format!(
            "UPDATE artifacts SET payload = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Artifact>(&query)
            .bind(id)
            .bind(payload)
            .fetch_optional(pool)
            .await
    }
}
