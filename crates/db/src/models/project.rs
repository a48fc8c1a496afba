//! Project entity model, DTOs, and the stage-transition command.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bob_core::types::{DbId, Timestamp};

use crate::models::artifact::{Artifact, NewArtifact};

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub pitch: String,
    pub problem: Option<String>,
    pub target_user: Option<String>,
    pub channels: Option<String>,
    pub monetization: Option<String>,
    pub stage: String,
    pub verdict_overridden: bool,
    pub selected_domain_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project. The stage always starts at `idea`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub pitch: String,
    pub problem: Option<String>,
    pub target_user: Option<String>,
    pub channels: Option<String>,
    pub monetization: Option<String>,
}

/// A guarded change to a project, applied in one transaction.
///
/// The change only applies if the locked row still has `expect_stage` (and
/// `expect_overridden`, when set). Unset fields are left untouched.
#[derive(Debug, Clone)]
pub struct StageTransition {
    pub expect_stage: String,
    pub expect_overridden: Option<bool>,
    pub next_stage: Option<String>,
    pub set_verdict_overridden: Option<bool>,
    pub selected_domain_name: Option<String>,
    pub artifact: Option<NewArtifact>,
}

impl StageTransition {
    /// A transition guarded only on the current stage, changing nothing yet.
    pub fn expecting(stage: impl Into<String>) -> Self {
        Self {
            expect_stage: stage.into(),
            expect_overridden: None,
            next_stage: None,
            set_verdict_overridden: None,
            selected_domain_name: None,
            artifact: None,
        }
    }

    /// Whether the guard holds for `project`.
    pub fn guard_holds(&self, project: &Project) -> bool {
        project.stage == self.expect_stage
            && self
                .expect_overridden
                .is_none_or(|expected| expected == project.verdict_overridden)
    }
}

/// Result of applying a [`StageTransition`].
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The change was applied.
    Committed {
        project: Project,
        artifact: Option<Artifact>,
    },
    /// The guard failed; nothing was written. Carries the current row.
    Rejected { current: Project },
    /// No such project.
    Missing,
}
