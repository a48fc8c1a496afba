//! Handlers for project intake, listing and the full project view.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use bob_core::types::DbId;
use bob_db::models::project::Project;
use bob_pipeline::{NewProject, ProjectView};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<NewProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = state.workflow.create_project(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
///
/// The caller's projects, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state.workflow.list_projects(auth.user_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
///
/// Project fields with every artifact resolved, plus the actions legal now.
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectView>>> {
    let view = state.workflow.project_view(auth.user_id, id).await?;
    Ok(Json(DataResponse { data: view }))
}
