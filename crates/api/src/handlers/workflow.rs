//! Handlers for the workflow actions and candidate queries on a project.
//!
//! Each committing action maps to one `Workflow` method; the engine does the
//! precondition checks, so handlers only parse input and wrap output.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bob_core::artifacts::{BrandKitData, CrossQaData, LogoRef, ValidationReportData, WebsiteData};
use bob_core::domain_names::NamingMode;
use bob_core::types::DbId;
use bob_db::models::project::Project;
use bob_pipeline::DomainCandidates;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects/{id}/cross-qa`.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub answer: String,
}

/// Query parameters for `GET /projects/{id}/domains`.
#[derive(Debug, Deserialize)]
pub struct DomainQuery {
    #[serde(default)]
    pub mode: NamingMode,
}

/// Request body for `POST /projects/{id}/domains`.
#[derive(Debug, Deserialize)]
pub struct SelectDomainRequest {
    pub domain_name: String,
}

/// Response body for `GET /projects/{id}/logo-options`.
#[derive(Debug, Serialize)]
pub struct LogoOptions {
    pub logos: Vec<LogoRef>,
}

/// Request body for `POST /projects/{id}/brand-kit`.
#[derive(Debug, Deserialize)]
pub struct BrandKitRequest {
    pub logo: String,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/validate
pub async fn validate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ValidationReportData>>> {
    let report = state.workflow.validate(auth.user_id, id).await?;
    Ok(Json(DataResponse { data: report }))
}

/// PATCH /api/v1/projects/{id}/override-verdict
pub async fn override_verdict(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.workflow.override_verdict(auth.user_id, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/cross-qa
pub async fn record_answer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AnswerRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CrossQaData>>)> {
    let entry = state
        .workflow
        .record_answer(auth.user_id, id, &input.question, &input.answer)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

// ---------------------------------------------------------------------------
// Domains
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/domains?mode=normal|creative
///
/// An empty candidate list is a success; `retry_mode` tells the client to
/// ask again in creative mode.
pub async fn domain_candidates(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<DomainQuery>,
) -> AppResult<Json<DataResponse<DomainCandidates>>> {
    let candidates = state
        .workflow
        .domain_candidates(auth.user_id, id, query.mode)
        .await?;
    Ok(Json(DataResponse { data: candidates }))
}

/// POST /api/v1/projects/{id}/domains
pub async fn select_domain(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<SelectDomainRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .workflow
        .select_domain(auth.user_id, id, &input.domain_name)
        .await?;
    Ok(Json(DataResponse { data: project }))
}

// ---------------------------------------------------------------------------
// Brand kit
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/logo-options
pub async fn logo_options(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LogoOptions>>> {
    let logos = state.workflow.logo_options(auth.user_id, id).await?;
    Ok(Json(DataResponse {
        data: LogoOptions { logos },
    }))
}

/// POST /api/v1/projects/{id}/brand-kit
pub async fn generate_brand_kit(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<BrandKitRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<BrandKitData>>)> {
    let kit = state
        .workflow
        .generate_brand_kit(auth.user_id, id, &input.logo)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: kit })))
}

/// POST /api/v1/projects/{id}/brand-kit/business-card
pub async fn attach_business_card(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BrandKitData>>> {
    let kit = state.workflow.attach_business_card(auth.user_id, id).await?;
    Ok(Json(DataResponse { data: kit }))
}

// ---------------------------------------------------------------------------
// Website
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/website
pub async fn generate_website(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<WebsiteData>>)> {
    let website = state.workflow.generate_website(auth.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: website })))
}
