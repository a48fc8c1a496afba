//! Route definitions for the `/projects` resource and its workflow actions.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{projects, workflow};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET, POST  /                               -> list, create
/// GET        /{id}                           -> get_by_id
/// POST       /{id}/validate                  -> validate
/// PATCH      /{id}/override-verdict          -> override_verdict
/// POST       /{id}/cross-qa                  -> record_answer
/// GET, POST  /{id}/domains                   -> domain_candidates, select_domain
/// GET        /{id}/logo-options              -> logo_options
/// POST       /{id}/brand-kit                 -> generate_brand_kit
/// POST       /{id}/brand-kit/business-card   -> attach_business_card
/// POST       /{id}/website                   -> generate_website
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/{id}", get(projects::get_by_id))
        .route("/{id}/validate", post(workflow::validate))
        .route("/{id}/override-verdict", patch(workflow::override_verdict))
        .route("/{id}/cross-qa", post(workflow::record_answer))
        .route(
            "/{id}/domains",
            get(workflow::domain_candidates).post(workflow::select_domain),
        )
        .route("/{id}/logo-options", get(workflow::logo_options))
        .route("/{id}/brand-kit", post(workflow::generate_brand_kit))
        .route(
            "/{id}/brand-kit/business-card",
            post(workflow::attach_business_card),
        )
        .route("/{id}/website", post(workflow::generate_website))
}
