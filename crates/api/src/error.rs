use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bob_core::error::CoreError;
use bob_pipeline::StoreError;
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain and workflow errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses of the form `{ "error": <message>, "code": <CODE> }`, with
/// `action`, `stage` and `next_action` added when the error is tied to a
/// workflow action.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bob_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A store error outside a workflow action (auth, settings).
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut extra = serde_json::Map::new();

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => {
                if let Some(action) = core.action() {
                    extra.insert("action".into(), json!(action));
                }
                match core {
                    CoreError::NotFound { entity, id } => (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        format!("{entity} with id {id} not found"),
                    ),
                    CoreError::Validation(msg) | CoreError::InvalidInput { message: msg, .. } => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                    }
                    CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                    CoreError::Unauthorized(msg) => {
                        (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                    }
                    CoreError::Forbidden(msg) => {
                        (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
                    }
                    CoreError::PreconditionViolation {
                        stage, next_action, ..
                    } => {
                        extra.insert("stage".into(), json!(stage));
                        extra.insert("next_action".into(), json!(next_action));
                        let message = match next_action {
                            Some(next) => format!("{core}. The next valid action is '{next}'"),
                            None => format!("{core}. The project is complete"),
                        };
                        (StatusCode::CONFLICT, "PRECONDITION_FAILED", message)
                    }
                    CoreError::Generator { action, message } => {
                        tracing::error!(action, error = %message, "Generator failure");
                        (StatusCode::BAD_GATEWAY, "GENERATOR_FAILED", core.to_string())
                    }
                    CoreError::Persistence { action, message } => {
                        tracing::error!(action, error = %message, "Persistence failure");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "PERSISTENCE_FAILED",
                            format!("{action} could not be saved; no changes were made"),
                        )
                    }
                    CoreError::Internal(msg) => {
                        tracing::error!(error = %msg, "Internal core error");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "INTERNAL_ERROR",
                            INTERNAL_MESSAGE.to_string(),
                        )
                    }
                }
            }

            // --- Store errors ---
            AppError::Store(err) => classify_store_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let mut body = serde_json::Map::new();
        body.insert("error".into(), Value::String(message));
        body.insert("code".into(), Value::String(code.to_string()));
        body.extend(extra);

        (status, axum::Json(Value::Object(body))).into_response()
    }
}

/// Classify a store error into an HTTP status, error code, and message.
///
/// Unique-constraint violations map to 409; everything else maps to 500 with
/// a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, &'static str, String) {
    match err {
        StoreError::Duplicate(constraint) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            format!("Duplicate value violates unique constraint: {constraint}"),
        ),
        other => {
            tracing::error!(error = %other, "Store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}
