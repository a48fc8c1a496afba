use crate::stage::{Stage, WorkflowAction};
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Input to a workflow action was rejected before anything ran.
    #[error("Validation failed: {message}")]
    InvalidInput { action: &'static str, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A workflow action was invoked in the wrong stage or without its
    /// prerequisite artifacts.
    #[error("Cannot {action} while project is '{stage}': {message}")]
    PreconditionViolation {
        action: WorkflowAction,
        stage: Stage,
        message: String,
        /// The action that is actually valid next, if any.
        next_action: Option<WorkflowAction>,
    },

    /// An external collaborator failed or returned malformed output.
    #[error("{action} failed: {message}")]
    Generator { action: &'static str, message: String },

    /// Generation succeeded but the result could not be stored.
    #[error("{action} failed to persist: {message}")]
    Persistence { action: &'static str, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Name of the failed workflow action, when the error is tied to one.
    pub fn action(&self) -> Option<&'static str> {
        match self {
            Self::PreconditionViolation { action, .. } => Some(action.as_str()),
            Self::InvalidInput { action, .. }
            | Self::Generator { action, .. }
            | Self::Persistence { action, .. } => Some(action),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_is_reported_for_workflow_errors() {
        let invalid = CoreError::InvalidInput {
            action: "select_domain",
            message: "bad label".to_string(),
        };
        assert_eq!(invalid.action(), Some("select_domain"));
        assert_eq!(invalid.to_string(), "Validation failed: bad label");

        assert_eq!(CoreError::Validation("bad label".into()).action(), None);
    }
}
