use std::sync::Arc;

use bob_pipeline::{Workflow, WorkflowStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the store is behind an `Arc` and `Workflow` clones
/// only handles.
#[derive(Clone)]
pub struct AppState {
    /// Durable state (users, projects, artifacts, chat logs).
    pub store: Arc<dyn WorkflowStore>,
    /// The project workflow engine.
    pub workflow: Workflow,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
