//! The project workflow: a typed stage machine that runs generators,
//! checks preconditions against freshly-read state, and commits each
//! artifact together with its stage change.

pub mod credentials;
pub mod engine;
pub mod generators;
pub mod store;
pub mod view;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use credentials::CredentialResolver;
pub use engine::{DomainCandidates, NewProject, Workflow, WorkflowConfig};
pub use generators::Generators;
pub use store::{MemoryStore, PgStore, StoreError, WorkflowStore};
pub use view::ProjectView;
