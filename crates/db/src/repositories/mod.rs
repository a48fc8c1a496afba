//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod artifact_repo;
pub mod chat_message_repo;
pub mod credential_repo;
pub mod offer_repo;
pub mod project_repo;
pub mod user_repo;

pub use artifact_repo::ArtifactRepo;
pub use chat_message_repo::ChatMessageRepo;
pub use credential_repo::CredentialRepo;
pub use offer_repo::OfferRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
