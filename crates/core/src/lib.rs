//! Domain layer for the Build-or-Bounce idea pipeline.
//!
//! Everything here is free of I/O: the stage machine and its precondition
//! rules, artifact payload types, domain-name rules, the generator adapter
//! traits, and the credential/secret primitives shared by the other crates.

pub mod artifacts;
pub mod coach;
pub mod credentials;
pub mod crypto;
pub mod domain_names;
pub mod error;
pub mod generators;
pub mod hashing;
pub mod questions;
pub mod rules;
pub mod stage;
pub mod types;
