//! HTTP-backed implementations of the generator adapter traits.
//!
//! Every adapter takes its API key from the per-request
//! [`Credentials`](bob_core::credentials::Credentials) and shares one
//! [`reqwest::Client`] for connection pooling. Provider failures surface as
//! [`ProviderError`] and are converted into
//! [`GeneratorError`](bob_core::generators::GeneratorError) at the trait
//! boundary.

pub mod brand;
pub mod card;
pub mod coach;
pub mod config;
pub mod error;
pub mod images;
pub mod logos;
pub mod naming;
pub mod openai;
pub mod rdap;
pub mod research;
pub mod site;
pub mod storage;
pub mod validator;

pub use config::ProviderConfig;
pub use error::ProviderError;
