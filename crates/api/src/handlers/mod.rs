pub mod auth;
pub mod chat;
pub mod projects;
pub mod settings;
pub mod workflow;
