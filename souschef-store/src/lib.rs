//! # Souschef Store
//!
//! User identity and conversation-thread persistence for the Souschef
//! cooking-assistant chat application. This crate owns the durable parts of
//! the system: account registration and authentication, profile management,
//! and the lifecycle of conversation threads together with their dependent
//! checkpoint state. The chat UI and the LLM session layer consume it as a
//! plain async API.
//!
//! ## Module Organization
//!
//! - `auth`: Argon2id password hashing
//! - `config`: environment-based configuration
//! - `db`: connection pool, transactional sessions, migrations
//! - `error`: the typed error taxonomy
//! - `models`: row types and their SQL operations
//! - `repo`: the user and thread repositories
//! - `validation`: registration/login input validation

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repo;
pub mod validation;

/// Current version of the souschef store library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
