/// Database models
///
/// This module contains the row types and their SQL operations. Operations
/// are generic over [`sqlx::PgExecutor`] so the repositories can run them
/// against a pool for single reads or inside one transaction for
/// multi-statement operations.
///
/// # Models
///
/// - `user`: user accounts, public profiles, sparse profile updates
/// - `thread`: conversation threads and their checkpoint-state cleanup
pub mod thread;
pub mod user;
