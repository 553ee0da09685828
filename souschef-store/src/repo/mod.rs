/// Repositories over the relational store
///
/// Each repository owns a pool handle and nothing else; instances are cheap
/// to clone and safe to share across concurrent callers. Every operation
/// acquires its own transactional scope via [`crate::db::session`], so a
/// multi-statement operation either commits as a whole or leaves no trace.
///
/// # Modules
///
/// - `users`: registration, authentication, profile and account lifecycle
/// - `threads`: conversation threads and their checkpoint-state cleanup
pub mod threads;
pub mod users;

pub use threads::ThreadRepository;
pub use users::UserRepository;
