/// Thread repository: conversation lifecycle and checkpoint cleanup
///
/// Creating a thread bumps the owner's `thread_number`; deleting one purges
/// the collaborator-owned checkpoint state, removes the row and decrements
/// the counter — all inside a single transaction, so the counter can never
/// drift from the rows it counts.
///
/// # Example
///
/// ```no_run
/// use souschef_store::repo::ThreadRepository;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: i32) -> Result<(), Box<dyn std::error::Error>> {
/// let threads = ThreadRepository::new(pool);
///
/// let thread_id = threads.create(user_id, Some("Dinner Ideas")).await?;
/// let mine = threads.list_for_user(user_id).await?;
/// assert_eq!(mine[0].id, thread_id);
///
/// threads.delete(thread_id).await?;
/// # Ok(())
/// # }
/// ```
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use crate::db::session;
use crate::error::{StoreError, StoreResult};
use crate::models::thread::{Thread, ThreadUpdate};
use crate::models::user::User;

/// Repository for the `threads` entity and its dependent checkpoint state
#[derive(Clone)]
pub struct ThreadRepository {
    pool: PgPool,
}

impl ThreadRepository {
    /// Creates a new repository over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a thread for a user
    ///
    /// A blank or absent name falls back to a timestamp label
    /// (`Thread 2026-08-07 18:30`). The owner's `thread_number` is
    /// incremented in the same transaction as the insert.
    ///
    /// # Returns
    ///
    /// The new thread's id.
    ///
    /// # Errors
    ///
    /// [`StoreError::UserNotFound`] if the owning user does not exist.
    pub async fn create(&self, user_id: i32, thread_name: Option<&str>) -> StoreResult<i32> {
        let mut tx = session::begin(&self.pool).await?;

        if !User::exists(&mut *tx, user_id).await? {
            return Err(StoreError::UserNotFound);
        }

        let name = match thread_name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_thread_name(),
        };

        let thread_id = Thread::insert(&mut *tx, user_id, &name).await?;
        User::increment_thread_count(&mut *tx, user_id).await?;

        session::commit(tx).await?;

        info!(thread_id, user_id, "thread created");
        Ok(thread_id)
    }

    /// Lists a user's threads, newest created first
    ///
    /// Read-only; an empty result is a valid outcome, not an error.
    pub async fn list_for_user(&self, user_id: i32) -> StoreResult<Vec<Thread>> {
        let mut tx = session::begin(&self.pool).await?;

        let threads = Thread::list_for_user(&mut *tx, user_id).await?;

        session::commit(tx).await?;

        Ok(threads)
    }

    /// Fetches a single thread
    ///
    /// # Errors
    ///
    /// [`StoreError::ThreadNotFound`] if the thread does not exist.
    pub async fn get_details(&self, thread_id: i32) -> StoreResult<Thread> {
        let mut tx = session::begin(&self.pool).await?;

        let thread = Thread::find_by_id(&mut *tx, thread_id)
            .await?
            .ok_or(StoreError::ThreadNotFound)?;

        session::commit(tx).await?;

        Ok(thread)
    }

    /// Renames and/or (de)activates a thread
    ///
    /// `updated_at` is refreshed whenever any field changes; with nothing
    /// supplied this degrades to a plain read.
    ///
    /// # Errors
    ///
    /// [`StoreError::ThreadNotFound`] if no row was affected.
    pub async fn update(&self, thread_id: i32, changes: &ThreadUpdate) -> StoreResult<Thread> {
        if !changes.has_changes() {
            return self.get_details(thread_id).await;
        }

        let mut tx = session::begin(&self.pool).await?;

        let affected = Thread::apply_update(&mut *tx, thread_id, changes).await?;
        if affected == 0 {
            return Err(StoreError::ThreadNotFound);
        }

        let thread = Thread::find_by_id(&mut *tx, thread_id)
            .await?
            .ok_or(StoreError::ThreadNotFound)?;

        session::commit(tx).await?;

        info!(thread_id, "thread updated");
        Ok(thread)
    }

    /// Deletes a thread and all of its checkpoint state
    ///
    /// Within one transaction: checkpoint blobs, writes and checkpoints
    /// keyed by this thread id are deleted, then the thread row, then the
    /// owner's `thread_number` is decremented. All five steps commit or
    /// roll back as a unit.
    ///
    /// # Errors
    ///
    /// [`StoreError::ThreadNotFound`] if the thread does not exist; counters
    /// are left untouched in that case.
    pub async fn delete(&self, thread_id: i32) -> StoreResult<()> {
        let mut tx = session::begin(&self.pool).await?;

        let owner_id = Thread::owner_id(&mut *tx, thread_id)
            .await?
            .ok_or(StoreError::ThreadNotFound)?;

        Thread::purge_checkpoint_state(&mut tx, thread_id).await?;
        Thread::delete_row(&mut *tx, thread_id).await?;
        User::decrement_thread_count(&mut *tx, owner_id).await?;

        session::commit(tx).await?;

        info!(thread_id, user_id = owner_id, "thread deleted");
        Ok(())
    }
}

/// Timestamp label used when a thread is created without a name
fn default_thread_name() -> String {
    format!("Thread {}", Utc::now().format("%Y-%m-%d %H:%M"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thread_name_shape() {
        let name = default_thread_name();
        assert!(name.starts_with("Thread "));
        // "Thread " + "YYYY-MM-DD HH:MM"
        assert_eq!(name.len(), 7 + 16);
    }
}
