/// Thread (conversation) model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE threads (
///     id SERIAL PRIMARY KEY,
///     user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     thread_name VARCHAR(100),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// The LLM-session collaborator keeps checkpoint state in three tables
/// (`checkpoints`, `checkpoint_writes`, `checkpoint_blobs`) keyed by the
/// thread id *as text*. This module never reads them; it only purges
/// matching rows when a thread is deleted.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};

/// A conversation thread
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Thread {
    /// Unique thread ID (store-assigned)
    pub id: i32,

    /// Owning user
    pub user_id: i32,

    /// Display name; defaulted to a timestamp label when created blank
    pub thread_name: Option<String>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,

    /// Bumped on every mutating update
    pub updated_at: DateTime<Utc>,
}

/// Sparse thread update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadUpdate {
    pub thread_name: Option<String>,
    pub is_active: Option<bool>,
}

impl ThreadUpdate {
    /// Returns true if at least one field would be written
    pub fn has_changes(&self) -> bool {
        self.thread_name.is_some() || self.is_active.is_some()
    }
}

impl Thread {
    /// Inserts a new thread row
    ///
    /// # Returns
    ///
    /// The store-assigned thread id.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        user_id: i32,
        thread_name: &str,
    ) -> Result<i32, sqlx::Error> {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO threads (user_id, thread_name)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(thread_name)
        .fetch_one(executor)
        .await?;

        Ok(id)
    }

    /// Lists a user's threads, newest created first
    pub async fn list_for_user(
        executor: impl PgExecutor<'_>,
        user_id: i32,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Thread>(
            r#"
            SELECT id, user_id, thread_name, is_active, created_at, updated_at
            FROM threads
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Lists the ids of every thread owned by a user
    ///
    /// Used by user deletion to run the full per-thread cascade before the
    /// user row is removed.
    pub async fn ids_for_user(
        executor: impl PgExecutor<'_>,
        user_id: i32,
    ) -> Result<Vec<i32>, sqlx::Error> {
        let rows: Vec<(i32,)> = sqlx::query_as("SELECT id FROM threads WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(executor)
            .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Finds a thread by id
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Thread>(
            r#"
            SELECT id, user_id, thread_name, is_active, created_at, updated_at
            FROM threads
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Returns the owning user's id, if the thread exists
    pub async fn owner_id(
        executor: impl PgExecutor<'_>,
        id: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT user_id FROM threads WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(row.map(|(user_id,)| user_id))
    }

    /// Applies a sparse update, always refreshing `updated_at`
    ///
    /// Callers must check [`ThreadUpdate::has_changes`] first.
    ///
    /// # Returns
    ///
    /// Number of rows affected (0 when the thread does not exist).
    pub async fn apply_update(
        executor: impl PgExecutor<'_>,
        id: i32,
        data: &ThreadUpdate,
    ) -> Result<u64, sqlx::Error> {
        let mut query = String::from("UPDATE threads SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.thread_name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", thread_name = ${}", bind_count));
        }
        if data.is_active.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_active = ${}", bind_count));
        }

        query.push_str(" WHERE id = $1");

        let mut q = sqlx::query(&query).bind(id);

        if let Some(ref thread_name) = data.thread_name {
            q = q.bind(thread_name);
        }
        if let Some(is_active) = data.is_active {
            q = q.bind(is_active);
        }

        let result = q.execute(executor).await?;

        Ok(result.rows_affected())
    }

    /// Purges the checkpoint state belonging to a thread
    ///
    /// Deletes dependents first (blobs, then writes, then the checkpoints
    /// themselves) so foreign keys in the collaborator's schema never block
    /// the cascade. The checkpoint tables key threads by text, hence the
    /// stringified id.
    pub async fn purge_checkpoint_state(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<(), sqlx::Error> {
        let thread_key = id.to_string();

        sqlx::query("DELETE FROM checkpoint_blobs WHERE thread_id = $1")
            .bind(&thread_key)
            .execute(&mut *conn)
            .await?;

        sqlx::query("DELETE FROM checkpoint_writes WHERE thread_id = $1")
            .bind(&thread_key)
            .execute(&mut *conn)
            .await?;

        sqlx::query("DELETE FROM checkpoints WHERE thread_id = $1")
            .bind(&thread_key)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Deletes a thread row
    ///
    /// # Returns
    ///
    /// Number of rows affected (0 when the thread does not exist).
    pub async fn delete_row(executor: impl PgExecutor<'_>, id: i32) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_update_default_has_no_changes() {
        let update = ThreadUpdate::default();
        assert!(!update.has_changes());
    }

    #[test]
    fn test_thread_update_detects_activation_change() {
        let update = ThreadUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(update.has_changes());
    }
}
