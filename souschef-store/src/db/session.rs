/// Transactional session scopes
///
/// Every repository operation runs entirely inside one transaction acquired
/// through this module: acquire, execute statements, then [`commit`]. If the
/// transaction value is dropped without an explicit commit — early `?`
/// return, panic unwind, or the caller's future being cancelled — sqlx rolls
/// it back and returns the connection to the pool. Partial commits cannot
/// happen.
///
/// Acquisition and commit failures surface as
/// [`StoreError::Unavailable`](crate::error::StoreError::Unavailable); the
/// driver error is logged here and never shown to callers.
///
/// # Example
///
/// ```no_run
/// use souschef_store::db::session;
/// use souschef_store::error::StoreError;
/// use sqlx::PgPool;
///
/// async fn bump(pool: &PgPool, user_id: i32) -> Result<(), StoreError> {
///     let mut tx = session::begin(pool).await?;
///
///     sqlx::query("UPDATE users SET thread_number = thread_number + 1 WHERE id = $1")
///         .bind(user_id)
///         .execute(&mut *tx)
///         .await?;
///
///     session::commit(tx).await
/// }
/// ```
use sqlx::{PgPool, Postgres, Transaction};
use tracing::error;

use crate::error::StoreError;

/// Begins a transaction on a pooled connection
///
/// # Errors
///
/// Returns `StoreError::Unavailable` if no connection can be acquired or the
/// transaction cannot be started.
pub async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, StoreError> {
    pool.begin().await.map_err(|e| {
        error!(error = %e, "failed to begin transaction");
        StoreError::Unavailable("Failed to begin transaction".to_string())
    })
}

/// Commits a transaction
///
/// # Errors
///
/// Returns `StoreError::Unavailable` on commit failure; the transaction is
/// rolled back by the driver in that case.
pub async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), StoreError> {
    tx.commit().await.map_err(|e| {
        error!(error = %e, "failed to commit transaction");
        StoreError::Unavailable("Failed to commit transaction".to_string())
    })
}
