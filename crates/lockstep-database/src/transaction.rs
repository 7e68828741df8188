//! All-or-nothing execution of multi-statement units of work.

use futures::future::BoxFuture;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, warn};

use lockstep_core::error::{AppError, ErrorKind};
use lockstep_core::result::AppResult;

/// A database transaction handle passed into units of work.
///
/// Repository methods that must participate in an enclosing commit accept
/// `&mut PgTransaction` instead of the pool.
pub type PgTransaction = Transaction<'static, Postgres>;

/// Runs a unit of work inside a single database transaction.
///
/// Writes made through the supplied handle become visible together at commit
/// or not at all. The unit of work's error is returned to the caller
/// unchanged after rollback. If the task unwinds mid-work, sqlx rolls the
/// transaction back on drop, so no exit path leaks an open transaction.
#[derive(Debug, Clone)]
pub struct TransactionExecutor {
    pool: PgPool,
}

impl TransactionExecutor {
    /// Create a new transaction executor on the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Execute `work` inside a transaction scope.
    ///
    /// Commits on `Ok`, rolls back on `Err`. A rollback failure is logged
    /// and swallowed; the unit of work's own error is what the caller sees.
    pub async fn run<T, F>(&self, work: F) -> AppResult<T>
    where
        T: Send,
        F: for<'t> FnOnce(&'t mut PgTransaction) -> BoxFuture<'t, AppResult<T>> + Send,
    {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        match work(&mut tx).await {
            Ok(value) => {
                tx.commit().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
                })?;
                debug!("Transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed after aborted unit of work");
                } else {
                    debug!(error = %err, "Transaction rolled back");
                }
                Err(err)
            }
        }
    }
}
