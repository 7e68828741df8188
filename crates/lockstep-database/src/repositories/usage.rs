//! Usage counter repository.
//!
//! The ceiling check and the increment happen in one statement, so the
//! counter can never observably pass the limit no matter how calls
//! interleave across instances. Postgres guarantees the row-level atomicity;
//! no external lock is involved.

use sqlx::PgPool;
use tracing::debug;

use lockstep_core::error::{AppError, ErrorKind};
use lockstep_core::result::AppResult;

use crate::transaction::PgTransaction;

/// Repository for per-subject, per-feature usage counters.
#[derive(Debug, Clone)]
pub struct UsageCounterRepository {
    pool: PgPool,
}

impl UsageCounterRepository {
    /// Create a new usage counter repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically increment the counter if it is below `limit`.
    ///
    /// Returns the post-increment count, or `None` when the counter already
    /// sat at or above the limit (in which case nothing was written). The
    /// insert arm covers the first increment for a subject/feature pair;
    /// callers must reject non-positive limits before reaching this query,
    /// because the insert arm does not consult `limit`.
    pub async fn try_increment(
        &self,
        subject_id: &str,
        feature_id: &str,
        limit: i64,
    ) -> AppResult<Option<i64>> {
        let count: Option<i64> = sqlx::query_scalar(
            r#"
            INSERT INTO usage_counters (subject_id, feature_id, count)
            VALUES ($1, $2, 1)
            ON CONFLICT (subject_id, feature_id) DO UPDATE
                SET count = usage_counters.count + 1,
                    updated_at = NOW()
                WHERE usage_counters.count < $3
            RETURNING count
            "#,
        )
        .bind(subject_id)
        .bind(feature_id)
        .bind(limit)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment usage counter", e)
        })?;

        debug!(
            subject_id,
            feature_id,
            count = ?count,
            "Usage counter increment attempted"
        );
        Ok(count)
    }

    /// Read the current count for a subject/feature pair.
    ///
    /// For display only. Checking this value and acting on it outside
    /// [`try_increment`](Self::try_increment) reintroduces the race the
    /// atomic statement exists to prevent.
    pub async fn current_usage(
        &self,
        subject_id: &str,
        feature_id: &str,
    ) -> AppResult<Option<i64>> {
        sqlx::query_scalar(
            "SELECT count FROM usage_counters WHERE subject_id = $1 AND feature_id = $2",
        )
        .bind(subject_id)
        .bind(feature_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read usage counter", e)
        })
    }

    /// Create a zeroed counter inside an enclosing transaction scope.
    ///
    /// The row commits or rolls back together with the rest of the unit of
    /// work. Already-existing counters are left untouched.
    pub async fn create_in(
        &self,
        tx: &mut PgTransaction,
        subject_id: &str,
        feature_id: &str,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO usage_counters (subject_id, feature_id, count)
            VALUES ($1, $2, 0)
            ON CONFLICT (subject_id, feature_id) DO NOTHING
            "#,
        )
        .bind(subject_id)
        .bind(feature_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to create usage counter", e)
        })?;
        Ok(())
    }

    /// Delete the counter for a subject/feature pair.
    pub async fn delete(&self, subject_id: &str, feature_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM usage_counters WHERE subject_id = $1 AND feature_id = $2",
        )
        .bind(subject_id)
        .bind(feature_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete usage counter", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
