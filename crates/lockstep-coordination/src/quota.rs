//! Quota ceilings enforced atomically with their own increment.

use serde::{Deserialize, Serialize};
use tracing::debug;

use lockstep_core::result::AppResult;
use lockstep_database::repositories::UsageCounterRepository;

/// Result of a ceiling-checked increment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaDecision {
    /// The increment was admitted.
    Allowed {
        /// The count after this increment.
        current_usage: i64,
    },
    /// The counter already sat at the limit; nothing was written.
    Exceeded,
}

impl QuotaDecision {
    /// Whether the increment was admitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Enforces per-subject, per-feature usage ceilings.
///
/// The check and the increment are one database statement, so no more than
/// `limit` calls are ever admitted regardless of interleaving across
/// instances. The limit is supplied by the caller on every call and never
/// persisted; callers passing inconsistent limits for the same
/// subject/feature get unspecified admission order between their limits.
#[derive(Debug, Clone)]
pub struct QuotaGuard {
    counters: UsageCounterRepository,
}

impl QuotaGuard {
    /// Create a quota guard over the usage counter repository.
    pub fn new(counters: UsageCounterRepository) -> Self {
        Self { counters }
    }

    /// Admit and count one use of `feature_id` by `subject_id`, unless the
    /// counter has reached `limit`.
    ///
    /// Exceeding the ceiling is an ordinary decision, not an error; backend
    /// failures propagate because there is no fallback that preserves the
    /// ceiling guarantee.
    pub async fn check_and_increment(
        &self,
        subject_id: &str,
        feature_id: &str,
        limit: i64,
    ) -> AppResult<QuotaDecision> {
        // The upsert's insert arm admits the first increment unconditionally,
        // so a non-positive limit has to be rejected before the query.
        if limit < 1 {
            debug!(subject_id, feature_id, limit, "Non-positive limit, nothing admitted");
            return Ok(QuotaDecision::Exceeded);
        }

        match self
            .counters
            .try_increment(subject_id, feature_id, limit)
            .await?
        {
            Some(count) => Ok(QuotaDecision::Allowed {
                current_usage: count,
            }),
            None => {
                debug!(subject_id, feature_id, limit, "Quota ceiling reached");
                Ok(QuotaDecision::Exceeded)
            }
        }
    }

    /// Current count for display. Zero when no counter exists yet.
    pub async fn current_usage(&self, subject_id: &str, feature_id: &str) -> AppResult<i64> {
        Ok(self
            .counters
            .current_usage(subject_id, feature_id)
            .await?
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_helpers() {
        assert!(QuotaDecision::Allowed { current_usage: 1 }.is_allowed());
        assert!(!QuotaDecision::Exceeded.is_allowed());
    }

    #[test]
    fn test_decision_serializes() {
        let decision = QuotaDecision::Allowed { current_usage: 3 };
        let json = serde_json::to_string(&decision).unwrap();
        let back: QuotaDecision = serde_json::from_str(&json).unwrap();
        assert_eq!(back, decision);
    }
}
