//! Distributed mutual-exclusion locks over the shared cache.
//!
//! Acquisition is one conditional set; there is no retry loop or wait queue.
//! Callers decide whether to retry, queue, or reject when the lock is busy.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use lockstep_cache::keys;
use lockstep_cache::provider::CacheManager;
use lockstep_core::config::coordination::{LockConfig, UnavailablePolicy};
use lockstep_core::result::AppResult;
use lockstep_core::traits::cache::CacheProvider;

/// Proof of a successful acquisition, required to release the lock.
///
/// The owner value is unique per acquisition attempt, so a token that
/// outlived its TTL can never release a lock re-acquired by someone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken {
    resource: String,
    owner: String,
}

impl LockToken {
    /// The resource this token was issued for.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// The opaque owner value stored in the lock record.
    pub fn owner(&self) -> &str {
        &self.owner
    }
}

/// Result of a lock acquisition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The lock was acquired; present the token on release.
    Acquired(LockToken),
    /// Another holder currently owns the lock.
    Busy,
    /// The cache backend was unreachable and the configured policy lets the
    /// operation proceed without mutual exclusion.
    Bypassed,
}

impl AcquireOutcome {
    /// The token, when the lock was actually acquired.
    pub fn token(&self) -> Option<&LockToken> {
        match self {
            Self::Acquired(token) => Some(token),
            _ => None,
        }
    }

    /// Whether the guarded operation may proceed (acquired or bypassed).
    pub fn may_proceed(&self) -> bool {
        !matches!(self, Self::Busy)
    }
}

/// Manages named TTL-bounded locks shared by all server instances.
///
/// A lock that is never released disappears when its TTL elapses. That
/// bounds the damage of a crashed holder, and it also means a holder that
/// outlives its TTL can lose the lock to another instance; callers size the
/// TTL to comfortably cover the guarded operation.
#[derive(Debug, Clone)]
pub struct LockManager {
    cache: Arc<CacheManager>,
    config: LockConfig,
}

impl LockManager {
    /// Create a lock manager on the given cache.
    pub fn new(cache: Arc<CacheManager>, config: LockConfig) -> Self {
        Self { cache, config }
    }

    /// Attempt to acquire the lock for `resource`, without waiting.
    ///
    /// `ttl` falls back to the configured default when `None`. When the
    /// cache backend is unreachable the configured [`UnavailablePolicy`]
    /// decides between proceeding unguarded (`Bypassed`) and surfacing the
    /// error.
    pub async fn acquire(
        &self,
        resource: &str,
        ttl: Option<Duration>,
    ) -> AppResult<AcquireOutcome> {
        let ttl = ttl.unwrap_or(Duration::from_secs(self.config.default_ttl_seconds));
        let owner = new_owner_token();
        let key = keys::lock(resource);

        match self.cache.set_nx(&key, &owner, ttl).await {
            Ok(true) => {
                debug!(resource, owner = %owner, "Lock acquired");
                Ok(AcquireOutcome::Acquired(LockToken {
                    resource: resource.to_string(),
                    owner,
                }))
            }
            Ok(false) => {
                debug!(resource, "Lock busy");
                Ok(AcquireOutcome::Busy)
            }
            Err(e) => match self.config.on_unavailable {
                UnavailablePolicy::Allow => {
                    warn!(
                        resource,
                        error = %e,
                        "Cache unreachable, proceeding without mutual exclusion"
                    );
                    Ok(AcquireOutcome::Bypassed)
                }
                UnavailablePolicy::Reject => Err(e),
            },
        }
    }

    /// Release a previously acquired lock.
    ///
    /// Returns `true` only when the stored owner still matches the token.
    /// `false` means the lock had already expired, was released, or is now
    /// held by another instance; in every case the other holder's record is
    /// left intact.
    pub async fn release(&self, token: &LockToken) -> AppResult<bool> {
        let key = keys::lock(&token.resource);

        match self.cache.compare_and_delete(&key, &token.owner).await {
            Ok(true) => {
                debug!(resource = %token.resource, "Lock released");
                Ok(true)
            }
            Ok(false) => {
                warn!(
                    resource = %token.resource,
                    owner = %token.owner,
                    "Lock was already released, expired, or re-acquired by another holder"
                );
                Ok(false)
            }
            Err(e) => match self.config.on_unavailable {
                UnavailablePolicy::Allow => {
                    warn!(
                        resource = %token.resource,
                        error = %e,
                        "Cache unreachable on release; record will expire via TTL"
                    );
                    Ok(false)
                }
                UnavailablePolicy::Reject => Err(e),
            },
        }
    }
}

/// Build a fresh owner value: millisecond timestamp plus a random UUID.
///
/// Two concurrent acquisition attempts can never be issued the same owner.
fn new_owner_token() -> String {
    format!("{}:{}", Utc::now().timestamp_millis(), Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_tokens_are_unique() {
        let a = new_owner_token();
        let b = new_owner_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_owner_token_format() {
        let owner = new_owner_token();
        let (millis, uuid) = owner.split_once(':').expect("timestamp:uuid");
        assert!(millis.parse::<i64>().is_ok());
        assert!(Uuid::parse_str(uuid).is_ok());
    }

    #[test]
    fn test_outcome_helpers() {
        let token = LockToken {
            resource: "booking:123".to_string(),
            owner: new_owner_token(),
        };
        let acquired = AcquireOutcome::Acquired(token.clone());
        assert_eq!(acquired.token(), Some(&token));
        assert!(acquired.may_proceed());

        assert!(AcquireOutcome::Bypassed.may_proceed());
        assert!(AcquireOutcome::Bypassed.token().is_none());

        assert!(!AcquireOutcome::Busy.may_proceed());
    }
}
