//! Replay protection for retried client calls.
//!
//! A caller-supplied token identifies one logical operation. The first
//! successfully recorded result stays authoritative for the TTL window;
//! retries fetch it instead of re-running the side effect. Failures record
//! nothing, so a retry after an error executes the operation again.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use lockstep_cache::keys;
use lockstep_cache::provider::CacheManager;
use lockstep_core::config::coordination::IdempotencyConfig;
use lockstep_core::result::AppResult;
use lockstep_core::traits::cache::CacheProvider;

/// Records operation results under caller-supplied idempotency tokens.
#[derive(Debug, Clone)]
pub struct IdempotencyStore {
    cache: Arc<CacheManager>,
    ttl: Duration,
}

impl IdempotencyStore {
    /// Create an idempotency store on the given cache.
    pub fn new(cache: Arc<CacheManager>, config: &IdempotencyConfig) -> Self {
        Self {
            cache,
            ttl: Duration::from_secs(config.ttl_seconds),
        }
    }

    /// Record the result of a completed operation under `token`.
    ///
    /// The write is a create-if-absent, so when two calls race the first one
    /// wins deterministically and the loser's result is discarded; the
    /// return value says whether this call's result was the one recorded.
    ///
    /// Known gap: recording happens after the operation has already run.
    /// Two concurrent requests with the same fresh token can both see no
    /// record and both execute the side effect before either stores. A
    /// claim-before-execute protocol on the caller's side is needed to close
    /// that window.
    pub async fn store<T: Serialize + Send + Sync>(
        &self,
        token: &str,
        result: &T,
    ) -> AppResult<bool> {
        let payload = serde_json::to_string(result)?;
        let recorded = self
            .cache
            .set_nx(&keys::idempotency(token), &payload, self.ttl)
            .await?;

        if recorded {
            debug!(token, "Idempotent result recorded");
        } else {
            debug!(token, "Idempotency record already present, keeping first result");
        }
        Ok(recorded)
    }

    /// Fetch the recorded result for `token`, if present and unexpired.
    pub async fn fetch<T: DeserializeOwned + Send>(&self, token: &str) -> AppResult<Option<T>> {
        self.cache.get_json(&keys::idempotency(token)).await
    }
}
