//! Coordination primitive configuration.

use serde::{Deserialize, Serialize};

/// Top-level coordination configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoordinationConfig {
    /// Distributed lock settings.
    #[serde(default)]
    pub lock: LockConfig,
    /// Idempotency record settings.
    #[serde(default)]
    pub idempotency: IdempotencyConfig,
}

/// Distributed lock settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    /// Lock TTL applied when the caller does not supply one, in seconds.
    #[serde(default = "default_lock_ttl")]
    pub default_ttl_seconds: u64,
    /// What to do when the cache backend cannot be reached.
    #[serde(default)]
    pub on_unavailable: UnavailablePolicy,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: default_lock_ttl(),
            on_unavailable: UnavailablePolicy::default(),
        }
    }
}

/// Policy applied by the lock manager when the cache backend is unreachable.
///
/// `Allow` lets the guarded operation proceed without mutual exclusion so a
/// cache outage does not take down all traffic; `Reject` surfaces the backend
/// error to the caller instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnavailablePolicy {
    /// Proceed without the lock (availability over consistency).
    #[default]
    Allow,
    /// Propagate the backend error.
    Reject,
}

/// Idempotency record settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyConfig {
    /// How long a recorded result stays authoritative, in seconds.
    #[serde(default = "default_idempotency_ttl")]
    pub ttl_seconds: u64,
}

impl Default for IdempotencyConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_idempotency_ttl(),
        }
    }
}

fn default_lock_ttl() -> u64 {
    30
}

fn default_idempotency_ttl() -> u64 {
    3600
}
