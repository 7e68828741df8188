//! Cache key builders for all Lockstep cache entries.
//!
//! Centralising key construction prevents typos and collisions between
//! unrelated subsystems sharing one cache namespace. The Redis client
//! applies the configured deployment prefix on top of these keys.

// ── Lock keys ──────────────────────────────────────────────

/// Cache key for a distributed lock on a named resource.
pub fn lock(resource: &str) -> String {
    format!("lock:{resource}")
}

// ── Idempotency keys ───────────────────────────────────────

/// Cache key for a recorded idempotent result.
pub fn idempotency(token: &str) -> String {
    format!("idem:{token}")
}
