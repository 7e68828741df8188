//! # lockstep-coordination
//!
//! Cross-process coordination primitives for stateless server instances
//! sharing one Redis cache and one PostgreSQL database:
//!
//! - [`LockManager`]: named TTL-bounded mutual-exclusion locks
//! - [`IdempotencyStore`]: replay protection for retried client calls
//! - [`QuotaGuard`]: atomic ceiling-checked usage counters
//!
//! Multi-row all-or-nothing writes live in
//! [`lockstep_database::TransactionExecutor`]; callers compose it with the
//! lock manager when a unit of work also needs mutual exclusion.
//!
//! Process-local synchronization (mutexes, in-memory maps) cannot protect
//! these resources: true parallelism exists across instances, so every
//! correctness-critical path goes through the cache's conditional primitives
//! or the database's own atomicity.

pub mod idempotency;
pub mod lock;
pub mod quota;

pub use idempotency::IdempotencyStore;
pub use lock::{AcquireOutcome, LockManager, LockToken};
pub use quota::{QuotaDecision, QuotaGuard};
