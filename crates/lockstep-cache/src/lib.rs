//! # lockstep-cache
//!
//! Cache provider implementations for Lockstep. Supports two modes:
//!
//! - **memory**: In-process cache backed by [dashmap](https://crates.io/crates/dashmap)
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration. The memory
//! provider only coordinates within a single process; multi-instance
//! deployments must use Redis.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
