//! # lockstep-core
//!
//! Core crate for Lockstep. Contains the cache provider trait, configuration
//! schemas, telemetry setup, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Lockstep crates.

pub mod config;
pub mod error;
pub mod result;
pub mod telemetry;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
