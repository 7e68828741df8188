//! Repository implementations for coordination entities.

pub mod usage;

pub use usage::UsageCounterRepository;
