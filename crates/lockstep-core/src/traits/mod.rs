//! Trait seams implemented by other Lockstep crates.

pub mod cache;
