//! # lockstep-database
//!
//! PostgreSQL connection management, the transaction executor, and the
//! repositories whose writes rely on the database's own atomicity.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod transaction;

pub use connection::DatabasePool;
pub use transaction::{PgTransaction, TransactionExecutor};
