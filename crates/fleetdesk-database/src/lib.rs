//! # fleetdesk-database
//!
//! PostgreSQL connection management and the concrete `AccountDirectory`
//! implementation backing the security core.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::account::PgAccountDirectory;
