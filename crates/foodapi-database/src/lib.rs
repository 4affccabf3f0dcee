//! # foodapi-database
//!
//! PostgreSQL connection management and the user repository backing the
//! login flow. An in-memory repository is provided for tests and local runs.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{InMemoryUserRepository, PgUserRepository};
