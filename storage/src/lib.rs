//! # Storage Layer
//!
//! Backends implementing the site access data sources:
//! - [`memory::InMemoryStore`]: process-local tables, used by tests and
//!   embedded deployments
//! - [`postgres::PostgresBackend`]: PostgreSQL via `sqlx`

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{PostgresBackend, PostgresError};
