//! Shared test fixtures for the site access workspace.
//!
//! Provides:
//! - A single PostgreSQL testcontainer per test process (port 5432)
//! - [`SiteScenario`], a seeded in-memory organization tree with one shelter
//!   and one facility site
//!
//! The container is lazily initialized once per test process and
//! automatically cleaned up when the process exits.

mod fixtures;
mod scenario;

pub use fixtures::*;
pub use scenario::SiteScenario;
