//! # Configuration Validation
//!
//! Provides validation for all configuration structures using the `validator` crate.

use crate::config::Config;
use validator::Validate;

/// Validate configuration structure.
///
/// ## Validation Rules
/// ### Access
/// - `no_instructions_placeholder`: 1-200 characters
/// - `max_ancestor_depth`: 1-256
///
/// ### Database
/// - `host`: 1-255 characters
/// - `port`: 1-65535
/// - `database`, `username`: 1-63 characters
/// - `pool_size`: 1-100
/// - `timeout_seconds`: 1-300
///
/// ### Observability
/// - `logging_level`: must be "trace", "debug", "info", "warn", or "error"
pub fn validate(config: &Config) -> Result<(), validator::ValidationErrors> {
    config.validate()
}
