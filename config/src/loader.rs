//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles.
//!
//! # Naming Convention
//! - `SA_*`: Access engine settings
//! - `PG_*`: PostgreSQL settings
//! - `OB_*`: Observability settings

use crate::config::{
    AccessConfig, Config, DatabaseConfig, ObservabilityConfig, default_db_host, default_db_name,
    default_db_port, default_db_username, default_enforce_direction, default_logging_level,
    default_max_ancestor_depth, default_metrics_enabled, default_no_instructions_placeholder,
    default_pool_size, default_timeout_seconds,
};
use std::env;

/// Load configuration from environment variables.
///
/// Unset or unparsable variables fall back to their defaults.
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_env;
///
/// let config = load_from_env();
/// println!("PostgreSQL host: {}", config.database.host);
/// ```
///
/// ## Environment Variables
/// ### Access Settings (`SA_*`)
/// - `SA_NO_INSTRUCTIONS_PLACEHOLDER`: Advisory body for flags without
///   instructions
/// - `SA_MAX_ANCESTOR_DEPTH`: Organization ancestor walk bound (default: 32)
/// - `SA_ENFORCE_DIRECTION`: Reject denied check-in/check-out (default: true)
///
/// ### PostgreSQL Settings (`PG_*`)
/// - `PG_HOST`, `PG_PORT`, `PG_DATABASE`, `PG_USERNAME`, `PG_PASSWORD`,
///   `PG_POOL_SIZE`, `PG_TIMEOUT_SECONDS`
///
/// ### Observability Settings (`OB_*`)
/// - `OB_LOGGING_LEVEL`: trace/debug/info/warn/error (default: "info")
/// - `OB_METRICS_ENABLED`: true/false (default: true)
pub fn load_from_env() -> Config {
    Config {
        access: load_access_from_env(),
        database: load_database_from_env(),
        observability: load_observability_from_env()
    }
}

fn load_access_from_env() -> AccessConfig {
    AccessConfig {
        no_instructions_placeholder: env::var("SA_NO_INSTRUCTIONS_PLACEHOLDER")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(default_no_instructions_placeholder),
        max_ancestor_depth: parse_env("SA_MAX_ANCESTOR_DEPTH")
            .unwrap_or_else(default_max_ancestor_depth),
        enforce_direction: parse_bool_env("SA_ENFORCE_DIRECTION")
            .unwrap_or_else(default_enforce_direction)
    }
}

fn load_database_from_env() -> DatabaseConfig {
    DatabaseConfig {
        host: env::var("PG_HOST").unwrap_or_else(|_| default_db_host()),
        port: parse_env("PG_PORT").unwrap_or_else(default_db_port),
        database: env::var("PG_DATABASE").unwrap_or_else(|_| default_db_name()),
        username: env::var("PG_USERNAME").unwrap_or_else(|_| default_db_username()),
        password: env::var("PG_PASSWORD").unwrap_or_default(),
        pool_size: parse_env("PG_POOL_SIZE").unwrap_or_else(default_pool_size),
        timeout_seconds: parse_env("PG_TIMEOUT_SECONDS").unwrap_or_else(default_timeout_seconds)
    }
}

fn load_observability_from_env() -> ObservabilityConfig {
    ObservabilityConfig {
        logging_level: env::var("OB_LOGGING_LEVEL").unwrap_or_else(|_| default_logging_level()),
        metrics_enabled: parse_bool_env("OB_METRICS_ENABLED")
            .unwrap_or_else(default_metrics_enabled)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}

fn parse_bool_env(key: &str) -> Option<bool> {
    let raw = env::var(key).ok()?;
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => {
            tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}
