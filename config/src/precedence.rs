//! # Configuration Precedence
//!
//! Merges configuration from multiple sources with precedence rules.
//!
//! # Precedence Order
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)

use crate::config::{AccessConfig, Config, DatabaseConfig, ObservabilityConfig};

/// Merge multiple configuration sources with precedence.
///
/// A field from a higher-priority source only wins when it differs from the
/// default, so a source that never mentioned a field cannot reset it.
///
/// ## Usage
/// ```rust,no_run
/// use config::{Config, load_from_env, load_from_file, merge_configs};
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let from_file = load_from_file(Path::new("site-access.toml"))?;
///     let config = merge_configs(Config::default(), from_file, load_from_env(), None);
///     println!("{}", config.database.host);
///     Ok(())
/// }
/// ```
pub fn merge_configs(
    defaults: Config,
    file_config: Config,
    env_config: Config,
    cli_config: Option<Config>
) -> Config {
    let mut config = defaults;

    config = merge_with_logging(config, &file_config, "file");
    config = merge_with_logging(config, &env_config, "env");

    if let Some(cli) = cli_config {
        config = merge_with_logging(config, &cli, "cli");
    }

    config
}

fn merge_with_logging(mut base: Config, override_config: &Config, source_name: &str) -> Config {
    let mut changes = Vec::new();

    merge_access(&mut base.access, &override_config.access, &mut changes);
    merge_database(&mut base.database, &override_config.database, &mut changes);
    merge_observability(
        &mut base.observability,
        &override_config.observability,
        &mut changes
    );

    if !changes.is_empty() {
        tracing::debug!("Configuration from {}: {:?}", source_name, changes);
    }

    base
}

fn merge_access(base: &mut AccessConfig, over: &AccessConfig, changes: &mut Vec<String>) {
    let defaults = AccessConfig::default();

    if over.no_instructions_placeholder != defaults.no_instructions_placeholder
        && over.no_instructions_placeholder != base.no_instructions_placeholder
    {
        changes.push(format!(
            "access.no_instructions_placeholder = {}",
            over.no_instructions_placeholder
        ));
        base.no_instructions_placeholder
            .clone_from(&over.no_instructions_placeholder);
    }
    if over.max_ancestor_depth != defaults.max_ancestor_depth
        && over.max_ancestor_depth != base.max_ancestor_depth
    {
        changes.push(format!(
            "access.max_ancestor_depth = {}",
            over.max_ancestor_depth
        ));
        base.max_ancestor_depth = over.max_ancestor_depth;
    }
    if over.enforce_direction != defaults.enforce_direction
        && over.enforce_direction != base.enforce_direction
    {
        changes.push(format!(
            "access.enforce_direction = {}",
            over.enforce_direction
        ));
        base.enforce_direction = over.enforce_direction;
    }
}

fn merge_database(base: &mut DatabaseConfig, over: &DatabaseConfig, changes: &mut Vec<String>) {
    let defaults = DatabaseConfig::default();

    if over.host != defaults.host && over.host != base.host {
        changes.push(format!("database.host = {}", over.host));
        base.host.clone_from(&over.host);
    }
    if over.port != defaults.port && over.port != base.port {
        changes.push(format!("database.port = {}", over.port));
        base.port = over.port;
    }
    if over.database != defaults.database && over.database != base.database {
        changes.push(format!("database.database = {}", over.database));
        base.database.clone_from(&over.database);
    }
    if over.username != defaults.username && over.username != base.username {
        changes.push(format!("database.username = {}", over.username));
        base.username.clone_from(&over.username);
    }
    if !over.password.is_empty() && over.password != base.password {
        changes.push("database.password = ***".to_string());
        base.password.clone_from(&over.password);
    }
    if over.pool_size != defaults.pool_size && over.pool_size != base.pool_size {
        changes.push(format!("database.pool_size = {}", over.pool_size));
        base.pool_size = over.pool_size;
    }
    if over.timeout_seconds != defaults.timeout_seconds
        && over.timeout_seconds != base.timeout_seconds
    {
        changes.push(format!(
            "database.timeout_seconds = {}",
            over.timeout_seconds
        ));
        base.timeout_seconds = over.timeout_seconds;
    }
}

fn merge_observability(
    base: &mut ObservabilityConfig,
    over: &ObservabilityConfig,
    changes: &mut Vec<String>
) {
    let defaults = ObservabilityConfig::default();

    if over.logging_level != defaults.logging_level && over.logging_level != base.logging_level {
        changes.push(format!(
            "observability.logging_level = {}",
            over.logging_level
        ));
        base.logging_level.clone_from(&over.logging_level);
    }
    if over.metrics_enabled != defaults.metrics_enabled
        && over.metrics_enabled != base.metrics_enabled
    {
        changes.push(format!(
            "observability.metrics_enabled = {}",
            over.metrics_enabled
        ));
        base.metrics_enabled = over.metrics_enabled;
    }
}
