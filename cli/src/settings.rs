use crate::commands::GlobalArgs;
use anyhow::{Context, Result};
use config::{Config, load_from_env, load_from_file, merge_configs, validate};
use std::sync::Arc;
use storage::PostgresBackend;

/// Defaults < file < environment < command line flags.
pub fn load(args: &GlobalArgs) -> Result<Config> {
    let file_config = match &args.config {
        Some(path) => load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default()
    };

    let config = merge_configs(
        Config::default(),
        file_config,
        load_from_env(),
        cli_overrides(args)
    );
    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

fn cli_overrides(args: &GlobalArgs) -> Option<Config> {
    if args.pg_host.is_none() && args.pg_port.is_none() && args.log_level.is_none() {
        return None;
    }

    let mut config = Config::default();
    if let Some(host) = &args.pg_host {
        config.database.host.clone_from(host);
    }
    if let Some(port) = args.pg_port {
        config.database.port = port;
    }
    if let Some(level) = &args.log_level {
        config.observability.logging_level.clone_from(level);
    }
    Some(config)
}

pub async fn connect(config: &Config) -> Result<Arc<PostgresBackend>> {
    let backend = PostgresBackend::from_config(&config.database)
        .await
        .with_context(|| {
            format!(
                "Cannot connect to PostgreSQL at {}:{}",
                config.database.host, config.database.port
            )
        })?;
    Ok(Arc::new(backend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_flags_means_no_overrides() {
        assert!(cli_overrides(&GlobalArgs::default()).is_none());
    }

    #[test]
    #[serial]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site-access.toml");
        fs::write(
            &path,
            "[database]\nhost = \"file-host\"\nport = 5433\n\n[access]\nmax_ancestor_depth = 4\n"
        )
        .unwrap();

        let args = GlobalArgs {
            config: Some(path),
            pg_host: Some("flag-host".to_string()),
            pg_port: None,
            log_level: Some("debug".to_string())
        };
        let config = load(&args).unwrap();

        assert_eq!(config.database.host, "flag-host");
        assert_eq!(config.database.port, 5433);
        assert_eq!(config.access.max_ancestor_depth, 4);
        assert_eq!(config.observability.logging_level, "debug");
    }

    #[test]
    #[serial]
    fn test_invalid_level_is_rejected() {
        let args = GlobalArgs {
            log_level: Some("loud".to_string()),
            ..GlobalArgs::default()
        };
        assert!(load(&args).is_err());
    }
}
