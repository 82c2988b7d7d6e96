//! # Configuration File Loading
//!
//! Loads configuration from TOML or YAML files.
//!
//! Supports automatic format detection based on file extension.

use crate::config::Config;
use std::path::Path;

/// Configuration file loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(String),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(String),

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String)
}

/// Load configuration from a TOML file.
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_toml;
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = load_from_toml(Path::new("site-access.toml"))?;
///     println!("PostgreSQL host: {}", config.database.host);
///     Ok(())
/// }
/// ```
pub fn load_from_toml(path: &Path) -> Result<Config, ConfigFileError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))?;

    toml::from_str(&contents).map_err(|e| ConfigFileError::TomlParse(e.to_string()))
}

/// Load configuration from a YAML file.
pub fn load_from_yaml(path: &Path) -> Result<Config, ConfigFileError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))?;

    serde_yaml::from_str(&contents).map_err(|e| ConfigFileError::YamlParse(e.to_string()))
}

/// Load configuration from file, detecting the format from its extension.
///
/// ## Supported Formats
/// - `.toml`: TOML format
/// - `.yaml` / `.yml`: YAML format
pub fn load_from_file(path: &Path) -> Result<Config, ConfigFileError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or(ConfigFileError::NoExtension)?;

    match extension.to_lowercase().as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        other => Err(ConfigFileError::UnsupportedFormat(other.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site-access.toml");
        fs::write(
            &path,
            r#"
[access]
no_instructions_placeholder = "Keine Hinweise"
max_ancestor_depth = 8
enforce_direction = false

[database]
host = "testhost"
port = 5433

[observability]
logging_level = "debug"
"#
        )
        .unwrap();

        let config = load_from_toml(&path).unwrap();
        assert_eq!(config.access.no_instructions_placeholder, "Keine Hinweise");
        assert_eq!(config.access.max_ancestor_depth, 8);
        assert!(!config.access.enforce_direction);
        assert_eq!(config.database.host, "testhost");
        assert_eq!(config.database.port, 5433);
        assert_eq!(config.database.database, "site_access");
        assert_eq!(config.observability.logging_level, "debug");
    }

    #[test]
    fn test_load_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site-access.yml");
        fs::write(
            &path,
            "access:\n  max_ancestor_depth: 3\ndatabase:\n  username: reception\n"
        )
        .unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.access.max_ancestor_depth, 3);
        assert_eq!(config.database.username, "reception");
        assert!(config.observability.metrics_enabled);
    }

    #[test]
    fn test_load_from_file_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site-access.ini");
        fs::write(&path, "").unwrap();

        assert!(matches!(
            load_from_file(&path),
            Err(ConfigFileError::UnsupportedFormat(ext)) if ext == "ini"
        ));
    }

    #[test]
    fn test_load_from_file_no_extension() {
        assert!(matches!(
            load_from_file(Path::new("site-access")),
            Err(ConfigFileError::NoExtension)
        ));
    }

    #[test]
    fn test_load_from_toml_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[access\nmax_ancestor_depth = ").unwrap();

        assert!(matches!(
            load_from_toml(&path),
            Err(ConfigFileError::TomlParse(_))
        ));
    }

    #[test]
    fn test_load_from_toml_not_found() {
        assert!(matches!(
            load_from_toml(Path::new("/nonexistent/site-access.toml")),
            Err(ConfigFileError::FileNotFound(_))
        ));
    }
}
