//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "database": { "path": "users.duckdb" },
//!   "logging": { "enabled": true }
//! }
//! ```
//! Unknown keys are ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;

/// Default database file name inside the data directory
pub const DEFAULT_DB_FILENAME: &str = "users.duckdb";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    database: DatabaseSettings,
    #[serde(default)]
    logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseSettings {
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoggingSettings {
    #[serde(default = "default_true")]
    enabled: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// Parse a boolean environment override
fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "TRUE" | "YES" => Some(true),
        "false" | "0" | "no" | "FALSE" | "NO" => Some(false),
        _ => None,
    }
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub logging_enabled: bool,
}

impl Config {
    /// Load config from the data directory
    ///
    /// Environment overrides:
    /// - USERDB_DATABASE: database file path
    /// - USERDB_LOGGING: enable/disable event logging
    pub fn load(data_dir: &Path) -> Result<Self> {
        let env_db = std::env::var("USERDB_DATABASE").ok();
        let env_logging = std::env::var("USERDB_LOGGING").ok();
        Self::load_with_overrides(data_dir, env_db.as_deref(), env_logging.as_deref())
    }

    fn load_with_overrides(
        data_dir: &Path,
        db_override: Option<&str>,
        logging_override: Option<&str>,
    ) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let db_path = db_override
            .map(PathBuf::from)
            .or(raw.database.path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILENAME));
        let database_path = if db_path.is_absolute() {
            db_path
        } else {
            data_dir.join(db_path)
        };

        let logging_enabled = logging_override
            .and_then(parse_flag)
            .unwrap_or(raw.logging.enabled);

        Ok(Self {
            database_path,
            logging_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load_with_overrides(dir.path(), None, None).unwrap();

        assert_eq!(config.database_path, dir.path().join("users.duckdb"));
        assert!(config.logging_enabled);
    }

    #[test]
    fn test_settings_file_values() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"database": {"path": "custom.duckdb"}, "logging": {"enabled": false}, "theme": "dark"}"#,
        )
        .unwrap();

        let config = Config::load_with_overrides(dir.path(), None, None).unwrap();
        assert_eq!(config.database_path, dir.path().join("custom.duckdb"));
        assert!(!config.logging_enabled);
    }

    #[test]
    fn test_overrides_win_over_settings_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"database": {"path": "custom.duckdb"}, "logging": {"enabled": false}}"#,
        )
        .unwrap();
        let absolute = dir.path().join("elsewhere").join("db.duckdb");

        let config = Config::load_with_overrides(
            dir.path(),
            Some(absolute.to_str().unwrap()),
            Some("yes"),
        )
        .unwrap();
        assert_eq!(config.database_path, absolute);
        assert!(config.logging_enabled);
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();

        let config = Config::load_with_overrides(dir.path(), None, None).unwrap();
        assert_eq!(config.database_path, dir.path().join("users.duckdb"));
        assert!(config.logging_enabled);
    }

    #[test]
    fn test_unrecognised_flag_is_ignored() {
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag("0"), Some(false));
    }
}
