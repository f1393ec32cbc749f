//! CLI command implementations

pub mod change_email;
pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod initialize;
pub mod list;
pub mod logs;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use userdb_core::config::Config;
use userdb_core::{LoggingService, UserDbContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging is disabled or fails to initialize (shouldn't
/// block operations)
pub fn get_logger(data_dir: &Path) -> Option<LoggingService> {
    let config = Config::load(data_dir).ok()?;
    if !config.logging_enabled {
        return None;
    }
    std::fs::create_dir_all(data_dir).ok()?;
    LoggingService::new(data_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Record that a command ran; a failed write never fails the command
pub fn log_command(logger: Option<&LoggingService>, command: &str) {
    if let Some(l) = logger {
        let _ = l.record_command(command);
    }
}

/// Record a failed command with its full cause chain
pub fn log_failure(logger: Option<&LoggingService>, command: &str, err: &anyhow::Error) {
    if let Some(l) = logger {
        let _ = l.record_failure(command, &err.to_string(), &format!("{:#}", err));
    }
}

/// Resolve the data directory: --dir / USERDB_DIR, else ~/.userdb
pub fn get_data_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => dirs::home_dir()
            .map(|home| home.join(".userdb"))
            .context("Could not find home directory; pass --dir or set USERDB_DIR"),
    }
}

/// Open the user store for this invocation
pub fn get_context(data_dir: &Path) -> Result<UserDbContext> {
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    UserDbContext::new(data_dir).context("Failed to open user database")
}
