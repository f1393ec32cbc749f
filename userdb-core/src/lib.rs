//! userdb core - user store access layer
//!
//! Laid out as a small hexagonal core:
//!
//! - **domain**: the `User` record, insert payload, pagination, errors
//! - **ports**: the `UserRepository` trait
//! - **services**: user operations, schema migrations, event logging
//! - **adapters**: the DuckDB implementation of the repository

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use ports::UserRepository;
use services::UserService;

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{NewUser, Page, User};
pub use ports::{InsertOutcome, UpdateOutcome};
pub use services::{LogEntry, LogStats, LoggingService};

/// Handle for one invocation's worth of user store operations
///
/// Built explicitly from a data directory and passed to whatever needs it;
/// there is no process-wide engine.
pub struct UserDbContext {
    pub user_service: UserService,
}

impl UserDbContext {
    /// Open the configured database (creating it if needed) and bring its
    /// schema up to date
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let repository = Arc::new(DuckDbRepository::new(&config.database_path)?);
        repository.ensure_schema()?;

        Ok(Self {
            user_service: UserService::new(repository),
        })
    }
}
