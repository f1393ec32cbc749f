//! Event log - one row per CLI command in logs.duckdb
//!
//! Rows carry the command name and, for failures, the error text. User
//! fields (username, email, password) are never written here.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use duckdb::{params, Connection};
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::log_migrations::LOG_MIGRATIONS;
use crate::services::MigrationService;

const EVENT_EXECUTED: &str = "command_executed";
const EVENT_FAILED: &str = "command_failed";

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Timestamp `days` before `now_ms`, clamped to i64::MIN when out of range
fn cutoff_ms(now_ms: i64, days: u64) -> i64 {
    i64::try_from(days)
        .ok()
        .and_then(|d| d.checked_mul(DAY_MS))
        .and_then(|span| now_ms.checked_sub(span))
        .unwrap_or(i64::MIN)
}

/// A stored log row
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: i64,
    /// Unix milliseconds
    pub timestamp: i64,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    pub command: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

impl LogEntry {
    fn from_row(row: &duckdb::Row) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            app_version: row.get(2)?,
            platform: row.get(3)?,
            event: row.get(4)?,
            command: row.get(5)?,
            error_message: row.get(6)?,
            error_details: row.get(7)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LogStats {
    pub total: u64,
    pub errors: u64,
}

pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    app_version: String,
}

impl LoggingService {
    /// Open (or create) logs.duckdb in `data_dir` and bring its schema up to date
    pub fn new(data_dir: &Path, app_version: impl Into<String>) -> Result<Self> {
        let db_path = data_dir.join("logs.duckdb");
        let mut conn = Connection::open(&db_path)?;

        let tx = conn.transaction()?;
        MigrationService::new(&tx, LOG_MIGRATIONS).run_pending()?;
        tx.commit()?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            app_version: app_version.into(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    fn insert(&self, event: &str, command: &str, error: Option<(&str, &str)>) -> Result<()> {
        let (message, details) = error.unzip();
        self.lock()?.execute(
            "INSERT INTO sys_logs
                (timestamp, app_version, platform, event, command, error_message, error_details)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                now_ms(),
                self.app_version,
                std::env::consts::OS,
                event,
                command,
                message,
                details
            ],
        )?;
        Ok(())
    }

    pub fn record_command(&self, command: &str) -> Result<()> {
        self.insert(EVENT_EXECUTED, command, None)
    }

    /// `details` is the full cause chain; `message` the top-level error
    pub fn record_failure(&self, command: &str, message: &str, details: &str) -> Result<()> {
        self.insert(EVENT_FAILED, command, Some((message, details)))
    }

    /// Newest entries first, optionally only failures
    pub fn recent(&self, limit: usize, errors_only: bool) -> Result<Vec<LogEntry>> {
        let filter = if errors_only {
            "WHERE error_message IS NOT NULL"
        } else {
            ""
        };
        let sql = format!(
            "SELECT id, timestamp, app_version, platform, event, command, error_message, error_details
             FROM sys_logs {} ORDER BY timestamp DESC, id DESC LIMIT ?",
            filter
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![limit], LogEntry::from_row)?
            .map(|entry| entry.map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn stats(&self) -> Result<LogStats> {
        let (total, errors): (i64, i64) = self.lock()?.query_row(
            "SELECT COUNT(*), COUNT(error_message) FROM sys_logs",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(LogStats {
            total: u64::try_from(total).unwrap_or_default(),
            errors: u64::try_from(errors).unwrap_or_default(),
        })
    }

    /// Delete entries recorded more than `days` days ago
    pub fn clear_older_than(&self, days: u64) -> Result<u64> {
        self.delete_before(cutoff_ms(now_ms(), days))
    }

    fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let deleted = self
            .lock()?
            .execute("DELETE FROM sys_logs WHERE timestamp < ?", params![timestamp_ms])?;
        Ok(deleted as u64)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_logs_db_created_in_data_dir() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        assert_eq!(service.db_path(), dir.path().join("logs.duckdb"));
        assert!(service.db_path().exists());
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let service = LoggingService::new(dir.path(), "1.0.0").unwrap();
            service.record_command("initialize").unwrap();
        }
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();
        assert_eq!(service.stats().unwrap().total, 1);
    }

    #[test]
    fn test_record_command() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "2.0.0").unwrap();

        service.record_command("get-user").unwrap();

        let entries = service.recent(10, false).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "command_executed");
        assert_eq!(entries[0].command.as_deref(), Some("get-user"));
        assert_eq!(entries[0].app_version, "2.0.0");
        assert_eq!(entries[0].platform, std::env::consts::OS);
        assert!(entries[0].error_message.is_none());
    }

    #[test]
    fn test_record_failure_counts_as_error() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        service.record_command("create-user").unwrap();
        service
            .record_failure("create-user", "Database error: disk full", "Failed to open user database: Database error: disk full")
            .unwrap();

        let errors = service.recent(10, true).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "command_failed");
        assert_eq!(errors[0].error_message.as_deref(), Some("Database error: disk full"));
        assert_eq!(service.stats().unwrap(), LogStats { total: 2, errors: 1 });
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        for command in ["initialize", "get-user", "delete-user"] {
            service.record_command(command).unwrap();
        }

        let entries = service.recent(2, false).unwrap();
        let commands: Vec<_> = entries.iter().filter_map(|e| e.command.as_deref()).collect();
        assert_eq!(commands, vec!["delete-user", "get-user"]);
    }

    #[test]
    fn test_delete_before() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();

        service.record_command("a").unwrap();
        service.record_command("b").unwrap();

        assert_eq!(service.delete_before(now_ms() + 1000).unwrap(), 2);
        assert_eq!(service.stats().unwrap().total, 0);
    }

    #[test]
    fn test_clear_with_huge_retention_keeps_everything() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), "1.0.0").unwrap();
        service.record_command("list-users").unwrap();

        assert_eq!(service.clear_older_than(9_999_999_999_999_999).unwrap(), 0);
        assert_eq!(service.clear_older_than(u64::MAX).unwrap(), 0);
        assert_eq!(service.stats().unwrap().total, 1);
    }

    #[test]
    fn test_cutoff_ms() {
        assert_eq!(cutoff_ms(10 * DAY_MS, 3), 7 * DAY_MS);
        assert_eq!(cutoff_ms(10 * DAY_MS, 0), 10 * DAY_MS);
        // days * DAY_MS overflows i64
        assert_eq!(cutoff_ms(10 * DAY_MS, 9_999_999_999_999_999), i64::MIN);
        // days itself does not fit in i64
        assert_eq!(cutoff_ms(10 * DAY_MS, u64::MAX), i64::MIN);
        // product fits, subtraction does not
        assert_eq!(cutoff_ms(-2 * DAY_MS, (i64::MAX / DAY_MS) as u64), i64::MIN);
    }
}
