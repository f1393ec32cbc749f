//! Migration service - applies embedded SQL migrations
//!
//! The user database and logs.duckdb share one ledger layout: a
//! sys_migrations row per file already applied.

use duckdb::Connection;

use crate::domain::result::{Error, Result};
use crate::migrations::{Migration, LEDGER};

/// Result of running migrations
#[derive(Debug)]
pub struct MigrationResult {
    /// Names of newly applied migrations
    pub applied: Vec<String>,
    /// Count of migrations that were already applied
    pub already_applied: usize,
}

/// Applies one migration list to one connection
///
/// Works on a plain connection or, through deref, on an open transaction.
pub struct MigrationService<'a> {
    conn: &'a Connection,
    migrations: &'a [Migration],
}

impl<'a> MigrationService<'a> {
    pub fn new(conn: &'a Connection, migrations: &'a [Migration]) -> Self {
        Self { conn, migrations }
    }

    /// Create the ledger if needed, then apply every unrecorded migration in
    /// list order
    pub fn run_pending(&self) -> Result<MigrationResult> {
        self.conn.execute_batch(LEDGER)?;
        let recorded = self.recorded()?;

        let mut applied = Vec::new();
        for &(name, sql) in self.migrations {
            if recorded.iter().any(|r| r.as_str() == name) {
                continue;
            }
            self.conn.execute_batch(sql)?;
            self.conn.execute(
                "INSERT INTO sys_migrations (migration_name) VALUES (?)",
                [name],
            )?;
            applied.push(name.to_string());
        }

        Ok(MigrationResult {
            applied,
            already_applied: recorded.len(),
        })
    }

    fn recorded(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT migration_name FROM sys_migrations")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .map(|name| name.map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;
        Ok(names)
    }
}
