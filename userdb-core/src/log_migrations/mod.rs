//! Schema of logs.duckdb, applied through the same ledger as the user database

use crate::migrations::Migration;

pub const LOG_MIGRATIONS: &[Migration] = &[("001_sys_logs.sql", include_str!("001_sys_logs.sql"))];
