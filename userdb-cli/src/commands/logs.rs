//! `logs` - inspect and prune the event log

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::Table;
use dialoguer::Confirm;
use userdb_core::{LogEntry, LoggingService};

use crate::output;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show the newest entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
        /// Only failed commands
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete entries older than a number of days
    Clear {
        /// Age threshold in days
        #[arg(long, default_value_t = 30)]
        older_than_days: u64,
        /// Do not ask for confirmation
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Entry counts and where the log lives
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Runs against the already-open logger when there is one, so logs.duckdb
/// is never opened twice by the same process.
pub fn run(data_dir: &Path, logger: Option<&LoggingService>, command: LogsCommands) -> Result<()> {
    let opened;
    let service = match logger {
        Some(service) => service,
        None => {
            std::fs::create_dir_all(data_dir)?;
            opened = LoggingService::new(data_dir, env!("CARGO_PKG_VERSION"))
                .context("Failed to open event log")?;
            &opened
        }
    };

    match command {
        LogsCommands::List { limit, errors, json } => list(service, limit, errors, json),
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => clear(service, older_than_days, force, json),
        LogsCommands::Stats { json } => stats(service, json),
    }
}

fn list(service: &LoggingService, limit: usize, errors: bool, json: bool) -> Result<()> {
    let entries = service.recent(limit, errors)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else if entries.is_empty() {
        output::warning("No log entries found.");
    } else {
        println!("{}", entries_table(&entries));
    }
    Ok(())
}

fn clear(service: &LoggingService, days: u64, force: bool, json: bool) -> Result<()> {
    let confirmed = force
        || json
        || Confirm::new()
            .with_prompt(format!("Delete log entries older than {} days?", days))
            .default(false)
            .interact()?;
    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    let deleted = service.clear_older_than(days)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        output::success(&format!("Deleted {} log entries", deleted));
    }
    Ok(())
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let stats = service.stats()?;
    let path = service.db_path();
    let size_bytes = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {:?}", path))?
        .len();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "total_entries": stats.total,
                "error_count": stats.errors,
                "database_path": path.display().to_string(),
                "database_size_bytes": size_bytes,
            })
        );
    } else {
        println!("{}", "Event log".bold());
        println!("  Entries: {} ({} failed)", stats.total, stats.errors);
        println!("  File:    {} ({} bytes)", path.display(), size_bytes);
    }
    Ok(())
}

fn entries_table(entries: &[LogEntry]) -> Table {
    let mut table = output::create_table();
    table.set_header(vec!["Time", "Event", "Command", "Error"]);
    for entry in entries {
        table.add_row(vec![
            format_timestamp(entry.timestamp),
            entry.event.clone(),
            entry.command.clone().unwrap_or_default(),
            entry.error_message.clone().unwrap_or_default(),
        ]);
    }
    table
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}
