//! userdb CLI - CRUD over the user table from your terminal

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use userdb_core::domain::{DEFAULT_LIMIT, DEFAULT_OFFSET};
use userdb_core::LoggingService;

mod commands;
mod output;

use commands::{change_email, create_user, delete_user, get_user, initialize, list, logs};

/// userdb - manage the user table from the command line
#[derive(Parser)]
#[command(name = "userdb", version, about, long_about = None)]
struct Cli {
    /// Data directory holding settings.json and the databases
    #[arg(long, global = true, env = "USERDB_DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop all tables, recreate them and add the default 'bob' user
    Initialize,

    /// Show a single user by exact username
    GetUser {
        /// The exact username of the user to retrieve
        username: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every user
    GetAllUsers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update the email address of an existing user
    ChangeEmail {
        /// The username of the account to update
        username: String,
        /// The new email address to assign to the user
        new_email: String,
    },

    /// Create a new user (username and email must be unique)
    CreateUser {
        /// The desired username
        username: String,
        /// The user's email address
        email: String,
        /// The password, stored as given
        password: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a user entirely
    DeleteUser {
        /// The username of the account to delete
        username: String,
    },

    /// Find users by partial username or email
    SearchUser {
        /// Substring to look for in usernames and emails
        query: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List one page of users
    ListUsers {
        /// The maximum number of users to return
        #[arg(default_value_t = DEFAULT_LIMIT)]
        limit: u64,
        /// The number of users to skip
        #[arg(default_value_t = DEFAULT_OFFSET)]
        offset: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Command name as recorded in the event log
    fn name(&self) -> &'static str {
        match self {
            Commands::Initialize => "initialize",
            Commands::GetUser { .. } => "get-user",
            Commands::GetAllUsers { .. } => "get-all-users",
            Commands::ChangeEmail { .. } => "change-email",
            Commands::CreateUser { .. } => "create-user",
            Commands::DeleteUser { .. } => "delete-user",
            Commands::SearchUser { .. } => "search-user",
            Commands::ListUsers { .. } => "list-users",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let data_dir = match commands::get_data_dir(cli.dir) {
        Ok(dir) => dir,
        Err(e) => {
            output::error(&format!("{:#}", e));
            return ExitCode::FAILURE;
        }
    };

    let command_name = cli.command.name();
    let logger = commands::get_logger(&data_dir);
    commands::log_command(logger.as_ref(), command_name);

    match run(&data_dir, logger.as_ref(), cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            commands::log_failure(logger.as_ref(), command_name, &e);
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(data_dir: &Path, logger: Option<&LoggingService>, command: Commands) -> Result<()> {
    match command {
        Commands::Initialize => initialize::run(data_dir),
        Commands::GetUser { username, json } => get_user::run(data_dir, &username, json),
        Commands::GetAllUsers { json } => list::run_all(data_dir, json),
        Commands::ChangeEmail { username, new_email } => {
            change_email::run(data_dir, &username, &new_email)
        }
        Commands::CreateUser { username, email, password, json } => {
            create_user::run(data_dir, &username, &email, &password, json)
        }
        Commands::DeleteUser { username } => delete_user::run(data_dir, &username),
        Commands::SearchUser { query, json } => list::run_search(data_dir, &query, json),
        Commands::ListUsers { limit, offset, json } => list::run_page(data_dir, limit, offset, json),
        Commands::Logs { command } => logs::run(data_dir, logger, command),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("userdb").chain(args.iter().copied()))
    }

    #[test]
    fn test_command_names_are_kebab_case() {
        let cli = parse(&["get-all-users"]).unwrap();
        assert_eq!(cli.command.name(), "get-all-users");

        let cli = parse(&["change-email", "alice", "new@x.com"]).unwrap();
        assert_eq!(cli.command.name(), "change-email");
    }

    #[test]
    fn test_list_users_defaults() {
        let cli = parse(&["list-users"]).unwrap();
        match cli.command {
            Commands::ListUsers { limit, offset, json } => {
                assert_eq!(limit, 10);
                assert_eq!(offset, 0);
                assert!(!json);
            }
            _ => panic!("expected list-users"),
        }
    }

    #[test]
    fn test_list_users_explicit_window() {
        let cli = parse(&["list-users", "5", "20"]).unwrap();
        assert!(matches!(cli.command, Commands::ListUsers { limit: 5, offset: 20, .. }));
    }

    #[test]
    fn test_negative_pagination_rejected() {
        assert!(parse(&["list-users", "-1"]).is_err());
        assert!(parse(&["list-users", "10", "-3"]).is_err());
        assert!(parse(&["list-users", "ten"]).is_err());
    }

    #[test]
    fn test_create_user_requires_password() {
        assert!(parse(&["create-user", "alice", "a@x.com"]).is_err());
        let cli = parse(&["create-user", "alice", "a@x.com", "pw", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::CreateUser { json: true, .. }));
    }

    #[test]
    fn test_global_dir_option() {
        let cli = parse(&["get-user", "bob", "--dir", "/tmp/userdb-test"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/userdb-test")));
    }

    #[test]
    fn test_logs_subcommand() {
        let cli = parse(&["logs", "clear", "--older-than-days", "7", "--force"]).unwrap();
        assert_eq!(cli.command.name(), "logs");
    }

    #[test]
    fn test_logs_clear_accepts_huge_retention() {
        let cli = parse(&["logs", "clear", "--older-than-days", "9999999999999999", "--force"]);
        assert!(cli.is_ok());
    }
}
