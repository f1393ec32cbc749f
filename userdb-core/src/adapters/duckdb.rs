//! DuckDB repository implementation

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use duckdb::{params, Connection, ToSql};

use crate::domain::result::{Error, Result};
use crate::domain::{NewUser, Page, User};
use crate::migrations::{DROP_ALL, MIGRATIONS};
use crate::ports::{InsertOutcome, UpdateOutcome, UserRepository};
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

const USER_COLUMNS: &str = "id, username, email, password";

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
        || lower.contains("could not set lock on file")
}

/// Check if an error message is DuckDB rejecting a duplicate username or email
///
/// CHECK constraint failures also report as "Constraint Error", so only the
/// duplicate-key wording counts here.
fn is_unique_violation_message(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    lower.contains("duplicate key") || lower.contains("violates unique constraint")
}

fn is_unique_violation(err: &duckdb::Error) -> bool {
    is_unique_violation_message(&err.to_string())
}

fn row_to_user(row: &duckdb::Row) -> duckdb::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
    })
}

/// Run a SELECT over the users table and collect every row
fn query_users(conn: &Connection, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, row_to_user)?;

    let mut users = Vec::new();
    for user in rows {
        users.push(user?);
    }
    Ok(users)
}

fn select_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS);
    Ok(query_users(conn, &sql, params![username])?.into_iter().next())
}

fn insert_user(conn: &Connection, user: &NewUser) -> std::result::Result<i64, duckdb::Error> {
    conn.query_row(
        "INSERT INTO users (username, email, password) VALUES (?, ?, ?) RETURNING id",
        params![user.username, user.email, user.password],
        |row| row.get(0),
    )
}

/// Call `open` until it succeeds, backing off while the failure is a file lock
///
/// Gives up after MAX_RETRIES attempts; any other error returns immediately.
fn retry_while_locked<T>(mut open: impl FnMut() -> Result<T>) -> Result<T> {
    let mut attempt = 0;
    loop {
        match open() {
            Ok(value) => return Ok(value),
            Err(e) => {
                let err_msg = e.to_string();
                if attempt + 1 >= MAX_RETRIES || !is_retryable_error(&err_msg) {
                    return Err(e);
                }
                let delay = Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                eprintln!(
                    "[userdb] Database busy, retrying in {}ms (attempt {}/{}): {}",
                    delay.as_millis(),
                    attempt + 1,
                    MAX_RETRIES,
                    err_msg
                );
                thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}

/// DuckDB repository implementation
///
/// Holds one connection for the lifetime of the process. Every operation
/// opens a transaction on it; an uncommitted transaction rolls back when it
/// is dropped, so early returns and `?` never leave partial writes behind.
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
}

impl DuckDbRepository {
    /// Open (or create) the database file
    ///
    /// Retries with exponential backoff while another invocation holds the
    /// file lock.
    pub fn new(db_path: &Path) -> Result<Self> {
        let conn = retry_while_locked(|| Self::try_open_connection(db_path))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Extensions are never needed and autoloading reaches for ~/.duckdb
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        Ok(conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("Lock poisoned: {}", e)))
    }

    /// Run database migrations using the MigrationService
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let result = MigrationService::new(&tx, MIGRATIONS).run_pending()?;
        tx.commit()?;
        Ok(result)
    }
}

impl UserRepository for DuckDbRepository {
    fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    fn reset_with_seed(&self, seed: &NewUser) -> Result<User> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        tx.execute_batch(DROP_ALL)?;
        MigrationService::new(&tx, MIGRATIONS).run_pending()?;
        let id = insert_user(&tx, seed)?;

        tx.commit()?;
        Ok(seed.clone().with_id(id))
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let user = select_by_username(&tx, username)?;
        tx.commit()?;
        Ok(user)
    }

    fn find_all(&self) -> Result<Vec<User>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        let users = query_users(&tx, &sql, params![])?;
        tx.commit()?;
        Ok(users)
    }

    fn search(&self, query: &str) -> Result<Vec<User>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        // contains() is a literal substring test; LIKE would treat % and _ as wildcards
        let sql = format!(
            "SELECT {} FROM users
             WHERE contains(username, ?::VARCHAR) OR contains(email, ?::VARCHAR)
             ORDER BY id",
            USER_COLUMNS
        );
        let users = query_users(&tx, &sql, params![query, query])?;
        tx.commit()?;
        Ok(users)
    }

    fn list(&self, page: Page) -> Result<Vec<User>> {
        let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset).unwrap_or(i64::MAX);

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let sql = format!(
            "SELECT {} FROM users ORDER BY id LIMIT ? OFFSET ?",
            USER_COLUMNS
        );
        let users = query_users(&tx, &sql, params![limit, offset])?;
        tx.commit()?;
        Ok(users)
    }

    fn count(&self) -> Result<i64> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let count: i64 = tx.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        tx.commit()?;
        Ok(count)
    }

    fn insert(&self, user: &NewUser) -> Result<InsertOutcome> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        match insert_user(&tx, user) {
            Ok(id) => {
                tx.commit()?;
                Ok(InsertOutcome::Inserted(user.clone().with_id(id)))
            }
            Err(e) if is_unique_violation(&e) => {
                tx.rollback()?;
                Ok(InsertOutcome::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update_email(&self, username: &str, email: &str) -> Result<UpdateOutcome> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let Some(mut user) = select_by_username(&tx, username)? else {
            return Ok(UpdateOutcome::NotFound);
        };

        let updated = tx.execute(
            "UPDATE users SET email = ? WHERE id = ?",
            params![email, user.id],
        );
        match updated {
            Ok(_) => {
                tx.commit()?;
                user.email = email.to_string();
                Ok(UpdateOutcome::Updated(user))
            }
            Err(e) if is_unique_violation(&e) => {
                tx.rollback()?;
                Ok(UpdateOutcome::Conflict)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete_by_username(&self, username: &str) -> Result<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let rows = tx.execute("DELETE FROM users WHERE username = ?", params![username])?;
        tx.commit()?;
        Ok(rows > 0)
    }
}
