//! Database migrations - embedded SQL files
//!
//! Migrations are compiled into the binary with include_str! and applied in
//! list order by `MigrationService`.

/// A migration as (file name, SQL)
pub type Migration = (&'static str, &'static str);

/// Creates the sys_migrations ledger; idempotent, runs before any list
pub const LEDGER: &str = include_str!("000_migrations.sql");

/// Migrations for the user database.
///
/// When adding one, create `NNN_description.sql` and append it here.
pub const MIGRATIONS: &[Migration] = &[("001_initial_schema.sql", include_str!("001_initial_schema.sql"))];

/// Statements that remove everything the migrations create, in dependency order
pub const DROP_ALL: &str = "
DROP TABLE IF EXISTS users;
DROP SEQUENCE IF EXISTS seq_users_id;
DROP TABLE IF EXISTS sys_migrations;
";
