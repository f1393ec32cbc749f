//! Tests for opening the database repeatedly, one invocation after another
//!
//! Run with: cargo test --test connection_retry_test -- --nocapture

use std::time::Instant;
use tempfile::TempDir;

use userdb_core::adapters::duckdb::DuckDbRepository;
use userdb_core::ports::UserRepository;
use userdb_core::NewUser;

/// Each CLI invocation opens, migrates and drops its own connection
#[test]
fn test_sequential_connections() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_sequential.duckdb");

    for i in 0..5 {
        let start = Instant::now();
        let repo = DuckDbRepository::new(&db_path).unwrap();
        repo.ensure_schema().unwrap();
        repo.insert(&NewUser::new(format!("user{}", i), format!("u{}@x.com", i), "pw"))
            .unwrap();
        println!("Connection {}: opened in {:?}", i, start.elapsed());
    }

    let repo = DuckDbRepository::new(&db_path).unwrap();
    assert_eq!(repo.count().unwrap(), 5);
}

/// Migrations already recorded are not applied a second time
#[test]
fn test_reopen_applies_no_migrations() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test_migrations.duckdb");

    let first = DuckDbRepository::new(&db_path).unwrap().run_migrations().unwrap();
    assert!(!first.applied.is_empty());

    let second = DuckDbRepository::new(&db_path).unwrap().run_migrations().unwrap();
    assert!(second.applied.is_empty());
    assert_eq!(second.already_applied, first.applied.len());
}

/// A path that cannot exist is not a locking problem and fails straight away
#[test]
fn test_missing_directory_is_not_retried() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("no").join("such").join("dir").join("users.duckdb");

    let result = DuckDbRepository::new(&db_path);
    assert!(result.is_err());
}
