//! Listing commands - get-all-users, search-user and list-users

use std::path::Path;

use anyhow::Result;
use userdb_core::{Page, User};

use super::get_context;
use crate::output;

/// Print the records, or `empty_msg` when there are none
fn print_or_empty(users: &[User], json: bool, empty_msg: &str) -> Result<()> {
    if users.is_empty() && !json {
        output::warning(empty_msg);
        return Ok(());
    }
    output::print_users(users, json)
}

pub fn run_all(data_dir: &Path, json: bool) -> Result<()> {
    let ctx = get_context(data_dir)?;
    let users = ctx.user_service.get_all_users()?;
    print_or_empty(&users, json, "No users found")
}

pub fn run_search(data_dir: &Path, query: &str, json: bool) -> Result<()> {
    let ctx = get_context(data_dir)?;
    let users = ctx.user_service.search_users(query)?;
    print_or_empty(&users, json, &format!("No users found matching '{}'.", query))
}

pub fn run_page(data_dir: &Path, limit: u64, offset: u64, json: bool) -> Result<()> {
    let ctx = get_context(data_dir)?;
    let users = ctx.user_service.list_users(Page::new(limit, offset))?;
    print_or_empty(&users, json, "No users found.")
}
