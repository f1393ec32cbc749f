//! Get-user command - exact lookup by username

use std::path::Path;

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(data_dir: &Path, username: &str, json: bool) -> Result<()> {
    let ctx = get_context(data_dir)?;

    match ctx.user_service.get_user(username)? {
        Some(user) => output::print_users(&[user], json)?,
        None if json => println!("null"),
        None => output::warning(&format!("{} not found!", username)),
    }

    Ok(())
}
