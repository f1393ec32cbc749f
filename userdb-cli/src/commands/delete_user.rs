//! Delete-user command - remove a user permanently

use std::path::Path;

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(data_dir: &Path, username: &str) -> Result<()> {
    let ctx = get_context(data_dir)?;

    if ctx.user_service.delete_user(username)? {
        output::success(&format!("{} deleted", username));
    } else {
        output::warning(&format!("{} not found! Unable to delete user.", username));
    }

    Ok(())
}
