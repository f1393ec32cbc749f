//! Change-email command - replace a user's email

use std::path::Path;

use anyhow::Result;
use userdb_core::UpdateOutcome;

use super::get_context;
use crate::output;

pub fn run(data_dir: &Path, username: &str, new_email: &str) -> Result<()> {
    let ctx = get_context(data_dir)?;

    match ctx.user_service.change_email(username, new_email)? {
        UpdateOutcome::Updated(user) => {
            output::success(&format!("Updated {}'s email to {}", user.username, user.email));
        }
        UpdateOutcome::NotFound => {
            output::warning(&format!("{} not found! Unable to update email.", username));
        }
        UpdateOutcome::Conflict => {
            output::warning(&format!("Email {} already taken!", new_email));
        }
    }

    Ok(())
}
