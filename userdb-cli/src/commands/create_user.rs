//! Create-user command - insert a new user

use std::path::Path;

use anyhow::Result;
use userdb_core::{InsertOutcome, NewUser};

use super::get_context;
use crate::output;

const ALREADY_TAKEN: &str = "Username or email already taken!";

pub fn run(data_dir: &Path, username: &str, email: &str, password: &str, json: bool) -> Result<()> {
    let ctx = get_context(data_dir)?;
    let new_user = NewUser::new(username, email, password);

    match ctx.user_service.create_user(&new_user)? {
        InsertOutcome::Inserted(user) => output::print_users(&[user], json)?,
        InsertOutcome::Conflict if json => {
            println!("{}", serde_json::json!({ "error": ALREADY_TAKEN }));
        }
        InsertOutcome::Conflict => output::warning(ALREADY_TAKEN),
    }

    Ok(())
}
