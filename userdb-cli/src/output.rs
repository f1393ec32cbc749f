//! Output formatting utilities

use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use userdb_core::User;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
///
/// Expected outcomes like "not found" go to stdout like everything else.
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render user records as a table
pub fn users_table(users: &[User]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ID", "Username", "Email", "Password"]);
    for user in users {
        table.add_row(vec![
            user.id.to_string(),
            user.username.clone(),
            user.email.clone(),
            user.password.clone(),
        ]);
    }
    table
}

/// Print user records as a table or as pretty JSON
pub fn print_users(users: &[User], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(users)?);
    } else {
        println!("{}", users_table(users));
    }
    Ok(())
}
