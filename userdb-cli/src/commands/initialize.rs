//! Initialize command - reset the database and insert the seed user

use std::path::Path;

use anyhow::Result;

use super::get_context;
use crate::output;

/// Drops every table without asking; the seed user is all that remains.
pub fn run(data_dir: &Path) -> Result<()> {
    let ctx = get_context(data_dir)?;
    ctx.user_service.initialize()?;
    output::success("Database Initialized");
    Ok(())
}
