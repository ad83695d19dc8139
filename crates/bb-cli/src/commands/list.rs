//! List command implementation

use std::path::Path;

use bb_store::{Page, RecordStore, timestamp};
use colored::Colorize;

use crate::context::{GlobalArgs, Session};
use crate::error::{CliError, Result};

/// Run the list command
pub fn run_list(
    cwd: &Path,
    globals: &GlobalArgs,
    role: &str,
    page: Page,
    json: bool,
) -> Result<()> {
    let role = role.trim();
    if role.is_empty() {
        return Err(CliError::user("--role must not be empty"));
    }

    let session = Session::open(cwd, globals)?;
    let ctx = session.context(session.config.deadlines.list());
    let boards = session.store.list_blackboards(&ctx, role, page)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&boards)?);
        return Ok(());
    }

    if boards.is_empty() {
        eprintln!("no blackboards for role {role:?}");
        return Ok(());
    }
    for board in &boards {
        let updated = board
            .updated
            .as_ref()
            .map(timestamp::format)
            .unwrap_or_default();
        println!(
            "{} role={:?} project={:?} updated={}",
            board.id.cyan(),
            board.role,
            board.project.as_deref().unwrap_or_default(),
            updated
        );
    }
    Ok(())
}
