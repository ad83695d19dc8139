//! Sync command implementation

use std::path::Path;

use bb_core::{Endpoint, Operands, SyncEngine, SyncOptions};
use colored::Colorize;

use crate::context::{GlobalArgs, Session};
use crate::error::Result;
use crate::output::ConsoleOutput;

/// Run the sync command
///
/// Only id -> folder is accepted; the reverse direction fails before the
/// store is opened.
pub fn run_sync(
    cwd: &Path,
    globals: &GlobalArgs,
    source: &str,
    target: &str,
    options: SyncOptions,
) -> Result<()> {
    let operands = Operands::for_sync(Endpoint::parse(source)?, Endpoint::parse(target)?)?;

    let session = Session::open(cwd, globals)?;
    let ctx = session.context(session.config.deadlines.sync());
    let report = SyncEngine::new(session.root.clone(), &session.store).sync(
        &ctx,
        &operands,
        options,
        &mut ConsoleOutput,
    )?;

    let prefix = if options.dry_run { "[dry-run] " } else { "" };
    eprintln!(
        "{} {}blackboard {}: {} written, {} up to date, {} deleted",
        "OK".green().bold(),
        prefix,
        report.blackboard_id,
        report.writes(),
        report.skips(),
        report.deletes()
    );
    Ok(())
}
