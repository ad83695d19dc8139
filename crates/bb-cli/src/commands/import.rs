//! Import command implementation

use std::path::Path;

use bb_core::{Endpoint, ImportEngine, ImportOptions};
use colored::Colorize;

use crate::context::{GlobalArgs, Session};
use crate::error::Result;
use crate::output::ConsoleOutput;

/// Run the import command
pub fn run_import(
    cwd: &Path,
    globals: &GlobalArgs,
    folder: &str,
    options: ImportOptions,
) -> Result<()> {
    let folder = Endpoint::parse_folder_arg(folder)?;

    let session = Session::open(cwd, globals)?;
    let ctx = session.context(session.config.deadlines.import());
    let report = ImportEngine::new(session.root.clone(), &session.store).import(
        &ctx,
        &folder,
        options,
        &mut ConsoleOutput,
    )?;

    eprintln!(
        "{} imported blackboard {} with {} stickies",
        "OK".green().bold(),
        report.blackboard.id,
        report.stickies.len()
    );
    Ok(())
}
