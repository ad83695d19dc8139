//! Diff command implementation

use std::path::Path;

use bb_core::{DiffEngine, DiffOptions, Endpoint, Operands, Output};
use colored::Colorize;

use crate::context::{GlobalArgs, Session};
use crate::error::Result;
use crate::output::ConsoleOutput;

/// Arguments of `blackboard diff`
#[derive(Debug, Clone)]
pub struct DiffArgs {
    pub first: String,
    pub second: String,
    pub options: DiffOptions,
    pub json: bool,
}

/// Run the diff command
///
/// Endpoints are validated before the store is opened.
pub fn run_diff(cwd: &Path, globals: &GlobalArgs, args: DiffArgs) -> Result<()> {
    let operands = Operands::for_diff(Endpoint::parse(&args.first)?, Endpoint::parse(&args.second)?)?;

    let session = Session::open(cwd, globals)?;
    let ctx = session.context(session.config.deadlines.diff());
    let report = DiffEngine::new(session.root.clone(), &session.store).diff(
        &ctx,
        &operands,
        args.options,
    )?;

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    let mut output = ConsoleOutput;
    for line in report.lines() {
        output.report(&line);
    }
    if report.is_clean() {
        eprintln!("{} mirror matches the store", "OK".green().bold());
    }
    Ok(())
}
