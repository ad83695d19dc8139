//! Get command implementation

use std::path::Path;

use bb_core::mirror::{BLACKBOARD_FILE, BlackboardFile};
use bb_core::{Endpoint, Error, RemoteRef};
use bb_fs::{DocumentStore, NormalizedPath};
use bb_store::RecordStore;

use crate::context::{GlobalArgs, Session};
use crate::error::{CliError, Result};

/// Run the get command
///
/// Prints the blackboard in its mirror-file shape, or the stored record as
/// JSON.
pub fn run_get(cwd: &Path, globals: &GlobalArgs, id: &str, json: bool) -> Result<()> {
    let id = parse_id(id)?;

    let session = Session::open(cwd, globals)?;
    let ctx = session.context(session.config.deadlines.list());
    let board = session
        .store
        .get_blackboard(&ctx, &id)?
        .ok_or_else(|| Error::NotFound {
            kind: "blackboard",
            id: id.clone(),
        })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }
    let rendered = DocumentStore::new().render(
        &NormalizedPath::new(BLACKBOARD_FILE),
        &BlackboardFile::from_remote(&board),
    )?;
    print!("{rendered}");
    Ok(())
}

/// Accept `id:<uuid>` or a bare id.
fn parse_id(token: &str) -> Result<String> {
    let token = token.trim();
    if !token.contains(':') {
        if token.is_empty() {
            return Err(CliError::user("blackboard id is required"));
        }
        return Ok(token.to_string());
    }
    match Endpoint::parse(token)? {
        Endpoint::Id(RemoteRef::Id(id)) => Ok(id),
        _ => Err(CliError::user(format!(
            "expected id:<uuid>, got {token:?}"
        ))),
    }
}
