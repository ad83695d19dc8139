//! Paged reads from the record store

use bb_store::{CallContext, Page, RecordStore, Stickie};

use crate::Result;

/// Page size used when pulling a blackboard's stickies.
pub const STICKIE_PAGE_SIZE: usize = 1000;

/// Fetch every stickie of a blackboard, archived ones included.
///
/// Pages are requested at increasing offsets until a short page comes back.
/// The result is ordered by id.
pub fn fetch_all_stickies(
    store: &dyn RecordStore,
    ctx: &CallContext,
    blackboard_id: &str,
) -> Result<Vec<Stickie>> {
    let mut stickies = Vec::new();
    let mut page = Page::new(STICKIE_PAGE_SIZE, 0);
    loop {
        let batch = store.list_stickies(ctx, blackboard_id, page)?;
        let short = batch.len() < page.limit;
        stickies.extend(batch);
        if short {
            break;
        }
        page = page.next();
    }
    stickies.sort_by(|a, b| a.id.cmp(&b.id));
    tracing::debug!(blackboard_id, count = stickies.len(), "fetched remote stickies");
    Ok(stickies)
}
