//! Tests for the diff engine against a mirror folder

use std::cell::Cell;

use bb_core::{
    DiffEngine, DiffOptions, Discard, Endpoint, EntryStatus, Error, Operands, SyncEngine,
    SyncOptions,
};
use bb_store::{
    Blackboard, CallContext, MemoryStore, NewBlackboard, NewStickie, Page, RecordStore, Stickie,
};
use bb_test_utils::records::{
    BOARD_A, BOARD_B, STICKIE_A, STICKIE_B, STICKIE_C, blackboard, stickie,
};
use bb_test_utils::workspace::TestWorkspace;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn operands(id: &str, folder: &str) -> Operands {
    Operands::for_diff(
        Endpoint::parse(&format!("id:{id}")).unwrap(),
        Endpoint::parse(&format!("folder:{folder}")).unwrap(),
    )
    .unwrap()
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.put_blackboard(blackboard(BOARD_A, "planner"));
    store.put_stickie(stickie(STICKIE_A, BOARD_A, "alpha"));
    store.put_stickie(stickie(STICKIE_B, BOARD_A, "beta"));
    store
}

/// Mirror the seeded store into `folder` so tests start from a clean diff.
fn mirror(ws: &TestWorkspace, store: &MemoryStore, folder: &str) {
    SyncEngine::new(ws.normalized_root(), store)
        .sync(
            &CallContext::background(),
            &operands(BOARD_A, folder),
            SyncOptions::default(),
            &mut Discard,
        )
        .unwrap();
}

fn diff_lines(ws: &TestWorkspace, store: &MemoryStore, id: &str, options: DiffOptions) -> Vec<String> {
    DiffEngine::new(ws.normalized_root(), store)
        .diff(&CallContext::background(), &operands(id, "mirror"), options)
        .unwrap()
        .lines()
}

#[test]
fn fresh_mirror_is_clean() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    mirror(&ws, &store, "mirror");

    let report = DiffEngine::new(ws.normalized_root(), &store)
        .diff(
            &CallContext::background(),
            &operands(BOARD_A, "mirror"),
            DiffOptions::default(),
        )
        .unwrap();

    assert!(report.is_clean(), "{report}");
    assert_eq!(report.entries.len(), 3);
}

#[test]
fn classifies_remote_only_local_only_and_shared() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    mirror(&ws, &store, "mirror");
    std::fs::remove_file(ws.root().join(format!("mirror/{STICKIE_A}.stickie.yaml"))).unwrap();
    ws.write_stickie("mirror", "gamma.stickie.yaml", STICKIE_C, "gamma");

    let lines = diff_lines(&ws, &store, BOARD_A, DiffOptions::default());

    assert_eq!(
        lines,
        vec![
            format!(r#"= blackboard id={BOARD_A} role="planner""#),
            format!(r#"+ stickie id={STICKIE_A} name="alpha" (remote-only)"#),
            format!(r#"= stickie id={STICKIE_B} name="beta""#),
            format!(r#"- stickie id={STICKIE_C} name="gamma" file=gamma.stickie.yaml (local-only)"#),
        ]
    );
}

#[test]
fn local_only_stickie_owned_elsewhere_is_annotated() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    store.put_blackboard(blackboard(BOARD_B, "reviewer"));
    store.put_stickie(stickie(STICKIE_C, BOARD_B, "gamma"));
    mirror(&ws, &store, "mirror");
    ws.write_stickie("mirror", "gamma.stickie.yaml", STICKIE_C, "gamma");

    let lines = diff_lines(&ws, &store, BOARD_A, DiffOptions::default());

    assert_eq!(
        lines.last().unwrap(),
        &format!(
            r#"- stickie id={STICKIE_C} name="gamma" file=gamma.stickie.yaml (local-only, belongs to blackboard {BOARD_B})"#
        )
    );
}

#[test]
fn anonymous_files_come_last_sorted_by_name() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    mirror(&ws, &store, "mirror");
    ws.write_stickie("mirror", "z-draft.stickie.yaml", "", "zeta");
    ws.write_stickie("mirror", "a-draft.stickie.yaml", "", "eta");

    let lines = diff_lines(&ws, &store, BOARD_A, DiffOptions::default());

    assert_eq!(
        &lines[lines.len() - 2..],
        &[
            r#"- stickie name="eta" file=a-draft.stickie.yaml (local-only, no id)"#.to_string(),
            r#"- stickie name="zeta" file=z-draft.stickie.yaml (local-only, no id)"#.to_string(),
        ]
    );
}

#[test]
fn renamed_stickie_is_changed() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    mirror(&ws, &store, "mirror");
    let path = format!("mirror/{STICKIE_B}.stickie.yaml");
    let content = ws.read(&path).replace("name: beta", "name: Bar");
    ws.write(&path, &content);

    let concise = diff_lines(&ws, &store, BOARD_A, DiffOptions::default());
    assert!(concise.contains(&format!(r#"~ stickie id={STICKIE_B} name="beta" fields:name"#)));

    let detailed = diff_lines(
        &ws,
        &store,
        BOARD_A,
        DiffOptions {
            detailed: true,
            ..Default::default()
        },
    );
    assert!(detailed.contains(&format!(
        r#"~ stickie id={STICKIE_B} name="beta" changed: name[remote="beta" local="Bar"]"#
    )));
}

#[test]
fn long_remote_note_matches_wrapped_mirror() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    let mut long = stickie(STICKIE_C, BOARD_A, "long");
    long.note = Some("a fairly long sentence that keeps going ".repeat(10));
    store.put_stickie(long);
    mirror(&ws, &store, "mirror");

    let lines = diff_lines(&ws, &store, BOARD_A, DiffOptions::default());
    assert!(lines.contains(&format!(r#"= stickie id={STICKIE_C} name="long""#)), "{lines:?}");
}

#[test]
fn archived_stickies_are_skipped_unless_requested() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    let mut archived = stickie(STICKIE_C, BOARD_A, "old");
    archived.archived = true;
    store.put_stickie(archived);

    ws.write_blackboard("mirror", BOARD_A, "planner");
    let default = diff_lines(&ws, &store, BOARD_A, DiffOptions::default());
    assert!(!default.iter().any(|l| l.contains(STICKIE_C)));

    let all = diff_lines(
        &ws,
        &store,
        BOARD_A,
        DiffOptions {
            include_archived: true,
            ..Default::default()
        },
    );
    assert!(all.contains(&format!(r#"+ stickie id={STICKIE_C} name="old" (remote-only)"#)));
}

#[test]
fn missing_folder_reports_remote_side() {
    let ws = TestWorkspace::new();
    let store = seeded_store();

    let lines = diff_lines(&ws, &store, BOARD_A, DiffOptions::default());

    assert_eq!(
        lines[0],
        format!(r#"+ blackboard id={BOARD_A} role="planner" (remote-only: no local blackboard.yaml)"#)
    );
    assert_eq!(lines.len(), 3);
}

#[test]
fn neither_side_present_is_reported() {
    let ws = TestWorkspace::new();
    let store = MemoryStore::new();

    let lines = diff_lines(&ws, &store, BOARD_A, DiffOptions::default());

    assert_eq!(
        lines,
        vec![format!("? blackboard id={BOARD_A} (neither remote nor local present)")]
    );
}

#[test]
fn local_only_blackboard_keeps_local_stickies() {
    let ws = TestWorkspace::new();
    let store = MemoryStore::new();
    ws.write_blackboard("mirror", BOARD_A, "planner");
    ws.write_stickie("mirror", "a.stickie.yaml", STICKIE_A, "alpha");

    let lines = diff_lines(&ws, &store, BOARD_A, DiffOptions::default());

    assert_eq!(
        lines,
        vec![
            format!(r#"- blackboard id={BOARD_A} role="planner" (local-only: no remote blackboard)"#),
            format!(r#"- stickie id={STICKIE_A} name="alpha" file=a.stickie.yaml (local-only)"#),
        ]
    );
}

#[test]
fn placeholder_id_reads_folder_header() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    mirror(&ws, &store, "mirror");

    let report = DiffEngine::new(ws.normalized_root(), &store)
        .diff(&CallContext::background(), &operands("_", "mirror"), DiffOptions::default())
        .unwrap();

    assert_eq!(report.blackboard_id, BOARD_A);
    assert!(report.is_clean());
}

#[test]
fn placeholder_without_header_is_invalid() {
    let ws = TestWorkspace::new();
    let store = seeded_store();

    let err = DiffEngine::new(ws.normalized_root(), &store)
        .diff(&CallContext::background(), &operands("_", "mirror"), DiffOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::InvalidEndpoint { .. }), "{err}");
}

#[test]
fn malformed_stickie_file_aborts() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    mirror(&ws, &store, "mirror");
    ws.write("mirror/broken.stickie.yaml", "labels: [unclosed\n");

    let err = DiffEngine::new(ws.normalized_root(), &store)
        .diff(&CallContext::background(), &operands(BOARD_A, "mirror"), DiffOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::Fs(bb_fs::Error::Parse { .. })), "{err}");
}

#[test]
fn changed_header_lists_fields_in_order() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    mirror(&ws, &store, "mirror");
    ws.write(
        "mirror/blackboard.yaml",
        &format!("id: {BOARD_A}\nrole: reviewer\nlifecycle: done\n"),
    );

    let report = DiffEngine::new(ws.normalized_root(), &store)
        .diff(&CallContext::background(), &operands(BOARD_A, "mirror"), DiffOptions::default())
        .unwrap();

    assert_eq!(report.entries[0].status, EntryStatus::Changed);
    assert_eq!(
        report.lines()[0],
        format!(r#"~ blackboard id={BOARD_A} role="planner" fields:role,project,background,lifecycle"#)
    );
}

#[test]
fn cancelled_context_aborts_diff() {
    let ws = TestWorkspace::new();
    let store = seeded_store();
    let ctx = CallContext::background();
    ctx.cancel();

    let err = DiffEngine::new(ws.normalized_root(), &store)
        .diff(&ctx, &operands(BOARD_A, "mirror"), DiffOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::Store(bb_store::Error::Cancelled)));
}

#[test]
fn eighty_column_note_in_hand_written_mirror_is_unchanged() {
    let ws = TestWorkspace::new();
    let store = MemoryStore::new();
    store.put_blackboard(blackboard(BOARD_A, "planner"));
    let mut long = stickie(STICKIE_C, BOARD_A, "long");
    long.labels.clear();
    long.note = Some(
        "This is a very long note that should be wrapped by the exporter at eighty characters \
         per line, ensuring equality in diff when comparing remote DB and local YAML."
            .to_string(),
    );
    store.put_stickie(long);
    ws.write_blackboard("mirror", BOARD_A, "planner");
    ws.write(
        "mirror/long.stickie.yaml",
        &format!(
            "id: {STICKIE_C}\n\
             note: |-\n\
             \x20 This is a very long note that should be wrapped by the exporter at eighty\n\
             \x20 characters per line, ensuring equality in diff when comparing remote DB and\n\
             \x20 local YAML.\n\
             complex_name:\n\
             \x20 name: long\n"
        ),
    );

    let lines = diff_lines(&ws, &store, BOARD_A, DiffOptions::default());

    assert!(
        lines.contains(&format!(r#"= stickie id={STICKIE_C} name="long""#)),
        "{lines:?}"
    );
}

/// Counts `list_stickies` calls made through it.
struct CountingStore {
    inner: MemoryStore,
    stickie_pages: Cell<usize>,
}

impl RecordStore for CountingStore {
    fn get_blackboard(&self, ctx: &CallContext, id: &str) -> bb_store::Result<Option<Blackboard>> {
        self.inner.get_blackboard(ctx, id)
    }

    fn list_blackboards(
        &self,
        ctx: &CallContext,
        role: &str,
        page: Page,
    ) -> bb_store::Result<Vec<Blackboard>> {
        self.inner.list_blackboards(ctx, role, page)
    }

    fn insert_blackboard(&self, ctx: &CallContext, board: &NewBlackboard) -> bb_store::Result<Blackboard> {
        self.inner.insert_blackboard(ctx, board)
    }

    fn get_stickie(&self, ctx: &CallContext, id: &str) -> bb_store::Result<Option<Stickie>> {
        self.inner.get_stickie(ctx, id)
    }

    fn list_stickies(
        &self,
        ctx: &CallContext,
        blackboard_id: &str,
        page: Page,
    ) -> bb_store::Result<Vec<Stickie>> {
        self.stickie_pages.set(self.stickie_pages.get() + 1);
        self.inner.list_stickies(ctx, blackboard_id, page)
    }

    fn insert_stickie(&self, ctx: &CallContext, stickie: &NewStickie) -> bb_store::Result<Stickie> {
        self.inner.insert_stickie(ctx, stickie)
    }
}

#[rstest]
#[case::one_full_page(1000, 2)]
#[case::one_past_a_page(1001, 2)]
#[case::several_pages(2500, 3)]
fn remote_stickies_are_read_across_pages(#[case] count: usize, #[case] pages: usize) {
    let ws = TestWorkspace::new();
    let store = CountingStore {
        inner: MemoryStore::new(),
        stickie_pages: Cell::new(0),
    };
    store.inner.put_blackboard(blackboard(BOARD_A, "planner"));
    for i in 0..count {
        let id = format!("bbbbbbbb-0000-4000-8000-{i:012}");
        store.inner.put_stickie(stickie(&id, BOARD_A, &format!("s{i}")));
    }

    let report = DiffEngine::new(ws.normalized_root(), &store)
        .diff(
            &CallContext::background(),
            &operands(BOARD_A, "mirror"),
            DiffOptions::default(),
        )
        .unwrap();

    assert_eq!(store.stickie_pages.get(), pages);
    assert_eq!(report.count(EntryStatus::RemoteOnly), count + 1);
    let lines = report.lines();
    assert_eq!(
        lines.last().unwrap(),
        &format!(
            r#"+ stickie id=bbbbbbbb-0000-4000-8000-{:012} name="s{}" (remote-only)"#,
            count - 1,
            count - 1
        )
    );
}
