//! Behaviour shared by every RecordStore implementation

use bb_store::{
    CallContext, ComplexName, Error, MemoryStore, NewBlackboard, NewStickie, Page, RecordStore,
    SqliteStore,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const BOARD: &str = "11111111-1111-4111-8111-111111111111";
const OTHER_BOARD: &str = "22222222-2222-4222-8222-222222222222";
const STICKIE_A: &str = "aaaaaaaa-0000-4000-8000-000000000001";
const STICKIE_B: &str = "aaaaaaaa-0000-4000-8000-000000000002";
const STICKIE_C: &str = "aaaaaaaa-0000-4000-8000-000000000003";

fn memory() -> Box<dyn RecordStore> {
    Box::new(MemoryStore::new())
}

fn sqlite() -> Box<dyn RecordStore> {
    Box::new(SqliteStore::open_in_memory().unwrap())
}

fn new_board(id: &str, role: &str) -> NewBlackboard {
    NewBlackboard {
        id: id.to_string(),
        role: role.to_string(),
        project: Some("demo".to_string()),
        background: Some("line one\nline two".to_string()),
        ..Default::default()
    }
}

fn new_stickie(id: &str, board: &str, name: &str) -> NewStickie {
    NewStickie {
        id: id.to_string(),
        blackboard_id: board.to_string(),
        note: Some(format!("note for {name}")),
        labels: vec!["b".to_string(), "a".to_string()],
        score: Some(0.5),
        complex_name: ComplexName {
            name: name.to_string(),
            variant: String::new(),
        },
        ..Default::default()
    }
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn insert_blackboard_keeps_explicit_id(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    let inserted = store.insert_blackboard(&ctx, &new_board(BOARD, "planner")).unwrap();

    assert_eq!(inserted.id, BOARD);
    assert!(!inserted.store_id.is_empty());
    assert!(inserted.created.is_some());
    assert_eq!(inserted.created, inserted.updated);

    let fetched = store.get_blackboard(&ctx, BOARD).unwrap().unwrap();
    assert_eq!(fetched, inserted);
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn ids_are_matched_case_insensitively(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    store.insert_blackboard(&ctx, &new_board(BOARD, "planner")).unwrap();

    let upper = BOARD.to_uppercase();
    let fetched = store.get_blackboard(&ctx, &upper).unwrap().unwrap();
    assert_eq!(fetched.id, BOARD);
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn missing_records_are_none(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    assert!(store.get_blackboard(&ctx, BOARD).unwrap().is_none());
    assert!(store.get_stickie(&ctx, STICKIE_A).unwrap().is_none());
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn invalid_id_is_rejected(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    let err = store.get_blackboard(&ctx, "not-a-uuid").unwrap_err();
    assert!(matches!(err, Error::InvalidId { .. }));
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn duplicate_blackboard_insert_fails(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    store.insert_blackboard(&ctx, &new_board(BOARD, "planner")).unwrap();

    let err = store
        .insert_blackboard(&ctx, &new_board(BOARD, "planner"))
        .unwrap_err();
    assert!(matches!(err, Error::Duplicate { kind: "blackboard", .. }));
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn blank_role_is_rejected(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    let err = store
        .insert_blackboard(&ctx, &new_board(BOARD, "  "))
        .unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "role" }));
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn stickie_round_trips_all_fields(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    store.insert_blackboard(&ctx, &new_board(BOARD, "planner")).unwrap();

    let inserted = store
        .insert_stickie(&ctx, &new_stickie(STICKIE_A, BOARD, "alpha"))
        .unwrap();
    assert_eq!(inserted.edit_count, 0);
    assert_eq!(inserted.labels, vec!["b", "a"]);

    let fetched = store.get_stickie(&ctx, STICKIE_A).unwrap().unwrap();
    assert_eq!(fetched, inserted);
    assert_eq!(fetched.complex_name.name, "alpha");
    assert_eq!(fetched.score, Some(0.5));
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn stickie_requires_existing_blackboard(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    let err = store
        .insert_stickie(&ctx, &new_stickie(STICKIE_A, BOARD, "alpha"))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownBlackboard { .. }));
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn duplicate_stickie_insert_fails(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    store.insert_blackboard(&ctx, &new_board(BOARD, "planner")).unwrap();
    store
        .insert_stickie(&ctx, &new_stickie(STICKIE_A, BOARD, "alpha"))
        .unwrap();

    let err = store
        .insert_stickie(&ctx, &new_stickie(STICKIE_A, BOARD, "again"))
        .unwrap_err();
    assert!(matches!(err, Error::Duplicate { kind: "stickie", .. }));
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn list_stickies_pages_in_id_order(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    store.insert_blackboard(&ctx, &new_board(BOARD, "planner")).unwrap();
    store.insert_blackboard(&ctx, &new_board(OTHER_BOARD, "planner")).unwrap();
    for (id, name) in [(STICKIE_C, "c"), (STICKIE_A, "a"), (STICKIE_B, "b")] {
        store.insert_stickie(&ctx, &new_stickie(id, BOARD, name)).unwrap();
    }
    store
        .insert_stickie(
            &ctx,
            &new_stickie("bbbbbbbb-0000-4000-8000-000000000001", OTHER_BOARD, "x"),
        )
        .unwrap();

    let first = store.list_stickies(&ctx, BOARD, Page::new(2, 0)).unwrap();
    let second = store
        .list_stickies(&ctx, BOARD, Page::new(2, 0).next())
        .unwrap();

    let ids: Vec<_> = first.iter().chain(&second).map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec![STICKIE_A, STICKIE_B, STICKIE_C]);
    assert_eq!(second.len(), 1);
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn list_blackboards_filters_by_role(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    store.insert_blackboard(&ctx, &new_board(BOARD, "planner")).unwrap();
    store.insert_blackboard(&ctx, &new_board(OTHER_BOARD, "reviewer")).unwrap();

    let planners = store
        .list_blackboards(&ctx, "planner", Page::default())
        .unwrap();
    assert_eq!(planners.len(), 1);
    assert_eq!(planners[0].id, BOARD);

    let nobody = store.list_blackboards(&ctx, "ghost", Page::default()).unwrap();
    assert!(nobody.is_empty());
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite(sqlite())]
fn cancelled_context_stops_calls(#[case] store: Box<dyn RecordStore>) {
    let ctx = CallContext::background();
    ctx.cancel();
    let err = store.get_blackboard(&ctx, BOARD).unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}
