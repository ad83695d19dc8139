//! Record fixtures with stable ids and timestamps.

use bb_store::{Blackboard, ComplexName, Stickie};
use chrono::{DateTime, TimeZone, Utc};

pub const BOARD_A: &str = "11111111-1111-4111-8111-111111111111";
pub const BOARD_B: &str = "22222222-2222-4222-8222-222222222222";
pub const STORE_ID: &str = "99999999-9999-4999-8999-999999999999";

pub const STICKIE_A: &str = "aaaaaaaa-0000-4000-8000-000000000001";
pub const STICKIE_B: &str = "aaaaaaaa-0000-4000-8000-000000000002";
pub const STICKIE_C: &str = "aaaaaaaa-0000-4000-8000-000000000003";

/// A UTC timestamp `secs` seconds after 2024-01-01T00:00:00Z, with a
/// nanosecond part so round-trips exercise full precision.
pub fn at(secs: i64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap();
    base + chrono::Duration::seconds(secs) + chrono::Duration::nanoseconds(123_456_789)
}

/// A blackboard stamped at `at(0)`.
pub fn blackboard(id: &str, role: &str) -> Blackboard {
    Blackboard {
        id: id.to_string(),
        role: role.to_string(),
        store_id: STORE_ID.to_string(),
        conversation_id: None,
        project: Some("demo".to_string()),
        task_id: None,
        background: Some("Shared context for the planning role.".to_string()),
        guidelines: None,
        lifecycle: None,
        created: Some(at(0)),
        updated: Some(at(0)),
    }
}

/// A stickie named `name` on `board`, stamped at `at(0)`.
pub fn stickie(id: &str, board: &str, name: &str) -> Stickie {
    Stickie {
        id: id.to_string(),
        blackboard_id: board.to_string(),
        topic_name: None,
        topic_role_name: None,
        note: Some(format!("Notes about {name}.")),
        code: None,
        labels: vec!["todo".to_string()],
        created_by_task_id: None,
        edit_count: 1,
        priority_level: None,
        score: None,
        complex_name: ComplexName {
            name: name.to_string(),
            variant: String::new(),
        },
        archived: false,
        created: Some(at(0)),
        updated: Some(at(0)),
    }
}
