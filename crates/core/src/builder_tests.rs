// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use crate::op::Mutation;
use yare::parameterized;

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn builder() -> OpBuilder {
    OpBuilder::new("u1")
}

fn upserted_row(draft: &OpDraft) -> &Row {
    match &draft.mutation {
        Mutation::Upsert { row } => row,
        Mutation::Delete { .. } => panic!("expected an upsert"),
    }
}

fn deleted_key(draft: &OpDraft) -> &RowKey {
    match &draft.mutation {
        Mutation::Delete { key } => key,
        Mutation::Upsert { .. } => panic!("expected a delete"),
    }
}

#[test]
fn record_day_writes_identity_columns() {
    let draft = builder()
        .build(Intent::RecordDay {
            habit_id: "h1".into(),
            date: date("2026-03-01"),
            completed: true,
            value: Some(20),
            note: None,
        })
        .unwrap();

    assert_eq!(draft.table(), Table::DailyLogs);
    assert_eq!(draft.conflict_key, None);
    let columns = upserted_row(&draft).to_columns();
    assert_eq!(columns["user_id"], "u1");
    assert_eq!(columns["habit_id"], "h1");
    assert_eq!(columns["log_date"], "2026-03-01");
}

#[test]
fn set_streak_keeps_longest_at_least_current() {
    let draft = builder()
        .build(Intent::SetStreak {
            habit_id: "h1".into(),
            current: 7,
            longest: 3,
            last_completed: Some(date("2026-03-01")),
        })
        .unwrap();

    let Row::Streaks(streak) = upserted_row(&draft) else {
        panic!("expected a streak row");
    };
    assert_eq!(streak.current_count, 7);
    assert_eq!(streak.longest_count, 7);
}

#[test]
fn set_xp_is_keyed_by_user() {
    let draft = builder().build(Intent::SetXp { total: 120, level: 2 }).unwrap();
    let key = upserted_row(&draft).key();
    assert_eq!(key.columns["user_id"], "u1");
    assert!(key.is_complete());
}

#[parameterized(
    habit = { Intent::DeleteHabit { id: "h1".into() }, Table::Habits },
    sprint = { Intent::DeleteSprint { id: "s1".into() }, Table::Sprints },
    task = { Intent::DeleteTask { id: "t1".into() }, Table::Tasks },
    day = { Intent::ClearDay { habit_id: "h1".into(), date: date("2026-03-01") }, Table::DailyLogs },
    reflection = { Intent::DeleteReflection { period: Period::Weekly, period_start: date("2026-03-02") }, Table::Reflections },
)]
fn delete_intents_carry_complete_key(intent: Intent, table: Table) {
    let draft = builder().build(intent).unwrap();
    let key = deleted_key(&draft);
    assert_eq!(key.table, table);
    assert!(key.is_complete());
}

#[test]
fn delete_reflection_key_uses_wire_names() {
    let draft = builder()
        .build(Intent::DeleteReflection {
            period: Period::Monthly,
            period_start: date("2026-03-01"),
        })
        .unwrap();
    let key = deleted_key(&draft);
    assert_eq!(key.columns["period"], "monthly");
    assert_eq!(key.columns["period_start"], "2026-03-01");
    assert_eq!(key.columns["user_id"], "u1");
}

#[parameterized(
    empty_habit_id = { Intent::SaveHabit { id: "".into(), name: "Read".into(), sort_order: 0, archived: false }, "id" },
    blank_task_id = { Intent::DeleteTask { id: "  ".into() }, "id" },
    empty_log_habit = { Intent::ClearDay { habit_id: "".into(), date: date("2026-03-01") }, "habit_id" },
)]
fn empty_identity_is_rejected(intent: Intent, column: &str) {
    let err = builder().build(intent).unwrap_err();
    match err {
        Error::MissingKey { column: c, .. } => assert_eq!(c, column),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn empty_user_is_rejected() {
    let err = OpBuilder::new("").build(Intent::SetXp { total: 1, level: 0 }).unwrap_err();
    assert!(matches!(err, Error::MissingKey { ref column, .. } if column == "user_id"));
}

#[test]
fn same_intent_builds_same_draft() {
    let intent = Intent::SaveTask {
        id: "t1".into(),
        sprint_id: Some("s1".into()),
        parent_task_id: None,
        title: "Ship it".into(),
        done: false,
        sort_order: 2,
    };
    let first = builder().build(intent.clone()).unwrap();
    let second = builder().build(intent).unwrap();
    assert_eq!(first, second);
}

#[test]
fn upsert_json_injects_user_id() {
    let draft = builder()
        .upsert_json(Table::Habits, json!({"id": "h1", "name": "Read"}), None)
        .unwrap();
    assert_eq!(upserted_row(&draft).to_columns()["user_id"], "u1");
}

#[test]
fn upsert_json_keeps_explicit_user_id() {
    let draft = builder()
        .upsert_json(Table::Habits, json!({"id": "h1", "user_id": "u2", "name": "Read"}), None)
        .unwrap();
    assert_eq!(upserted_row(&draft).to_columns()["user_id"], "u2");
}

#[test]
fn upsert_json_with_custom_conflict_key() {
    let ck: ConflictKey = "user_id,habit_id".parse().unwrap();
    let draft = builder()
        .upsert_json(Table::Streaks, json!({"habit_id": "h1", "current_count": 3}), Some(ck.clone()))
        .unwrap();
    assert_eq!(draft.conflict_key, Some(ck));
}

#[test]
fn upsert_json_rejects_unknown_conflict_column() {
    let ck: ConflictKey = "slug".parse().unwrap();
    let err = builder()
        .upsert_json(Table::Habits, json!({"id": "h1", "name": "Read"}), Some(ck))
        .unwrap_err();
    assert!(matches!(err, Error::MissingKey { ref column, .. } if column == "slug"));
}

#[parameterized(
    not_an_object = { json!(["h1"]) },
    missing_required = { json!({"id": "h1"}) },
)]
fn upsert_json_rejects_bad_rows(value: Value) {
    let err = builder().upsert_json(Table::Habits, value, None).unwrap_err();
    assert!(matches!(err, Error::InvalidRow { .. }));
}

#[test]
fn delete_json_keeps_only_identity_columns() {
    let draft = builder()
        .delete_json(Table::DailyLogs, &json!({"habit_id": "h1", "log_date": "2026-03-01", "note": "x"}))
        .unwrap();
    let key = deleted_key(&draft);
    assert_eq!(key.columns.len(), 2);
    assert!(!key.columns.contains_key("note"));
}

#[test]
fn delete_json_rejects_partial_composite_key() {
    let err = builder()
        .delete_json(Table::DailyLogs, &json!({"habit_id": "h1"}))
        .unwrap_err();
    assert!(matches!(err, Error::MissingKey { ref column, .. } if column == "log_date"));
}

#[test]
fn delete_json_fills_user_keyed_tables() {
    let draft = builder().delete_json(Table::Xp, &json!({})).unwrap();
    assert_eq!(deleted_key(&draft).columns["user_id"], "u1");
}
