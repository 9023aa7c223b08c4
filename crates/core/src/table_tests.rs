// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    habits = { "habits", Table::Habits },
    daily_logs = { "daily_logs", Table::DailyLogs },
    streaks = { "streaks", Table::Streaks },
    xp = { "xp", Table::Xp },
    sprints = { "sprints", Table::Sprints },
    tasks = { "tasks", Table::Tasks },
    reflections = { "reflections", Table::Reflections },
    uppercase = { "STREAKS", Table::Streaks },
)]
fn table_from_str(input: &str, expected: Table) {
    assert_eq!(input.parse::<Table>().unwrap(), expected);
}

#[test]
fn table_from_str_rejects_unknown() {
    let err = "journal".parse::<Table>().unwrap_err();
    assert!(matches!(err, Error::InvalidTable(ref name) if name == "journal"));
}

#[test]
fn table_display_roundtrips_for_all() {
    for table in Table::ALL {
        assert_eq!(table.to_string().parse::<Table>().unwrap(), table);
    }
}

#[test]
fn table_serde_uses_snake_case() {
    let json = serde_json::to_string(&Table::DailyLogs).unwrap();
    assert_eq!(json, "\"daily_logs\"");
}

#[parameterized(
    habits = { Table::Habits, "id" },
    daily_logs = { Table::DailyLogs, "habit_id,log_date" },
    streaks = { Table::Streaks, "habit_id" },
    xp = { Table::Xp, "user_id" },
    tasks = { Table::Tasks, "id" },
    reflections = { Table::Reflections, "user_id,period,period_start" },
)]
fn table_default_conflict_key(table: Table, expected: &str) {
    assert_eq!(table.conflict_key().to_string(), expected);
}

#[test]
fn conflict_key_parse_trims_columns() {
    let key: ConflictKey = "habit_id, log_date".parse().unwrap();
    assert_eq!(key.columns(), &["habit_id".to_string(), "log_date".to_string()]);
}

#[parameterized(
    empty = { "" },
    blank = { "   " },
    trailing_comma = { "habit_id," },
)]
fn conflict_key_parse_rejects(input: &str) {
    assert!(input.parse::<ConflictKey>().is_err());
}

#[test]
fn conflict_key_serializes_as_string() {
    let key = Table::DailyLogs.conflict_key();
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, "\"habit_id,log_date\"");

    let parsed: ConflictKey = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, key);
}
