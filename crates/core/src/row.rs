// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed rows for every logical table.
//!
//! Untyped JSON is turned into a [`Row`] once, at the builder boundary
//! ([`Row::from_value`]), and stays typed through the queue and the flush
//! engine. Rows are totally ordered so that reconstruction can pick a
//! deterministic winner when the same identity shows up twice.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::table::{ConflictKey, Table};

/// Time span a reflection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    /// Retrospective for a sprint starting on `period_start`.
    Sprint,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Sprint => "sprint",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "sprint" => Ok(Period::Sprint),
            _ => Err(Error::InvalidPeriod(s.to_string())),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A habit definition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HabitRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub archived: bool,
}

/// One habit on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DailyLogRow {
    pub habit_id: String,
    pub user_id: String,
    pub log_date: NaiveDate,
    #[serde(default = "default_true")]
    pub completed: bool,
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Streak counters for one habit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreakRow {
    pub habit_id: String,
    pub user_id: String,
    #[serde(default)]
    pub current_count: u32,
    #[serde(default)]
    pub longest_count: u32,
    #[serde(default)]
    pub last_completed: Option<NaiveDate>,
}

/// Experience point totals for one user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct XpRow {
    pub user_id: String,
    #[serde(default)]
    pub total_xp: u64,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SprintRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub goal: Option<String>,
}

/// A task; subtasks point at their parent through `parent_task_id`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub sprint_id: Option<String>,
    #[serde(default)]
    pub parent_task_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReflectionRow {
    pub user_id: String,
    pub period: Period,
    pub period_start: NaiveDate,
    pub content: String,
}

/// A row of any logical table, tagged with its table name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum Row {
    Habits(HabitRow),
    DailyLogs(DailyLogRow),
    Streaks(StreakRow),
    Xp(XpRow),
    Sprints(SprintRow),
    Tasks(TaskRow),
    Reflections(ReflectionRow),
}

impl Row {
    /// Returns the table this row belongs to.
    pub fn table(&self) -> Table {
        match self {
            Row::Habits(_) => Table::Habits,
            Row::DailyLogs(_) => Table::DailyLogs,
            Row::Streaks(_) => Table::Streaks,
            Row::Xp(_) => Table::Xp,
            Row::Sprints(_) => Table::Sprints,
            Row::Tasks(_) => Table::Tasks,
            Row::Reflections(_) => Table::Reflections,
        }
    }

    /// Types a JSON object as a row of `table`.
    ///
    /// Unknown columns (e.g. server-managed timestamps) are ignored.
    pub fn from_value(table: Table, value: Value) -> Result<Self> {
        let invalid = |e: serde_json::Error| Error::InvalidRow {
            table: table.to_string(),
            reason: e.to_string(),
        };
        let row = match table {
            Table::Habits => Row::Habits(serde_json::from_value(value).map_err(invalid)?),
            Table::DailyLogs => Row::DailyLogs(serde_json::from_value(value).map_err(invalid)?),
            Table::Streaks => Row::Streaks(serde_json::from_value(value).map_err(invalid)?),
            Table::Xp => Row::Xp(serde_json::from_value(value).map_err(invalid)?),
            Table::Sprints => Row::Sprints(serde_json::from_value(value).map_err(invalid)?),
            Table::Tasks => Row::Tasks(serde_json::from_value(value).map_err(invalid)?),
            Table::Reflections => {
                Row::Reflections(serde_json::from_value(value).map_err(invalid)?)
            }
        };
        Ok(row)
    }

    /// The row as a flat column map, without the table tag.
    pub fn to_columns(&self) -> Map<String, Value> {
        let value = match self {
            Row::Habits(r) => serde_json::to_value(r),
            Row::DailyLogs(r) => serde_json::to_value(r),
            Row::Streaks(r) => serde_json::to_value(r),
            Row::Xp(r) => serde_json::to_value(r),
            Row::Sprints(r) => serde_json::to_value(r),
            Row::Tasks(r) => serde_json::to_value(r),
            Row::Reflections(r) => serde_json::to_value(r),
        };
        // Row structs only hold strings, numbers, bools and dates
        match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Identity of this row under the table's default conflict key.
    pub fn key(&self) -> RowKey {
        self.key_for(&self.table().conflict_key())
    }

    /// Values of the given conflict-key columns.
    pub fn key_for(&self, conflict_key: &ConflictKey) -> RowKey {
        let columns = self.to_columns();
        let picked = conflict_key
            .columns()
            .iter()
            .filter_map(|c| columns.get(c).map(|v| (c.clone(), v.clone())))
            .collect();
        RowKey { table: self.table(), columns: picked }
    }
}

/// Identifying column values of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowKey {
    pub table: Table,
    pub columns: BTreeMap<String, Value>,
}

impl RowKey {
    /// Picks the table's identity columns out of a JSON object.
    ///
    /// Missing or null columns are left out; check [`RowKey::is_complete`]
    /// before using the key to filter a delete.
    pub fn from_value(table: Table, value: &Value) -> Self {
        let columns = table
            .key_columns()
            .iter()
            .filter_map(|c| {
                value
                    .get(*c)
                    .filter(|v| !v.is_null())
                    .map(|v| (c.to_string(), v.clone()))
            })
            .collect();
        RowKey { table, columns }
    }

    /// True when no identity column is present.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// True when every identity column of the table has a usable value.
    pub fn is_complete(&self) -> bool {
        self.table.key_columns().iter().all(|c| match self.columns.get(*c) {
            Some(Value::Null) | None => false,
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        })
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .columns
            .iter()
            .map(|(c, v)| match v {
                Value::String(s) => format!("{c}={s}"),
                other => format!("{c}={other}"),
            })
            .collect();
        write!(f, "{}[{}]", self.table, parts.join(","))
    }
}

#[cfg(test)]
#[path = "row_tests.rs"]
mod tests;
