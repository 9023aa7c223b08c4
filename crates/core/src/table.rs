// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Logical tables and their conflict keys.
//!
//! Every table declares the column set that identifies a row. Upserts use it
//! as the `on conflict` target, so replaying the same upsert replaces the row
//! instead of inserting a duplicate. The mapping lives in
//! [`Table::conflict_key`] and is never inferred from payloads.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A logical table in the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// Habit definitions.
    Habits,
    /// One entry per habit per calendar day.
    DailyLogs,
    /// Streak counters, one per habit.
    Streaks,
    /// Experience point totals, one per user.
    Xp,
    /// Time-boxed sprints.
    Sprints,
    /// Sprint tasks, nested through `parent_task_id`.
    Tasks,
    /// Free-text reflections per period.
    Reflections,
}

impl Table {
    /// Every table, in bulk-fetch order.
    pub const ALL: [Table; 7] = [
        Table::Habits,
        Table::DailyLogs,
        Table::Streaks,
        Table::Xp,
        Table::Sprints,
        Table::Tasks,
        Table::Reflections,
    ];

    /// Returns the name used on the wire and in the persisted queue.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Habits => "habits",
            Table::DailyLogs => "daily_logs",
            Table::Streaks => "streaks",
            Table::Xp => "xp",
            Table::Sprints => "sprints",
            Table::Tasks => "tasks",
            Table::Reflections => "reflections",
        }
    }

    /// Columns that uniquely identify a row of this table.
    pub fn key_columns(&self) -> &'static [&'static str] {
        match self {
            Table::Habits | Table::Sprints | Table::Tasks => &["id"],
            Table::DailyLogs => &["habit_id", "log_date"],
            Table::Streaks => &["habit_id"],
            Table::Xp => &["user_id"],
            Table::Reflections => &["user_id", "period", "period_start"],
        }
    }

    /// Default conflict key for upserts against this table.
    pub fn conflict_key(&self) -> ConflictKey {
        ConflictKey(self.key_columns().iter().map(|c| c.to_string()).collect())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "habits" => Ok(Table::Habits),
            "daily_logs" => Ok(Table::DailyLogs),
            "streaks" => Ok(Table::Streaks),
            "xp" => Ok(Table::Xp),
            "sprints" => Ok(Table::Sprints),
            "tasks" => Ok(Table::Tasks),
            "reflections" => Ok(Table::Reflections),
            _ => Err(Error::InvalidTable(s.to_string())),
        }
    }
}

/// Column set used to detect "this row already exists, replace it".
///
/// Serialized as a comma-separated list, e.g. `"habit_id,log_date"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConflictKey(Vec<String>);

impl ConflictKey {
    /// Creates a conflict key from one or more column names.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.into().trim().to_string())
            .collect();
        if columns.is_empty() || columns.iter().any(|c| c.is_empty()) {
            return Err(Error::InvalidInput(
                "conflict key needs at least one non-empty column".to_string(),
            ));
        }
        Ok(ConflictKey(columns))
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ConflictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

impl FromStr for ConflictKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ConflictKey::new(s.split(','))
    }
}

impl Serialize for ConflictKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ConflictKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
