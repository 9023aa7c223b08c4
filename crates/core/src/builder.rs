// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Translate application-level mutation intents into operation drafts.
//!
//! The builder is the only place untyped input becomes a typed [`Row`]. It
//! always writes the identity columns (including `user_id`) into the payload
//! and always uses the table's conflict key, so replaying a draft twice
//! leaves the remote row as replaying it once would.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::op::OpDraft;
use crate::row::{
    DailyLogRow, HabitRow, Period, ReflectionRow, Row, RowKey, SprintRow, StreakRow, TaskRow,
    XpRow,
};
use crate::table::{ConflictKey, Table};

/// An application-level mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SaveHabit {
        id: String,
        name: String,
        sort_order: i32,
        archived: bool,
    },
    DeleteHabit {
        id: String,
    },
    /// Record a habit's outcome for one day.
    RecordDay {
        habit_id: String,
        date: NaiveDate,
        completed: bool,
        value: Option<i64>,
        note: Option<String>,
    },
    /// Remove a habit's entry for one day.
    ClearDay {
        habit_id: String,
        date: NaiveDate,
    },
    SetStreak {
        habit_id: String,
        current: u32,
        longest: u32,
        last_completed: Option<NaiveDate>,
    },
    SetXp {
        total: u64,
        level: u32,
    },
    SaveSprint {
        id: String,
        title: String,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        goal: Option<String>,
    },
    DeleteSprint {
        id: String,
    },
    SaveTask {
        id: String,
        sprint_id: Option<String>,
        parent_task_id: Option<String>,
        title: String,
        done: bool,
        sort_order: i32,
    },
    DeleteTask {
        id: String,
    },
    SaveReflection {
        period: Period,
        period_start: NaiveDate,
        content: String,
    },
    DeleteReflection {
        period: Period,
        period_start: NaiveDate,
    },
}

impl Intent {
    /// Returns the table the intent mutates.
    pub fn table(&self) -> Table {
        match self {
            Intent::SaveHabit { .. } | Intent::DeleteHabit { .. } => Table::Habits,
            Intent::RecordDay { .. } | Intent::ClearDay { .. } => Table::DailyLogs,
            Intent::SetStreak { .. } => Table::Streaks,
            Intent::SetXp { .. } => Table::Xp,
            Intent::SaveSprint { .. } | Intent::DeleteSprint { .. } => Table::Sprints,
            Intent::SaveTask { .. } | Intent::DeleteTask { .. } => Table::Tasks,
            Intent::SaveReflection { .. } | Intent::DeleteReflection { .. } => Table::Reflections,
        }
    }
}

/// Builds drafts on behalf of one user.
#[derive(Debug, Clone)]
pub struct OpBuilder {
    user_id: String,
}

impl OpBuilder {
    pub fn new(user_id: impl Into<String>) -> Self {
        OpBuilder { user_id: user_id.into() }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Builds the draft for an intent.
    ///
    /// Returns [`Error::MissingKey`] when an identity value is empty.
    pub fn build(&self, intent: Intent) -> Result<OpDraft> {
        let table = intent.table();
        self.require_user(table)?;
        let user_id = self.user_id.clone();

        let row = match intent {
            Intent::SaveHabit { id, name, sort_order, archived } => {
                Row::Habits(HabitRow { id, user_id, name, sort_order, archived })
            }
            Intent::RecordDay { habit_id, date, completed, value, note } => {
                Row::DailyLogs(DailyLogRow {
                    habit_id,
                    user_id,
                    log_date: date,
                    completed,
                    value,
                    note,
                })
            }
            Intent::SetStreak { habit_id, current, longest, last_completed } => {
                Row::Streaks(StreakRow {
                    habit_id,
                    user_id,
                    current_count: current,
                    longest_count: longest.max(current),
                    last_completed,
                })
            }
            Intent::SetXp { total, level } => Row::Xp(XpRow { user_id, total_xp: total, level }),
            Intent::SaveSprint { id, title, start_date, end_date, goal } => {
                Row::Sprints(SprintRow { id, user_id, title, start_date, end_date, goal })
            }
            Intent::SaveTask { id, sprint_id, parent_task_id, title, done, sort_order } => {
                Row::Tasks(TaskRow {
                    id,
                    user_id,
                    sprint_id,
                    parent_task_id,
                    title,
                    done,
                    sort_order,
                })
            }
            Intent::SaveReflection { period, period_start, content } => {
                Row::Reflections(ReflectionRow { user_id, period, period_start, content })
            }
            Intent::DeleteHabit { id }
            | Intent::DeleteSprint { id }
            | Intent::DeleteTask { id } => {
                return self.delete_key(RowKey::from_value(table, &json!({ "id": id })));
            }
            Intent::ClearDay { habit_id, date } => {
                let value = json!({ "habit_id": habit_id, "log_date": date.to_string() });
                return self.delete_key(RowKey::from_value(table, &value));
            }
            Intent::DeleteReflection { period, period_start } => {
                let value = json!({
                    "user_id": user_id,
                    "period": period.as_str(),
                    "period_start": period_start.to_string(),
                });
                return self.delete_key(RowKey::from_value(table, &value));
            }
        };

        self.upsert_row(row, None)
    }

    /// Builds an upsert from a JSON object.
    ///
    /// `user_id` is filled in when absent. Every column of the conflict key
    /// (the table default unless given) must be present in the typed row.
    pub fn upsert_json(
        &self,
        table: Table,
        value: Value,
        conflict_key: Option<ConflictKey>,
    ) -> Result<OpDraft> {
        self.require_user(table)?;
        let value = self.with_user(table, value)?;
        let row = Row::from_value(table, value)?;
        self.upsert_row(row, conflict_key)
    }

    /// Builds a delete from a JSON object; only identity columns are kept.
    pub fn delete_json(&self, table: Table, value: &Value) -> Result<OpDraft> {
        self.require_user(table)?;
        let value = self.with_user(table, value.clone())?;
        self.delete_key(RowKey::from_value(table, &value))
    }

    fn upsert_row(&self, row: Row, conflict_key: Option<ConflictKey>) -> Result<OpDraft> {
        let effective = conflict_key.clone().unwrap_or_else(|| row.table().conflict_key());
        require_columns(&row.key_for(&effective), &effective)?;
        Ok(OpDraft::upsert(row, conflict_key))
    }

    fn delete_key(&self, key: RowKey) -> Result<OpDraft> {
        require_columns(&key, &key.table.conflict_key())?;
        Ok(OpDraft::delete(key))
    }

    fn require_user(&self, table: Table) -> Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(Error::MissingKey {
                table: table.to_string(),
                column: "user_id".to_string(),
            });
        }
        Ok(())
    }

    fn with_user(&self, table: Table, value: Value) -> Result<Value> {
        let Value::Object(mut map) = value else {
            return Err(Error::InvalidRow {
                table: table.to_string(),
                reason: "expected a JSON object".to_string(),
            });
        };
        match map.get("user_id") {
            Some(v) if !v.is_null() => {}
            _ => {
                map.insert("user_id".to_string(), Value::String(self.user_id.clone()));
            }
        }
        Ok(Value::Object(map))
    }
}

fn require_columns(key: &RowKey, conflict_key: &ConflictKey) -> Result<()> {
    for column in conflict_key.columns() {
        let usable = match key.columns.get(column) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        };
        if !usable {
            return Err(Error::MissingKey {
                table: key.table.to_string(),
                column: column.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
