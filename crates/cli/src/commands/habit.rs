// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daily habit check-ins.

use hl_core::{Intent, OpDraft};

use super::{parse_date, submit, today, Workspace};
use crate::error::Result;

/// Mark a habit done for a day.
pub fn done(
    ws: &Workspace,
    habit: &str,
    date: Option<&str>,
    value: Option<i64>,
    note: Option<String>,
) -> Result<()> {
    let draft = done_draft(ws, habit, date, value, note)?;
    submit(ws, draft)
}

/// Clear a habit's entry for a day.
pub fn undo(ws: &Workspace, habit: &str, date: Option<&str>) -> Result<()> {
    let draft = undo_draft(ws, habit, date)?;
    submit(ws, draft)
}

pub(crate) fn done_draft(
    ws: &Workspace,
    habit: &str,
    date: Option<&str>,
    value: Option<i64>,
    note: Option<String>,
) -> Result<OpDraft> {
    let intent = Intent::RecordDay {
        habit_id: habit.to_string(),
        date: parse_date(date, today())?,
        completed: true,
        value,
        note: note.filter(|n| !n.trim().is_empty()),
    };
    Ok(ws.builder().build(intent)?)
}

pub(crate) fn undo_draft(ws: &Workspace, habit: &str, date: Option<&str>) -> Result<OpDraft> {
    let intent = Intent::ClearDay {
        habit_id: habit.to_string(),
        date: parse_date(date, today())?,
    };
    Ok(ws.builder().build(intent)?)
}

#[cfg(test)]
#[path = "habit_tests.rs"]
mod tests;
