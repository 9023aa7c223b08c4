// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::panic)]

use hl_core::{Intent, OpBuilder, OpDraft};

/// Builder for the test user.
pub fn builder() -> OpBuilder {
    OpBuilder::new("u1")
}

/// Draft upserting a streak row for `habit_id`.
pub fn streak_draft(habit_id: &str, current: u32) -> OpDraft {
    builder()
        .build(Intent::SetStreak {
            habit_id: habit_id.to_string(),
            current,
            longest: current,
            last_completed: None,
        })
        .unwrap_or_else(|e| panic!("streak draft: {e}"))
}

/// Draft upserting a habit.
pub fn habit_draft(id: &str, name: &str) -> OpDraft {
    builder()
        .build(Intent::SaveHabit {
            id: id.to_string(),
            name: name.to_string(),
            sort_order: 0,
            archived: false,
        })
        .unwrap_or_else(|e| panic!("habit draft: {e}"))
}

/// Draft deleting a task.
pub fn delete_task_draft(id: &str) -> OpDraft {
    builder()
        .build(Intent::DeleteTask { id: id.to_string() })
        .unwrap_or_else(|e| panic!("delete draft: {e}"))
}
