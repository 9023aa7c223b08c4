// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! hl-core: Shared library for the habitline offline sync engine
//!
//! This crate provides the data model (tables, rows, operations), the
//! operation builder, state reconstruction, and the wire protocol used by
//! the hl CLI to talk to the remote store.

pub mod builder;
pub mod error;
pub mod hlc;
pub mod op;
pub mod protocol;
pub mod row;
pub mod snapshot;
pub mod state;
pub mod table;

pub use builder::{Intent, OpBuilder};
pub use error::{Error, Result};
pub use hlc::{ClockSource, Hlc, IdClock, SystemClock};
pub use op::{Action, Mutation, Op, OpDraft, OpId};
pub use protocol::{ClientMessage, ServerMessage};
pub use row::{
    DailyLogRow, HabitRow, Period, ReflectionRow, Row, RowKey, SprintRow, StreakRow, TaskRow,
    XpRow,
};
pub use state::{reconstruct, AppState, DayEntry, RowsByTable, SprintView, Streak, TaskNode, Xp};
pub use table::{ConflictKey, Table};
