// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued operations.
//!
//! An [`Op`] is one intended mutation against exactly one logical table.
//! Once stamped it is immutable except for its retry counter, and its
//! position in the queue (not `created_at`) decides replay order.
//!
//! Ops are designed to be:
//!
//! - Serializable: persisted in the offline queue between runs
//! - Idempotent: upserts carry their conflict key, so replaying one twice
//!   leaves the remote row as replaying it once would

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::hlc::Hlc;
use crate::row::{Row, RowKey};
use crate::table::{ConflictKey, Table};

/// Unique identifier for an operation.
pub type OpId = Hlc;

/// Kind of remote mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Upsert,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Upsert => "upsert",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "upsert" => Ok(Action::Upsert),
            "delete" => Ok(Action::Delete),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

/// The mutation an operation carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Mutation {
    /// Insert the row, or replace the columns of the row sharing its
    /// conflict-key values.
    Upsert { row: Row },
    /// Remove the row identified by `key`.
    Delete { key: RowKey },
}

/// An operation that has not been assigned an id yet.
///
/// Produced by the [`OpBuilder`](crate::builder::OpBuilder); the offline
/// queue stamps it when it is enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpDraft {
    pub mutation: Mutation,
    pub conflict_key: Option<ConflictKey>,
}

impl OpDraft {
    pub fn upsert(row: Row, conflict_key: Option<ConflictKey>) -> Self {
        OpDraft { mutation: Mutation::Upsert { row }, conflict_key }
    }

    pub fn delete(key: RowKey) -> Self {
        OpDraft { mutation: Mutation::Delete { key }, conflict_key: None }
    }

    pub fn table(&self) -> Table {
        table_of(&self.mutation)
    }

    pub fn action(&self) -> Action {
        action_of(&self.mutation)
    }

    /// Assigns identity and creation time, with a zero retry count.
    pub fn stamp(self, id: OpId, created_at: DateTime<Utc>) -> Op {
        Op {
            id,
            created_at,
            mutation: self.mutation,
            conflict_key: self.conflict_key,
            retry_count: 0,
        }
    }
}

/// A queued mutation awaiting replay against the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Op {
    /// Unique identifier, never reused.
    pub id: OpId,
    /// Creation time (informational only).
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub mutation: Mutation,
    /// Explicit conflict key; `None` means the table default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflict_key: Option<ConflictKey>,
    /// Number of failed replay attempts so far.
    #[serde(default)]
    pub retry_count: u32,
}

impl Op {
    /// Returns the table this operation targets.
    pub fn table(&self) -> Table {
        table_of(&self.mutation)
    }

    pub fn action(&self) -> Action {
        action_of(&self.mutation)
    }

    /// The conflict key to send with an upsert.
    pub fn effective_conflict_key(&self) -> ConflictKey {
        self.conflict_key.clone().unwrap_or_else(|| self.table().conflict_key())
    }

    /// Returns a copy carrying one more failed attempt.
    pub fn retried(&self) -> Op {
        Op { retry_count: self.retry_count.saturating_add(1), ..self.clone() }
    }
}

fn action_of(mutation: &Mutation) -> Action {
    match mutation {
        Mutation::Upsert { .. } => Action::Upsert,
        Mutation::Delete { .. } => Action::Delete,
    }
}

fn table_of(mutation: &Mutation) -> Table {
    match mutation {
        Mutation::Upsert { row } => row.table(),
        Mutation::Delete { key } => key.table,
    }
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
