// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for hl-core operations.

use thiserror::Error;

/// All possible errors that can occur in hl-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid table: '{0}'\n  hint: valid tables are: habits, daily_logs, streaks, xp, sprints, tasks, reflections")]
    InvalidTable(String),

    #[error("invalid action: '{0}'\n  hint: valid actions are: upsert, delete")]
    InvalidAction(String),

    #[error("invalid period: '{0}'\n  hint: valid periods are: daily, weekly, monthly, sprint")]
    InvalidPeriod(String),

    #[error("invalid {table} row: {reason}")]
    InvalidRow { table: String, reason: String },

    #[error("missing key column '{column}' for table {table}")]
    MissingKey { table: String, column: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid op id: {0}")]
    InvalidOpId(String),
}

/// A specialized Result type for hl-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
