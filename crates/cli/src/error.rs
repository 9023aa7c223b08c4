// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{QueueError, SyncError};

/// All possible errors that can occur in the hlrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'hl init --user <id>' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("no remote configured\n  hint: add a [remote] section with a url to .habitline/config.toml")]
    NoRemote,

    #[error("invalid remote URL '{0}': must be ws:// or wss://")]
    InvalidRemoteUrl(String),

    #[error("{field} cannot be empty")]
    FieldEmpty { field: &'static str },

    #[error("invalid date '{0}'\n  hint: dates are written as YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid JSON input: {0}")]
    InvalidJson(String),

    #[error("no pending op with id '{0}'\n  hint: run 'hl queue list' to see pending ids")]
    OpNotFound(String),

    #[error("{0}")]
    Core(#[from] hl_core::Error),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for hlrs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<QueueError> for Error {
    fn from(e: QueueError) -> Self {
        Error::Sync(SyncError::Queue(e))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
