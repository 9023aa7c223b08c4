// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! hlrs - The offline sync engine behind the `hl` habit tracker.
//!
//! This crate provides the client side of habitline: edits are turned into
//! operations, kept in a durable offline queue, and replayed against a remote
//! store whenever it is reachable.
//!
//! # Main Components
//!
//! - [`sync::OfflineQueue`] - Durable FIFO of pending operations
//! - [`sync::flush`] - One replay pass with a per-op retry ceiling
//! - [`sync::SyncClient`] - Caller-facing facade over queue, store and state rebuild
//! - [`Config`] - Project configuration (user, node id, remote)
//! - [`Error`] - Error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use hlrs::{find_work_dir, queue_path, Config};
//! use hlrs::sync::SyncClient;
//!
//! let work_dir = find_work_dir(Path::new("."))?;
//! let config = Config::load(&work_dir)?;
//! let mut client = SyncClient::new(config.sync_config(), &queue_path(&work_dir), config.node_id);
//! let report = client.sync().await?;
//! ```

mod cli;
mod commands;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat, QueueCommand};
pub use config::{find_work_dir, init_work_dir, queue_path, Config, RemoteConfig};
pub use error::{Error, Result};

use std::path::PathBuf;

use commands::Workspace;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let start = match cli.directory {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };

    let ws = || Workspace::open(&start);
    match cli.command {
        Command::Init { user, remote } => commands::init::run(&start, &user, remote),
        Command::Put {
            table,
            json,
            on_conflict,
        } => commands::row::put(&ws()?, &table, &json, on_conflict.as_deref()),
        Command::Rm { table, json } => commands::row::rm(&ws()?, &table, &json),
        Command::Done {
            habit,
            date,
            value,
            note,
        } => commands::habit::done(&ws()?, &habit, date.as_deref(), value, note),
        Command::Undo { habit, date } => commands::habit::undo(&ws()?, &habit, date.as_deref()),
        Command::Reflect {
            period,
            content,
            date,
        } => commands::reflect::run(&ws()?, &period, &content, date.as_deref()),
        Command::Sync => commands::sync::run(&ws()?),
        Command::Queue(QueueCommand::Status) => commands::queue::status(&ws()?),
        Command::Queue(QueueCommand::List {
            action,
            table,
            output,
        }) => commands::queue::list(&ws()?, action.as_deref(), table.as_deref(), output),
        Command::Queue(QueueCommand::Drop { id }) => commands::queue::drop_op(&ws()?, &id),
        Command::Queue(QueueCommand::Clear) => commands::queue::clear(&ws()?),
        Command::Pull { output } => commands::pull::run(&ws()?, output),
    }
}
