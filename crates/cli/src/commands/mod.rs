// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod habit;
pub mod init;
pub mod pull;
pub mod queue;
pub mod reflect;
pub mod row;
pub mod sync;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use hl_core::{OpBuilder, OpDraft};
use tracing::debug;

use crate::config::{find_work_dir, queue_path, Config, RemoteConfig};
use crate::error::{Error, Result};
use crate::sync::{Submitted, SyncClient};

/// An initialized project: its `.habitline/` directory and configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub work_dir: PathBuf,
    pub config: Config,
}

impl Workspace {
    /// Finds and loads the workspace enclosing `start`.
    pub fn open(start: &Path) -> Result<Self> {
        let work_dir = find_work_dir(start)?;
        let config = Config::load(&work_dir)?;
        Ok(Workspace { work_dir, config })
    }

    pub fn builder(&self) -> OpBuilder {
        OpBuilder::new(self.config.user_id.clone())
    }

    pub fn queue_path(&self) -> PathBuf {
        queue_path(&self.work_dir)
    }

    /// The configured remote, for commands that cannot work offline.
    pub fn remote(&self) -> Result<&RemoteConfig> {
        self.config.remote.as_ref().ok_or(Error::NoRemote)
    }

    pub fn client(&self) -> SyncClient {
        SyncClient::new(self.config.sync_config(), &self.queue_path(), self.config.node_id)
    }
}

/// Single-threaded runtime for one command invocation.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread().enable_all().build()?)
}

/// Applies a draft: straight to the remote when one is reachable and
/// nothing is queued, otherwise into the offline queue.
pub fn submit(ws: &Workspace, draft: OpDraft) -> Result<()> {
    let what = format!("{} {}", draft.action(), draft.table());
    let mut client = ws.client();

    if ws.config.remote.is_none() {
        let op = client.enqueue(draft)?;
        println!("Queued {} ({})", what, op.id);
        return Ok(());
    }

    let rt = runtime()?;
    let outcome = rt.block_on(async {
        if let Err(e) = client.connect().await {
            debug!(error = %e, "remote unreachable");
        }
        let outcome = client.submit(draft).await;
        if client.is_connected() {
            if let Err(e) = client.disconnect().await {
                debug!(error = %e, "disconnect failed");
            }
        }
        outcome
    })?;

    match outcome {
        Submitted::Synced => println!("Synced {}", what),
        Submitted::Queued(op) => println!("Queued {} ({})", what, op.id),
    }
    Ok(())
}

/// Parses a `YYYY-MM-DD` argument, defaulting to `today`.
pub fn parse_date(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        Some(s) => s.trim().parse().map_err(|_| Error::InvalidDate(s.to_string())),
        None => Ok(today),
    }
}

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
