// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable offline queue for operations awaiting replay.
//!
//! The whole queue is one JSON document (`{"version": N, "ops": [...]}`)
//! replaced atomically on every save, so a crash mid-write leaves either the
//! old queue or the new one. Ops are appended at the tail and replayed from
//! the head.
//!
//! No lock is held between load and save. Two processes writing the same
//! queue file can lose each other's updates; one writer per device is
//! assumed.

use std::path::{Path, PathBuf};

use chrono::Utc;
use hl_core::snapshot::{read_json, write_json};
use hl_core::{IdClock, Op, OpDraft, OpId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The queue file could not be written.
    #[error("queue storage error: {0}")]
    Storage(#[from] hl_core::Error),
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Ordered list of pending operations plus a save counter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    /// Incremented on every save.
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub ops: Vec<Op>,
}

impl Queue {
    fn max_id(&self) -> Option<OpId> {
        self.ops.iter().map(|op| op.id).max()
    }
}

/// Offline queue persisted at a fixed path.
pub struct OfflineQueue {
    path: PathBuf,
    clock: IdClock,
}

impl OfflineQueue {
    /// Opens the queue at `path`; the file is created on first save.
    ///
    /// Ids minted afterwards sort after every id already in the file.
    pub fn open(path: &Path, node_id: u32) -> Self {
        let queue = OfflineQueue { path: path.to_path_buf(), clock: IdClock::new(node_id) };
        if let Some(max) = queue.load().max_id() {
            queue.clock.witness(&max);
        }
        queue
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted queue.
    ///
    /// A missing, empty or unreadable file yields an empty queue; corruption
    /// is logged, never returned.
    pub fn load(&self) -> Queue {
        match read_json::<Queue>(&self.path) {
            Ok(Some(queue)) => queue,
            Ok(None) => Queue::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "offline queue unreadable, starting empty");
                Queue::default()
            }
        }
    }

    /// Bumps the version and atomically replaces the queue file.
    pub fn save(&self, queue: &mut Queue) -> QueueResult<()> {
        queue.version += 1;
        write_json(&self.path, queue)?;
        debug!(version = queue.version, ops = queue.ops.len(), "offline queue saved");
        Ok(())
    }

    /// Stamps a draft and appends it to the tail of the queue.
    pub fn enqueue(&self, draft: OpDraft) -> QueueResult<Op> {
        let mut queue = self.load();
        if let Some(max) = queue.max_id() {
            self.clock.witness(&max);
        }

        let op = draft.stamp(self.clock.next(), Utc::now());
        queue.ops.push(op.clone());
        self.save(&mut queue)?;

        debug!(id = %op.id, table = %op.table(), action = %op.action(), "op enqueued");
        Ok(op)
    }

    /// Removes the op with the given id.
    ///
    /// Returns `false` (and writes nothing) when no such op is queued.
    pub fn dequeue_by_id(&self, id: &OpId) -> QueueResult<bool> {
        let mut queue = self.load();
        let Some(pos) = queue.ops.iter().position(|op| op.id == *id) else {
            return Ok(false);
        };
        queue.ops.remove(pos);
        self.save(&mut queue)?;
        Ok(true)
    }

    /// Returns the queued ops in replay order without modifying anything.
    pub fn peek(&self) -> Vec<Op> {
        self.load().ops
    }

    /// Drops every queued op.
    pub fn clear(&self) -> QueueResult<()> {
        let mut queue = Queue { version: self.load().version, ops: Vec::new() };
        self.save(&mut queue)
    }

    pub fn has_pending(&self) -> bool {
        !self.load().ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.load().ops.len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_pending()
    }
}
