// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Flush engine: replay the offline queue against the remote store.
//!
//! One pass loads the queue once, attempts every op exactly once in queue
//! order, and writes back only the ops that failed and still have retries
//! left. A pass never stops early and never returns an error; the outcome
//! is reported as a [`FlushReport`].

use hl_core::{Mutation, Op, OpId};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::queue::{OfflineQueue, Queue};
use super::store::{RemoteStore, StoreResult};

/// Default number of failed attempts after which an op is abandoned.
pub const MAX_RETRIES: u32 = 5;

/// Retry policy for flush passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushPolicy {
    /// Total attempts an op gets before it is dropped.
    pub max_retries: u32,
}

impl Default for FlushPolicy {
    fn default() -> Self {
        FlushPolicy { max_retries: MAX_RETRIES }
    }
}

/// Outcome of one flush pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlushReport {
    /// Ops confirmed by the remote store (or skipped as no-ops).
    pub synced: usize,
    /// Ops that failed this pass, whether retained or abandoned.
    pub failed: usize,
    /// Ids of ops dropped after their final failed attempt.
    pub abandoned: Vec<OpId>,
}

impl FlushReport {
    /// Ops failed this pass that remain queued.
    pub fn retained(&self) -> usize {
        self.failed - self.abandoned.len()
    }
}

/// Replays every queued op once.
pub async fn flush<S>(queue: &OfflineQueue, store: &mut S, policy: FlushPolicy) -> FlushReport
where
    S: RemoteStore + ?Sized,
{
    let snapshot = queue.load();
    let mut report = FlushReport::default();
    if snapshot.ops.is_empty() {
        return report;
    }

    let start_version = snapshot.version;
    let mut carried = Vec::new();

    for op in snapshot.ops {
        match replay(store, &op).await {
            Ok(()) => {
                debug!(id = %op.id, table = %op.table(), action = %op.action(), "op synced");
                report.synced += 1;
            }
            Err(e) => {
                report.failed += 1;
                let attempts = op.retry_count.saturating_add(1);
                if attempts < policy.max_retries {
                    debug!(
                        id = %op.id,
                        table = %op.table(),
                        attempts,
                        transient = e.is_transient(),
                        error = %e,
                        "op failed, will retry"
                    );
                    carried.push(op.retried());
                } else {
                    warn!(
                        id = %op.id,
                        table = %op.table(),
                        action = %op.action(),
                        attempts,
                        error = %e,
                        "op abandoned after final retry"
                    );
                    report.abandoned.push(op.id);
                }
            }
        }
    }

    let on_disk = queue.load().version;
    if on_disk != start_version {
        warn!(
            expected = start_version,
            found = on_disk,
            "offline queue changed during flush; concurrently enqueued ops are overwritten"
        );
    }

    let mut next = Queue { version: on_disk.max(start_version), ops: carried };
    if let Err(e) = queue.save(&mut next) {
        error!(path = %queue.path().display(), error = %e, "failed to save offline queue after flush");
    }

    info!(
        synced = report.synced,
        failed = report.failed,
        abandoned = report.abandoned.len(),
        "flush pass complete"
    );
    report
}

/// Applies one op to the store.
///
/// A delete without a complete identifying key would match nothing (or too
/// much); it counts as done without contacting the store.
async fn replay<S>(store: &mut S, op: &Op) -> StoreResult<()>
where
    S: RemoteStore + ?Sized,
{
    match &op.mutation {
        Mutation::Upsert { row } => store.upsert(row.clone(), op.effective_conflict_key()).await,
        Mutation::Delete { key } if !key.is_complete() => {
            debug!(id = %op.id, %key, "delete without complete key, skipping");
            Ok(())
        }
        Mutation::Delete { key } => store.delete(key.clone()).await,
    }
}
