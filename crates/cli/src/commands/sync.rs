// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay the offline queue against the remote store.

use tracing::debug;

use super::{runtime, Workspace};
use crate::error::Result;
use crate::sync::FlushReport;

/// Connect (with backoff) and run one flush pass.
pub fn run(ws: &Workspace) -> Result<()> {
    let remote = ws.remote()?;
    let mut client = ws.client();

    let rt = runtime()?;
    let report = rt.block_on(async {
        let report = client.sync().await;
        if client.is_connected() {
            if let Err(e) = client.disconnect().await {
                debug!(error = %e, "disconnect failed");
            }
        }
        report
    })?;

    print!("{}", summary(&report, remote.max_retries));
    Ok(())
}

pub(crate) fn summary(report: &FlushReport, max_retries: u32) -> String {
    let mut out = format!("synced {}, failed {}\n", report.synced, report.failed);
    if report.retained() > 0 {
        out.push_str(&format!("{} op(s) still queued\n", report.retained()));
    }
    if !report.abandoned.is_empty() {
        out.push_str(&format!(
            "dropped {} op(s) after {} failed attempts\n",
            report.abandoned.len(),
            max_retries
        ));
    }
    out
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
