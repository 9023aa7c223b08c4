// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue inspection.

use hl_core::{Action, Mutation, Op, OpId, Table};

use super::Workspace;
use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::sync::OfflineQueue;

/// Which ops `hl queue list` shows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Filter {
    action: Option<Action>,
    table: Option<Table>,
}

impl Filter {
    pub(crate) fn parse(action: Option<&str>, table: Option<&str>) -> Result<Self> {
        Ok(Filter {
            action: action.map(str::parse).transpose()?,
            table: table.map(str::parse).transpose()?,
        })
    }

    pub(crate) fn matches(&self, op: &Op) -> bool {
        let action = match self.action {
            Some(action) => op.action() == action,
            None => true,
        };
        let table = match self.table {
            Some(table) => op.table() == table,
            None => true,
        };
        action && table
    }
}

fn open(ws: &Workspace) -> OfflineQueue {
    OfflineQueue::open(&ws.queue_path(), ws.config.node_id)
}

/// Show pending op count and queue location.
pub fn status(ws: &Workspace) -> Result<()> {
    let queue = open(ws);
    println!("Queue: {}", queue.path().display());
    println!("Pending ops: {}", queue.len());
    match ws.config.remote_url() {
        Some(url) => println!("Remote: {}", url),
        None => println!("Remote: none"),
    }
    Ok(())
}

/// List pending ops in replay order.
pub fn list(
    ws: &Workspace,
    action: Option<&str>,
    table: Option<&str>,
    output: OutputFormat,
) -> Result<()> {
    let filter = Filter::parse(action, table)?;
    let ops: Vec<Op> = open(ws).peek().into_iter().filter(|op| filter.matches(op)).collect();
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ops)?),
        OutputFormat::Text => {
            if ops.is_empty() {
                println!("No pending ops");
            }
            for op in &ops {
                println!("{}", format_op(op));
            }
        }
    }
    Ok(())
}

/// Drop one pending op by id.
pub fn drop_op(ws: &Workspace, id: &str) -> Result<()> {
    let id: OpId = id.trim().parse()?;
    if !open(ws).dequeue_by_id(&id)? {
        return Err(Error::OpNotFound(id.to_string()));
    }
    println!("Dropped op {}", id);
    Ok(())
}

/// Drop every pending op.
pub fn clear(ws: &Workspace) -> Result<()> {
    let queue = open(ws);
    let count = queue.len();
    queue.clear()?;
    println!("Cleared {} pending op(s)", count);
    Ok(())
}

pub(crate) fn format_op(op: &Op) -> String {
    let target = match &op.mutation {
        Mutation::Upsert { row } => row.key_for(&op.effective_conflict_key()),
        Mutation::Delete { key } => key.clone(),
    };
    let mut line = format!("{}  {:<6} {}", op.id, op.action().as_str(), target);
    if op.retry_count > 0 {
        line.push_str(&format!("  (failed {}x)", op.retry_count));
    }
    line
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
