// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Raw row commands: `put` and `rm` take a table name and a JSON object.

use hl_core::{ConflictKey, OpDraft, Table};
use serde_json::Value;

use super::{submit, Workspace};
use crate::error::{Error, Result};

/// Upsert a row given as JSON.
pub fn put(ws: &Workspace, table: &str, json: &str, on_conflict: Option<&str>) -> Result<()> {
    let draft = put_draft(ws, table, json, on_conflict)?;
    submit(ws, draft)
}

/// Delete the row identified by the key columns in `json`.
pub fn rm(ws: &Workspace, table: &str, json: &str) -> Result<()> {
    let draft = rm_draft(ws, table, json)?;
    submit(ws, draft)
}

pub(crate) fn put_draft(
    ws: &Workspace,
    table: &str,
    json: &str,
    on_conflict: Option<&str>,
) -> Result<OpDraft> {
    let table: Table = table.parse()?;
    let value = parse_object(json)?;
    let conflict_key = on_conflict.map(str::parse::<ConflictKey>).transpose()?;
    Ok(ws.builder().upsert_json(table, value, conflict_key)?)
}

pub(crate) fn rm_draft(ws: &Workspace, table: &str, json: &str) -> Result<OpDraft> {
    let table: Table = table.parse()?;
    let value = parse_object(json)?;
    Ok(ws.builder().delete_json(table, &value)?)
}

fn parse_object(json: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| Error::InvalidJson(e.to_string()))?;
    if !value.is_object() {
        return Err(Error::InvalidJson("expected a JSON object".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "row_tests.rs"]
mod tests;
