// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages between the client and the remote store.
//!
//! The protocol is request/response:
//! - Client sends row mutations and fetch requests, each with a `request_id`
//! - Server answers every request with an `ack`, `rows` or `error` carrying
//!   the same `request_id`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::row::{Row, RowKey};
use crate::table::{ConflictKey, Table};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Insert a row, or replace the row with the same `on_conflict` values.
    Upsert {
        request_id: u64,
        table: Table,
        row: Map<String, Value>,
        on_conflict: ConflictKey,
    },

    /// Delete the rows matching every key column.
    Delete {
        request_id: u64,
        table: Table,
        key: BTreeMap<String, Value>,
    },

    /// Fetch every row of a table belonging to one user.
    Fetch {
        request_id: u64,
        table: Table,
        user_id: String,
    },

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The mutation was applied.
    Ack { request_id: u64 },

    /// Response to a Fetch request.
    Rows {
        request_id: u64,
        /// Raw column maps; the client types them per table.
        rows: Vec<Value>,
    },

    /// The request was rejected.
    Error {
        /// Absent when the error is not tied to a request.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<u64>,
        /// Human-readable error description.
        message: String,
    },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },
}

impl ClientMessage {
    /// Creates an Upsert message for a typed row.
    pub fn upsert(request_id: u64, row: &Row, on_conflict: ConflictKey) -> Self {
        ClientMessage::Upsert { request_id, table: row.table(), row: row.to_columns(), on_conflict }
    }

    /// Creates a Delete message.
    pub fn delete(request_id: u64, key: &RowKey) -> Self {
        ClientMessage::Delete { request_id, table: key.table, key: key.columns.clone() }
    }

    /// Creates a Fetch message.
    pub fn fetch(request_id: u64, table: Table, user_id: impl Into<String>) -> Self {
        ClientMessage::Fetch { request_id, table, user_id: user_id.into() }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// Request id this message expects an answer for.
    pub fn request_id(&self) -> u64 {
        match self {
            ClientMessage::Upsert { request_id, .. }
            | ClientMessage::Delete { request_id, .. }
            | ClientMessage::Fetch { request_id, .. } => *request_id,
            ClientMessage::Ping { id } => *id,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates an Ack message.
    pub fn ack(request_id: u64) -> Self {
        ServerMessage::Ack { request_id }
    }

    /// Creates a Rows message.
    pub fn rows(request_id: u64, rows: Vec<Value>) -> Self {
        ServerMessage::Rows { request_id, rows }
    }

    /// Creates an Error message answering a request.
    pub fn error(request_id: u64, message: impl Into<String>) -> Self {
        ServerMessage::Error { request_id: Some(request_id), message: message.into() }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// Request id this message answers, if any.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            ServerMessage::Ack { request_id } | ServerMessage::Rows { request_id, .. } => {
                Some(*request_id)
            }
            ServerMessage::Error { request_id, .. } => *request_id,
            ServerMessage::Pong { id } => Some(*id),
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
