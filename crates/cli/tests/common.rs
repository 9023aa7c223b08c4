// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use futures_util::{SinkExt, StreamExt};
use hl_core::protocol::{ClientMessage, ServerMessage};
use hl_core::Table;
use serde_json::{Map, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn hl() -> Command {
    cargo_bin_cmd!("hl")
}

/// Helper to create an initialized temp directory without a remote
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    hl().args(["init", "--user", "u1"])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Adds a `[remote]` section to an initialized directory's config.
///
/// `extra` holds additional `key = value` lines for the section.
pub fn configure_remote(temp: &TempDir, url: &str, extra: &str) {
    let path = temp.path().join(".habitline/config.toml");
    let mut config = std::fs::read_to_string(&path).unwrap();
    config.push_str(&format!("\n[remote]\nurl = \"{url}\"\n{extra}\n"));
    std::fs::write(&path, config).unwrap();
}

/// A URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{addr}")
}

type Tables = BTreeMap<Table, Vec<Map<String, Value>>>;

/// In-process remote store speaking the habitline WebSocket protocol.
///
/// Serves every connection until the test binary exits. Upserts replace the
/// row sharing the `on_conflict` values; deletes drop rows matching the key.
pub struct RemoteServer {
    pub url: String,
    tables: Arc<Mutex<Tables>>,
    rejected: Arc<Mutex<Option<Table>>>,
}

impl RemoteServer {
    pub fn start() -> Self {
        let tables: Arc<Mutex<Tables>> = Arc::default();
        let rejected: Arc<Mutex<Option<Table>>> = Arc::default();
        let (tx, rx) = std::sync::mpsc::channel::<SocketAddr>();

        let (t, r) = (Arc::clone(&tables), Arc::clone(&rejected));
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                while let Ok((stream, _)) = listener.accept().await {
                    tokio::spawn(serve(stream, Arc::clone(&t), Arc::clone(&r)));
                }
            });
        });

        let addr = rx.recv().unwrap();
        RemoteServer { url: format!("ws://{addr}"), tables, rejected }
    }

    /// Reject every upsert into `table` until [`RemoteServer::accept_all`].
    pub fn reject(&self, table: Table) {
        *self.rejected.lock().unwrap() = Some(table);
    }

    pub fn accept_all(&self) {
        *self.rejected.lock().unwrap() = None;
    }

    pub fn rows(&self, table: Table) -> Vec<Map<String, Value>> {
        self.tables.lock().unwrap().get(&table).cloned().unwrap_or_default()
    }
}

async fn serve(stream: TcpStream, tables: Arc<Mutex<Tables>>, rejected: Arc<Mutex<Option<Table>>>) {
    let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
        return;
    };

    while let Some(Ok(frame)) = ws.next().await {
        let Message::Text(text) = frame else {
            continue;
        };
        let Ok(message) = ClientMessage::from_json(&text) else {
            continue;
        };
        let reply = handle(message, &tables, &rejected);
        let json = reply.to_json().unwrap();
        if ws.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

fn handle(
    message: ClientMessage,
    tables: &Mutex<Tables>,
    rejected: &Mutex<Option<Table>>,
) -> ServerMessage {
    let mut tables = tables.lock().unwrap();
    match message {
        ClientMessage::Ping { id } => ServerMessage::pong(id),
        ClientMessage::Upsert { request_id, table, .. }
            if *rejected.lock().unwrap() == Some(table) =>
        {
            ServerMessage::error(request_id, "constraint violation")
        }
        ClientMessage::Upsert { request_id, table, row, on_conflict } => {
            let rows = tables.entry(table).or_default();
            let same = |existing: &Map<String, Value>| {
                on_conflict.columns().iter().all(|c| existing.get(c) == row.get(c))
            };
            match rows.iter_mut().find(|existing| same(existing)) {
                Some(existing) => existing.extend(row.clone()),
                None => rows.push(row),
            }
            ServerMessage::ack(request_id)
        }
        ClientMessage::Delete { request_id, table, key } => {
            let rows = tables.entry(table).or_default();
            rows.retain(|row| !key.iter().all(|(c, v)| row.get(c) == Some(v)));
            ServerMessage::ack(request_id)
        }
        ClientMessage::Fetch { request_id, table, user_id } => {
            let rows = tables
                .get(&table)
                .map(|rows| {
                    rows.iter()
                        .filter(|row| row.get("user_id").and_then(Value::as_str) == Some(user_id.as_str()))
                        .map(|row| Value::Object(row.clone()))
                        .collect()
                })
                .unwrap_or_default();
            ServerMessage::rows(request_id, rows)
        }
    }
}
