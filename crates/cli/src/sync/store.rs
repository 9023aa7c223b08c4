// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote store abstraction.
//!
//! Provides a trait-based boundary to the remote relational store that
//! enables:
//! - A WebSocket client speaking the request/response protocol for production
//! - In-memory stores for unit testing

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use hl_core::protocol::{ClientMessage, ServerMessage};
use hl_core::{ConflictKey, Row, RowKey, Table};
use tracing::{debug, warn};

/// Error type for remote store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed, or never opened.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// No reply within the request timeout.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// The store refused the request.
    #[error("rejected by remote: {0}")]
    Rejected(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// True for failures that may go away on their own (network trouble),
    /// false for ones the store will keep returning.
    pub fn is_transient(&self) -> bool {
        !matches!(self, StoreError::Rejected(_) | StoreError::Serialization(_))
    }
}

/// Result type for remote store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future returned by [`RemoteStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Row-level access to the remote store.
///
/// This trait abstracts over the actual store client, allowing for easy
/// testing with in-memory implementations.
pub trait RemoteStore: Send + Sync {
    /// Connect to the store.
    fn connect(&mut self) -> StoreFuture<'_, ()>;

    /// Disconnect from the store.
    fn disconnect(&mut self) -> StoreFuture<'_, ()>;

    /// Check if connected.
    fn is_connected(&self) -> bool;

    /// Insert `row` into its table, or replace the row sharing its values
    /// for every `conflict_key` column.
    fn upsert(&mut self, row: Row, conflict_key: ConflictKey) -> StoreFuture<'_, ()>;

    /// Delete the rows matching every column of `key`.
    fn delete(&mut self, key: RowKey) -> StoreFuture<'_, ()>;

    /// Fetch every row of `table` owned by `user_id`.
    fn fetch_all(&mut self, table: Table, user_id: String) -> StoreFuture<'_, Vec<Row>>;
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Internal WebSocket connection wrapper.
struct WebSocketConnection {
    sink: futures_util::stream::SplitSink<WsStream, tokio_tungstenite::tungstenite::Message>,
    stream: futures_util::stream::SplitStream<WsStream>,
}

/// Remote store client over a WebSocket connection.
///
/// Every request carries a fresh `request_id`; frames answering other ids
/// are skipped.
pub struct WebSocketStore {
    url: String,
    request_timeout: Duration,
    ws: Option<WebSocketConnection>,
    next_request_id: u64,
}

impl WebSocketStore {
    /// Create a store client for `url`.
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> Self {
        WebSocketStore {
            url: url.into(),
            request_timeout,
            ws: None,
            next_request_id: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&mut self) -> u64 {
        self.next_request_id += 1;
        self.next_request_id
    }

    /// Sends one request and waits for its answer, bounded by the request
    /// timeout.
    async fn request(&mut self, msg: ClientMessage) -> StoreResult<ServerMessage> {
        let limit = self.request_timeout;
        match tokio::time::timeout(limit, self.exchange(msg)).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(limit.as_millis() as u64)),
        }
    }

    async fn exchange(&mut self, msg: ClientMessage) -> StoreResult<ServerMessage> {
        use futures_util::{SinkExt, StreamExt};
        use tokio_tungstenite::tungstenite::Message;

        let request_id = msg.request_id();
        let json = msg.to_json().map_err(|e| StoreError::Serialization(e.to_string()))?;

        let ws = self.ws.as_mut().ok_or(StoreError::ConnectionClosed)?;
        if let Err(e) = ws.sink.send(Message::Text(json.into())).await {
            // Connection is broken, clear it
            self.ws = None;
            return Err(StoreError::SendFailed(e.to_string()));
        }

        loop {
            let ws = self.ws.as_mut().ok_or(StoreError::ConnectionClosed)?;
            match ws.stream.next().await {
                Some(Ok(Message::Text(text))) => match ServerMessage::from_json(&text) {
                    Ok(reply) if reply.request_id() == Some(request_id) => return Ok(reply),
                    Ok(ServerMessage::Error { request_id: None, message }) => {
                        warn!(%message, "remote store error");
                    }
                    Ok(other) => debug!(?other, request_id, "skipping unrelated frame"),
                    Err(e) => warn!(error = %e, "skipping malformed frame"),
                },
                Some(Ok(Message::Close(_))) | None => {
                    self.ws = None;
                    return Err(StoreError::ConnectionClosed);
                }
                Some(Ok(_)) => {
                    // Ignore ping/pong and binary frames
                    continue;
                }
                Some(Err(e)) => {
                    // Connection is broken, clear it
                    self.ws = None;
                    return Err(StoreError::ReceiveFailed(e.to_string()));
                }
            }
        }
    }

    /// Sends a mutation and expects an `ack`.
    async fn mutate(&mut self, msg: ClientMessage) -> StoreResult<()> {
        match self.request(msg).await? {
            ServerMessage::Ack { .. } => Ok(()),
            ServerMessage::Error { message, .. } => Err(StoreError::Rejected(message)),
            other => Err(StoreError::ReceiveFailed(format!("unexpected reply: {other:?}"))),
        }
    }
}

impl RemoteStore for WebSocketStore {
    fn connect(&mut self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            use futures_util::StreamExt;

            let limit = self.request_timeout;
            let connecting = tokio_tungstenite::connect_async(self.url.as_str());
            let (ws_stream, _) = match tokio::time::timeout(limit, connecting).await {
                Ok(result) => result.map_err(|e| StoreError::ConnectionFailed(e.to_string()))?,
                Err(_) => {
                    return Err(StoreError::ConnectionFailed(format!(
                        "no handshake within {}ms",
                        limit.as_millis()
                    )));
                }
            };

            let (sink, stream) = ws_stream.split();
            self.ws = Some(WebSocketConnection { sink, stream });

            // The store must answer a ping before the connection counts
            let id = self.next_id();
            match self.request(ClientMessage::ping(id)).await {
                Ok(ServerMessage::Pong { .. }) => Ok(()),
                Ok(other) => {
                    self.ws = None;
                    Err(StoreError::ConnectionFailed(format!("unexpected handshake reply: {other:?}")))
                }
                Err(e) => {
                    self.ws = None;
                    Err(StoreError::ConnectionFailed(e.to_string()))
                }
            }
        })
    }

    fn disconnect(&mut self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut ws) = self.ws.take() {
                use futures_util::SinkExt;
                if let Err(e) = ws.sink.close().await {
                    debug!(error = %e, "close failed");
                }
            }
            Ok(())
        })
    }

    fn is_connected(&self) -> bool {
        self.ws.is_some()
    }

    fn upsert(&mut self, row: Row, conflict_key: ConflictKey) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let id = self.next_id();
            self.mutate(ClientMessage::upsert(id, &row, conflict_key)).await
        })
    }

    fn delete(&mut self, key: RowKey) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let id = self.next_id();
            self.mutate(ClientMessage::delete(id, &key)).await
        })
    }

    fn fetch_all(&mut self, table: Table, user_id: String) -> StoreFuture<'_, Vec<Row>> {
        Box::pin(async move {
            let id = self.next_id();
            let values = match self.request(ClientMessage::fetch(id, table, user_id)).await? {
                ServerMessage::Rows { rows, .. } => rows,
                ServerMessage::Error { message, .. } => return Err(StoreError::Rejected(message)),
                other => {
                    return Err(StoreError::ReceiveFailed(format!("unexpected reply: {other:?}")))
                }
            };

            let mut rows = Vec::with_capacity(values.len());
            for value in values {
                match Row::from_value(table, value) {
                    Ok(row) => rows.push(row),
                    Err(e) => warn!(%table, error = %e, "skipping malformed row"),
                }
            }
            Ok(rows)
        })
    }
}
