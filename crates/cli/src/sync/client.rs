// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync client: the caller-facing side of the offline sync engine.
//!
//! Provides a high-level interface for:
//! - Connecting to the remote store with exponential backoff
//! - Submitting mutations (write-through, with offline queue fallback)
//! - Flushing the offline queue
//! - Rebuilding application state from a bulk fetch

use std::path::Path;
use std::time::Duration;

use hl_core::{reconstruct, AppState, Mutation, Op, OpDraft, RowsByTable, Table};
use tracing::{debug, info};

use super::flush::{flush, FlushPolicy, FlushReport};
use super::queue::{OfflineQueue, QueueError};
use super::store::{RemoteStore, StoreError, WebSocketStore};

/// Configuration for the sync client.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// URL of the remote store.
    pub url: String,
    /// Maximum reconnection attempts.
    pub max_retries: u32,
    /// Maximum delay between reconnection attempts (seconds).
    pub max_delay_secs: u64,
    /// Initial delay for exponential backoff (milliseconds).
    pub initial_delay_ms: u64,
    /// Upper bound for one request/response round trip (milliseconds).
    pub request_timeout_ms: u64,
    /// Retry ceiling for queued ops.
    pub flush: FlushPolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            url: "ws://localhost:7890".to_string(),
            max_retries: 10,
            max_delay_secs: 30,
            initial_delay_ms: 100,
            request_timeout_ms: 10_000,
            flush: FlushPolicy::default(),
        }
    }
}

/// Error type for sync client operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Remote store error.
    #[error("remote store error: {0}")]
    Store(#[from] StoreError),

    /// Queue error.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    /// Not connected.
    #[error("not connected to remote store")]
    NotConnected,

    /// Max retries exceeded.
    #[error("max reconnection retries exceeded")]
    MaxRetriesExceeded,
}

/// Result type for sync client operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// State of the sync client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected.
    Disconnected,
    /// Attempting to connect.
    Connecting,
    /// Connected to the remote store.
    Connected,
    /// Reconnecting after disconnect.
    Reconnecting { attempt: u32 },
}

/// What happened to a submitted mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    /// Applied directly by the remote store.
    Synced,
    /// Stored in the offline queue for a later flush.
    Queued(Op),
}

/// Sync client for one user's device.
pub struct SyncClient<S: RemoteStore = WebSocketStore> {
    /// Configuration.
    config: SyncConfig,
    /// Remote store.
    store: S,
    /// Offline queue.
    queue: OfflineQueue,
    /// Connection state.
    state: ConnectionState,
}

impl SyncClient<WebSocketStore> {
    /// Create a new sync client with the WebSocket store.
    pub fn new(config: SyncConfig, queue_path: &Path, node_id: u32) -> Self {
        let store = WebSocketStore::new(
            config.url.clone(),
            Duration::from_millis(config.request_timeout_ms),
        );
        Self::with_store(config, store, queue_path, node_id)
    }
}

impl<S: RemoteStore> SyncClient<S> {
    /// Create a new sync client with a custom store (for testing).
    pub fn with_store(config: SyncConfig, store: S, queue_path: &Path, node_id: u32) -> Self {
        SyncClient {
            config,
            store,
            queue: OfflineQueue::open(queue_path, node_id),
            state: ConnectionState::Disconnected,
        }
    }

    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected && self.store.is_connected()
    }

    /// Drops back to `Disconnected` once the store has lost its connection.
    fn refresh_state(&mut self) {
        if self.state == ConnectionState::Connected && !self.store.is_connected() {
            debug!("remote store dropped the connection");
            self.state = ConnectionState::Disconnected;
        }
    }

    pub fn queue(&self) -> &OfflineQueue {
        &self.queue
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Connect to the remote store.
    pub async fn connect(&mut self) -> SyncResult<()> {
        self.state = ConnectionState::Connecting;

        match self.store.connect().await {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                Ok(())
            }
            Err(e) => {
                self.state = ConnectionState::Disconnected;
                Err(e.into())
            }
        }
    }

    /// Disconnect from the remote store.
    pub async fn disconnect(&mut self) -> SyncResult<()> {
        self.store.disconnect().await?;
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    /// Connect with exponential backoff retry.
    pub async fn connect_with_retry(&mut self) -> SyncResult<()> {
        let mut attempt = 0;
        let mut delay_ms = self.config.initial_delay_ms;

        loop {
            attempt += 1;
            self.state = ConnectionState::Reconnecting { attempt };

            match self.store.connect().await {
                Ok(()) => {
                    self.state = ConnectionState::Connected;
                    return Ok(());
                }
                Err(e) if attempt >= self.config.max_retries => {
                    debug!(attempt, error = %e, "giving up on connect");
                    self.state = ConnectionState::Disconnected;
                    return Err(SyncError::MaxRetriesExceeded);
                }
                Err(e) => {
                    debug!(attempt, delay_ms, error = %e, "connect failed, backing off");
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                    delay_ms = std::cmp::min(delay_ms * 2, self.config.max_delay_secs * 1000);
                }
            }
        }
    }

    /// Queue a mutation without trying the remote store.
    pub fn enqueue(&self, draft: OpDraft) -> SyncResult<Op> {
        Ok(self.queue.enqueue(draft)?)
    }

    /// Apply a mutation now if possible, otherwise queue it.
    ///
    /// Writes go straight to the store only while connected and with an
    /// empty queue, so a direct write never overtakes queued ones.
    pub async fn submit(&mut self, draft: OpDraft) -> SyncResult<Submitted> {
        self.refresh_state();
        if !self.is_connected() || self.queue.has_pending() {
            return Ok(Submitted::Queued(self.enqueue(draft)?));
        }

        let result = match &draft.mutation {
            Mutation::Upsert { row } => {
                let conflict_key =
                    draft.conflict_key.clone().unwrap_or_else(|| row.table().conflict_key());
                self.store.upsert(row.clone(), conflict_key).await
            }
            Mutation::Delete { key } if !key.is_complete() => Ok(()),
            Mutation::Delete { key } => self.store.delete(key.clone()).await,
        };

        match result {
            Ok(()) => Ok(Submitted::Synced),
            Err(e) => {
                debug!(error = %e, "write-through failed, queueing");
                self.refresh_state();
                Ok(Submitted::Queued(self.enqueue(draft)?))
            }
        }
    }

    /// Run one flush pass over the offline queue.
    pub async fn flush(&mut self) -> FlushReport {
        let report = flush(&self.queue, &mut self.store, self.config.flush).await;
        self.refresh_state();
        report
    }

    /// Connect if needed, then flush.
    pub async fn sync(&mut self) -> SyncResult<FlushReport> {
        self.refresh_state();
        if !self.is_connected() {
            self.connect_with_retry().await?;
        }
        Ok(self.flush().await)
    }

    pub fn has_pending(&self) -> bool {
        self.queue.has_pending()
    }

    /// Get the number of pending operations in the offline queue.
    pub fn pending_ops_count(&self) -> usize {
        self.queue.len()
    }

    /// Queued ops in replay order.
    pub fn peek(&self) -> Vec<Op> {
        self.queue.peek()
    }

    /// Drop every queued op.
    pub fn clear_queue(&self) -> SyncResult<()> {
        Ok(self.queue.clear()?)
    }

    /// Fetch every table for `user_id` and rebuild the application state.
    pub async fn refresh(&mut self, user_id: &str) -> SyncResult<AppState> {
        self.refresh_state();
        if !self.is_connected() {
            return Err(SyncError::NotConnected);
        }

        let mut rows = RowsByTable::new();
        for table in Table::ALL {
            let fetched = self.store.fetch_all(table, user_id.to_string()).await?;
            debug!(%table, rows = fetched.len(), "fetched");
            rows.insert(table, fetched);
        }

        let state = self.reconstruct(&rows);
        info!(
            habits = state.habits.len(),
            sprints = state.sprints.len(),
            "state rebuilt from remote"
        );
        Ok(state)
    }

    /// Rebuild the application state from already fetched rows.
    pub fn reconstruct(&self, rows: &RowsByTable) -> AppState {
        reconstruct(rows)
    }
}
