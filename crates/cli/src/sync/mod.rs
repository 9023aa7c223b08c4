// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline sync engine.
//!
//! Mutations are queued locally while the remote store is unreachable and
//! replayed later; application state is rebuilt from a bulk fetch.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Client    │────►│ RemoteStore │────►│   Remote    │
//! │ (SyncClient)│◄────│   (trait)   │◄────│    Store    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   ▲
//!        ▼                   │
//! ┌─────────────┐     ┌─────────────┐
//! │   Queue     │────►│    Flush    │
//! │(OfflineQueue)│    │   (engine)  │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Features
//!
//! - Durable offline queue, replaced atomically on every save
//! - Flush passes with a bounded per-op retry ceiling
//! - Automatic reconnect with exponential backoff
//! - Injectable store trait for testing

mod client;
mod flush;
mod queue;
mod store;

pub use client::{ConnectionState, Submitted, SyncClient, SyncConfig, SyncError, SyncResult};
pub use flush::{flush, FlushPolicy, FlushReport, MAX_RETRIES};
pub use queue::{OfflineQueue, Queue, QueueError, QueueResult};
pub use store::{RemoteStore, StoreError, StoreFuture, StoreResult, WebSocketStore};

#[cfg(test)]
mod test_helpers;

#[cfg(test)]
mod client_tests;
