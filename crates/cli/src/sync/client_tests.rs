// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the sync client module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::client::{ConnectionState, Submitted, SyncClient, SyncConfig, SyncError};
use super::flush::FlushPolicy;
use super::store::StoreError;
use super::store_tests::{Call, MockStore};
use super::test_helpers::{habit_draft, streak_draft};
use hl_core::Table;
use tempfile::tempdir;

fn fast_config() -> SyncConfig {
    SyncConfig {
        max_retries: 3,
        initial_delay_ms: 1,
        max_delay_secs: 1,
        ..SyncConfig::default()
    }
}

fn make_client_with_mock(dir: &tempfile::TempDir, store: MockStore) -> SyncClient<MockStore> {
    let queue_path = dir.path().join("sync_queue.json");
    SyncClient::with_store(fast_config(), store, &queue_path, 1)
}

#[tokio::test]
async fn test_client_connect_disconnect() {
    let dir = tempdir().unwrap();
    let mut client = make_client_with_mock(&dir, MockStore::new());

    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert!(!client.is_connected());

    client.connect().await.unwrap();

    assert_eq!(client.state(), ConnectionState::Connected);
    assert!(client.is_connected());

    client.disconnect().await.unwrap();

    assert_eq!(client.state(), ConnectionState::Disconnected);
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_client_connect_failure() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    store.fail_connects(1);
    let mut client = make_client_with_mock(&dir, store);

    let result = client.connect().await;

    assert!(matches!(result, Err(SyncError::Store(StoreError::ConnectionFailed(_)))));
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_connect_with_retry_recovers() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    store.fail_connects(2);
    let mut client = make_client_with_mock(&dir, store);

    client.connect_with_retry().await.unwrap();

    assert!(client.is_connected());
}

#[tokio::test]
async fn test_connect_with_retry_gives_up() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    store.fail_connects(10);
    let mut client = make_client_with_mock(&dir, store);

    let result = client.connect_with_retry().await;

    assert!(matches!(result, Err(SyncError::MaxRetriesExceeded)));
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_submit_when_connected_writes_through() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    let mut client = make_client_with_mock(&dir, store.clone());
    client.connect().await.unwrap();

    let outcome = client.submit(streak_draft("h1", 3)).await.unwrap();

    assert_eq!(outcome, Submitted::Synced);
    assert_eq!(client.pending_ops_count(), 0);
    assert_eq!(store.rows(Table::Streaks).len(), 1);
}

#[tokio::test]
async fn test_submit_when_disconnected_queues() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    let mut client = make_client_with_mock(&dir, store.clone());

    let outcome = client.submit(streak_draft("h1", 3)).await.unwrap();

    assert!(matches!(outcome, Submitted::Queued(ref op) if op.retry_count == 0));
    assert!(client.has_pending());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_submit_failure_queues() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    let mut client = make_client_with_mock(&dir, store.clone());
    client.connect().await.unwrap();
    store.drop_connection();

    let outcome = client.submit(habit_draft("h1", "Read")).await.unwrap();

    assert!(matches!(outcome, Submitted::Queued(_)));
    assert_eq!(client.pending_ops_count(), 1);
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_submit_does_not_overtake_queue() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    let mut client = make_client_with_mock(&dir, store.clone());

    client.enqueue(habit_draft("h1", "Read")).unwrap();
    client.connect().await.unwrap();
    let outcome = client.submit(habit_draft("h1", "Read more")).await.unwrap();

    assert!(matches!(outcome, Submitted::Queued(_)));
    assert_eq!(client.pending_ops_count(), 2);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_sync_connects_and_flushes() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    store.fail_connects(1);
    let mut client = make_client_with_mock(&dir, store.clone());

    client.enqueue(habit_draft("h1", "Read")).unwrap();
    client.enqueue(streak_draft("h1", 1)).unwrap();

    let report = client.sync().await.unwrap();

    assert_eq!((report.synced, report.failed), (2, 0));
    assert!(!client.has_pending());
    assert_eq!(store.calls(), vec![Call::Upsert(Table::Habits), Call::Upsert(Table::Streaks)]);
}

#[tokio::test]
async fn test_sync_uses_configured_ceiling() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    store.reject_all(StoreError::Rejected("no".into()));
    let config = SyncConfig { flush: FlushPolicy { max_retries: 1 }, ..fast_config() };
    let mut client =
        SyncClient::with_store(config, store, &dir.path().join("sync_queue.json"), 1);

    let op = client.enqueue(habit_draft("h1", "Read")).unwrap();
    let report = client.sync().await.unwrap();

    assert_eq!(report.abandoned, vec![op.id]);
    assert!(!client.has_pending());
}

#[tokio::test]
async fn test_peek_and_clear_queue() {
    let dir = tempdir().unwrap();
    let client = make_client_with_mock(&dir, MockStore::new());

    let a = client.enqueue(habit_draft("h1", "Read")).unwrap();
    let b = client.enqueue(habit_draft("h2", "Run")).unwrap();
    assert_eq!(client.peek(), vec![a, b]);

    client.clear_queue().unwrap();
    assert!(client.peek().is_empty());
}

#[tokio::test]
async fn test_refresh_requires_connection() {
    let dir = tempdir().unwrap();
    let mut client = make_client_with_mock(&dir, MockStore::new());

    assert!(matches!(client.refresh("u1").await, Err(SyncError::NotConnected)));
}

#[tokio::test]
async fn test_refresh_after_dropped_connection() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    let mut client = make_client_with_mock(&dir, store.clone());
    client.connect().await.unwrap();
    store.drop_connection();

    assert!(matches!(client.refresh("u1").await, Err(SyncError::NotConnected)));
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_flush_notices_dropped_connection() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    let mut client = make_client_with_mock(&dir, store.clone());
    client.enqueue(habit_draft("h1", "Read")).unwrap();
    client.connect().await.unwrap();
    store.drop_connection();

    let report = client.flush().await;

    assert_eq!((report.synced, report.failed), (0, 1));
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_sync_reconnects_after_dropped_connection() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    let mut client = make_client_with_mock(&dir, store.clone());
    client.enqueue(habit_draft("h1", "Read")).unwrap();
    client.connect().await.unwrap();
    store.drop_connection();

    let report = client.sync().await.unwrap();

    assert_eq!((report.synced, report.failed), (1, 0));
    assert_eq!(client.state(), ConnectionState::Connected);
    assert!(!client.has_pending());
}

#[tokio::test]
async fn test_refresh_fetches_every_table() {
    let dir = tempdir().unwrap();
    let store = MockStore::new();
    let mut client = make_client_with_mock(&dir, store.clone());
    client.connect().await.unwrap();
    client.submit(habit_draft("h1", "Read")).await.unwrap();
    client.submit(streak_draft("h1", 4)).await.unwrap();

    let state = client.refresh("u1").await.unwrap();

    assert_eq!(state.habits.len(), 1);
    assert_eq!(state.streak("h1").current, 4);
    let fetches = store.calls().into_iter().filter(|c| matches!(c, Call::Fetch(_))).count();
    assert_eq!(fetches, Table::ALL.len());
}
