// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::error::Error;
use tempfile::TempDir;

#[test]
fn test_init_offline() {
    let temp = TempDir::new().unwrap();

    run(temp.path(), "u1", None).unwrap();

    let config = Config::load(&temp.path().join(".habitline")).unwrap();
    assert_eq!(config.user_id, "u1");
    assert!(config.remote.is_none());
}

#[test]
fn test_init_with_remote() {
    let temp = TempDir::new().unwrap();

    run(temp.path(), "u1", Some("wss://sync.example.com".into())).unwrap();

    let config = Config::load(&temp.path().join(".habitline")).unwrap();
    assert_eq!(config.remote_url(), Some("wss://sync.example.com"));
    assert_eq!(config.remote.unwrap().max_retries, 5);
}

#[test]
fn test_init_rejects_non_websocket_remote() {
    let temp = TempDir::new().unwrap();

    let err = run(temp.path(), "u1", Some("https://example.com".into())).unwrap_err();

    assert!(matches!(err, Error::InvalidRemoteUrl(_)));
    assert!(!temp.path().join(".habitline").exists());
}

#[test]
fn test_init_twice_fails() {
    let temp = TempDir::new().unwrap();
    run(temp.path(), "u1", None).unwrap();

    let err = run(temp.path(), "u2", None).unwrap_err();

    assert!(matches!(err, Error::AlreadyInitialized(_)));
    let config = Config::load(&temp.path().join(".habitline")).unwrap();
    assert_eq!(config.user_id, "u1");
}
