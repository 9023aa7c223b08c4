// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::Error;
use serde::Deserialize;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Doc {
    version: u64,
    names: Vec<String>,
}

fn doc(version: u64) -> Doc {
    Doc { version, names: vec!["a".into(), "b".into()] }
}

#[test]
fn read_missing_file_is_none() {
    let dir = TempDir::new().unwrap();
    let read: Option<Doc> = read_json(&dir.path().join("missing.json")).unwrap();
    assert_eq!(read, None);
}

#[test]
fn read_blank_file_is_none() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("blank.json");
    fs::write(&path, "  \n").unwrap();

    let read: Option<Doc> = read_json(&path).unwrap();
    assert_eq!(read, None);
}

#[test]
fn write_then_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.json");

    write_json(&path, &doc(1)).unwrap();
    assert_eq!(read_json::<Doc>(&path).unwrap(), Some(doc(1)));
}

#[test]
fn write_replaces_previous_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.json");

    write_json(&path, &doc(1)).unwrap();
    write_json(&path, &doc(2)).unwrap();

    assert_eq!(read_json::<Doc>(&path).unwrap(), Some(doc(2)));
    assert!(!temp_path(&path).exists());
}

#[test]
fn failed_write_removes_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.json");
    // A non-empty directory at the target makes the rename fail
    fs::create_dir(&path).unwrap();
    fs::write(path.join("keep"), "x").unwrap();

    assert!(matches!(write_json(&path, &doc(1)), Err(Error::Io(_))));
    assert!(!temp_path(&path).exists());
    assert!(path.join("keep").exists());
}

#[test]
fn parent_directory_can_be_synced() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.json");

    write_json(&path, &doc(4)).unwrap();
    assert!(sync_dir(dir.path()).is_ok());
}

#[test]
fn write_creates_parent_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("doc.json");

    write_json(&path, &doc(3)).unwrap();
    assert!(path.exists());
}

#[test]
fn read_corrupt_file_is_json_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("doc.json");
    fs::write(&path, "{\"version\": 1, \"names\": [").unwrap();

    assert!(matches!(read_json::<Doc>(&path), Err(Error::Json(_))));
}

#[test]
fn temp_path_is_a_sibling() {
    let path = Path::new("/data/.habitline/sync_queue.json");
    assert_eq!(temp_path(path), Path::new("/data/.habitline/sync_queue.json.tmp"));
}
