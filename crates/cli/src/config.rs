// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.habitline/config.toml` and includes:
//! - `user_id`: The user every built operation is attributed to
//! - `node_id`: Tiebreaker for op ids minted on this device
//! - `remote`: Optional remote store settings; absent means offline-only

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::sync::{FlushPolicy, SyncConfig, MAX_RETRIES};

const WORK_DIR_NAME: &str = ".habitline";
const CONFIG_FILE_NAME: &str = "config.toml";
const QUEUE_FILE_NAME: &str = "sync_queue.json";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Project configuration stored in `.habitline/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Owner of every row this client writes.
    pub user_id: String,
    /// Op-id tiebreaker for this device (default: 1).
    #[serde(default = "default_node_id")]
    pub node_id: u32,
    /// Remote store configuration (optional - if absent, ops stay queued).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
}

/// Remote store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// WebSocket URL of the remote store (`ws://...` or `wss://...`).
    pub url: String,
    /// Flush passes an op may fail before it is abandoned (default: 5).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Maximum reconnection attempts before giving up (default: 10).
    #[serde(default = "default_reconnect_max_retries")]
    pub reconnect_max_retries: u32,
    /// Maximum delay between reconnection attempts in seconds (default: 30).
    #[serde(default = "default_reconnect_max_delay_secs")]
    pub reconnect_max_delay_secs: u64,
    /// First reconnection delay in milliseconds (default: 100).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Max time to wait for one response in milliseconds (default: 10000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_node_id() -> u32 {
    1
}

fn default_max_retries() -> u32 {
    MAX_RETRIES
}

fn default_reconnect_max_retries() -> u32 {
    10
}

fn default_reconnect_max_delay_secs() -> u64 {
    30
}

fn default_initial_delay_ms() -> u64 {
    100
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl RemoteConfig {
    /// Creates a remote config with default tuning for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            max_retries: default_max_retries(),
            reconnect_max_retries: default_reconnect_max_retries(),
            reconnect_max_delay_secs: default_reconnect_max_delay_secs(),
            initial_delay_ms: default_initial_delay_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }

    /// Validates that the URL is a WebSocket URL.
    pub fn validate_url(&self) -> Result<()> {
        if self.url.starts_with("ws://") || self.url.starts_with("wss://") {
            Ok(())
        } else {
            Err(Error::InvalidRemoteUrl(self.url.clone()))
        }
    }

    /// Settings for a [`SyncClient`](crate::sync::SyncClient) talking to this remote.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            url: self.url.clone(),
            max_retries: self.reconnect_max_retries,
            max_delay_secs: self.reconnect_max_delay_secs,
            initial_delay_ms: self.initial_delay_ms,
            request_timeout_ms: self.request_timeout_ms,
            flush: FlushPolicy {
                max_retries: self.max_retries,
            },
        }
    }
}

impl Config {
    /// Creates a new offline-only config for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldEmpty`] if `user_id` is blank.
    pub fn new(user_id: impl Into<String>) -> Result<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(Error::FieldEmpty { field: "user_id" });
        }
        Ok(Config {
            user_id,
            node_id: default_node_id(),
            remote: None,
        })
    }

    /// Loads configuration from the given `.habitline/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        if config.user_id.trim().is_empty() {
            return Err(Error::Config("user_id cannot be empty".to_string()));
        }
        if let Some(remote) = &config.remote {
            remote.validate_url()?;
        }
        Ok(config)
    }

    /// Returns the remote URL if configured.
    pub fn remote_url(&self) -> Option<&str> {
        self.remote.as_ref().map(|r| r.url.as_str())
    }

    /// Sync settings for the configured remote; offline-only configs
    /// get the defaults, which keep the standard retry ceiling.
    pub fn sync_config(&self) -> SyncConfig {
        match &self.remote {
            Some(remote) => remote.sync_config(),
            None => SyncConfig::default(),
        }
    }

    /// Saves configuration to the given `.habitline/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .habitline directory by walking up from `start`.
pub fn find_work_dir(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Path of the offline queue inside a work directory.
pub fn queue_path(work_dir: &Path) -> PathBuf {
    work_dir.join(QUEUE_FILE_NAME)
}

/// Initialize a new .habitline directory at the given path
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.join(CONFIG_FILE_NAME).exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// The queue and its temp file are device-local state.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    let content = "# Device-local offline queue\nsync_queue.json\nsync_queue.json.tmp\n";
    fs::write(&gitignore_path, content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
