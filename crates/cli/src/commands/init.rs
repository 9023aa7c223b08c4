// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use crate::config::{init_work_dir, Config, RemoteConfig};
use crate::error::Result;

pub fn run(target_path: &Path, user: &str, remote: Option<String>) -> Result<()> {
    let mut config = Config::new(user)?;
    if let Some(url) = remote {
        let remote = RemoteConfig::new(url);
        remote.validate_url()?;
        config.remote = Some(remote);
    }

    let work_dir = init_work_dir(target_path, &config)?;

    println!("Initialized habitline at {}", work_dir.display());
    println!("User: {}", config.user_id);
    match config.remote_url() {
        Some(url) => println!("Remote: {}", url),
        None => println!("Remote: none (edits stay queued until a [remote] is configured)"),
    }

    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
