// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Hybrid logical clock used to mint operation ids.
//!
//! Each id combines wall clock milliseconds with a logical counter and the
//! device's node id, so ids stay unique and strictly increasing even when
//! the wall clock stalls or steps backwards.
//!
//! Format: `{wall_ms}-{counter}-{node_id}`
//!
//! Ordering rules:
//! 1. Higher wall_ms wins
//! 2. If wall_ms equal, higher counter wins
//! 3. If both equal, higher node_id wins

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// A Hybrid Logical Clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hlc {
    /// Wall clock time in milliseconds since Unix epoch.
    pub wall_ms: u64,
    /// Logical counter for ids minted within the same millisecond.
    pub counter: u32,
    /// Node identifier for deterministic tiebreaking.
    pub node_id: u32,
}

impl Hlc {
    pub fn new(wall_ms: u64, counter: u32, node_id: u32) -> Self {
        Hlc { wall_ms, counter, node_id }
    }

    /// The smallest possible timestamp.
    pub fn min() -> Self {
        Hlc { wall_ms: 0, counter: 0, node_id: 0 }
    }
}

impl Ord for Hlc {
    fn cmp(&self, other: &Self) -> Ordering {
        self.wall_ms
            .cmp(&other.wall_ms)
            .then_with(|| self.counter.cmp(&other.counter))
            .then_with(|| self.node_id.cmp(&other.node_id))
    }
}

impl PartialOrd for Hlc {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Hlc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wall_ms, self.counter, self.node_id)
    }
}

impl FromStr for Hlc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(Error::InvalidOpId(format!(
                "expected format 'wall_ms-counter-node_id', got '{s}'"
            )));
        }

        let wall_ms = parts[0]
            .parse::<u64>()
            .map_err(|_| Error::InvalidOpId(format!("invalid wall_ms '{}' in '{s}'", parts[0])))?;

        let counter = parts[1]
            .parse::<u32>()
            .map_err(|_| Error::InvalidOpId(format!("invalid counter '{}' in '{s}'", parts[1])))?;

        let node_id = parts[2]
            .parse::<u32>()
            .map_err(|_| Error::InvalidOpId(format!("invalid node_id '{}' in '{s}'", parts[2])))?;

        Ok(Hlc::new(wall_ms, counter, node_id))
    }
}

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

impl<C: ClockSource> ClockSource for &C {
    fn now_ms(&self) -> u64 {
        (*self).now_ms()
    }
}

/// Mints strictly increasing operation ids.
pub struct IdClock<C: ClockSource = SystemClock> {
    clock: C,
    node_id: u32,
    last: Mutex<Hlc>,
}

impl IdClock<SystemClock> {
    /// Creates an id clock backed by the system clock.
    pub fn new(node_id: u32) -> Self {
        Self::with_clock(SystemClock, node_id)
    }
}

impl<C: ClockSource> IdClock<C> {
    /// Creates an id clock with a custom clock source.
    pub fn with_clock(clock: C, node_id: u32) -> Self {
        IdClock { clock, node_id, last: Mutex::new(Hlc::min()) }
    }

    pub fn node_id(&self) -> u32 {
        self.node_id
    }

    /// Mints the next id.
    ///
    /// The result is greater than every id previously minted or witnessed
    /// by this clock, even if the wall clock goes backwards.
    pub fn next(&self) -> Hlc {
        let physical = self.clock.now_ms();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        let next = if physical > last.wall_ms {
            Hlc::new(physical, 0, self.node_id)
        } else if last.counter == u32::MAX {
            // Counter exhausted: borrow the next millisecond
            Hlc::new(last.wall_ms + 1, 0, self.node_id)
        } else {
            Hlc::new(last.wall_ms, last.counter + 1, self.node_id)
        };

        *last = next;
        next
    }

    /// Advances the clock past an id minted elsewhere (e.g. one loaded from
    /// a persisted queue written by a previous process).
    pub fn witness(&self, seen: &Hlc) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if seen.wall_ms > last.wall_ms
            || (seen.wall_ms == last.wall_ms && seen.counter > last.counter)
        {
            *last = Hlc::new(seen.wall_ms, seen.counter, self.node_id);
        }
    }
}

#[cfg(test)]
#[path = "hlc_tests.rs"]
mod tests;
