// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART: &str = "\
Get started:
  hl init --user me                     Initialize in the current directory
  hl done read                          Mark habit 'read' done today
  hl sync                               Replay queued edits to the remote
  hl pull                               Rebuild state from the remote";

#[derive(Parser)]
#[command(name = "hl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "An offline-first habit and sprint tracker")]
#[command(
    long_about = "An offline-first habit and sprint tracker.\n\n\
    Edits are queued locally and replayed to a remote store when it is reachable."
)]
#[command(after_help = QUICKSTART)]
pub struct Cli {
    /// Run as if hl was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Initialize habitline in the current directory
    #[command(after_help = "\
Examples:
  hl init --user me                              Offline-only
  hl init --user me --remote ws://localhost:7890 With a remote store")]
    Init {
        /// User every row is written for
        #[arg(long, value_parser = non_empty_string)]
        user: String,

        /// WebSocket URL of the remote store
        #[arg(long)]
        remote: Option<String>,
    },

    /// Upsert a row given as a JSON object
    #[command(after_help = "\
Examples:
  hl put habits '{\"id\":\"read\",\"name\":\"Read\"}'
  hl put streaks '{\"habit_id\":\"read\",\"current_count\":3}'
  hl put habits '{\"id\":\"read\",\"name\":\"Read\"}' --on-conflict id,user_id")]
    Put {
        /// Table name (habits, daily_logs, streaks, xp, sprints, tasks, reflections)
        table: String,

        /// Row as a JSON object; user_id is filled in when absent
        json: String,

        /// Comma-separated conflict-key columns (defaults to the table's key)
        #[arg(long, value_name = "COLS")]
        on_conflict: Option<String>,
    },

    /// Delete the row identified by the key columns of a JSON object
    #[command(after_help = "\
Examples:
  hl rm tasks '{\"id\":\"t1\"}'
  hl rm daily_logs '{\"habit_id\":\"read\",\"log_date\":\"2026-03-01\"}'")]
    Rm {
        /// Table name
        table: String,

        /// JSON object holding the row's key columns
        json: String,
    },

    /// Mark a habit done for a day
    Done {
        /// Habit id
        #[arg(value_parser = non_empty_string)]
        habit: String,

        /// Day to record (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Measured value (pages, minutes, ...)
        #[arg(long)]
        value: Option<i64>,

        /// Free-text note
        #[arg(long)]
        note: Option<String>,
    },

    /// Clear a habit's entry for a day
    Undo {
        /// Habit id
        #[arg(value_parser = non_empty_string)]
        habit: String,

        /// Day to clear (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Write a reflection for a period
    #[command(after_help = "\
Examples:
  hl reflect weekly \"Good focus this week\"
  hl reflect sprint \"Shipped the planner\" --date 2026-03-02")]
    Reflect {
        /// Period (daily, weekly, monthly, sprint)
        period: String,

        /// Reflection text
        content: String,

        /// First day of the period (defaults to the start of the current period)
        #[arg(long)]
        date: Option<String>,
    },

    /// Connect to the remote and replay the offline queue
    Sync,

    /// Inspect or clear the offline queue
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Fetch every table from the remote and print the rebuilt state
    Pull {
        /// Output format
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

/// Offline queue commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum QueueCommand {
    /// Show pending op count and queue location
    Status,
    /// List pending ops in replay order
    #[command(after_help = "\
Examples:
  hl queue list --action delete        Only queued deletes
  hl queue list --table daily_logs     Only check-ins")]
    List {
        /// Only ops with this action (upsert, delete)
        #[arg(long)]
        action: Option<String>,

        /// Only ops against this table
        #[arg(long)]
        table: Option<String>,

        /// Output format
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Drop one pending op by id (as shown by `hl queue list`)
    Drop {
        /// Op id (wall_ms-counter-node_id)
        id: String,
    },
    /// Drop every pending op
    Clear,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
