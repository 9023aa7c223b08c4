// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rebuild application state from the remote store and print it.

use chrono::NaiveDate;
use hl_core::{AppState, TaskNode};
use tracing::debug;

use super::{runtime, today, Workspace};
use crate::cli::OutputFormat;
use crate::error::Result;

pub fn run(ws: &Workspace, output: OutputFormat) -> Result<()> {
    ws.remote()?;
    let mut client = ws.client();
    let user_id = ws.config.user_id.clone();

    let rt = runtime()?;
    let state = rt.block_on(async {
        client.connect_with_retry().await?;
        let state = client.refresh(&user_id).await;
        if let Err(e) = client.disconnect().await {
            debug!(error = %e, "disconnect failed");
        }
        state
    })?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&state)?),
        OutputFormat::Text => print!("{}", render(&state, today())),
    }
    if client.has_pending() {
        eprintln!(
            "note: {} queued op(s) are not reflected yet; run 'hl sync' first",
            client.pending_ops_count()
        );
    }
    Ok(())
}

/// Human-readable summary of the state; `today` selects the check-in line.
pub(crate) fn render(state: &AppState, today: NaiveDate) -> String {
    let mut lines = vec!["Habits:".to_string()];
    let habits = state.habits_ordered();
    if habits.is_empty() {
        lines.push("  (none)".to_string());
    }
    for habit in habits {
        let streak = state.streak(&habit.id);
        let mut line = format!(
            "  {}  {}  streak {} (best {})",
            habit.id, habit.name, streak.current, streak.longest
        );
        if habit.archived {
            line.push_str("  [archived]");
        }
        lines.push(line);
    }

    let done = state.completions_on(today);
    let done = if done.is_empty() { "-".to_string() } else { done.join(", ") };
    lines.push(format!("Done {}: {}", today, done));
    lines.push(format!("XP: {} (level {})", state.xp.total, state.xp.level));

    if !state.sprints.is_empty() {
        lines.push("Sprints:".to_string());
    }
    for view in state.sprints.values() {
        let sprint = &view.sprint;
        let total: usize = view.tasks.iter().map(TaskNode::len).sum();
        let done: usize = view.tasks.iter().map(TaskNode::done_count).sum();
        let end = sprint.end_date.map(|d| d.to_string()).unwrap_or_default();
        lines.push(format!(
            "  {}  {}  {}..{}  {}/{} done",
            sprint.id, sprint.title, sprint.start_date, end, done, total
        ));
        for node in &view.tasks {
            render_task(&mut lines, node, 2);
        }
    }

    if !state.backlog.is_empty() {
        lines.push("Backlog:".to_string());
        for node in &state.backlog {
            render_task(&mut lines, node, 1);
        }
    }

    let reflections: usize = state.reflections.values().map(|by_date| by_date.len()).sum();
    lines.push(format!("Reflections: {}", reflections));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_task(lines: &mut Vec<String>, node: &TaskNode, depth: usize) {
    let mark = if node.task.done { "x" } else { " " };
    lines.push(format!("{}[{}] {}", "  ".repeat(depth), mark, node.task.title));
    for child in &node.children {
        render_task(lines, child, depth + 1);
    }
}

#[cfg(test)]
#[path = "pull_tests.rs"]
mod tests;
