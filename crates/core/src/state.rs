// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rebuild the application state from bulk-fetched remote rows.
//!
//! Fold rules:
//! - Each table folds independently into its own slice of [`AppState`]
//! - Rows are keyed by their identity columns; when an identity shows up
//!   more than once the greatest row wins, so row order never matters
//! - A null or dangling foreign key means "no data yet", never an error
//! - Lists with an explicit `sort_order` column are materialized in that
//!   order (ties broken by id)
//!
//! [`reconstruct`] is pure: no I/O, no clock.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::row::{
    DailyLogRow, HabitRow, Period, ReflectionRow, Row, SprintRow, StreakRow, TaskRow, XpRow,
};
use crate::table::Table;

/// Row collections as fetched, keyed by the table they were fetched from.
pub type RowsByTable = BTreeMap<Table, Vec<Row>>;

/// Streak counters for one habit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub current: u32,
    pub longest: u32,
    pub last_completed: Option<NaiveDate>,
}

impl From<StreakRow> for Streak {
    fn from(row: StreakRow) -> Self {
        Streak {
            current: row.current_count,
            longest: row.longest_count,
            last_completed: row.last_completed,
        }
    }
}

/// One habit's entry on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayEntry {
    pub completed: bool,
    pub value: Option<i64>,
    pub note: Option<String>,
}

impl From<DailyLogRow> for DayEntry {
    fn from(row: DailyLogRow) -> Self {
        DayEntry { completed: row.completed, value: row.value, note: row.note }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Xp {
    pub total: u64,
    pub level: u32,
}

/// A task with its subtasks in `sort_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskNode {
    pub task: TaskRow,
    pub children: Vec<TaskNode>,
}

impl TaskNode {
    /// Number of tasks in this subtree, including this one.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(TaskNode::len).sum::<usize>()
    }

    /// Number of done tasks in this subtree.
    pub fn done_count(&self) -> usize {
        usize::from(self.task.done) + self.children.iter().map(TaskNode::done_count).sum::<usize>()
    }
}

/// A sprint and its task forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SprintView {
    pub sprint: SprintRow,
    pub tasks: Vec<TaskNode>,
}

/// Complete client-side state rebuilt from remote rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppState {
    pub habits: BTreeMap<String, HabitRow>,
    pub streaks: BTreeMap<String, Streak>,
    /// Daily log entries by date, then by habit id.
    pub calendar: BTreeMap<NaiveDate, BTreeMap<String, DayEntry>>,
    pub xp: Xp,
    pub sprints: BTreeMap<String, SprintView>,
    /// Root tasks without a (known) sprint.
    pub backlog: Vec<TaskNode>,
    pub reflections: BTreeMap<Period, BTreeMap<NaiveDate, ReflectionRow>>,
}

impl AppState {
    /// Habits in display order.
    pub fn habits_ordered(&self) -> Vec<&HabitRow> {
        let mut habits: Vec<&HabitRow> = self.habits.values().collect();
        habits.sort_by(|a, b| (a.sort_order, &a.id).cmp(&(b.sort_order, &b.id)));
        habits
    }

    /// Streak for a habit; zero when the habit has no streak row yet.
    pub fn streak(&self, habit_id: &str) -> Streak {
        self.streaks.get(habit_id).cloned().unwrap_or_default()
    }

    /// Habit ids completed on `date`.
    pub fn completions_on(&self, date: NaiveDate) -> Vec<&str> {
        self.calendar
            .get(&date)
            .map(|day| {
                day.iter()
                    .filter(|(_, entry)| entry.completed)
                    .map(|(habit_id, _)| habit_id.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Dates on which a habit was completed, ascending.
    pub fn completed_days(&self, habit_id: &str) -> Vec<NaiveDate> {
        self.calendar
            .iter()
            .filter(|(_, day)| day.get(habit_id).is_some_and(|e| e.completed))
            .map(|(date, _)| *date)
            .collect()
    }

    pub fn reflection(&self, period: Period, start: NaiveDate) -> Option<&ReflectionRow> {
        self.reflections.get(&period).and_then(|by_date| by_date.get(&start))
    }
}

/// Folds fetched rows into one [`AppState`].
///
/// Rows filed under a table other than their own are ignored.
pub fn reconstruct(rows: &RowsByTable) -> AppState {
    let mut habits: BTreeMap<String, HabitRow> = BTreeMap::new();
    let mut streaks: BTreeMap<String, StreakRow> = BTreeMap::new();
    let mut logs: BTreeMap<(NaiveDate, String), DailyLogRow> = BTreeMap::new();
    let mut xp: Option<XpRow> = None;
    let mut sprints: BTreeMap<String, SprintRow> = BTreeMap::new();
    let mut tasks: BTreeMap<String, TaskRow> = BTreeMap::new();
    let mut reflections: BTreeMap<(Period, NaiveDate), ReflectionRow> = BTreeMap::new();

    for (table, table_rows) in rows {
        for row in table_rows.iter().filter(|r| r.table() == *table) {
            match row {
                Row::Habits(r) => keep_greatest(&mut habits, r.id.clone(), r),
                Row::DailyLogs(r) => {
                    keep_greatest(&mut logs, (r.log_date, r.habit_id.clone()), r)
                }
                Row::Streaks(r) => keep_greatest(&mut streaks, r.habit_id.clone(), r),
                Row::Xp(r) => match &xp {
                    Some(current) if current >= r => {}
                    _ => xp = Some(r.clone()),
                },
                Row::Sprints(r) => keep_greatest(&mut sprints, r.id.clone(), r),
                Row::Tasks(r) => keep_greatest(&mut tasks, r.id.clone(), r),
                Row::Reflections(r) => {
                    keep_greatest(&mut reflections, (r.period, r.period_start), r)
                }
            }
        }
    }

    let mut calendar: BTreeMap<NaiveDate, BTreeMap<String, DayEntry>> = BTreeMap::new();
    for ((date, habit_id), log) in logs {
        calendar.entry(date).or_default().insert(habit_id, log.into());
    }

    let mut by_period: BTreeMap<Period, BTreeMap<NaiveDate, ReflectionRow>> = BTreeMap::new();
    for ((period, start), reflection) in reflections {
        by_period.entry(period).or_default().insert(start, reflection);
    }

    let mut sprint_views: BTreeMap<String, SprintView> = sprints
        .into_iter()
        .map(|(id, sprint)| (id, SprintView { sprint, tasks: Vec::new() }))
        .collect();
    let mut backlog = Vec::new();
    for root in build_task_forest(&tasks) {
        let view = root.task.sprint_id.as_ref().and_then(|id| sprint_views.get_mut(id));
        match view {
            Some(view) => view.tasks.push(root),
            None => backlog.push(root),
        }
    }

    AppState {
        habits,
        streaks: streaks.into_iter().map(|(id, s)| (id, s.into())).collect(),
        calendar,
        xp: xp.map(|r| Xp { total: r.total_xp, level: r.level }).unwrap_or_default(),
        sprints: sprint_views,
        backlog,
        reflections: by_period,
    }
}

fn keep_greatest<K: Ord, V: Ord + Clone>(map: &mut BTreeMap<K, V>, key: K, row: &V) {
    match map.get(&key) {
        Some(existing) if existing >= row => {}
        _ => {
            map.insert(key, row.clone());
        }
    }
}

fn task_order(task: &TaskRow) -> (i32, &str) {
    (task.sort_order, task.id.as_str())
}

/// Links tasks into trees through `parent_task_id` and returns the roots in
/// `sort_order`.
///
/// A missing, self-referencing or dangling parent makes the task a root.
/// Parent cycles are broken by promoting the cycle member that sorts first.
fn build_task_forest(tasks: &BTreeMap<String, TaskRow>) -> Vec<TaskNode> {
    let mut ordered: Vec<&TaskRow> = tasks.values().collect();
    ordered.sort_by(|a, b| task_order(a).cmp(&task_order(b)));

    let mut parent: BTreeMap<&str, Option<&str>> = tasks
        .values()
        .map(|t| {
            let p = t
                .parent_task_id
                .as_deref()
                .filter(|p| *p != t.id && tasks.contains_key(*p));
            (t.id.as_str(), p)
        })
        .collect();

    let mut settled: BTreeSet<&str> = BTreeSet::new();
    for start in &ordered {
        let mut path: Vec<&str> = Vec::new();
        let mut cursor = Some(start.id.as_str());
        while let Some(id) = cursor {
            if settled.contains(id) {
                break;
            }
            if let Some(pos) = path.iter().position(|p| *p == id) {
                let promoted = path[pos..]
                    .iter()
                    .filter_map(|member| tasks.get(*member))
                    .min_by(|a, b| task_order(a).cmp(&task_order(b)));
                if let Some(task) = promoted {
                    parent.insert(task.id.as_str(), None);
                }
                break;
            }
            path.push(id);
            cursor = parent.get(id).copied().flatten();
        }
        settled.extend(path);
    }

    let mut children: BTreeMap<&str, Vec<&TaskRow>> = BTreeMap::new();
    let mut roots: Vec<&TaskRow> = Vec::new();
    for task in ordered.iter().copied() {
        match parent.get(task.id.as_str()).copied().flatten() {
            Some(p) => children.entry(p).or_default().push(task),
            None => roots.push(task),
        }
    }

    roots.into_iter().map(|t| materialize(t, &children)).collect()
}

fn materialize(task: &TaskRow, children: &BTreeMap<&str, Vec<&TaskRow>>) -> TaskNode {
    let kids = children
        .get(task.id.as_str())
        .map(|kids| kids.iter().map(|k| materialize(k, children)).collect())
        .unwrap_or_default();
    TaskNode { task: task.clone(), children: kids }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
