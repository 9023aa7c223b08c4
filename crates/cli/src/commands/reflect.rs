// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{Datelike, NaiveDate};
use hl_core::{Intent, OpDraft, Period};

use super::{parse_date, submit, today, Workspace};
use crate::error::{Error, Result};

/// Write a reflection for a period.
pub fn run(ws: &Workspace, period: &str, content: &str, date: Option<&str>) -> Result<()> {
    let draft = draft(ws, period, content, date, today())?;
    submit(ws, draft)
}

pub(crate) fn draft(
    ws: &Workspace,
    period: &str,
    content: &str,
    date: Option<&str>,
    today: NaiveDate,
) -> Result<OpDraft> {
    let period: Period = period.parse()?;
    if content.trim().is_empty() {
        return Err(Error::FieldEmpty { field: "content" });
    }
    let period_start = match date {
        Some(_) => parse_date(date, today)?,
        None => period_start(period, today),
    };
    let intent = Intent::SaveReflection {
        period,
        period_start,
        content: content.to_string(),
    };
    Ok(ws.builder().build(intent)?)
}

/// First day of the period containing `day`; weeks start on Monday.
///
/// Sprints have no calendar boundary, so `day` itself is used.
pub(crate) fn period_start(period: Period, day: NaiveDate) -> NaiveDate {
    match period {
        Period::Daily | Period::Sprint => day,
        Period::Weekly => {
            let back = u64::from(day.weekday().num_days_from_monday());
            day.checked_sub_days(chrono::Days::new(back)).unwrap_or(day)
        }
        Period::Monthly => day.with_day(1).unwrap_or(day),
    }
}

#[cfg(test)]
#[path = "reflect_tests.rs"]
mod tests;
