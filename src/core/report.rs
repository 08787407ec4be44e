// McPlaytime - core/report.rs
//
// Derived views over a finished scan: total hours/days and per-month totals
// (with empty months filled in so a chart or table has no gaps).

use crate::core::model::PlaytimeByDate;
use crate::util::constants::{HOURS_PER_DAY, SECONDS_PER_HOUR};
use chrono::{Datelike, NaiveDate, TimeDelta};

/// Fractional hours in `duration`.
pub fn hours(duration: TimeDelta) -> f64 {
    duration.num_seconds() as f64 / SECONDS_PER_HOUR
}

/// Fractional days in `duration` (hours / 24).
pub fn days(duration: TimeDelta) -> f64 {
    hours(duration) / HOURS_PER_DAY
}

/// One-line human summary, e.g. `Total time: 12.50 hours (0.52 days)`.
pub fn total_line(total: TimeDelta) -> String {
    format!(
        "Total time: {:.2} hours ({:.2} days)",
        hours(total),
        days(total)
    )
}

/// `H:MM:SS` rendering of a non-negative duration.
pub fn format_hms(duration: TimeDelta) -> String {
    let secs = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Play time summed per calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthTotal {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    pub duration: TimeDelta,
}

impl MonthTotal {
    /// `YYYY-MM` label.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Sequential month index (year * 12 + zero-based month).
fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Per-month totals from the first to the last month with play time,
/// including zero-duration entries for months in between with no logs.
pub fn monthly_totals(playtime: &PlaytimeByDate) -> Vec<MonthTotal> {
    let mut months: Vec<MonthTotal> = Vec::new();
    let mut last_index: Option<i64> = None;

    for (date, duration) in playtime.iter() {
        let index = month_index(date);
        if last_index != Some(index) {
            if let Some(prev) = last_index {
                for gap in prev + 1..index {
                    months.push(MonthTotal {
                        // i32 years always round-trip through the index.
                        year: gap.div_euclid(12) as i32,
                        month: gap.rem_euclid(12) as u32 + 1,
                        duration: TimeDelta::zero(),
                    });
                }
            }
            months.push(MonthTotal {
                year: date.year(),
                month: date.month(),
                duration: TimeDelta::zero(),
            });
            last_index = Some(index);
        }
        if let Some(current) = months.last_mut() {
            current.duration = current.duration + duration;
        }
    }

    months
}
