// McPlaytime - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies. These types are the shared vocabulary across all layers.

use crate::util::error::SkipReason;
use chrono::{NaiveDate, TimeDelta};
use std::collections::BTreeMap;
use std::path::PathBuf;

// =============================================================================
// Per-file result
// =============================================================================

/// Outcome of extracting the session length from one log file.
#[derive(Debug)]
pub enum ScanResult {
    /// Elapsed time between the first and last timestamp in the file.
    Duration(TimeDelta),

    /// The file contributed nothing; the reason is logged and the scan moves on.
    Skipped(SkipReason),
}

impl ScanResult {
    /// The duration, if the file was not skipped.
    pub fn duration(&self) -> Option<TimeDelta> {
        match self {
            Self::Duration(d) => Some(*d),
            Self::Skipped(_) => None,
        }
    }
}

// =============================================================================
// Per-date accumulation
// =============================================================================

/// Play time per calendar date, always iterated in ascending date order.
///
/// A single day may be split across several rotated log files, so durations
/// added for an existing date are summed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaytimeByDate {
    days: BTreeMap<NaiveDate, TimeDelta>,
}

impl PlaytimeByDate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `duration` to the bucket for `date`.
    pub fn add(&mut self, date: NaiveDate, duration: TimeDelta) {
        let bucket = self.days.entry(date).or_insert_with(TimeDelta::zero);
        *bucket = *bucket + duration;
    }

    /// Accumulated time for `date`, if any file was attributed to it.
    pub fn get(&self, date: NaiveDate) -> Option<TimeDelta> {
        self.days.get(&date).copied()
    }

    /// Sum over every date.
    pub fn total(&self) -> TimeDelta {
        self.days.values().fold(TimeDelta::zero(), |acc, d| acc + *d)
    }

    /// `(date, duration)` pairs in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, TimeDelta)> + '_ {
        self.days.iter().map(|(date, d)| (*date, *d))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

// =============================================================================
// Scan outcome
// =============================================================================

/// How a scan ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanStatus {
    /// Every requested path was enumerated and processed.
    Completed,

    /// A stop request was observed between files; totals cover the files
    /// processed before it.
    Cancelled,

    /// The scan was aborted by a fatal error. No totals are reported.
    Failed { error: String },
}

/// Terminal result of a full scan, handed from the worker to the caller once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    total: TimeDelta,
    playtime: PlaytimeByDate,
    status: ScanStatus,

    /// Number of files that produced a duration.
    pub files_counted: usize,

    /// Number of classified files that were skipped.
    pub files_skipped: usize,
}

impl ScanOutcome {
    /// Outcome for a scan that ran to completion or was cancelled.
    ///
    /// The total is derived from `playtime` so the two can never disagree.
    pub fn finished(
        playtime: PlaytimeByDate,
        cancelled: bool,
        files_counted: usize,
        files_skipped: usize,
    ) -> Self {
        Self {
            total: playtime.total(),
            playtime,
            status: if cancelled {
                ScanStatus::Cancelled
            } else {
                ScanStatus::Completed
            },
            files_counted,
            files_skipped,
        }
    }

    /// Outcome for an aborted scan. Partial totals are discarded so a
    /// misleadingly low number is never presented as complete.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            total: TimeDelta::zero(),
            playtime: PlaytimeByDate::new(),
            status: ScanStatus::Failed {
                error: error.into(),
            },
            files_counted: 0,
            files_skipped: 0,
        }
    }

    pub fn total(&self) -> TimeDelta {
        self.total
    }

    pub fn playtime(&self) -> &PlaytimeByDate {
        &self.playtime
    }

    pub fn status(&self) -> &ScanStatus {
        &self.status
    }

    pub fn cancelled(&self) -> bool {
        self.status == ScanStatus::Cancelled
    }

    /// False only when a fatal error aborted the scan.
    pub fn success(&self) -> bool {
        !matches!(self.status, ScanStatus::Failed { .. })
    }
}

// =============================================================================
// Scan Progress (worker -> caller)
// =============================================================================

/// Messages sent from the scan thread to the caller.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// The worker has started on the given paths.
    Started { paths: Vec<PathBuf> },

    /// A log file produced a duration.
    FileScanned {
        path: PathBuf,
        date: NaiveDate,
        duration: TimeDelta,
    },

    /// A log file was skipped; `reason` is already formatted for display.
    FileSkipped { path: PathBuf, reason: String },

    /// Terminal message; no further messages follow.
    Finished { outcome: ScanOutcome },
}
