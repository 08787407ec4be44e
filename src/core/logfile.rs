// McPlaytime - core/logfile.rs
//
// Recognition of Minecraft client log file names.
//
// Names follow `YYYY-MM-DD-N.log` or `YYYY-MM-DD-N.log.gz`, where N is the
// rotation sequence number for that day. The whole name must match; a date
// that is shaped correctly but is not a real calendar date (month 13, Feb 30)
// is treated the same as any other non-log file.

use crate::util::constants::{LOG_NAME_DATE_FORMAT, LOG_NAME_PATTERN};
use chrono::NaiveDate;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Classification of a log file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFileName {
    /// Calendar date embedded in the name.
    pub date: NaiveDate,

    /// Whether the file carries the `.gz` suffix.
    pub compressed: bool,
}

/// A log file found on disk, ready for duration extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Full path to the file.
    pub path: PathBuf,

    /// Calendar date the log belongs to.
    pub date: NaiveDate,

    /// Whether the file is gzip-compressed.
    pub compressed: bool,
}

impl LogFile {
    /// Classify `path` by its file name. Returns `None` for anything that is
    /// not a client log, including non-UTF-8 names.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let LogFileName { date, compressed } = classify(name)?;
        Some(Self {
            path: path.to_path_buf(),
            date,
            compressed,
        })
    }

    /// File name for display in log lines and reports.
    pub fn display_name(&self) -> std::borrow::Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| self.path.to_string_lossy())
    }
}

fn log_name_regex() -> &'static Regex {
    static LOG_NAME: OnceLock<Regex> = OnceLock::new();
    LOG_NAME.get_or_init(|| Regex::new(LOG_NAME_PATTERN).expect("log name pattern is valid"))
}

/// Classify a bare file name (no directory components).
///
/// Returns `None` when the name does not match the log naming convention or
/// when its date portion is not a valid calendar date.
pub fn classify(file_name: &str) -> Option<LogFileName> {
    let caps = log_name_regex().captures(file_name)?;
    let raw_date = caps.name("date")?.as_str();

    match NaiveDate::parse_from_str(raw_date, LOG_NAME_DATE_FORMAT) {
        Ok(date) => Some(LogFileName {
            date,
            compressed: caps.name("gz").is_some(),
        }),
        Err(e) => {
            tracing::debug!(
                file = file_name,
                date = raw_date,
                error = %e,
                "Log-shaped name with invalid date; not a log file"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_plain_log_name() {
        let c = classify("2023-04-05-3.log").unwrap();
        assert_eq!(c.date, date(2023, 4, 5));
        assert!(!c.compressed);
    }

    #[test]
    fn test_compressed_log_name() {
        let c = classify("2023-04-05-3.log.gz").unwrap();
        assert_eq!(c.date, date(2023, 4, 5));
        assert!(c.compressed);
    }

    #[test]
    fn test_multi_digit_sequence_number() {
        let c = classify("2019-12-31-142.log.gz").unwrap();
        assert_eq!(c.date, date(2019, 12, 31));
    }

    #[test]
    fn test_non_log_names_rejected() {
        for name in [
            "notalog.txt",
            "latest.log",
            "debug.log.gz",
            "2023-04-05.log",
            "2023-04-05-.log",
            "2023-04-05-x.log",
            "2023-04-05-1.log.zip",
            "2023-04-05-1.txt",
            "x2023-04-05-1.log",
            "2023-04-05-1.log.gz.bak",
            "23-04-05-1.log",
        ] {
            assert!(classify(name).is_none(), "{name} should not classify");
        }
    }

    #[test]
    fn test_invalid_calendar_date_is_not_a_log_file() {
        assert!(classify("2023-13-01-1.log").is_none());
        assert!(classify("2023-02-30-1.log.gz").is_none());
        assert!(classify("2023-00-10-1.log").is_none());
    }

    #[test]
    fn test_leap_day_accepted() {
        assert_eq!(classify("2024-02-29-1.log").unwrap().date, date(2024, 2, 29));
    }

    #[test]
    fn test_from_path_uses_file_name_only() {
        let file = LogFile::from_path(Path::new("/games/2023-01-02-1/2022-07-08-2.log.gz")).unwrap();
        assert_eq!(file.date, date(2022, 7, 8));
        assert!(file.compressed);
        assert_eq!(file.display_name(), "2022-07-08-2.log.gz");

        assert!(LogFile::from_path(Path::new("/games/2023-01-02-1.log/notes.txt")).is_none());
    }
}
