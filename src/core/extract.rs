// McPlaytime - core/extract.rs
//
// Session length of a single client log: the first timestamp comes from a
// forward read of line one, the last from a backward scan of the stream.
// Core layer: works on any BufRead + Seek source; opening files (and gzip
// decompression) is the caller's job.

use crate::core::backscan;
use crate::core::model::ScanResult;
use crate::util::constants;
use crate::util::error::SkipReason;
use chrono::{NaiveTime, TimeDelta, Timelike};
use regex::bytes::Regex;
use std::io::{BufRead, Read, Seek};
use std::sync::OnceLock;

/// Configuration for duration extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Chunk size in bytes for the backward timestamp scan.
    pub chunk_size: usize,

    /// Upper bound on the inflated size of a `.log.gz`.
    pub max_decompressed_bytes: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            chunk_size: constants::DEFAULT_BACKSCAN_CHUNK_SIZE,
            max_decompressed_bytes: constants::DEFAULT_MAX_DECOMPRESSED_BYTES,
        }
    }
}

/// Longest first line considered when looking for the start timestamp.
const MAX_FIRST_LINE_BYTES: u64 = 64 * 1024;

fn start_time_regex() -> &'static Regex {
    static START: OnceLock<Regex> = OnceLock::new();
    START.get_or_init(|| {
        Regex::new(constants::START_TIME_PATTERN).expect("start time pattern is valid")
    })
}

fn end_time_regex() -> &'static Regex {
    static END: OnceLock<Regex> = OnceLock::new();
    END.get_or_init(|| Regex::new(constants::END_TIME_PATTERN).expect("end time pattern is valid"))
}

/// Measure the session recorded in `reader`, which must be positioned at the
/// start of the log.
pub fn extract_from_reader<R>(reader: &mut R, chunk_size: usize) -> ScanResult
where
    R: BufRead + Seek + ?Sized,
{
    match measure(reader, chunk_size) {
        Ok(duration) => ScanResult::Duration(duration),
        Err(reason) => ScanResult::Skipped(reason),
    }
}

fn measure<R>(reader: &mut R, chunk_size: usize) -> Result<TimeDelta, SkipReason>
where
    R: BufRead + Seek + ?Sized,
{
    let mut first_line = Vec::new();
    Read::take(&mut *reader, MAX_FIRST_LINE_BYTES).read_until(b'\n', &mut first_line)?;

    let start = {
        let caps = start_time_regex()
            .captures(&first_line)
            .ok_or(SkipReason::UnrecognizedFormat)?;
        time_of_day(
            caps.name("hour").map(|m| m.as_bytes()),
            caps.name("min").map(|m| m.as_bytes()),
            caps.name("sec").map(|m| m.as_bytes()),
        )?
    };

    let last = backscan::find_last_match(reader, end_time_regex(), chunk_size)?
        .ok_or(SkipReason::NoEndTime)?;
    let end = time_of_day(
        last.name("hour").map(str::as_bytes),
        last.name("min").map(str::as_bytes),
        last.name("sec").map(str::as_bytes),
    )?;

    Ok(session_length(start, end))
}

/// Convert captured `HH`, `MM`, `SS` digits into time since midnight.
fn time_of_day(
    hour: Option<&[u8]>,
    min: Option<&[u8]>,
    sec: Option<&[u8]>,
) -> Result<TimeDelta, SkipReason> {
    fn field(raw: Option<&[u8]>, name: &str) -> Result<u32, SkipReason> {
        raw.and_then(|b| std::str::from_utf8(b).ok())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| SkipReason::Unexpected(format!("timestamp has no usable {name} field")))
    }

    let (h, m, s) = (field(hour, "hour")?, field(min, "minute")?, field(sec, "second")?);
    let time = NaiveTime::from_hms_opt(h, m, s).ok_or_else(|| {
        SkipReason::Unexpected(format!("{h:02}:{m:02}:{s:02} is not a valid time of day"))
    })?;
    Ok(TimeDelta::seconds(i64::from(time.num_seconds_from_midnight())))
}

/// Elapsed time between two times of day.
///
/// An end earlier than the start is taken to mean the session crossed
/// midnight once. A single log spanning more than 24 hours is misread; logs
/// rotate far more often than that in practice.
pub fn session_length(start: TimeDelta, end: TimeDelta) -> TimeDelta {
    if end < start {
        end + TimeDelta::days(1) - start
    } else {
        end - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn extract(text: &[u8]) -> ScanResult {
        extract_from_reader(&mut Cursor::new(text.to_vec()), 32)
    }

    fn hms(h: i64, m: i64, s: i64) -> TimeDelta {
        TimeDelta::hours(h) + TimeDelta::minutes(m) + TimeDelta::seconds(s)
    }

    #[test]
    fn test_session_duration() {
        let log = b"[20:15:00] [main/INFO]: Setting user: Steve\n\
                    [20:30:12] [Render thread/INFO]: Connecting to server\n\
                    [21:05:30] [Render thread/INFO]: Stopping!\n";
        assert_eq!(extract(log).duration(), Some(hms(0, 50, 30)));
    }

    #[test]
    fn test_midnight_rollover() {
        let log = b"[23:50:00] [main/INFO]: start\n[00:10:00] [main/INFO]: end\n";
        assert_eq!(extract(log).duration(), Some(TimeDelta::minutes(20)));
    }

    #[test]
    fn test_end_time_found_without_brackets() {
        let log = b"[08:00:00] [main/INFO]: start\n\
                    Crash report saved at 09:15:45 by the game\n\
                    \tat net.minecraft.client.main.Main.main(SourceFile)\n";
        assert_eq!(extract(log).duration(), Some(hms(1, 15, 45)));
    }

    #[test]
    fn test_single_line_log_is_zero_length() {
        let log = b"[12:00:00] [main/INFO]: only line";
        assert_eq!(extract(log).duration(), Some(TimeDelta::zero()));
    }

    #[test]
    fn test_first_line_without_timestamp_is_unrecognized() {
        let log = b"---- Minecraft Crash Report ----\n[10:00:00] later\n";
        assert!(matches!(
            extract(log),
            ScanResult::Skipped(SkipReason::UnrecognizedFormat)
        ));
    }

    #[test]
    fn test_out_of_range_first_timestamp_is_unrecognized() {
        let log = b"[24:61:00] nonsense\n[10:00:00] later\n";
        assert!(matches!(
            extract(log),
            ScanResult::Skipped(SkipReason::UnrecognizedFormat)
        ));
    }

    #[test]
    fn test_empty_file_is_unrecognized() {
        assert!(matches!(
            extract(b""),
            ScanResult::Skipped(SkipReason::UnrecognizedFormat)
        ));
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut log = b"[10:00:00] \xff\xfe mod banner\n".to_vec();
        log.extend_from_slice(&[0x80; 100]);
        log.extend_from_slice(b"\n[10:00:42] \xc3 done\n");
        assert_eq!(extract(&log).duration(), Some(TimeDelta::seconds(42)));
    }

    #[test]
    fn test_chunk_size_zero_is_io_skip() {
        let mut cursor = Cursor::new(b"[10:00:00] a\n[10:01:00] b\n".to_vec());
        assert!(matches!(
            extract_from_reader(&mut cursor, 0),
            ScanResult::Skipped(SkipReason::Io(_))
        ));
    }

    #[test]
    fn test_session_length_rules() {
        assert_eq!(session_length(hms(10, 0, 0), hms(10, 0, 0)), TimeDelta::zero());
        assert_eq!(session_length(hms(10, 0, 0), hms(12, 30, 0)), hms(2, 30, 0));
        assert_eq!(session_length(hms(23, 0, 0), hms(1, 0, 0)), hms(2, 0, 0));
    }

    #[test]
    fn test_time_of_day_rejects_missing_field() {
        let result = time_of_day(Some(b"10".as_slice()), None, Some(b"00".as_slice()));
        assert!(matches!(result, Err(SkipReason::Unexpected(_))));
    }
}
