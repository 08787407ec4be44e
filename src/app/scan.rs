// McPlaytime - app/scan.rs
//
// Scan lifecycle management. Expands the requested paths into classified log
// files, measures each one, and accumulates per-date totals. Runs on a
// background thread, sending progress messages to the caller via an mpsc
// channel.
//
// Architecture:
//   - `ScanManager` lives on the caller's thread; `scan_paths` runs on a
//     background thread and owns all scan state until it hands off the
//     final `ScanOutcome`.
//   - An `Arc<AtomicBool>` cancel flag allows the caller to stop the scan
//     cooperatively. It is checked once per file, never mid-file.
//   - Files are processed strictly one at a time: one open handle at a time.
//
// Error policy:
//   - Per-file problems (`SkipReason`) are logged and the scan continues.
//   - Path/directory enumeration failures (`ScanError`) abort the scan and
//     discard partial totals.

use crate::core::extract::{self, ExtractConfig};
use crate::core::logfile::LogFile;
use crate::core::model::{PlaytimeByDate, ScanOutcome, ScanProgress, ScanResult};
use crate::core::report;
use crate::platform::fs;
use crate::util::error::{ScanError, SkipReason};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

// =============================================================================
// ScanManager
// =============================================================================

/// Manages a scan operation on a background thread.
pub struct ScanManager {
    /// Channel receiver for the caller to poll progress messages.
    progress_rx: Option<mpsc::Receiver<ScanProgress>>,

    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl ScanManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start scanning `paths` on a background thread.
    ///
    /// Only one scan runs at a time: a scan already in progress is cancelled
    /// first and its remaining messages are discarded.
    pub fn start_scan(&mut self, paths: Vec<PathBuf>, config: ExtractConfig) {
        self.cancel_scan();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        std::thread::spawn(move || {
            let _ = tx.send(ScanProgress::Started {
                paths: paths.clone(),
            });
            let outcome = scan_paths(&paths, &config, &cancel, |progress| {
                if tx.send(progress).is_err() {
                    // Receiver dropped; nobody is listening any more.
                    cancel.store(true, Ordering::SeqCst);
                }
            });
            let _ = tx.send(ScanProgress::Finished { outcome });
        });

        tracing::info!("Scan started");
    }

    /// Request cancellation of the running scan. The worker finishes the file
    /// it is on, then sends `ScanProgress::Finished` with a cancelled outcome.
    pub fn cancel_scan(&mut self) {
        if let Some(flag) = self.cancel_flag.take() {
            tracing::info!("Cancelling log scan");
            flag.store(true, Ordering::SeqCst);
        }
    }

    /// Whether a scan has been started and its outcome not yet received.
    pub fn is_running(&self) -> bool {
        self.progress_rx.is_some()
    }

    /// Poll for progress messages without blocking. Returns all pending messages.
    pub fn poll_progress(&mut self) -> Vec<ScanProgress> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }
        if messages
            .iter()
            .any(|m| matches!(m, ScanProgress::Finished { .. }))
        {
            self.finish();
        }
        messages
    }

    /// Wait up to `timeout` for the next progress message.
    ///
    /// Returns `Ok(None)` on timeout or when no scan is running.
    ///
    /// # Errors
    /// `ScanError::WorkerLost` if the worker went away without a final outcome.
    pub fn next_progress(&mut self, timeout: Duration) -> Result<Option<ScanProgress>, ScanError> {
        let Some(ref rx) = self.progress_rx else {
            return Ok(None);
        };
        match rx.recv_timeout(timeout) {
            Ok(msg) => {
                if matches!(msg, ScanProgress::Finished { .. }) {
                    self.finish();
                }
                Ok(Some(msg))
            }
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                self.finish();
                Err(ScanError::WorkerLost)
            }
        }
    }

    /// Block until the running scan finishes, passing every intermediate
    /// message to `on_progress`.
    ///
    /// # Errors
    /// `ScanError::WorkerLost` if no scan is running or the worker died.
    pub fn wait_for_outcome<F>(&mut self, mut on_progress: F) -> Result<ScanOutcome, ScanError>
    where
        F: FnMut(&ScanProgress),
    {
        let rx = self.progress_rx.take().ok_or(ScanError::WorkerLost)?;
        self.cancel_flag = None;
        for msg in rx.iter() {
            match msg {
                ScanProgress::Finished { outcome } => return Ok(outcome),
                other => on_progress(&other),
            }
        }
        Err(ScanError::WorkerLost)
    }

    fn finish(&mut self) {
        self.progress_rx = None;
        self.cancel_flag = None;
    }
}

impl Default for ScanManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Aggregation
// =============================================================================

/// Running totals owned by the scan loop.
#[derive(Default)]
struct Tally {
    playtime: PlaytimeByDate,
    cancelled: bool,
    counted: usize,
    skipped: usize,
}

/// Scan every path and return per-date totals.
///
/// `paths` may hold directories (immediate children are considered, not
/// recursively), individual files, or pre-expanded glob results. `cancel` is
/// polled before each log file. `on_progress` receives one message per
/// processed file.
///
/// Never panics on bad input: per-file problems are skipped, enumeration
/// failures produce a failed outcome with no totals.
pub fn scan_paths<F>(
    paths: &[PathBuf],
    config: &ExtractConfig,
    cancel: &AtomicBool,
    mut on_progress: F,
) -> ScanOutcome
where
    F: FnMut(ScanProgress),
{
    match accumulate(paths, config, cancel, &mut on_progress) {
        Ok(tally) => {
            let outcome =
                ScanOutcome::finished(tally.playtime, tally.cancelled, tally.counted, tally.skipped);
            tracing::info!(
                files = tally.counted,
                skipped = tally.skipped,
                days = outcome.playtime().len(),
                total = %report::format_hms(outcome.total()),
                cancelled = tally.cancelled,
                "Scan complete"
            );
            outcome
        }
        Err(e) => {
            tracing::error!(error = %e, "Unexpected error while scanning! Aborting.");
            ScanOutcome::failed(e.to_string())
        }
    }
}

fn accumulate<F>(
    paths: &[PathBuf],
    config: &ExtractConfig,
    cancel: &AtomicBool,
    on_progress: &mut F,
) -> Result<Tally, ScanError>
where
    F: FnMut(ScanProgress),
{
    let mut tally = Tally::default();

    'paths: for path in paths {
        for file in list_log_files(path)? {
            if cancel.load(Ordering::SeqCst) {
                tally.cancelled = true;
                break 'paths;
            }

            match extract_duration(&file, config) {
                ScanResult::Duration(duration) => {
                    tracing::info!(
                        file = %file.display_name(),
                        duration = %report::format_hms(duration),
                        "Log measured"
                    );
                    tally.playtime.add(file.date, duration);
                    tally.counted += 1;
                    on_progress(ScanProgress::FileScanned {
                        path: file.path,
                        date: file.date,
                        duration,
                    });
                }
                ScanResult::Skipped(reason) => {
                    log_skip(&file, &reason);
                    tally.skipped += 1;
                    on_progress(ScanProgress::FileSkipped {
                        path: file.path,
                        reason: reason.to_string(),
                    });
                }
            }
        }
    }

    if tally.cancelled {
        tracing::info!(files = tally.counted, "Scan cancelled");
    }
    Ok(tally)
}

fn log_skip(file: &LogFile, reason: &SkipReason) {
    match reason {
        SkipReason::Io(_) | SkipReason::Unexpected(_) => tracing::warn!(
            file = %file.display_name(),
            reason = reason.label(),
            error = %reason,
            "Skipping log file"
        ),
        SkipReason::UnrecognizedFormat | SkipReason::NoEndTime => tracing::warn!(
            file = %file.display_name(),
            reason = reason.label(),
            "Skipping log file: {reason}"
        ),
    }
}

/// Classified log files for one requested path, in file-name order.
///
/// A file path is classified directly; a directory contributes its immediate
/// children. Names that are not client logs are silently ignored.
///
/// # Errors
/// Missing paths and directory listing failures are fatal to the scan.
pub fn list_log_files(path: &Path) -> Result<Vec<LogFile>, ScanError> {
    let metadata = std::fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ScanError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ScanError::Metadata {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Ok(LogFile::from_path(path).into_iter().collect());
    }

    let mut files = Vec::new();
    let walker = walkdir::WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|source| ScanError::ReadDir {
            path: path.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        match LogFile::from_path(entry.path()) {
            Some(file) => files.push(file),
            None => tracing::trace!(file = %entry.path().display(), "Not a log file"),
        }
    }

    tracing::debug!(
        dir = %path.display(),
        logs = files.len(),
        "Listed log directory"
    );
    Ok(files)
}

/// Open `file` (decompressing if needed) and measure its session length.
///
/// The file handle is dropped before returning on every path.
pub fn extract_duration(file: &LogFile, config: &ExtractConfig) -> ScanResult {
    let mut source = match fs::open_log(&file.path, file.compressed, config.max_decompressed_bytes)
    {
        Ok(source) => source,
        Err(e) => return ScanResult::Skipped(SkipReason::Io(e)),
    };
    extract::extract_from_reader(&mut *source, config.chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn write_log(dir: &Path, name: &str, start: &str, end: &str) -> PathBuf {
        let path = dir.join(name);
        stdfs::write(
            &path,
            format!("[{start}] [main/INFO]: Setting user: Alex\n[{end}] [Render thread/INFO]: Stopping!\n"),
        )
        .unwrap();
        path
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_same_date_files_are_summed_once_in_total() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2023-04-05-1.log", "10:00:00", "10:10:00");
        write_log(dir.path(), "2023-04-05-2.log", "12:00:00", "12:15:00");

        let outcome = scan_paths(
            &[dir.path().to_path_buf()],
            &ExtractConfig::default(),
            &AtomicBool::new(false),
            |_| {},
        );

        assert!(outcome.success());
        assert!(!outcome.cancelled());
        assert_eq!(
            outcome.playtime().get(date(2023, 4, 5)),
            Some(TimeDelta::minutes(25))
        );
        assert_eq!(outcome.total(), TimeDelta::minutes(25));
        assert_eq!(outcome.files_counted, 2);
    }

    #[test]
    fn test_skips_do_not_affect_totals() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2023-04-05-1.log", "10:00:00", "11:00:00");
        stdfs::write(dir.path().join("2023-04-06-1.log"), "no timestamp here\n").unwrap();
        stdfs::write(dir.path().join("2023-04-07-1.log.gz"), b"not gzip").unwrap();
        stdfs::write(dir.path().join("latest.log"), "[10:00:00] ignored\n").unwrap();

        let mut skipped = Vec::new();
        let outcome = scan_paths(
            &[dir.path().to_path_buf()],
            &ExtractConfig::default(),
            &AtomicBool::new(false),
            |p| {
                if let ScanProgress::FileSkipped { path, .. } = p {
                    skipped.push(path.file_name().unwrap().to_string_lossy().into_owned());
                }
            },
        );

        assert!(outcome.success());
        assert_eq!(outcome.total(), TimeDelta::hours(1));
        assert_eq!(outcome.files_skipped, 2);
        assert_eq!(skipped, vec!["2023-04-06-1.log", "2023-04-07-1.log.gz"]);
    }

    #[test]
    fn test_explicit_file_path_is_classified() {
        let dir = TempDir::new().unwrap();
        let file = write_log(dir.path(), "2021-08-09-3.log", "09:00:00", "09:00:30");
        let other = write_log(dir.path(), "session.log", "09:00:00", "10:00:00");

        let outcome = scan_paths(
            &[file, other],
            &ExtractConfig::default(),
            &AtomicBool::new(false),
            |_| {},
        );
        assert_eq!(outcome.total(), TimeDelta::seconds(30));
        assert_eq!(outcome.playtime().len(), 1);
    }

    #[test]
    fn test_missing_path_fails_without_partial_totals() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2023-04-05-1.log", "10:00:00", "11:00:00");

        let outcome = scan_paths(
            &[dir.path().to_path_buf(), dir.path().join("missing")],
            &ExtractConfig::default(),
            &AtomicBool::new(false),
            |_| {},
        );

        assert!(!outcome.success());
        assert_eq!(outcome.total(), TimeDelta::zero());
        assert!(outcome.playtime().is_empty());
    }

    #[test]
    fn test_cancel_before_start_processes_nothing() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2023-04-05-1.log", "10:00:00", "11:00:00");

        let outcome = scan_paths(
            &[dir.path().to_path_buf()],
            &ExtractConfig::default(),
            &AtomicBool::new(true),
            |_| {},
        );
        assert!(outcome.cancelled());
        assert!(outcome.success());
        assert_eq!(outcome.total(), TimeDelta::zero());
    }

    #[test]
    fn test_cancel_after_n_files_counts_exactly_those() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2023-04-01-1.log", "10:00:00", "10:01:00");
        write_log(dir.path(), "2023-04-02-1.log", "10:00:00", "10:02:00");
        write_log(dir.path(), "2023-04-03-1.log", "10:00:00", "10:04:00");
        write_log(dir.path(), "2023-04-04-1.log", "10:00:00", "10:08:00");

        let cancel = AtomicBool::new(false);
        let mut seen = 0;
        let outcome = scan_paths(
            &[dir.path().to_path_buf()],
            &ExtractConfig::default(),
            &cancel,
            |_| {
                seen += 1;
                if seen == 2 {
                    cancel.store(true, Ordering::SeqCst);
                }
            },
        );

        assert!(outcome.cancelled());
        assert_eq!(outcome.files_counted, 2);
        // Files are processed in name order: 1 + 2 minutes.
        assert_eq!(outcome.total(), TimeDelta::minutes(3));
        assert_eq!(outcome.total(), outcome.playtime().total());
    }

    #[test]
    fn test_list_log_files_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2023-04-05-1.log", "10:00:00", "11:00:00");
        let nested = dir.path().join("2023-04-06-1.log");
        stdfs::create_dir(&nested).unwrap();
        write_log(&nested, "2023-04-07-1.log", "10:00:00", "11:00:00");

        let files = list_log_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].date, date(2023, 4, 5));
    }

    #[test]
    fn test_extract_duration_missing_file_is_io_skip() {
        let dir = TempDir::new().unwrap();
        let file = LogFile::from_path(&dir.path().join("2023-04-05-1.log")).unwrap();
        assert!(matches!(
            extract_duration(&file, &ExtractConfig::default()),
            ScanResult::Skipped(SkipReason::Io(_))
        ));
    }

    #[test]
    fn test_manager_delivers_outcome() {
        let dir = TempDir::new().unwrap();
        write_log(dir.path(), "2023-04-05-1.log", "10:00:00", "10:30:00");

        let mut manager = ScanManager::new();
        manager.start_scan(vec![dir.path().to_path_buf()], ExtractConfig::default());
        assert!(manager.is_running());

        let mut scanned = 0;
        let outcome = manager
            .wait_for_outcome(|p| {
                if matches!(p, ScanProgress::FileScanned { .. }) {
                    scanned += 1;
                }
            })
            .unwrap();

        assert_eq!(scanned, 1);
        assert_eq!(outcome.total(), TimeDelta::minutes(30));
        assert!(!manager.is_running());
    }

    #[test]
    fn test_manager_without_scan_reports_nothing() {
        let mut manager = ScanManager::default();
        assert!(manager.poll_progress().is_empty());
        assert!(manager
            .next_progress(Duration::from_millis(1))
            .unwrap()
            .is_none());
        assert!(matches!(
            manager.wait_for_outcome(|_| {}),
            Err(ScanError::WorkerLost)
        ));
    }
}
