// McPlaytime - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation (debug mode support)
// 3. Input resolution (default folder, explicit paths, or glob patterns)
// 4. Running the scan, printing the report and writing exports

use mcplaytime::app::input::{self, InputSelection};
use mcplaytime::app::scan::ScanManager;
use mcplaytime::core::export;
use mcplaytime::core::extract::ExtractConfig;
use mcplaytime::core::model::{ScanOutcome, ScanProgress, ScanStatus};
use mcplaytime::core::report;
use mcplaytime::platform::config::{self, AppConfig, PlatformPaths};
use mcplaytime::util::constants;
use mcplaytime::util::error::{ConfigError, ExportError, Result, ScanError};
use mcplaytime::util::logging;

use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// McPlaytime - Estimate Minecraft play time from client logs.
///
/// Reads the dated logs the launcher keeps (`YYYY-MM-DD-N.log[.gz]`), measures
/// each session from its first to its last timestamp, and totals the result.
#[derive(Parser, Debug)]
#[command(name = "mcplaytime", version, about)]
struct Cli {
    /// Log directories or individual log files to scan.
    /// Defaults to the .minecraft/logs folder when omitted.
    paths: Vec<PathBuf>,

    /// Glob pattern selecting logs (repeatable, `**` recurses).
    #[arg(short = 'g', long = "glob", conflicts_with = "paths")]
    globs: Vec<String>,

    /// Write per-day totals as CSV.
    #[arg(long, num_args = 0..=1, default_missing_value = constants::DEFAULT_CSV_FILE_NAME)]
    csv: Option<PathBuf>,

    /// Write per-day totals as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Also print per-month totals.
    #[arg(short = 'm', long)]
    monthly: bool,

    /// Configuration file to use instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Backward scan chunk size in bytes (overrides the config file).
    #[arg(long = "chunk-size")]
    chunk_size: Option<usize>,

    /// Stop after this many seconds and report the files processed so far.
    #[arg(short = 't', long = "time-limit")]
    time_limit: Option<u64>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let platform_paths = PlatformPaths::resolve();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform_paths.config_file());
    let (app_config, config_warnings) = config::load_config(&config_path);

    // Initialise logging subsystem
    logging::init(cli.debug, app_config.log_level.as_deref());

    for warning in &config_warnings {
        tracing::warn!("{warning}");
    }

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "McPlaytime starting"
    );

    match run(&cli, &platform_paths, &app_config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!(error = %e, "McPlaytime failed");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Returns `Ok(false)` when the scan itself was aborted.
fn run(cli: &Cli, platform_paths: &PlatformPaths, app_config: &AppConfig) -> Result<bool> {
    if let Some(ref path) = cli.config {
        if !path.is_file() {
            return Err(ConfigError::Io {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            }
            .into());
        }
    }

    let mut extract_config = ExtractConfig {
        chunk_size: app_config.backscan_chunk_size,
        max_decompressed_bytes: app_config.max_decompressed_bytes,
    };
    if let Some(size) = cli.chunk_size {
        if !(constants::MIN_BACKSCAN_CHUNK_SIZE..=constants::MAX_BACKSCAN_CHUNK_SIZE)
            .contains(&size)
        {
            return Err(ConfigError::ValueOutOfRange {
                field: "--chunk-size".to_string(),
                value: size.to_string(),
                expected: format!(
                    "{}-{}",
                    constants::MIN_BACKSCAN_CHUNK_SIZE,
                    constants::MAX_BACKSCAN_CHUNK_SIZE
                ),
            }
            .into());
        }
        extract_config.chunk_size = size;
    }

    let selection = if !cli.globs.is_empty() {
        InputSelection::Glob(cli.globs.clone())
    } else if !cli.paths.is_empty() {
        InputSelection::Manual(cli.paths.clone())
    } else {
        InputSelection::Automatic {
            default_dir: app_config
                .logs_directory
                .clone()
                .or_else(|| platform_paths.minecraft_logs_dir.clone()),
        }
    };
    let paths = input::resolve(&selection)?;

    let outcome = scan(paths, extract_config, cli.time_limit.map(Duration::from_secs))?;

    match outcome.status() {
        ScanStatus::Failed { error } => {
            eprintln!("Error: {error}");
            return Ok(false);
        }
        ScanStatus::Cancelled => {
            eprintln!("Scan stopped early; totals cover only the logs processed so far.");
        }
        ScanStatus::Completed => {}
    }

    print_report(&outcome, cli.monthly);

    if let Some(ref path) = cli.csv {
        let rows = write_export(path, |w| export::export_csv(outcome.playtime(), w, path))?;
        tracing::info!(path = %path.display(), rows, "CSV export complete");
    }
    if let Some(ref path) = cli.json {
        let rows = write_export(path, |w| export::export_json(outcome.playtime(), w, path))?;
        tracing::info!(path = %path.display(), rows, "JSON export complete");
    }

    Ok(true)
}

/// Drive a background scan to completion, cancelling it once `time_limit`
/// has elapsed.
fn scan(
    paths: Vec<PathBuf>,
    config: ExtractConfig,
    time_limit: Option<Duration>,
) -> std::result::Result<ScanOutcome, ScanError> {
    let mut deadline = time_limit.map(|limit| Instant::now() + limit);
    let poll_interval = Duration::from_millis(constants::SCAN_POLL_INTERVAL_MS);

    let mut manager = ScanManager::new();
    manager.start_scan(paths, config);

    loop {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            tracing::info!("Time limit reached");
            manager.cancel_scan();
            deadline = None;
        }

        match manager.next_progress(poll_interval)? {
            Some(ScanProgress::Finished { outcome }) => return Ok(outcome),
            Some(ScanProgress::Started { paths }) => {
                tracing::debug!(paths = paths.len(), "Scan worker running");
            }
            Some(ScanProgress::FileScanned { .. } | ScanProgress::FileSkipped { .. }) | None => {}
        }
    }
}

fn print_report(outcome: &ScanOutcome, monthly: bool) {
    for (date, duration) in outcome.playtime().iter() {
        println!("{date}  {:>9}", report::format_hms(duration));
    }

    if monthly {
        println!();
        for month in report::monthly_totals(outcome.playtime()) {
            println!("{}  {:>9.2} h", month.label(), report::hours(month.duration));
        }
    }

    println!();
    println!("{}", report::total_line(outcome.total()));
    println!(
        "{} log file(s) counted, {} skipped",
        outcome.files_counted, outcome.files_skipped
    );
}

/// Create `path` and hand a buffered writer to `export`, flushing it after.
fn write_export<F>(path: &Path, export: F) -> std::result::Result<usize, ExportError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::result::Result<usize, ExportError>,
{
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    let rows = export(&mut writer)?;
    writer.flush().map_err(io_err)?;
    Ok(rows)
}
