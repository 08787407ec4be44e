// McPlaytime - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "McPlaytime";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "McPlaytime";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log file recognition
// =============================================================================

/// Full-string pattern for client log file names: `YYYY-MM-DD-N.log` with an
/// optional `.gz` suffix. Capture group `date` holds the `YYYY-MM-DD` part.
pub const LOG_NAME_PATTERN: &str = r"^(?P<date>\d{4}-\d{2}-\d{2})-\d+\.log(?P<gz>\.gz)?$";

/// chrono format for the date embedded in a log file name.
pub const LOG_NAME_DATE_FORMAT: &str = "%Y-%m-%d";

/// Bracketed timestamp expected on the first line of every client log.
pub const START_TIME_PATTERN: &str =
    r"\[(?P<hour>[01]\d|2[0-3]):(?P<min>[0-5]\d):(?P<sec>[0-5]\d)\]";

/// Unbracketed timestamp searched backward from the end of the file.
pub const END_TIME_PATTERN: &str = r"(?P<hour>[01]\d|2[0-3]):(?P<min>[0-5]\d):(?P<sec>[0-5]\d)";

/// Length in bytes of the longest possible `END_TIME_PATTERN` match.
/// The backward scan chunk must be at least this large.
pub const MAX_TIMESTAMP_LEN: usize = "HH:MM:SS".len();

// =============================================================================
// Scan limits
// =============================================================================

/// Default chunk size in bytes for the backward timestamp scan.
pub const DEFAULT_BACKSCAN_CHUNK_SIZE: usize = 128;

/// Minimum configurable backward scan chunk size.
pub const MIN_BACKSCAN_CHUNK_SIZE: usize = MAX_TIMESTAMP_LEN;

/// Maximum configurable backward scan chunk size.
pub const MAX_BACKSCAN_CHUNK_SIZE: usize = 1024 * 1024; // 1 MiB

/// Maximum number of bytes a single `.log.gz` may inflate to. Compressed logs
/// are decompressed into memory so they can be scanned backward; this bound
/// keeps a corrupt or hostile archive from exhausting memory.
pub const DEFAULT_MAX_DECOMPRESSED_BYTES: u64 = 256 * 1024 * 1024; // 256 MiB

/// Smallest user-configurable decompression bound.
pub const MIN_MAX_DECOMPRESSED_BYTES: u64 = 64 * 1024; // 64 KiB

/// Largest user-configurable decompression bound.
pub const ABSOLUTE_MAX_DECOMPRESSED_BYTES: u64 = 4 * 1024 * 1024 * 1024; // 4 GiB

/// How often the CLI polls the scan channel while waiting (ms).
pub const SCAN_POLL_INTERVAL_MS: u64 = 50;

// =============================================================================
// Default Minecraft locations
// =============================================================================

/// Minecraft directory name under `%APPDATA%` (Windows) or `$HOME` (Linux).
pub const MINECRAFT_DIR_NAME: &str = ".minecraft";

/// Minecraft directory name under `~/Library/Application Support` (macOS).
pub const MINECRAFT_DIR_NAME_MACOS: &str = "minecraft";

/// Logs subdirectory of the Minecraft directory.
pub const MINECRAFT_LOGS_DIR_NAME: &str = "logs";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Export
// =============================================================================

/// Suggested file name for CSV exports.
pub const DEFAULT_CSV_FILE_NAME: &str = "minecraft_playtime.csv";

/// Seconds per hour, for report formatting.
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Hours per day, for report formatting.
pub const HOURS_PER_DAY: f64 = 24.0;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
