// McPlaytime - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Per-file problems (SkipReason) are kept separate from errors that abort a
// whole scan (ScanError) so the aggregator decides skip-vs-abort by type,
// never by whichever error happens to propagate.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all McPlaytime operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum McPlaytimeError {
    /// A scan was aborted before it could produce a trustworthy result.
    Scan(ScanError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Input path resolution failed (missing directory, empty glob, ...).
    Input(InputError),
}

impl fmt::Display for McPlaytimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scan(e) => write!(f, "Scan error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Input(e) => write!(f, "Input error: {e}"),
        }
    }
}

impl std::error::Error for McPlaytimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scan(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Input(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-file skip reasons
// ---------------------------------------------------------------------------

/// Why a single log file contributed no play time.
///
/// Every variant is non-fatal: the aggregator logs it against the file name
/// and moves on to the next file.
#[derive(Debug)]
pub enum SkipReason {
    /// The first line carries no `[HH:MM:SS]` timestamp, so this is not a
    /// client log in the expected format.
    UnrecognizedFormat,

    /// The backward scan found no `HH:MM:SS` timestamp anywhere in the file.
    NoEndTime,

    /// Opening, reading or decompressing the file failed (permissions,
    /// truncated gzip stream, ...).
    Io(io::Error),

    /// Anything else that went wrong while processing the file.
    Unexpected(String),
}

impl SkipReason {
    /// Short machine-friendly label used in structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnrecognizedFormat => "unrecognized_format",
            Self::NoEndTime => "no_end_time",
            Self::Io(_) => "io_error",
            Self::Unexpected(_) => "unexpected_error",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedFormat => f.write_str("unable to find start time"),
            Self::NoEndTime => f.write_str("unable to find end time"),
            Self::Io(e) => write!(f, "log file may be corrupted or unreadable: {e}"),
            Self::Unexpected(reason) => write!(f, "unexpected error: {reason}"),
        }
    }
}

impl std::error::Error for SkipReason {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SkipReason {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Scan errors
// ---------------------------------------------------------------------------

/// Errors that abort a whole scan. No partial totals are reported after one
/// of these, since the enumeration that produced them is incomplete.
#[derive(Debug)]
pub enum ScanError {
    /// A requested path is neither a file nor a directory.
    PathNotFound { path: PathBuf },

    /// A requested path exists but its metadata could not be read.
    Metadata { path: PathBuf, source: io::Error },

    /// Listing a directory's children failed.
    ReadDir {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// The background scan thread terminated without reporting an outcome.
    WorkerLost,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathNotFound { path } => {
                write!(f, "Scan path '{}' does not exist", path.display())
            }
            Self::Metadata { path, source } => {
                write!(f, "Cannot access '{}': {source}", path.display())
            }
            Self::ReadDir { path, source } => {
                write!(f, "Error listing '{}': {source}", path.display())
            }
            Self::WorkerLost => f.write_str("scan worker exited without a result"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Metadata { source, .. } => Some(source),
            Self::ReadDir { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ScanError> for McPlaytimeError {
    fn from(e: ScanError) -> Self {
        Self::Scan(e)
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors resolving the user's path selection into concrete scan paths.
#[derive(Debug)]
pub enum InputError {
    /// No default logs directory could be located on this platform.
    DefaultDirNotFound { tried: Option<PathBuf> },

    /// A manually specified path does not exist.
    PathNotFound { path: PathBuf },

    /// A glob pattern is syntactically invalid.
    InvalidGlob {
        pattern: String,
        source: glob::PatternError,
    },

    /// The glob patterns matched no files at all.
    NoGlobMatches { patterns: Vec<String> },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefaultDirNotFound { tried: Some(path) } => write!(
                f,
                "Could not automatically find your .minecraft/logs folder (tried '{}'). \
                 Please enter it manually.",
                path.display()
            ),
            Self::DefaultDirNotFound { tried: None } => f.write_str(
                "Could not automatically find your .minecraft/logs folder. \
                 Please enter it manually.",
            ),
            Self::PathNotFound { path } => {
                write!(f, "The specified path does not exist: '{}'", path.display())
            }
            Self::InvalidGlob { pattern, source } => {
                write!(f, "Invalid glob pattern '{pattern}': {source}")
            }
            Self::NoGlobMatches { patterns } => {
                write!(f, "The specified file(s) could not be found: {patterns:?}")
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidGlob { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<InputError> for McPlaytimeError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } if source.kind() == io::ErrorKind::PermissionDenied => {
                write!(
                    f,
                    "Failed to save file at '{}': {source}. The file is probably open \
                     in another program; close it to overwrite.",
                    path.display()
                )
            }
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for McPlaytimeError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors in explicitly requested configuration (a `--config` file that
/// cannot be read, an out-of-range command-line override).
#[derive(Debug)]
pub enum ConfigError {
    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for McPlaytimeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for McPlaytime results.
pub type Result<T> = std::result::Result<T, McPlaytimeError>;
