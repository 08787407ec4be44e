// McPlaytime - platform/config.rs
//
// Platform-specific configuration, default directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

/// Resolved platform paths for McPlaytime configuration and Minecraft logs.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/mcplaytime/ or %APPDATA%\McPlaytime\config\)
    pub config_dir: PathBuf,

    /// Where the vanilla launcher keeps client logs on this platform, if a
    /// home directory could be determined. Not checked for existence.
    pub minecraft_logs_dir: Option<PathBuf>,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        let config_dir = match ProjectDirs::from("", "", constants::APP_ID) {
            Some(proj_dirs) => proj_dirs.config_dir().to_path_buf(),
            None => {
                tracing::warn!("Could not determine platform directories, using current directory");
                PathBuf::from(".")
            }
        };
        let minecraft_logs_dir = default_minecraft_logs_dir();

        tracing::debug!(
            config = %config_dir.display(),
            minecraft_logs = ?minecraft_logs_dir,
            "Platform paths resolved"
        );

        Self {
            config_dir,
            minecraft_logs_dir,
        }
    }

    /// Full path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

/// The launcher's `logs` directory: `%APPDATA%\.minecraft\logs` on Windows,
/// `~/Library/Application Support/minecraft/logs` on macOS and
/// `~/.minecraft/logs` elsewhere.
fn default_minecraft_logs_dir() -> Option<PathBuf> {
    let base = BaseDirs::new()?;

    #[cfg(target_os = "windows")]
    let minecraft = base.config_dir().join(constants::MINECRAFT_DIR_NAME);

    #[cfg(target_os = "macos")]
    let minecraft = base.data_dir().join(constants::MINECRAFT_DIR_NAME_MACOS);

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let minecraft = base.home_dir().join(constants::MINECRAFT_DIR_NAME);

    Some(minecraft.join(constants::MINECRAFT_LOGS_DIR_NAME))
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[scan]` section.
    pub scan: ScanSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[scan]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Logs directory used instead of the platform default.
    pub logs_directory: Option<String>,
    /// Backward scan chunk size in bytes.
    pub backscan_chunk_size: Option<usize>,
    /// Upper bound on the inflated size of one `.log.gz`.
    pub max_decompressed_bytes: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Overrides the platform default logs directory in automatic mode.
    pub logs_directory: Option<PathBuf>,
    /// Backward scan chunk size in bytes.
    pub backscan_chunk_size: usize,
    /// Decompression bound for `.log.gz` files.
    pub max_decompressed_bytes: u64,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logs_directory: None,
            backscan_chunk_size: constants::DEFAULT_BACKSCAN_CHUNK_SIZE,
            max_decompressed_bytes: constants::DEFAULT_MAX_DECOMPRESSED_BYTES,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unparseable, returns defaults with a warning so the tool
/// still runs but the user is informed.
///
/// Runs before logging is initialised (the log level lives in this file), so
/// problems are reported only through the returned warnings.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            warnings.push(format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return (AppConfig::default(), warnings);
        }
    };

    let config = validate(raw, &mut warnings);
    (config, warnings)
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Scan: logs_directory --
    if let Some(dir) = raw.scan.logs_directory.filter(|d| !d.trim().is_empty()) {
        config.logs_directory = Some(PathBuf::from(dir.trim()));
    }

    // -- Scan: backscan_chunk_size --
    if let Some(size) = raw.scan.backscan_chunk_size {
        if (constants::MIN_BACKSCAN_CHUNK_SIZE..=constants::MAX_BACKSCAN_CHUNK_SIZE).contains(&size)
        {
            config.backscan_chunk_size = size;
        } else {
            warnings.push(format!(
                "[scan] backscan_chunk_size = {size} is out of range ({}-{}). Using default ({}).",
                constants::MIN_BACKSCAN_CHUNK_SIZE,
                constants::MAX_BACKSCAN_CHUNK_SIZE,
                constants::DEFAULT_BACKSCAN_CHUNK_SIZE,
            ));
        }
    }

    // -- Scan: max_decompressed_bytes --
    if let Some(bytes) = raw.scan.max_decompressed_bytes {
        if (constants::MIN_MAX_DECOMPRESSED_BYTES..=constants::ABSOLUTE_MAX_DECOMPRESSED_BYTES)
            .contains(&bytes)
        {
            config.max_decompressed_bytes = bytes;
        } else {
            warnings.push(format!(
                "[scan] max_decompressed_bytes = {bytes} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_DECOMPRESSED_BYTES,
                constants::ABSOLUTE_MAX_DECOMPRESSED_BYTES,
                constants::DEFAULT_MAX_DECOMPRESSED_BYTES,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load_str(content: &str) -> (AppConfig, Vec<String>) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(constants::CONFIG_FILE_NAME);
        std::fs::write(&path, content).unwrap();
        load_config(&path)
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_config_is_applied() {
        let (config, warnings) = load_str(
            r#"
            [scan]
            logs_directory = "/srv/minecraft/logs"
            backscan_chunk_size = 512
            max_decompressed_bytes = 1048576

            [logging]
            level = "DEBUG"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.logs_directory, Some(PathBuf::from("/srv/minecraft/logs")));
        assert_eq!(config.backscan_chunk_size, 512);
        assert_eq!(config.max_decompressed_bytes, 1_048_576);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back_with_warnings() {
        let (config, warnings) = load_str(
            r#"
            [scan]
            backscan_chunk_size = 4
            max_decompressed_bytes = 10

            [logging]
            level = "loud"
            "#,
        );
        assert_eq!(warnings.len(), 3);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unparseable_config_falls_back() {
        let (config, warnings) = load_str("[scan\nbackscan_chunk_size = ");
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Failed to parse"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (config, warnings) = load_str("[ui]\ntheme = \"dark\"\n[scan]\nfuture_option = 1\n");
        assert!(warnings.is_empty());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_default_logs_dir_ends_with_logs() {
        if let Some(dir) = PlatformPaths::resolve().minecraft_logs_dir {
            assert!(dir.ends_with(constants::MINECRAFT_LOGS_DIR_NAME));
        }
    }
}
