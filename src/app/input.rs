// McPlaytime - app/input.rs
//
// Turns the user's path selection into the concrete list handed to the scan.
// Three modes: the platform default logs directory, explicit paths, or glob
// patterns expanded here (the scan itself never sees a glob).

use crate::util::error::InputError;
use std::path::PathBuf;

/// Where the logs to scan come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSelection {
    /// The default `.minecraft/logs` directory, if one was found.
    Automatic { default_dir: Option<PathBuf> },

    /// Directories and/or files given explicitly. Each must exist.
    Manual(Vec<PathBuf>),

    /// Glob patterns (`**` allowed) matched against the filesystem.
    Glob(Vec<String>),
}

/// Resolve `selection` into scan paths.
///
/// # Errors
/// A missing default directory, a missing manual path, an invalid pattern, or
/// glob patterns that match nothing.
pub fn resolve(selection: &InputSelection) -> Result<Vec<PathBuf>, InputError> {
    match selection {
        InputSelection::Automatic { default_dir } => match default_dir {
            Some(dir) if dir.is_dir() => Ok(vec![dir.clone()]),
            Some(dir) => Err(InputError::DefaultDirNotFound {
                tried: Some(dir.clone()),
            }),
            None => Err(InputError::DefaultDirNotFound { tried: None }),
        },

        InputSelection::Manual(paths) => {
            if let Some(missing) = paths.iter().find(|p| !p.exists()) {
                return Err(InputError::PathNotFound {
                    path: missing.clone(),
                });
            }
            Ok(paths.clone())
        }

        InputSelection::Glob(patterns) => expand_globs(patterns),
    }
}

fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>, InputError> {
    let mut paths = Vec::new();

    for pattern in patterns {
        let pattern = pattern.trim();
        let entries = glob::glob(pattern).map_err(|source| InputError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })?;

        for entry in entries {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => {
                    tracing::warn!(pattern, error = %e, "Unreadable glob match, skipping");
                }
            }
        }
    }

    if paths.is_empty() {
        return Err(InputError::NoGlobMatches {
            patterns: patterns.to_vec(),
        });
    }

    tracing::debug!(patterns = ?patterns, matches = paths.len(), "Expanded globs");
    Ok(paths)
}
