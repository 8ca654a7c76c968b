//! Settings file discovery and loading.
//!
//! The settings file is optional. Lookup order:
//! 1. An explicit `--config` path (must exist)
//! 2. `firedrake-bootstrap.yml` in the working directory
//! 3. Built-in defaults

use crate::config::schema::Settings;
use crate::error::{BootstrapError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const SETTINGS_FILE_NAME: &str = "firedrake-bootstrap.yml";

/// Find the settings file to use, if any.
pub fn discover_settings(working_dir: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let candidate = working_dir.join(SETTINGS_FILE_NAME);
    if candidate.is_file() {
        Some(candidate)
    } else {
        None
    }
}

/// Load and parse a settings file.
///
/// # Errors
///
/// Returns `Io` if the file can't be read and `ConfigParse` if the YAML
/// is invalid.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path)?;
    parse_settings(&content, path)
}

/// Parse YAML content into [`Settings`].
///
/// An empty document yields the defaults.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }

    serde_yaml::from_str(content).map_err(|e| BootstrapError::ConfigParse {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load settings using the discovery rules above.
///
/// Returns the settings together with the file they came from.
pub fn load_settings(
    working_dir: &Path,
    explicit: Option<&Path>,
) -> Result<(Settings, Option<PathBuf>)> {
    match discover_settings(working_dir, explicit) {
        Some(path) => {
            tracing::debug!("Loading settings from {}", path.display());
            let settings = load_settings_file(&path)?;
            Ok((settings, Some(path)))
        }
        None => {
            tracing::debug!("No settings file found, using defaults");
            Ok((Settings::default(), None))
        }
    }
}
