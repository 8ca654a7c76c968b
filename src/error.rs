//! Error types for bootstrap operations.
//!
//! This module defines [`BootstrapError`], the error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `BootstrapError` for failures the operator needs to act on
//! - Use `anyhow::Error` (via `BootstrapError::Other`) for unexpected errors
//! - Every error is fatal to the run; [`BootstrapError::exit_code`] decides
//!   what status the process leaves with

use std::path::PathBuf;
use thiserror::Error;

/// Exit status used when the operator aborts at the confirmation gate.
pub const ABORT_EXIT_CODE: i32 = 130;

/// Core error type for bootstrap operations.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A required tool or directory does not exist.
    #[error("{name} not found at {path}")]
    MissingPath { name: String, path: PathBuf },

    /// A required environment variable is unset or empty.
    #[error("{name} is not set")]
    MissingVariable { name: String },

    /// Failed to parse the settings file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// The installer script could not be downloaded.
    #[error("Failed to fetch installer from {url}: {message}")]
    InstallerFetch { url: String, message: String },

    /// The downloaded installer does not match the pinned digest.
    #[error("Installer checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// The installer process exited unsuccessfully.
    #[error("firedrake-install failed ({})", describe_exit(.code))]
    InstallerFailed { code: Option<i32> },

    /// The virtual environment has no activation script.
    #[error("Virtual environment not found: {path} is missing")]
    VenvMissing { path: PathBuf },

    /// The smoke test exited unsuccessfully.
    #[error("Smoke test '{script}' failed ({})", describe_exit(.code))]
    SmokeTestFailed { script: String, code: Option<i32> },

    /// A child process could not be started at all.
    #[error("Could not run '{command}': {message}")]
    SpawnFailed { command: String, message: String },

    /// The operator declined to continue.
    #[error("Aborted by operator")]
    Aborted,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BootstrapError {
    /// Exit status the process should terminate with for this error.
    ///
    /// Child-process failures propagate the child's own status when it
    /// has one. Everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InstallerFailed { code: Some(code) }
            | Self::SmokeTestFailed {
                code: Some(code), ..
            } if *code != 0 => *code,
            Self::Aborted => ABORT_EXIT_CODE,
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

/// Result type alias for bootstrap operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;
