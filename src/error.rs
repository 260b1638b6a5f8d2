//! Error types for devstrap operations.
//!
//! This module defines [`DevstrapError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Per-software errors (`ProbeIndeterminate`, `NoApplicableMethod`,
//!   `ProcessFailed`) are caught by the orchestrator and reported per entry
//! - Environment-level errors (`UnsupportedPlatform`, `MissingPrerequisite`)
//!   abort the whole run before any work starts
//! - Use `anyhow::Error` (via `DevstrapError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for devstrap operations.
#[derive(Debug, Error)]
pub enum DevstrapError {
    /// A descriptor has no usable detection strategy on this host.
    #[error("Cannot tell whether '{software}' is installed: no installation check applies")]
    ProbeIndeterminate { software: String },

    /// No install method applies to the current platform and environment.
    #[error("No installation method for '{software}' on {platform}")]
    NoApplicableMethod { software: String, platform: String },

    /// An external command exited with a non-zero status.
    #[error("Command failed with exit code {code:?}: {command}")]
    ProcessFailed {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// An external command could not be spawned because it is not on PATH.
    #[error("Command not found: {program}")]
    CommandNotFound { program: String },

    /// The host operating system is not one devstrap knows how to provision.
    #[error("Unsupported operating system: {os}")]
    UnsupportedPlatform { os: String },

    /// A tool needed before any work can start is missing.
    #[error("{tool} is not installed")]
    MissingPrerequisite { tool: String },

    /// A requested software id does not exist in the catalog.
    #[error("Unknown software '{id}' (available: {available})")]
    UnknownSoftware { id: String, available: String },

    /// Configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a configuration or catalog file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DevstrapError {
    /// Whether this error means "the thing checked for is not there".
    ///
    /// Probe checks treat these as a negative answer rather than a failure.
    pub fn is_negative_probe(&self) -> bool {
        matches!(
            self,
            DevstrapError::ProcessFailed { .. } | DevstrapError::CommandNotFound { .. }
        )
    }

    /// Captured output attached to a failed process, stderr first.
    pub fn captured_output(&self) -> Option<String> {
        match self {
            DevstrapError::ProcessFailed { stdout, stderr, .. } => {
                let mut out = String::new();
                if !stderr.trim().is_empty() {
                    out.push_str(stderr.trim_end());
                }
                if !stdout.trim().is_empty() {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    out.push_str(stdout.trim_end());
                }
                Some(out)
            }
            _ => None,
        }
    }
}

/// Result type alias for devstrap operations.
pub type Result<T> = std::result::Result<T, DevstrapError>;
