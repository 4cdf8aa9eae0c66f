//! Error types for scan and baseline operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during scanning.
///
/// These are structural failures that abort the whole operation. Per-file
/// problems are reported as [`ScanWarning`]s instead and never abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Scan was interrupted between files.
    #[error("Scan interrupted")]
    Interrupted,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Other error.
    #[error("{message}")]
    Other { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error reading file content.
    ReadError,
    /// Error reading metadata.
    MetadataError,
}

/// Non-fatal warning for a single file encountered during a scan.
///
/// The file is omitted from the snapshot; the scan continues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a permission denied warning.
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Permission denied: {}", path.display()),
            path,
            kind: WarningKind::PermissionDenied,
        }
    }

    /// Create a read error warning.
    pub fn read_error(path: impl Into<PathBuf>, error: &ScanError) -> Self {
        let path = path.into();
        let kind = match error {
            ScanError::PermissionDenied { .. } => WarningKind::PermissionDenied,
            _ => WarningKind::ReadError,
        };
        Self {
            message: error.to_string(),
            path,
            kind,
        }
    }
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors from loading or saving a baseline.
///
/// A missing baseline is a distinct condition from a damaged one so callers
/// can tell "never scanned" apart from "baseline corrupt".
#[derive(Debug, Error)]
pub enum BaselineError {
    /// No baseline exists at the given location.
    #[error("Baseline not found: {path}")]
    NotFound { path: PathBuf },

    /// The baseline file exists but could not be parsed.
    #[error("Baseline corrupt at {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// I/O error reading or writing the baseline.
    #[error("Baseline I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BaselineError {
    /// Create an I/O error with path context, mapping a missing file to
    /// [`BaselineError::NotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Whether this is the missing-baseline condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
