//! Error types for report analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an analysis run.
///
/// Every variant is fatal: a stale report or a wrong root would otherwise
/// produce misleading size numbers.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The report file could not be read.
    #[error("Failed to read report {path}: {source}")]
    ReportRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report does not contain a usable size payload.
    #[error("Malformed bundle report: {message}")]
    ReportFormat { message: String },

    /// A reconciled entry failed its path checks.
    #[error("Invalid entry {path}: {reason}")]
    InvalidEntry { path: String, reason: String },

    /// An entry path does not match the package store layout.
    #[error("Cannot resolve the installed package for {path}")]
    UnresolvableEntry { path: String },

    /// A package manifest is missing or unreadable.
    #[error("Failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A package manifest is not valid JSON or lacks name/version.
    #[error("Failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl AnalyzeError {
    /// Create a report format error.
    pub fn report_format(message: impl Into<String>) -> Self {
        Self::ReportFormat {
            message: message.into(),
        }
    }

    /// Create an invalid entry error.
    pub fn invalid_entry(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEntry {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
