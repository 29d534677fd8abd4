//! Error types and handling infrastructure for cordex.
//!
//! The library reports failures through a single `thiserror` enum; the binary wraps it in
//! `anyhow` for context at the top level.
//!
//! Only a missing or unreadable data source is fatal for a session. Row-level problems
//! (an unparseable date, a short row) are absorbed during loading and never surface here,
//! and empty filter results are ordinary values rather than errors.

use std::path::Path;
use thiserror::Error;

/// The main error type for cordex operations.
#[derive(Error, Debug)]
pub enum CordexError {
    /// The backing data source is missing, unreadable, or has no header row.
    #[error("No data available from {origin}: {reason}")]
    DataUnavailable { origin: String, reason: String },

    /// File system errors outside of dataset loading (export targets, config files)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing an exported view failed
    #[error("Export failed: {message}")]
    ExportError { message: String },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// UI and terminal related errors
    #[error("UI operation failed: {message}")]
    UIError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Standard Result type for cordex operations.
pub type Result<T> = std::result::Result<T, CordexError>;

impl CordexError {
    /// Create a DataUnavailable error for the given source description
    pub fn data_unavailable(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::ExportError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a UIError with a descriptive message
    pub fn ui(message: impl Into<String>) -> Self {
        Self::UIError {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Config file missing at an explicitly requested location
    pub fn config_not_found(path: &Path) -> Self {
        Self::config(format!("config file not found: {}", path.display()))
    }

    /// True when the session has nothing to show
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }
}

// Automatic conversion from io::Error to CordexError
impl From<std::io::Error> for CordexError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileError {
                message: "File not found".to_string(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => Self::FileError {
                message: "Permission denied".to_string(),
                source: err,
            },
            _ => Self::FileError {
                message: "IO operation failed".to_string(),
                source: err,
            },
        }
    }
}
