//! Centralized error handling for mdtofile
//!
//! This module provides a unified error type that covers all error scenarios
//! in the application: file I/O, configuration, the persisted session snapshot,
//! rendering, and the two export formats.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error source used by variants that wrap foreign errors.
type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The centralized error type for the application.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    /// Failed to read an input file (upload or watched source)
    FileRead { path: PathBuf, source: io::Error },

    /// Failed to write file contents
    FileWrite { path: PathBuf, source: io::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad { path: PathBuf, source: BoxedSource },

    /// Failed to save configuration file
    ConfigSave { path: PathBuf, source: BoxedSource },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<BoxedSource>,
    },

    /// Configuration or data directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Session Snapshot Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The snapshot store could not be read
    SnapshotRead { key: String, source: BoxedSource },

    /// The snapshot store could not be written
    SnapshotWrite { key: String, source: BoxedSource },

    /// The stored snapshot is not a JSON object
    SnapshotParse { key: String, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering and Export Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Markdown conversion failed
    Render(String),

    /// PDF generation failed
    PdfExport(String),

    /// HTML document assembly failed
    HtmlExport(String),

    /// The source file watcher could not be set up
    Watch(String),
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::PdfExport(format!("Failed to generate PDF: {}", err))
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::FileRead { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            Error::FileWrite { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            // Session Snapshot Errors
            Error::SnapshotRead { key, source } => {
                write!(f, "Failed to read saved state '{}': {}", key, source)
            }
            Error::SnapshotWrite { key, source } => {
                write!(f, "Failed to write saved state '{}': {}", key, source)
            }
            Error::SnapshotParse { key, message } => {
                write!(f, "Saved state '{}' is corrupt: {}", key, message)
            }

            // Rendering and Export Errors
            Error::Render(msg)
            | Error::PdfExport(msg)
            | Error::HtmlExport(msg)
            | Error::Watch(msg) => write!(f, "{}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::FileRead { source, .. } | Error::FileWrite { source, .. } => Some(source),
            Error::ConfigLoad { source, .. }
            | Error::ConfigSave { source, .. }
            | Error::SnapshotRead { source, .. }
            | Error::SnapshotWrite { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::ConfigDirNotFound
            | Error::SnapshotParse { .. }
            | Error::Render(_)
            | Error::PdfExport(_)
            | Error::HtmlExport(_)
            | Error::Watch(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
