//! User settings and preferences for mdtofile
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence. Document state (text,
//! theme, filename, orientation) is not configuration; it lives in the
//! session snapshot.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::markdown::DEFAULT_LARGE_DOCUMENT_THRESHOLD;

/// File name of the preview document inside the state directory.
pub const DEFAULT_PREVIEW_FILE_NAME: &str = "preview.html";

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Application settings.
///
/// Unknown fields are ignored and missing fields take their defaults, so
/// config files written by older or newer versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Last directory an export was written to
    pub export_directory: Option<PathBuf>,

    /// Whether to open exported files after export
    pub open_after_export: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────
    /// Quiet period after the last edit before the preview re-renders
    pub debounce_ms: u64,

    /// Character count above which a document is reported as large
    pub large_document_threshold: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Live Preview
    // ─────────────────────────────────────────────────────────────────────────
    /// Where the preview document is written; defaults to the state directory
    pub preview_file: Option<PathBuf>,

    /// Browser auto-refresh interval of the preview document
    pub preview_refresh_secs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Export Settings
            export_directory: None,
            open_after_export: false,

            // Rendering
            debounce_ms: 300,
            large_document_threshold: DEFAULT_LARGE_DOCUMENT_THRESHOLD,

            // Live Preview
            preview_file: None,
            preview_refresh_secs: 2,
        }
    }
}

impl Settings {
    /// The debounce window as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Preview document path, falling back to `<state_dir>/preview.html`.
    pub fn preview_path(&self, state_dir: &Path) -> PathBuf {
        self.preview_file
            .clone()
            .unwrap_or_else(|| state_dir.join(DEFAULT_PREVIEW_FILE_NAME))
    }

    /// Directory exports go to when none is given explicitly.
    pub fn export_dir_or_current(&self) -> PathBuf {
        self.export_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum debounce window in milliseconds.
    pub const MIN_DEBOUNCE_MS: u64 = 50;
    /// Maximum debounce window in milliseconds.
    pub const MAX_DEBOUNCE_MS: u64 = 5000;
    /// Smallest accepted large-document threshold.
    pub const MIN_LARGE_DOCUMENT_THRESHOLD: usize = 1000;
    /// Minimum preview refresh interval.
    pub const MIN_PREVIEW_REFRESH_SECS: u32 = 1;
    /// Maximum preview refresh interval.
    pub const MAX_PREVIEW_REFRESH_SECS: u32 = 60;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.debounce_ms = self
            .debounce_ms
            .clamp(Self::MIN_DEBOUNCE_MS, Self::MAX_DEBOUNCE_MS);

        self.large_document_threshold = self
            .large_document_threshold
            .max(Self::MIN_LARGE_DOCUMENT_THRESHOLD);

        self.preview_refresh_secs = self
            .preview_refresh_secs
            .clamp(Self::MIN_PREVIEW_REFRESH_SECS, Self::MAX_PREVIEW_REFRESH_SECS);

        // An empty path in the file means "use the default"
        if self
            .preview_file
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            self.preview_file = None;
        }
        if self
            .export_directory
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            self.export_directory = None;
        }
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
