//! Document Export Module for mdtofile
//!
//! Exports produce an in-memory [`Artifact`]; [`deliver`] then writes it to
//! disk in one step.
//!
//! # Supported Export Formats
//!
//! - **PDF**: A4 pages laid out from a snapshot of the live preview
//! - **HTML File**: Complete HTML document with inlined theme and highlight CSS
//!
//! # Architecture
//!
//! - `pdf/` - Page layout and PDF serialization
//! - `html.rs` - HTML document generation with theme styling

pub mod html;
pub mod pdf;

pub use html::HtmlExporter;
pub use pdf::PdfExporter;

use log::info;
use std::path::{Path, PathBuf};

use crate::config::write_replacing;
use crate::error::{Error, Result};

/// Suffix of the file an artifact is staged in before it is renamed into place
const PARTIAL_SUFFIX: &str = ".part";

// ─────────────────────────────────────────────────────────────────────────────
// Artifact
// ─────────────────────────────────────────────────────────────────────────────

/// A generated file, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Create an artifact. Characters that are not allowed in file names on
    /// common platforms are replaced with `_`.
    pub fn new(file_name: impl Into<String>, media_type: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: safe_file_name(&file_name.into()),
            media_type,
            bytes,
        }
    }
}

fn safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Delivery
// ─────────────────────────────────────────────────────────────────────────────

/// Write `artifact` into `dir` and return the final path.
///
/// The bytes go to a `.part` file that is renamed over the target, so a
/// partially written export is never visible under the final name.
pub fn deliver(artifact: &Artifact, dir: &Path) -> Result<PathBuf> {
    let target = dir.join(&artifact.file_name);
    write_replacing(&target, PARTIAL_SUFFIX, &artifact.bytes).map_err(|e| Error::FileWrite {
        path: target.clone(),
        source: e,
    })?;
    info!(
        "Wrote {} ({}, {} bytes)",
        target.display(),
        artifact.media_type,
        artifact.bytes.len()
    );
    Ok(target)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
