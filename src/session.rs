//! Document session state and its persisted snapshot
//!
//! The [`Session`] is everything about the current document that survives a
//! restart: the text, the theme, the export filename and the page
//! orientation. It is stored as one JSON object under a fixed key in a
//! [`SnapshotStore`].
//!
//! Loading is forgiving: every field is merged over its default on its own,
//! so a snapshot written by an older version (or edited by hand) still
//! restores whatever it can. Storage failures never propagate; they are
//! posted to the notification feed and the in-memory state stays as it was.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::config::write_replacing;
use crate::error::{Error, Result};
use crate::feedback::NotificationFeed;
use crate::theme::ThemeId;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Key the session snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "markdownToFile";

/// Filename used when none (or only whitespace) is given.
pub const DEFAULT_FILENAME: &str = "document";

/// Format of the suffix appended by [`Session::append_timestamp`].
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

// ─────────────────────────────────────────────────────────────────────────────
// Orientation
// ─────────────────────────────────────────────────────────────────────────────

/// Page orientation of the PDF export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn key(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }

    /// Strict lookup, `None` for anything but the two keys.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "portrait" => Some(Orientation::Portrait),
            "landscape" => Some(Orientation::Landscape),
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Snapshot Store
// ─────────────────────────────────────────────────────────────────────────────

/// Key-value storage for serialized snapshots.
pub trait SnapshotStore {
    /// Stored value for `key`, `None` if nothing was ever written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            debug!("No snapshot at {}", path.display());
            return Ok(None);
        }

        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| Error::SnapshotRead {
                key: key.to_string(),
                source: Box::new(e),
            })
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        write_replacing(&path, ".bak", value.as_bytes()).map_err(|e| Error::SnapshotWrite {
            key: key.to_string(),
            source: Box::new(e),
        })?;
        debug!("Saved snapshot to {}", path.display());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted shape of a session.
#[derive(Serialize)]
struct SessionRecord<'a> {
    markdown: &'a str,
    theme: &'static str,
    filename: &'a str,
    orientation: &'static str,
}

/// The current document and its export preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub markdown: String,
    pub theme: ThemeId,
    pub filename: String,
    pub orientation: Orientation,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            markdown: String::new(),
            theme: ThemeId::default(),
            filename: DEFAULT_FILENAME.to_string(),
            orientation: Orientation::default(),
        }
    }
}

impl Session {
    /// Restore the session from `store`.
    ///
    /// A missing snapshot gives the defaults silently. A corrupt or
    /// unreadable snapshot is reported to `feed` and also gives the defaults.
    pub fn load(store: &dyn SnapshotStore, feed: &mut NotificationFeed) -> Self {
        match Self::try_load(store) {
            Ok(session) => session,
            Err(e) => {
                feed.error("Failed to load saved state", &e);
                Self::default()
            }
        }
    }

    fn try_load(store: &dyn SnapshotStore) -> Result<Self> {
        match store.read(SNAPSHOT_KEY)? {
            Some(json) => {
                let session = Self::from_snapshot(&json)?;
                info!("Restored session ({} chars)", session.markdown.len());
                Ok(session)
            }
            None => Ok(Self::default()),
        }
    }

    /// Merge a serialized snapshot over the defaults, field by field.
    pub fn from_snapshot(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| Error::SnapshotParse {
            key: SNAPSHOT_KEY.to_string(),
            message: e.to_string(),
        })?;
        let Value::Object(fields) = value else {
            return Err(Error::SnapshotParse {
                key: SNAPSHOT_KEY.to_string(),
                message: "expected a JSON object".to_string(),
            });
        };

        let mut session = Self::default();
        if let Some(markdown) = string_field(&fields, "markdown") {
            session.markdown = markdown.to_string();
        }
        if let Some(theme) = string_field(&fields, "theme") {
            session.theme = ThemeId::from_key(theme);
        }
        if let Some(filename) = string_field(&fields, "filename") {
            session.set_filename(filename);
        }
        if let Some(orientation) = string_field(&fields, "orientation") {
            session.orientation = Orientation::parse(orientation).unwrap_or_default();
        }
        Ok(session)
    }

    /// Serialize every field.
    pub fn to_snapshot(&self) -> Result<String> {
        let record = SessionRecord {
            markdown: &self.markdown,
            theme: self.theme.key(),
            filename: &self.filename,
            orientation: self.orientation.key(),
        };
        serde_json::to_string(&record).map_err(|e| Error::SnapshotWrite {
            key: SNAPSHOT_KEY.to_string(),
            source: Box::new(e),
        })
    }

    /// Write the whole session to `store`. Failures go to `feed`.
    pub fn save(&self, store: &mut dyn SnapshotStore, feed: &mut NotificationFeed) -> bool {
        let result = self
            .to_snapshot()
            .and_then(|json| store.write(SNAPSHOT_KEY, &json));
        match result {
            Ok(()) => true,
            Err(e) => {
                feed.error("Failed to save state", &e);
                false
            }
        }
    }

    /// Set the export filename. Blank input resets it to the default.
    pub fn set_filename(&mut self, name: &str) {
        self.filename = if name.trim().is_empty() {
            DEFAULT_FILENAME.to_string()
        } else {
            name.to_string()
        };
    }

    /// Append `_<UTC timestamp>` to the filename and return the new name.
    pub fn append_timestamp(&mut self, now: DateTime<Utc>) -> &str {
        let stamp = now.format(TIMESTAMP_FORMAT);
        self.filename = format!("{}_{}", self.filename, stamp);
        &self.filename
    }

    /// Reset the document text, keeping preferences.
    pub fn clear_text(&mut self) {
        self.markdown.clear();
    }
}

/// Non-empty string value of `name`, `None` when missing or wrong-typed.
fn string_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory Store
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::MemoryStore;


// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
