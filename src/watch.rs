//! File system watcher for the live preview.
//!
//! Watches the directory containing the source document and reports when
//! the document itself changes. Editors often save by writing a new file and
//! renaming it over the old one, so the directory is watched rather than the
//! file and every create/modify/rename touching the file name counts.

use log::{debug, warn};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::error::{Error, Result};

/// Changes the preview loop cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// The source file was written, created or renamed into place
    Changed,
    /// The source file was deleted
    Removed,
    /// The watcher encountered an error
    Error(String),
}

/// Outcome of waiting for the next event.
#[derive(Debug, PartialEq, Eq)]
pub enum WaitResult {
    Event(SourceEvent),
    Timeout,
    Disconnected,
}

/// Watches a single source file.
#[derive(Debug)]
pub struct SourceWatcher {
    /// The internal notify watcher
    _watcher: RecommendedWatcher,
    /// Receiver for file system events
    receiver: Receiver<SourceEvent>,
    /// The file being watched
    path: PathBuf,
}

impl SourceWatcher {
    /// Create a watcher for `path`.
    ///
    /// Returns an error if the watcher cannot be created.
    pub fn new(path: &Path) -> Result<Self> {
        let path = path
            .canonicalize()
            .map_err(|e| Error::FileRead {
                path: path.to_path_buf(),
                source: e,
            })?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::Watch(format!("{} has no parent directory", path.display())))?;

        let (tx, rx) = channel();
        let target = path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| {
                Self::handle_event(result, &target, &tx);
            },
            Config::default().with_poll_interval(Duration::from_millis(500)),
        )
        .map_err(|e| Error::Watch(format!("Failed to create file watcher: {}", e)))?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|e| Error::Watch(format!("Failed to watch {}: {}", dir.display(), e)))?;
        debug!("Watching {} for changes", path.display());

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            path,
        })
    }

    /// Handle a raw notify event and convert to a SourceEvent.
    fn handle_event(
        result: std::result::Result<Event, notify::Error>,
        target: &Path,
        tx: &Sender<SourceEvent>,
    ) {
        match result {
            Ok(event) => {
                if let Some(evt) = classify(&event, target) {
                    let _ = tx.send(evt);
                }
            }
            Err(e) => {
                warn!("File watcher error: {}", e);
                let _ = tx.send(SourceEvent::Error(e.to_string()));
            }
        }
    }

    /// Block for up to `timeout` waiting for the next event.
    pub fn wait(&self, timeout: Duration) -> WaitResult {
        match self.receiver.recv_timeout(timeout) {
            Ok(event) => WaitResult::Event(event),
            Err(RecvTimeoutError::Timeout) => WaitResult::Timeout,
            Err(RecvTimeoutError::Disconnected) => WaitResult::Disconnected,
        }
    }

    /// Drain pending events without blocking.
    pub fn poll_events(&self) -> Vec<SourceEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    /// The canonical path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Map a notify event to a SourceEvent if it concerns `target`.
fn classify(event: &Event, target: &Path) -> Option<SourceEvent> {
    let file_name = target.file_name()?;
    if !event
        .paths
        .iter()
        .any(|p| p == target || p.file_name() == Some(file_name))
    {
        return None;
    }

    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => Some(SourceEvent::Changed),
        EventKind::Remove(_) => Some(SourceEvent::Removed),
        // Access and other events - ignore
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};
    use tempfile::TempDir;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_classify_modify_of_target() {
        let target = Path::new("/docs/notes.md");
        let evt = event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/docs/notes.md",
        );
        assert_eq!(classify(&evt, target), Some(SourceEvent::Changed));
    }

    #[test]
    fn test_classify_create_and_remove() {
        let target = Path::new("/docs/notes.md");
        assert_eq!(
            classify(&event(EventKind::Create(CreateKind::File), "/docs/notes.md"), target),
            Some(SourceEvent::Changed)
        );
        assert_eq!(
            classify(&event(EventKind::Remove(RemoveKind::File), "/docs/notes.md"), target),
            Some(SourceEvent::Removed)
        );
    }

    #[test]
    fn test_classify_ignores_other_files() {
        let target = Path::new("/docs/notes.md");
        let evt = event(EventKind::Create(CreateKind::File), "/docs/other.md");
        assert_eq!(classify(&evt, target), None);
    }

    #[test]
    fn test_classify_ignores_access() {
        let target = Path::new("/docs/notes.md");
        let evt = event(
            EventKind::Access(notify::event::AccessKind::Any),
            "/docs/notes.md",
        );
        assert_eq!(classify(&evt, target), None);
    }

    #[test]
    fn test_watcher_requires_existing_file() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.md");
        assert!(matches!(
            SourceWatcher::new(&missing),
            Err(Error::FileRead { .. })
        ));
    }

    #[test]
    fn test_watcher_times_out_without_changes() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("doc.md");
        std::fs::write(&file, "# hi").unwrap();

        let watcher = SourceWatcher::new(&file).unwrap();
        assert!(watcher.path().ends_with("doc.md"));
        assert!(watcher.poll_events().is_empty());
        assert_eq!(watcher.wait(Duration::from_millis(10)), WaitResult::Timeout);
    }
}
