//! Main application controller for mdtofile
//!
//! `App` owns the session, the live preview, the notification feed, the
//! debounce timer and the snapshot store, and turns user actions into
//! state mutation, debounced re-rendering, preview updates and persistence.
//! Every action recovers from its own failures by posting to the feed; none
//! of them return errors.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::Settings;
use crate::debounce::Debouncer;
use crate::error::Error;
use crate::export::{deliver, Artifact, HtmlExporter, PdfExporter};
use crate::feedback::NotificationFeed;
use crate::markdown::{validate, MarkdownRenderer};
use crate::preview::Preview;
use crate::session::{Orientation, Session, SnapshotStore};
use crate::theme::ThemeId;

/// Which export an action asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Pdf,
    Html,
}

impl ExportFormat {
    fn label(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF",
            ExportFormat::Html => "HTML",
        }
    }
}

/// A watched source that could not be read.
#[derive(Debug)]
struct SourceFailure {
    path: PathBuf,
    retry_at: Instant,
    reported: bool,
}

/// The application controller.
pub struct App {
    session: Session,
    preview: Preview,
    feed: NotificationFeed,
    debouncer: Debouncer,
    store: Box<dyn SnapshotStore>,
    settings: Settings,
    renderer: MarkdownRenderer,
    pdf_exporter: PdfExporter,
    html_exporter: HtmlExporter,
    /// Validation warnings last shown, to avoid repeating them on every render
    last_warnings: Vec<String>,
    /// Number of renders so far
    renders: u64,
    /// Set while the watched source cannot be read
    source_failure: Option<SourceFailure>,
}

impl App {
    // ─────────────────────────────────────────────────────────────────────────
    // Initialization
    // ─────────────────────────────────────────────────────────────────────────

    /// Restore the saved session and show it in `preview`.
    pub fn new(store: Box<dyn SnapshotStore>, settings: Settings, preview: Preview) -> Self {
        let mut feed = NotificationFeed::new();
        let session = Session::load(store.as_ref(), &mut feed);
        let debouncer = Debouncer::new(settings.debounce());

        let mut app = Self {
            session,
            preview,
            feed,
            debouncer,
            store,
            settings,
            renderer: MarkdownRenderer::new(),
            pdf_exporter: PdfExporter::new(),
            html_exporter: HtmlExporter::new(),
            last_warnings: Vec::new(),
            renders: 0,
            source_failure: None,
        };

        let theme = app.session.theme;
        app.preview.restyle(theme, &mut app.feed);
        if !app.session.markdown.is_empty() {
            app.update_preview();
        }
        info!(
            "Session ready: theme {}, filename {}, {} chars",
            app.session.theme,
            app.session.filename,
            app.session.markdown.len()
        );
        app
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    pub fn feed(&self) -> &NotificationFeed {
        &self.feed
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing and Debounced Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the document text; rendering waits for the quiet period.
    pub fn on_text_input(&mut self, text: impl Into<String>, now: Instant) {
        self.session.markdown = text.into();
        self.debouncer.schedule(now);
    }

    /// Render and persist if the quiet period has elapsed. Returns whether it
    /// did.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.retry_source(now);
        if !self.debouncer.fire_if_due(now) {
            return false;
        }
        self.update_preview();
        self.persist();
        true
    }

    /// Time until the pending render or source retry is due, `None` if
    /// nothing is pending.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        let retry = self
            .source_failure
            .as_ref()
            .filter(|failure| !failure.reported)
            .map(|failure| failure.retry_at.saturating_duration_since(now));
        match (self.debouncer.time_until_due(now), retry) {
            (Some(render), Some(retry)) => Some(render.min(retry)),
            (render, retry) => render.or(retry),
        }
    }

    /// Run a pending render right away.
    pub fn flush(&mut self) -> bool {
        if !self.debouncer.is_pending() {
            return false;
        }
        self.debouncer.cancel();
        self.update_preview();
        self.persist();
        true
    }

    /// Re-render the session text into the preview.
    pub fn update_preview(&mut self) {
        self.report_validation();

        match self.renderer.render_fragment(&self.session.markdown) {
            Ok(fragment) => {
                self.renders += 1;
                debug!("Render #{} ({} bytes)", self.renders, fragment.html.len());
                self.preview.update(fragment, &mut self.feed);
            }
            Err(e) => self.feed.error("Failed to render preview", e),
        }
    }

    /// Post validation warnings when they differ from the last ones shown.
    fn report_validation(&mut self) {
        let report = validate(&self.session.markdown, self.settings.large_document_threshold);
        if report.warnings != self.last_warnings {
            for warning in &report.warnings {
                self.feed.warning(warning.clone());
            }
            self.last_warnings = report.warnings;
        }
    }

    fn persist(&mut self) -> bool {
        self.session.save(self.store.as_mut(), &mut self.feed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document Actions
    // ─────────────────────────────────────────────────────────────────────────

    /// Erase the document text. Preferences are kept.
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.session.clear_text();
        self.last_warnings.clear();
        self.preview.clear(&mut self.feed);
        self.persist();
        self.feed.info("Content cleared.");
    }

    /// Replace the document with the contents of `path`.
    pub fn load_file(&mut self, path: &Path) -> bool {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                self.feed.error(
                    "Failed to open file",
                    Error::FileRead {
                        path: path.to_path_buf(),
                        source: e,
                    },
                );
                return false;
            }
        };

        self.debouncer.cancel();
        self.session.markdown = text;
        self.update_preview();
        self.persist();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.feed.success(format!("File \"{}\" loaded.", name));
        true
    }

    /// Pick up the current contents of the watched `path`.
    ///
    /// A read failure is retried once the quiet period has passed; if it is
    /// still failing then, it is posted to the feed. Each failing stretch is
    /// posted once.
    pub fn reload_source(&mut self, path: &Path, now: Instant) -> bool {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                self.source_recovered(path);
                self.apply_source(text, now);
                true
            }
            Err(e) => {
                debug!("Source not readable: {}", e);
                if self.source_failure.is_none() {
                    self.source_failure = Some(SourceFailure {
                        path: path.to_path_buf(),
                        retry_at: now + self.debouncer.delay(),
                        reported: false,
                    });
                }
                false
            }
        }
    }

    fn retry_source(&mut self, now: Instant) {
        let path = match &self.source_failure {
            Some(failure) if !failure.reported && now >= failure.retry_at => failure.path.clone(),
            _ => return,
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                self.source_recovered(&path);
                self.apply_source(text, now);
            }
            Err(e) => {
                self.feed.error(
                    "Failed to reload watched file",
                    Error::FileRead { path, source: e },
                );
                if let Some(failure) = self.source_failure.as_mut() {
                    failure.reported = true;
                }
            }
        }
    }

    fn source_recovered(&mut self, path: &Path) {
        if let Some(failure) = self.source_failure.take() {
            if failure.reported {
                self.feed
                    .info(format!("{} is readable again.", path.display()));
            }
        }
    }

    fn apply_source(&mut self, text: String, now: Instant) {
        if text != self.session.markdown {
            debug!("Source changed ({} chars)", text.len());
            self.on_text_input(text, now);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preferences
    // ─────────────────────────────────────────────────────────────────────────

    /// Switch theme; the preview is restyled without re-rendering.
    pub fn set_theme(&mut self, theme: ThemeId) {
        self.session.theme = theme;
        self.preview.restyle(theme, &mut self.feed);
        self.persist();
        self.feed
            .info(format!("Theme set to {}.", theme.definition().name));
    }

    pub fn set_filename(&mut self, name: &str) {
        self.session.set_filename(name);
        self.persist();
    }

    /// Append a UTC timestamp to the filename.
    pub fn append_timestamp(&mut self, now: DateTime<Utc>) {
        let name = self.session.append_timestamp(now).to_string();
        self.persist();
        self.feed.info(format!("Timestamp added: {}", name));
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.session.orientation = orientation;
        self.persist();
    }

    /// Empty the notification feed.
    pub fn clear_log(&mut self) {
        self.feed.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Export the current preview as PDF into `dir` (or the configured export
    /// directory). Returns the written path.
    pub fn export_pdf(&mut self, dir: Option<&Path>, open: bool) -> Option<PathBuf> {
        if self.preview.is_empty() {
            self.feed.warning("Nothing to export: the preview is empty.");
            return None;
        }

        self.feed.info("Generating PDF...");
        let snapshot = self.preview.snapshot();
        let artifact = self.pdf_exporter.export(
            &snapshot,
            self.session.theme.definition(),
            &self.session.filename,
            self.session.orientation,
        );
        self.finish_export(ExportFormat::Pdf, artifact, dir, open)
    }

    /// Export the document text as a self-contained HTML file.
    pub fn export_html(
        &mut self,
        dir: Option<&Path>,
        open: bool,
        date: DateTime<Utc>,
    ) -> Option<PathBuf> {
        if self.session.markdown.trim().is_empty() {
            self.feed
                .warning("Nothing to export: write something first.");
            return None;
        }

        self.feed.info("Generating HTML...");
        let artifact = self.html_exporter.export(
            &self.session.markdown,
            self.session.theme.definition(),
            &self.session.filename,
            date,
        );
        self.finish_export(ExportFormat::Html, artifact, dir, open)
    }

    fn finish_export(
        &mut self,
        format: ExportFormat,
        artifact: crate::error::Result<Artifact>,
        dir: Option<&Path>,
        open: bool,
    ) -> Option<PathBuf> {
        let target_dir = dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.settings.export_dir_or_current());

        let path = match artifact.and_then(|artifact| deliver(&artifact, &target_dir)) {
            Ok(path) => path,
            Err(e) => {
                self.feed
                    .error(&format!("Failed to export {}", format.label()), e);
                return None;
            }
        };

        self.feed.success(format!(
            "{} exported to {}",
            format.label(),
            path.display()
        ));
        if dir.is_some() {
            self.settings.export_directory = Some(target_dir);
        }
        if open || self.settings.open_after_export {
            if let Err(e) = open::that(&path) {
                self.feed.error("Failed to open exported file", e);
            }
        }
        Some(path)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Severity;
    use crate::session::{MemoryStore, SNAPSHOT_KEY};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn app_with(store: &MemoryStore) -> App {
        App::new(
            Box::new(store.clone()),
            Settings::default(),
            Preview::new(ThemeId::default()),
        )
    }

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn severities(app: &App) -> Vec<Severity> {
        app.feed().entries().iter().map(|n| n.severity).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Initialization
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_fresh_start() {
        let store = MemoryStore::new();
        let app = app_with(&store);
        assert_eq!(app.session().markdown, "");
        assert!(app.preview().is_empty());
        assert_eq!(app.render_count(), 0);
        assert!(app.feed().is_empty());
    }

    #[test]
    fn test_restores_saved_session() {
        let store = MemoryStore::with_value(
            SNAPSHOT_KEY,
            r##"{"markdown":"# Saved","theme":"dark","filename":"notes","orientation":"landscape"}"##,
        );
        let app = app_with(&store);

        assert_eq!(app.session().theme, ThemeId::Dark);
        assert_eq!(app.preview().theme(), ThemeId::Dark);
        assert!(app.preview().fragment().html.contains("Saved</h1>"));
        assert_eq!(app.session().orientation, Orientation::Landscape);
    }

    #[test]
    fn test_corrupt_snapshot_reported() {
        let store = MemoryStore::with_value(SNAPSHOT_KEY, "{not json");
        let app = app_with(&store);
        assert_eq!(severities(&app), vec![Severity::Error]);
        assert_eq!(app.session().filename, "document");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Debounce
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_rapid_edits_render_and_persist_once() {
        let store = MemoryStore::new();
        let mut app = app_with(&store);
        let start = Instant::now();

        app.on_text_input("a", start);
        app.on_text_input("ab", start + Duration::from_millis(100));
        app.on_text_input("abc", start + Duration::from_millis(200));

        assert!(!app.tick(start + Duration::from_millis(400)));
        assert!(app.tick(start + Duration::from_millis(500)));
        assert!(!app.tick(start + Duration::from_secs(2)));

        assert_eq!(app.render_count(), 1);
        assert_eq!(store.writes(), 1);
        assert_eq!(app.preview().fragment().source, "abc");
        assert!(store.get(SNAPSHOT_KEY).unwrap().contains("\"abc\""));
    }

    #[test]
    fn test_flush_renders_pending_edit() {
        let store = MemoryStore::new();
        let mut app = app_with(&store);
        app.on_text_input("**now**", Instant::now());

        assert!(app.flush());
        assert!(!app.flush());
        assert!(app.preview().fragment().html.contains("<strong>now</strong>"));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_validation_warning_shown_once() {
        let store = MemoryStore::new();
        let mut app = app_with(&store);
        let start = Instant::now();

        app.on_text_input("```\ncode", start);
        app.tick(start + Duration::from_secs(1));
        app.on_text_input("```\ncode more", start + Duration::from_secs(2));
        app.tick(start + Duration::from_secs(3));

        let warnings = app
            .feed()
            .entries()
            .iter()
            .filter(|n| n.severity == Severity::Warning)
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_persist_failure_is_reported() {
        let store = MemoryStore::new();
        let mut app = app_with(&store);
        store.fail_writes(true);

        app.set_filename("report");
        assert_eq!(severities(&app), vec![Severity::Error]);
        assert_eq!(app.session().filename, "report");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document Actions
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_clear() {
        let store = MemoryStore::with_value(SNAPSHOT_KEY, r#"{"markdown":"text","theme":"minimal"}"#);
        let mut app = app_with(&store);
        let renders = app.render_count();
        app.clear();

        assert_eq!(app.render_count(), renders);
        assert_eq!(app.session().markdown, "");
        assert_eq!(app.session().theme, ThemeId::Minimal);
        assert!(app.preview().is_empty());
        assert!(store.get(SNAPSHOT_KEY).unwrap().contains("\"markdown\":\"\""));
    }

    #[test]
    fn test_load_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        std::fs::write(&path, "# From file").unwrap();

        let store = MemoryStore::new();
        let mut app = app_with(&store);
        assert!(app.load_file(&path));

        assert_eq!(app.session().markdown, "# From file");
        assert!(app.preview().fragment().html.contains("From file</h1>"));
        let last = app.feed().last().unwrap();
        assert_eq!(last.severity, Severity::Success);
        assert!(last.message.contains("notes.md"));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut app = app_with(&store);

        assert!(!app.load_file(&temp.path().join("missing.md")));
        assert_eq!(severities(&app), vec![Severity::Error]);
        assert_eq!(store.writes(), 0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Watched Source
    // ─────────────────────────────────────────────────────────────────────────

    const QUIET: Duration = Duration::from_millis(300);

    fn errors(app: &App) -> usize {
        severities(app)
            .into_iter()
            .filter(|s| *s == Severity::Error)
            .count()
    }

    #[test]
    fn test_reload_source_schedules_render() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        std::fs::write(&path, "# Watched").unwrap();

        let store = MemoryStore::new();
        let mut app = app_with(&store);
        let start = Instant::now();
        assert!(app.reload_source(&path, start));
        assert_eq!(app.session().markdown, "# Watched");
        assert!(app.tick(start + QUIET));
        assert!(app.preview().fragment().html.contains("Watched</h1>"));

        // Same contents again do not schedule anything
        assert!(app.reload_source(&path, start + QUIET));
        assert_eq!(app.time_until_due(start + QUIET), None);
    }

    #[test]
    fn test_unreadable_source_is_reported_once() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        std::fs::write(&path, [0x66, 0x6f, 0xff, 0xfe, 0x00]).unwrap();

        let store = MemoryStore::new();
        let mut app = app_with(&store);
        let start = Instant::now();

        assert!(!app.reload_source(&path, start));
        assert_eq!(errors(&app), 0);
        assert_eq!(app.time_until_due(start), Some(QUIET));

        // Still broken after the quiet period
        assert!(!app.tick(start + QUIET));
        assert_eq!(errors(&app), 1);
        let last = app.feed().last().unwrap();
        assert!(last.message.contains("Failed to read"));
        assert!(last.message.contains("notes.md"));

        // Further events and ticks in the same failing state stay quiet
        assert!(!app.reload_source(&path, start + QUIET * 2));
        app.tick(start + QUIET * 4);
        assert_eq!(errors(&app), 1);
        assert_eq!(app.time_until_due(start + QUIET * 4), None);

        std::fs::write(&path, "fixed").unwrap();
        assert!(app.reload_source(&path, start + QUIET * 5));
        assert_eq!(app.feed().last().unwrap().severity, Severity::Info);
        assert!(app.tick(start + QUIET * 6));
        assert_eq!(app.session().markdown, "fixed");

        // A new failing stretch is reported again
        std::fs::write(&path, [0xff]).unwrap();
        assert!(!app.reload_source(&path, start + QUIET * 7));
        app.tick(start + QUIET * 8);
        assert_eq!(errors(&app), 2);
    }

    #[test]
    fn test_transient_read_failure_is_not_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        std::fs::write(&path, [0xff, 0xfe]).unwrap();

        let store = MemoryStore::new();
        let mut app = app_with(&store);
        let start = Instant::now();
        assert!(!app.reload_source(&path, start));

        // The editor finishes saving before the retry
        std::fs::write(&path, "# Saved").unwrap();
        assert!(app.reload_source(&path, start + Duration::from_millis(50)));
        assert!(app.tick(start + Duration::from_millis(350)));
        assert_eq!(errors(&app), 0);
        assert!(app.preview().fragment().html.contains("Saved</h1>"));
    }

    #[test]
    fn test_failed_source_is_retried_without_events() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.md");
        std::fs::write(&path, [0xff]).unwrap();

        let store = MemoryStore::new();
        let mut app = app_with(&store);
        let start = Instant::now();
        assert!(!app.reload_source(&path, start));

        std::fs::write(&path, "late").unwrap();
        assert!(!app.tick(start + QUIET));
        assert_eq!(app.session().markdown, "late");
        assert!(app.tick(start + QUIET * 2));
        assert_eq!(errors(&app), 0);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Preferences
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_set_theme_restyles_without_render() {
        let store = MemoryStore::with_value(SNAPSHOT_KEY, r#"{"markdown":"hello"}"#);
        let mut app = app_with(&store);
        let renders = app.render_count();

        app.set_theme(ThemeId::Python);
        assert_eq!(app.preview().theme(), ThemeId::Python);
        assert_eq!(app.render_count(), renders);
        assert!(store.get(SNAPSHOT_KEY).unwrap().contains("\"python\""));
    }

    #[test]
    fn test_filename_and_timestamp() {
        let store = MemoryStore::new();
        let mut app = app_with(&store);

        app.set_filename("   ");
        assert_eq!(app.session().filename, "document");

        app.set_filename("report");
        app.append_timestamp(date());
        assert_eq!(app.session().filename, "report_2024-05-01T12-00-00");
    }

    #[test]
    fn test_clear_log() {
        let store = MemoryStore::new();
        let mut app = app_with(&store);
        app.set_theme(ThemeId::Dark);
        assert!(!app.feed().is_empty());
        app.clear_log();
        assert!(app.feed().is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_export_with_empty_preview_warns() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut app = app_with(&store);

        assert!(app.export_pdf(Some(temp.path()), false).is_none());
        assert!(app.export_html(Some(temp.path()), false, date()).is_none());
        assert_eq!(severities(&app), vec![Severity::Warning, Severity::Warning]);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_export_blank_text_warns() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut app = app_with(&store);
        app.on_text_input("   \n  ", Instant::now());
        app.flush();

        assert!(app.export_html(Some(temp.path()), false, date()).is_none());
        assert_eq!(app.feed().last().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_export_pdf_and_html() {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::with_value(
            SNAPSHOT_KEY,
            r##"{"markdown":"# Report\n\nBody","filename":"report","orientation":"landscape"}"##,
        );
        let mut app = app_with(&store);
        let before = app.preview().snapshot();

        let pdf = app.export_pdf(Some(temp.path()), false).unwrap();
        assert_eq!(pdf, temp.path().join("report.pdf"));
        assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));
        assert_eq!(app.preview().snapshot(), before);

        let html = app.export_html(Some(temp.path()), false, date()).unwrap();
        assert_eq!(html, temp.path().join("report.html"));
        assert_eq!(app.feed().last().unwrap().severity, Severity::Success);
        assert_eq!(
            app.settings().export_directory.as_deref(),
            Some(temp.path())
        );
    }

    #[test]
    fn test_export_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let store = MemoryStore::with_value(SNAPSHOT_KEY, r#"{"markdown":"text"}"#);
        let mut app = app_with(&store);

        assert!(app.export_html(Some(&blocker), false, date()).is_none());
        let last = app.feed().last().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert!(last.message.starts_with("Failed to export HTML"));
        assert!(app.settings().export_directory.is_none());
    }
}
