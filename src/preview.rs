//! Live preview
//!
//! Holds the most recent rendered fragment and the theme it is shown with.
//! When a mirror path is configured, every change rewrites a themed HTML
//! page there that reloads itself, so a browser pointed at the file follows
//! the edits.

use log::debug;
use std::path::{Path, PathBuf};

use crate::config::write_replacing;
use crate::error::Error;
use crate::export::html::theme_styles;
use crate::feedback::NotificationFeed;
use crate::markdown::RenderedFragment;
use crate::theme::ThemeId;

/// Suffix of the staging file used when rewriting the mirror
const MIRROR_STAGING_SUFFIX: &str = ".tmp";

/// Owned copy of what the preview currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewSnapshot {
    /// Sanitized HTML on display
    pub html: String,
    /// Text the HTML was rendered from
    pub source: String,
}

impl PreviewSnapshot {
    pub fn is_empty(&self) -> bool {
        self.html.trim().is_empty()
    }
}

#[derive(Debug)]
pub struct Preview {
    fragment: RenderedFragment,
    theme: ThemeId,
    mirror: Option<PathBuf>,
    refresh_secs: u32,
}

impl Preview {
    pub fn new(theme: ThemeId) -> Self {
        Self {
            fragment: RenderedFragment::default(),
            theme,
            mirror: None,
            refresh_secs: 0,
        }
    }

    /// Also write the preview page to `path`, reloading every `refresh_secs`.
    pub fn with_mirror(mut self, path: impl Into<PathBuf>, refresh_secs: u32) -> Self {
        self.mirror = Some(path.into());
        self.refresh_secs = refresh_secs;
        self
    }

    pub fn mirror_path(&self) -> Option<&Path> {
        self.mirror.as_deref()
    }

    pub fn theme(&self) -> ThemeId {
        self.theme
    }

    pub fn fragment(&self) -> &RenderedFragment {
        &self.fragment
    }

    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty()
    }

    /// Show a newly rendered fragment.
    pub fn update(&mut self, fragment: RenderedFragment, feed: &mut NotificationFeed) {
        self.fragment = fragment;
        self.sync_mirror(feed);
    }

    /// Switch theme without re-rendering the content.
    pub fn restyle(&mut self, theme: ThemeId, feed: &mut NotificationFeed) {
        self.theme = theme;
        self.sync_mirror(feed);
    }

    pub fn clear(&mut self, feed: &mut NotificationFeed) {
        self.fragment = RenderedFragment::default();
        self.sync_mirror(feed);
    }

    /// Copy of the current content for consumers that must not touch the
    /// preview itself.
    pub fn snapshot(&self) -> PreviewSnapshot {
        PreviewSnapshot {
            html: self.fragment.html.clone(),
            source: self.fragment.source.clone(),
        }
    }

    /// The complete preview page.
    pub fn document(&self) -> String {
        let definition = self.theme.definition();
        let refresh = if self.refresh_secs > 0 {
            format!(
                "\n    <meta http-equiv=\"refresh\" content=\"{}\">",
                self.refresh_secs
            )
        } else {
            String::new()
        };
        let body = if self.fragment.is_empty() {
            "<p><em>Nothing to preview yet.</em></p>"
        } else {
            self.fragment.html.as_str()
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">{refresh}
    <title>Preview - {theme}</title>
    <style>
{styles}
    </style>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>
</body>
</html>"#,
            refresh = refresh,
            theme = definition.name,
            styles = theme_styles(definition),
            body = body,
        )
    }

    /// Rewrite the mirror file, reporting failures to `feed`.
    fn sync_mirror(&self, feed: &mut NotificationFeed) {
        let Some(path) = &self.mirror else {
            return;
        };
        match write_replacing(path, MIRROR_STAGING_SUFFIX, self.document().as_bytes()) {
            Ok(()) => debug!("Preview written to {}", path.display()),
            Err(e) => feed.error(
                "Failed to update preview",
                Error::FileWrite {
                    path: path.clone(),
                    source: e,
                },
            ),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Severity;
    use tempfile::TempDir;

    fn fragment(html: &str, source: &str) -> RenderedFragment {
        RenderedFragment {
            html: html.to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_starts_empty() {
        let preview = Preview::new(ThemeId::Github);
        assert!(preview.is_empty());
        assert!(preview.snapshot().is_empty());
        assert!(preview.document().contains("Nothing to preview yet."));
    }

    #[test]
    fn test_update_and_snapshot() {
        let mut feed = NotificationFeed::new();
        let mut preview = Preview::new(ThemeId::Github);
        preview.update(fragment("<p>hi</p>", "hi"), &mut feed);

        let snapshot = preview.snapshot();
        assert_eq!(snapshot.html, "<p>hi</p>");
        assert_eq!(snapshot.source, "hi");
        assert!(feed.is_empty());
    }

    #[test]
    fn test_restyle_keeps_content() {
        let mut feed = NotificationFeed::new();
        let mut preview = Preview::new(ThemeId::Github);
        preview.update(fragment("<p>hi</p>", "hi"), &mut feed);
        preview.restyle(ThemeId::Dark, &mut feed);

        assert_eq!(preview.theme(), ThemeId::Dark);
        assert_eq!(preview.fragment().html, "<p>hi</p>");
        let doc = preview.document();
        assert!(doc.contains(ThemeId::Dark.definition().css));
        assert!(!doc.contains(ThemeId::Github.definition().css));
    }

    #[test]
    fn test_mirror_follows_changes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preview.html");
        let mut feed = NotificationFeed::new();
        let mut preview = Preview::new(ThemeId::Github).with_mirror(&path, 2);

        preview.update(fragment("<p>first</p>", "first"), &mut feed);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<p>first</p>"));
        assert!(written.contains("http-equiv=\"refresh\" content=\"2\""));

        preview.clear(&mut feed);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(!written.contains("<p>first</p>"));
        assert!(feed.is_empty());
    }

    #[test]
    fn test_mirror_failure_goes_to_feed() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let mut feed = NotificationFeed::new();
        let mut preview = Preview::new(ThemeId::Github).with_mirror(blocker.join("preview.html"), 2);

        preview.update(fragment("<p>x</p>", "x"), &mut feed);
        let last = feed.last().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert!(last.message.starts_with("Failed to update preview"));
        // The in-memory preview is still updated
        assert_eq!(preview.fragment().source, "x");
    }
}
