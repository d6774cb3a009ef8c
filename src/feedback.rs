//! User-facing notification feed
//!
//! Every component reports the outcome of a user action through the
//! [`NotificationFeed`]. It is a plain append-only list that the CLI prints;
//! it is separate from the `log` output, which every post is mirrored to.

use log::{error, info, warn};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Severity
// ─────────────────────────────────────────────────────────────────────────────

/// The four kinds of notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Success,
    Info,
}

impl Severity {
    /// Marker shown in front of the message.
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Error => "❌",
            Severity::Warning => "⚠️",
            Severity::Success => "✅",
            Severity::Info => "ℹ️",
        }
    }

    /// Lowercase tag, used as the CSS-like class of an entry.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Info => "info",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Notification
// ─────────────────────────────────────────────────────────────────────────────

/// A single entry in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
    /// Creation order, unique for the lifetime of the feed
    pub seq: u64,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.severity.icon(), self.message)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Feed
// ─────────────────────────────────────────────────────────────────────────────

/// Append-only, clearable list of notifications.
#[derive(Debug, Default)]
pub struct NotificationFeed {
    entries: Vec<Notification>,
    next_seq: u64,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and mirror it to the log.
    pub fn post(&mut self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        match severity {
            Severity::Error => error!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Success | Severity::Info => info!("{}", message),
        }
        self.entries.push(Notification {
            severity,
            message,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    /// Post an error with the context it happened in, as `"<context>: <err>"`.
    pub fn error(&mut self, context: &str, err: impl fmt::Display) {
        self.post(format!("{}: {}", context, err), Severity::Error);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.post(message, Severity::Warning);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.post(message, Severity::Success);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.post(message, Severity::Info);
    }

    /// Empty the visible feed. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Entries created at or after `seq`.
    pub fn since(&self, seq: u64) -> impl Iterator<Item = &Notification> {
        self.entries.iter().filter(move |n| n.seq >= seq)
    }

    /// Sequence number the next post will get.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&Notification> {
        self.entries.last()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_appends_in_order() {
        let mut feed = NotificationFeed::new();
        feed.info("first");
        feed.success("second");
        feed.warning("third");

        let messages: Vec<_> = feed.entries().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(feed.entries()[2].severity, Severity::Warning);
        assert_eq!(feed.entries()[2].seq, 2);
    }

    #[test]
    fn test_error_includes_context() {
        let mut feed = NotificationFeed::new();
        feed.error("Failed to save state", "disk full");
        let last = feed.last().unwrap();
        assert_eq!(last.severity, Severity::Error);
        assert_eq!(last.message, "Failed to save state: disk full");
    }

    #[test]
    fn test_clear_keeps_sequence() {
        let mut feed = NotificationFeed::new();
        feed.info("a");
        feed.info("b");
        feed.clear();
        assert!(feed.is_empty());

        feed.info("c");
        assert_eq!(feed.entries()[0].seq, 2);
    }

    #[test]
    fn test_since_filters_older_entries() {
        let mut feed = NotificationFeed::new();
        feed.info("old");
        let mark = feed.next_seq();
        feed.info("new");
        let recent: Vec<_> = feed.since(mark).map(|n| n.message.clone()).collect();
        assert_eq!(recent, vec!["new".to_string()]);
    }

    #[test]
    fn test_display_uses_icon() {
        let mut feed = NotificationFeed::new();
        feed.post("done", Severity::Success);
        assert_eq!(feed.last().unwrap().to_string(), "✅ done");
    }

    #[test]
    fn test_severity_labels_are_distinct() {
        let all = [
            Severity::Error,
            Severity::Warning,
            Severity::Success,
            Severity::Info,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.icon(), b.icon());
                assert_ne!(a.label(), b.label());
            }
        }
    }
}
