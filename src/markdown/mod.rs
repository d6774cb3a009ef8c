//! Markdown parsing, sanitized rendering and syntax highlighting
//!
//! This module turns document text into the HTML every surface of the
//! application shows, using the comrak library, a CommonMark + GFM
//! compatible parser.
//!
//! # Features
//! - GitHub Flavored Markdown: tables, strikethrough, task lists, autolinks
//! - Single newlines render as line breaks, headings get ids
//! - Syntax highlighting for code blocks using syntect, with language detection
//! - Allow-list sanitization with ammonia
//! - Advisory validation (unclosed fences, very large documents)
//! - An owned AST for consumers that lay the document out themselves
//!
//! # Example
//! ```ignore
//! use crate::markdown::{parse_markdown, validate, MarkdownRenderer};
//!
//! let renderer = MarkdownRenderer::new();
//! let html = renderer.render("# Hello\n\nThis is **bold** text.")?;
//! let doc = parse_markdown("# Hello");
//! let report = validate("```rust", 500_000);
//! ```

mod parser;
mod renderer;
pub mod sanitize;
pub mod syntax;
mod validate;

pub use parser::{
    parse_markdown, ListType, MarkdownDocument, MarkdownNode, MarkdownNodeType, TableAlignment,
};
pub use renderer::{MarkdownRenderer, RenderedFragment};
pub use syntax::get_highlighter;
pub use validate::{validate, DEFAULT_LARGE_DOCUMENT_THRESHOLD};

/// Escape text for use in HTML content and attribute values.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
