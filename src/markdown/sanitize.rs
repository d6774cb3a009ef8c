//! Allow-list HTML sanitization
//!
//! Everything the converter produces passes through here before it reaches
//! the preview or an export. Anything not listed below is dropped; `script`
//! and `style` elements lose their content too.

use ammonia::{Builder, UrlRelative};
use std::collections::{HashMap, HashSet};

/// Elements that survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "strong", "em", "del", "code", "pre",
    "ul", "ol", "li", "a", "img", "table", "thead", "tbody", "tr", "th", "td", "blockquote",
    "div", "span",
];

/// Attributes allowed on any surviving element.
pub const ALLOWED_ATTRIBUTES: &[&str] = &[
    "href", "src", "alt", "title", "class", "id", "align", "colspan", "rowspan",
];

/// URL schemes allowed in `href` and `src`. Relative URLs are kept as well.
pub const ALLOWED_URL_SCHEMES: &[&str] = &[
    "http", "https", "mailto", "tel", "callto", "cid", "xmpp", "data",
];

/// Elements removed together with everything inside them.
const STRIPPED_CONTENT_TAGS: &[&str] = &["script", "style"];

/// Build the sanitizer with the allow-lists above.
pub fn build_sanitizer() -> Builder<'static> {
    let mut builder = Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect::<HashSet<_>>())
        .clean_content_tags(STRIPPED_CONTENT_TAGS.iter().copied().collect::<HashSet<_>>())
        .generic_attributes(ALLOWED_ATTRIBUTES.iter().copied().collect::<HashSet<_>>())
        .tag_attributes(HashMap::new())
        .url_schemes(ALLOWED_URL_SCHEMES.iter().copied().collect::<HashSet<_>>())
        .url_relative(UrlRelative::PassThrough)
        .link_rel(None)
        .strip_comments(true);
    builder
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(html: &str) -> String {
        build_sanitizer().clean(html).to_string()
    }

    #[test]
    fn test_script_removed_with_content() {
        let out = clean("<p>hi</p><script>alert(1)</script>");
        assert_eq!(out, "<p>hi</p>");
    }

    #[test]
    fn test_style_removed_with_content() {
        let out = clean("<style>body { display: none }</style><em>x</em>");
        assert_eq!(out, "<em>x</em>");
    }

    #[test]
    fn test_event_handlers_stripped() {
        let out = clean("<img src=\"a.png\" onerror=\"alert(1)\" alt=\"a\">");
        assert!(!out.contains("onerror"));
        assert!(out.contains("src=\"a.png\""));
    }

    #[test]
    fn test_javascript_urls_dropped() {
        let out = clean("<a href=\"javascript:alert(1)\">x</a>");
        assert!(!out.contains("javascript:"));
        assert!(out.contains(">x</a>"));
    }

    #[test]
    fn test_allowed_schemes_and_relative_urls_kept() {
        let out = clean(
            "<a href=\"mailto:me@example.com\">m</a><a href=\"#top\">t</a><a href=\"docs/a.md\">d</a>",
        );
        assert!(out.contains("mailto:me@example.com"));
        assert!(out.contains("href=\"#top\""));
        assert!(out.contains("href=\"docs/a.md\""));
    }

    #[test]
    fn test_unknown_tags_unwrapped() {
        let out = clean("<iframe src=\"https://x\"></iframe><section><p>kept</p></section>");
        assert!(!out.contains("iframe"));
        assert!(!out.contains("section"));
        assert!(out.contains("<p>kept</p>"));
    }

    #[test]
    fn test_table_attributes_kept() {
        let out = clean("<table><tr><td align=\"right\" colspan=\"2\">1</td></tr></table>");
        assert!(out.contains("align=\"right\""));
        assert!(out.contains("colspan=\"2\""));
    }

    #[test]
    fn test_comments_stripped() {
        assert_eq!(clean("<!-- note --><p>a</p>"), "<p>a</p>");
    }
}
