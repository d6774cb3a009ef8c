//! HTML Export Generation
//!
//! This module generates complete HTML documents from markdown content,
//! with inlined theme and syntax highlighting CSS for standalone viewing.
//! The document references nothing outside itself.

use chrono::{DateTime, Utc};
use log::info;

use super::Artifact;
use crate::config::APP_NAME;
use crate::error::{Error, Result};
use crate::markdown::{escape_html, get_highlighter, MarkdownRenderer};
use crate::theme::ThemeDefinition;

pub const HTML_MEDIA_TYPE: &str = "text/html;charset=utf-8";

/// Format of the date in the metadata and footer.
const DATE_FORMAT: &str = "%Y-%m-%d";

// ─────────────────────────────────────────────────────────────────────────────
// Exporter
// ─────────────────────────────────────────────────────────────────────────────

/// Renders markdown into a self-contained HTML artifact.
#[derive(Default)]
pub struct HtmlExporter {
    renderer: MarkdownRenderer,
}

impl HtmlExporter {
    pub fn new() -> Self {
        Self {
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Render `markdown` with `theme` into `<filename>.html`.
    ///
    /// The text is rendered from scratch, independently of any preview.
    pub fn export(
        &self,
        markdown: &str,
        theme: &ThemeDefinition,
        filename: &str,
        date: DateTime<Utc>,
    ) -> Result<Artifact> {
        let body = self
            .renderer
            .render(markdown)
            .map_err(|e| Error::HtmlExport(format!("Failed to generate HTML: {}", e)))?;
        let html = generate_html_document(&body, theme, filename, date);
        info!(
            "Generated HTML for {} with theme {} ({} bytes)",
            filename,
            theme.name,
            html.len()
        );

        Ok(Artifact::new(
            format!("{}.html", filename),
            HTML_MEDIA_TYPE,
            html.into_bytes(),
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Assemble a complete HTML document around already sanitized `body` HTML.
pub fn generate_html_document(
    body: &str,
    theme: &ThemeDefinition,
    title: &str,
    date: DateTime<Utc>,
) -> String {
    let date = date.format(DATE_FORMAT).to_string();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="{generator}">
    <meta name="date" content="{date}">
    <title>{title}</title>
    <style>
{styles}

{print_css}
    </style>
</head>
<body>
    <article class="markdown-body">
{body}
    </article>

    <footer style="margin-top: 3rem; padding-top: 1rem; border-top: 1px solid #ddd; font-size: 0.85rem; color: #666; text-align: center;">
        <p>Generated on {date} by {generator}</p>
    </footer>
</body>
</html>"#,
        generator = APP_NAME,
        date = date,
        title = escape_html(title),
        styles = theme_styles(theme),
        print_css = PRINT_CSS,
        body = body,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for elements the theme stylesheets leave alone.
const BASE_CSS: &str = r#"
/* Base */
*, *::before, *::after {
    box-sizing: border-box;
}

.markdown-body img {
    max-width: 100%;
    height: auto;
}

.markdown-body ul.contains-task-list {
    list-style-type: none;
    padding-left: 1em;
}

.markdown-body pre code {
    display: block;
    overflow-x: auto;
}

.markdown-body del {
    text-decoration: line-through;
}
"#;

/// Print rules, applied when the document is printed from a browser.
const PRINT_CSS: &str = r#"/* Print styles */
@media print {
    body { background-color: #fff; }
    a { color: #000; text-decoration: underline; }
    pre, blockquote, table, img { page-break-inside: avoid; }
    h1, h2, h3, h4, h5, h6 { page-break-after: avoid; }
    .page-break-before { page-break-before: always; }
    .page-break-after { page-break-after: always; }
}"#;

/// Everything a theme contributes to a page: base rules, the theme's own
/// stylesheet (verbatim) and the code highlighting classes.
///
/// Shared by the HTML export and the live preview document.
pub fn theme_styles(theme: &ThemeDefinition) -> String {
    format!(
        "{base}\n/* Theme: {name} */\n{css}\n/* Syntax highlighting: {highlight} */\n{syntax}",
        base = BASE_CSS,
        name = theme.name,
        css = theme.css,
        highlight = theme.highlight_theme,
        syntax = get_highlighter().stylesheet(theme.highlight_theme),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeId;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap()
    }

    fn export(markdown: &str, theme: ThemeId, filename: &str) -> String {
        let artifact = HtmlExporter::new()
            .export(markdown, theme.definition(), filename, date())
            .unwrap();
        String::from_utf8(artifact.bytes).unwrap()
    }

    #[test]
    fn test_document_structure() {
        let html = export("# Test\n\nParagraph text.", ThemeId::Github, "notes");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>notes</title>"));
        assert!(html.contains("<meta name=\"generator\" content=\"mdtofile\">"));
        assert!(html.contains("<meta name=\"date\" content=\"2024-03-09\">"));
        assert!(html.contains("<article class=\"markdown-body\">"));
        assert!(html.contains("Test</h1>"));
        assert!(html.contains("Generated on 2024-03-09 by mdtofile"));
    }

    #[test]
    fn test_artifact_metadata() {
        let artifact = HtmlExporter::new()
            .export("text", ThemeId::Github.definition(), "report", date())
            .unwrap();
        assert_eq!(artifact.file_name, "report.html");
        assert_eq!(artifact.media_type, HTML_MEDIA_TYPE);
    }

    #[test]
    fn test_title_is_escaped() {
        let html = export("x", ThemeId::Github, "<b>&");
        assert!(html.contains("<title>&lt;b&gt;&amp;</title>"));
    }

    #[test]
    fn test_switching_theme_embeds_only_new_css() {
        let github = export("# Hi", ThemeId::Github, "doc");
        assert!(github.contains(ThemeId::Github.definition().css));

        let dark = export("# Hi", ThemeId::Dark, "doc");
        assert!(dark.contains(ThemeId::Dark.definition().css));
        assert!(!dark.contains(ThemeId::Github.definition().css));
        assert!(dark.contains("/* Theme: Dark */"));
    }

    #[test]
    fn test_content_is_sanitized() {
        let html = export(
            "<script>alert(1)</script>\n\n<img src=x onerror=alert(2)>",
            ThemeId::Github,
            "doc",
        );
        assert!(!html.contains("<script"));
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn test_highlight_block_follows_theme() {
        let github = ThemeId::Github.definition();
        let dark = ThemeId::Dark.definition();
        let github_css = get_highlighter().stylesheet(github.highlight_theme);
        let dark_css = get_highlighter().stylesheet(dark.highlight_theme);
        assert!(!github_css.is_empty());
        assert_ne!(github_css, dark_css);

        let html = export("```rust\nfn main() {}\n```", ThemeId::Dark, "doc");
        assert!(html.contains(&dark_css));
        assert!(!html.contains(&github_css));
    }

    #[test]
    fn test_self_contained() {
        let html = export("```rust\nfn main() {}\n```", ThemeId::Python, "doc");
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
        assert!(html.contains("hl-"));
        assert!(html.contains("@media print"));
    }
}
