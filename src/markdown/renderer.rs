//! Sanitized Markdown to HTML rendering
//!
//! The pipeline is: comrak converts GFM to HTML, fenced code is highlighted
//! by syntect through a comrak adapter, and ammonia strips everything outside
//! the allow-list. The output is the only HTML the rest of the application
//! ever embeds.

use ammonia::Builder;
use comrak::adapters::SyntaxHighlighterAdapter;
use comrak::{format_html_with_plugins, parse_document, Arena, Options, Plugins};
use log::debug;
use std::collections::HashMap;
use std::io::{self, Write};

use super::parser::MarkdownOptions;
use super::sanitize::build_sanitizer;
use super::syntax::get_highlighter;
use super::escape_html;
use crate::error::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Rendered Fragment
// ─────────────────────────────────────────────────────────────────────────────

/// Sanitized HTML together with the text it was rendered from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedFragment {
    pub html: String,
    pub source: String,
}

impl RenderedFragment {
    pub fn is_empty(&self) -> bool {
        self.html.trim().is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Code Block Highlighting
// ─────────────────────────────────────────────────────────────────────────────

/// Routes comrak's fenced code blocks through the syntect highlighter.
struct CodeBlockHighlighter;

impl SyntaxHighlighterAdapter for CodeBlockHighlighter {
    fn write_highlighted(
        &self,
        output: &mut dyn Write,
        lang: Option<&str>,
        code: &str,
    ) -> io::Result<()> {
        let html = get_highlighter().highlight_block(code, lang);
        output.write_all(html.as_bytes())
    }

    fn write_pre_tag(
        &self,
        output: &mut dyn Write,
        attributes: HashMap<String, String>,
    ) -> io::Result<()> {
        write_tag(output, "pre", &attributes)
    }

    fn write_code_tag(
        &self,
        output: &mut dyn Write,
        attributes: HashMap<String, String>,
    ) -> io::Result<()> {
        write_tag(output, "code", &attributes)
    }
}

fn write_tag(
    output: &mut dyn Write,
    tag: &str,
    attributes: &HashMap<String, String>,
) -> io::Result<()> {
    let mut names: Vec<_> = attributes.keys().collect();
    names.sort();

    write!(output, "<{}", tag)?;
    for name in names {
        write!(output, " {}=\"{}\"", name, escape_html(&attributes[name]))?;
    }
    output.write_all(b">")
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderer
// ─────────────────────────────────────────────────────────────────────────────

/// Converts markup text to a sanitized HTML fragment.
pub struct MarkdownRenderer {
    options: Options,
    sanitizer: Builder<'static>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::with_options(&MarkdownOptions::default())
    }

    pub fn with_options(options: &MarkdownOptions) -> Self {
        Self {
            options: options.to_comrak_options(),
            sanitizer: build_sanitizer(),
        }
    }

    /// Render `text` to sanitized HTML. Empty input gives an empty string.
    pub fn render(&self, text: &str) -> Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }

        let arena = Arena::new();
        let root = parse_document(&arena, text, &self.options);

        let adapter = CodeBlockHighlighter;
        let mut plugins = Plugins::default();
        plugins.render.codefence_syntax_highlighter = Some(&adapter);

        let mut raw = Vec::new();
        format_html_with_plugins(root, &self.options, &mut raw, &plugins)
            .map_err(|e| Error::Render(format!("Failed to render markdown: {}", e)))?;
        let raw = String::from_utf8(raw)
            .map_err(|e| Error::Render(format!("Failed to render markdown: {}", e)))?;

        let html = self.sanitizer.clean(&raw).to_string();
        debug!(
            "Rendered {} chars of markdown to {} bytes of HTML",
            text.len(),
            html.len()
        );
        Ok(html)
    }

    /// Render `text` and keep it alongside the HTML.
    pub fn render_fragment(&self, text: &str) -> Result<RenderedFragment> {
        Ok(RenderedFragment {
            html: self.render(text)?,
            source: text.to_string(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
