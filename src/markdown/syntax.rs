//! Syntax Highlighting Module
//!
//! This module integrates syntect for code block syntax highlighting in the
//! rendered HTML.
//!
//! # Features
//! - Loads and caches syntect SyntaxSet and ThemeSet
//! - Resolves language hints through a table of common aliases
//! - Detects the language of unlabelled code blocks
//! - Emits class-based HTML so colors come from a stylesheet
//! - Generates that stylesheet for any bundled syntect theme
//!
//! # Example
//! ```ignore
//! use crate::markdown::syntax::get_highlighter;
//!
//! let html = get_highlighter().highlight_block("fn main() {}", Some("rust"));
//! let css = get_highlighter().stylesheet("InspiredGitHub");
//! ```

use log::{debug, warn};
use regex::Regex;
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::escape_html;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Prefix of every class emitted into highlighted code.
pub const CLASS_PREFIX: &str = "hl-";

/// Class naming used for both the HTML and the generated stylesheet.
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
    prefix: CLASS_PREFIX,
};

/// Fallback theme if the requested theme is not found
pub const FALLBACK_THEME: &str = "InspiredGitHub";

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Syntax highlighter that caches syntect sets for performance.
///
/// This struct holds the loaded SyntaxSet and ThemeSet, which are expensive
/// to load and should be reused across highlighting operations.
pub struct SyntaxHighlighter {
    /// Loaded syntax definitions
    syntax_set: SyntaxSet,
    /// Loaded color themes
    theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    /// Create a new syntax highlighter with default syntax and theme sets.
    ///
    /// This loads the default syntaxes and themes bundled with syntect.
    /// The operation is relatively expensive, so the highlighter should be
    /// cached and reused.
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    /// Get a theme by name, falling back to the default if not found.
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.get(FALLBACK_THEME))
    }

    /// Highlight a code block and return HTML for the inside of `<code>`.
    ///
    /// A recognized `language` hint is used directly; otherwise the language
    /// is detected from the code. When nothing matches, or highlighting fails,
    /// the escaped plain code is returned.
    pub fn highlight_block(&self, code: &str, language: Option<&str>) -> String {
        let syntax = language
            .and_then(|lang| self.find_syntax_for_language(lang))
            .or_else(|| self.detect_syntax(code));

        let Some(syntax) = syntax else {
            return escape_html(code);
        };

        match self.highlight_with(code, syntax) {
            Ok(html) => html,
            Err(e) => {
                warn!("Highlighting failed for {}: {}", syntax.name, e);
                escape_html(code)
            }
        }
    }

    /// Run the classed HTML generator over every line of `code`.
    fn highlight_with(
        &self,
        code: &str,
        syntax: &SyntaxReference,
    ) -> Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }

    /// Stylesheet coloring the classes emitted by [`Self::highlight_block`].
    ///
    /// Returns an empty string when the stylesheet cannot be generated, in
    /// which case code simply shows unstyled.
    pub fn stylesheet(&self, theme_name: &str) -> String {
        let Some(theme) = self.get_theme(theme_name) else {
            warn!("No syntect theme available for '{}'", theme_name);
            return String::new();
        };
        css_for_theme_with_class_style(theme, CLASS_STYLE).unwrap_or_else(|e| {
            warn!("Failed to build highlight stylesheet: {}", e);
            String::new()
        })
    }

    /// Find syntax definition for a language identifier.
    ///
    /// Tries multiple strategies:
    /// 1. By extension (e.g., "rs" -> Rust)
    /// 2. By name (e.g., "Rust" -> Rust)
    /// 3. By case-insensitive name
    fn find_syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        let language = language.trim();
        if language.is_empty() {
            return None;
        }

        // Normalize the language identifier
        let lang_lower = language.to_lowercase();

        // Map common language aliases to extensions
        let extension = match lang_lower.as_str() {
            "rust" | "rs" => "rs",
            "python" | "py" => "py",
            "javascript" | "js" | "node" => "js",
            "typescript" | "ts" => "ts",
            "c" | "h" => "c",
            "cpp" | "c++" | "cxx" | "hpp" => "cpp",
            "csharp" | "c#" | "cs" => "cs",
            "java" => "java",
            "go" | "golang" => "go",
            "ruby" | "rb" => "rb",
            "php" => "php",
            "scala" => "scala",
            "html" | "htm" | "xhtml" => "html",
            "css" => "css",
            "json" => "json",
            "yaml" | "yml" => "yaml",
            "xml" | "svg" => "xml",
            "markdown" | "md" => "md",
            "sql" => "sql",
            "shell" | "sh" | "bash" | "zsh" | "console" => "sh",
            "makefile" | "make" => "Makefile",
            "lua" => "lua",
            "perl" | "pl" => "pl",
            "r" => "r",
            "haskell" | "hs" => "hs",
            "erlang" | "erl" => "erl",
            "clojure" | "clj" => "clj",
            "diff" | "patch" => "diff",
            "latex" | "tex" => "tex",
            other => other,
        };

        // Try by extension first
        if let Some(syntax) = self.syntax_set.find_syntax_by_extension(extension) {
            return Some(syntax);
        }

        // Try by name
        if let Some(syntax) = self.syntax_set.find_syntax_by_name(language) {
            return Some(syntax);
        }

        // Try case-insensitive name search
        self.syntax_set
            .syntaxes()
            .iter()
            .find(|syntax| syntax.name.to_lowercase() == lang_lower)
    }

    /// Guess the language of an unlabelled code block.
    ///
    /// Shebangs and modelines win; otherwise the language whose signatures
    /// match the most lines is chosen.
    fn detect_syntax(&self, code: &str) -> Option<&SyntaxReference> {
        if code.trim().is_empty() {
            return None;
        }

        if let Some(syntax) = self.syntax_set.find_syntax_by_first_line(code) {
            return Some(syntax);
        }

        let extension = detect_language(code)?;
        debug!("Detected code block language: {}", extension);
        self.syntax_set.find_syntax_by_extension(extension)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Language Detection
// ─────────────────────────────────────────────────────────────────────────────

/// Per-language signatures, keyed by the extension syntect knows it by.
fn signatures() -> &'static [(&'static str, Vec<Regex>)] {
    static SIGNATURES: OnceLock<Vec<(&'static str, Vec<Regex>)>> = OnceLock::new();
    SIGNATURES.get_or_init(|| {
        let table: &[(&str, &[&str])] = &[
            (
                "rs",
                &[
                    r"\bfn\s+\w+\s*(<[^>]*>)?\s*\(",
                    r"\blet\s+mut\s+\w+",
                    r"\bimpl\b",
                    r"\bpub\s+(fn|struct|enum|mod|trait)\b",
                    r"\w+!\(",
                ],
            ),
            (
                "py",
                &[
                    r"(?m)^\s*def\s+\w+\s*\(.*\)\s*(->\s*[\w\[\], ]+)?:\s*$",
                    r"(?m)^\s*(from\s+[\w.]+\s+)?import\s+\w+",
                    r"(?m)^\s*class\s+\w+(\(.*\))?:\s*$",
                    r"\bself\.",
                    r"(?m)^\s*(elif|except)\b",
                ],
            ),
            (
                "js",
                &[
                    r"\bfunction\s*\w*\s*\(",
                    r"\b(const|var)\s+\w+\s*=",
                    r"=>\s*[{(]?",
                    r"\bconsole\.\w+\(",
                    r"\b(document|window)\.\w+",
                ],
            ),
            (
                "c",
                &[
                    r#"(?m)^\s*#include\s*[<"]"#,
                    r"\bint\s+main\s*\(",
                    r"\bprintf\s*\(",
                ],
            ),
            (
                "html",
                &[r"(?i)<!DOCTYPE\s+html", r"(?i)</?(html|head|body|div|span)\b"],
            ),
            (
                "json",
                &[r#"\A\s*[\{\[]\s*"#, r#""[\w-]+"\s*:\s*["\d\[\{tfn]"#],
            ),
            (
                "sql",
                &[
                    r"(?i)\bSELECT\b[\s\S]+\bFROM\b",
                    r"(?i)\bINSERT\s+INTO\b",
                    r"(?i)\bCREATE\s+TABLE\b",
                    r"(?i)\bUPDATE\s+\w+\s+SET\b",
                ],
            ),
            (
                "sh",
                &[
                    r"(?m)^\s*\$\s+\w+",
                    r"(?m)^\s*(echo|export|cd|sudo|apt|apt-get|brew|cargo|npm|git)\s",
                    r"\$\{?\w+\}?",
                ],
            ),
            (
                "css",
                &[
                    r"(?m)^\s*[.#]?[\w-]+(\s*[,>+~]?\s*[.#]?[\w-]+)*\s*\{\s*$",
                    r"(?m)^\s*[\w-]+\s*:\s*[^;{}]+;\s*$",
                ],
            ),
        ];

        table
            .iter()
            .map(|(ext, patterns)| {
                let compiled = patterns
                    .iter()
                    .filter_map(|p| match Regex::new(p) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            warn!("Invalid detection pattern for {}: {}", ext, e);
                            None
                        }
                    })
                    .collect();
                (*ext, compiled)
            })
            .collect()
    })
}

/// Guess the language extension of `code` from content signatures.
///
/// Needs at least two matching signatures, so a lone keyword in prose-like
/// text stays unhighlighted.
pub fn detect_language(code: &str) -> Option<&'static str> {
    signatures()
        .iter()
        .map(|(ext, patterns)| {
            let score = patterns.iter().filter(|re| re.is_match(code)).count();
            (*ext, score)
        })
        .filter(|(_, score)| *score >= 2)
        // max_by_key keeps the last maximum, so reverse to prefer table order on ties
        .rev()
        .max_by_key(|(_, score)| *score)
        .map(|(ext, _)| ext)
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

/// Global syntax highlighter instance.
///
/// This is lazily initialized on first access and reused for all highlighting
/// operations. Using a global instance avoids the cost of loading syntax and
/// theme sets multiple times.
static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Get or create the global syntax highlighter.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
