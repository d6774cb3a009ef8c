//! Theme Registry for mdtofile
//!
//! A theme is a named bundle of presentational styling applied identically to
//! the live preview, the HTML export and the PDF export.
//!
//! # Architecture
//!
//! Themes are a closed enumeration: [`ThemeId`] lists every registered theme
//! and [`ThemeId::definition`] maps it to its static [`ThemeDefinition`].
//! Parsing a key with [`ThemeId::from_key`] is total, so an unknown key from a
//! stale snapshot falls back to the default theme instead of failing.
//!
//! Adding a theme means adding one variant below and one entry in `presets.rs`.
//!
//! # Theme Files
//!
//! - `presets.rs` - CSS payloads and print palettes for each preset

mod presets;

use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Identifier
// ─────────────────────────────────────────────────────────────────────────────

/// Identifier of a registered theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeId {
    #[default]
    Github,
    Dark,
    Minimal,
    Professional,
    Python,
}

impl ThemeId {
    /// Every registered theme, in selector order.
    pub fn all() -> &'static [ThemeId] {
        &[
            ThemeId::Github,
            ThemeId::Dark,
            ThemeId::Minimal,
            ThemeId::Professional,
            ThemeId::Python,
        ]
    }

    /// Registry keys, exactly the values a theme selector accepts.
    pub fn keys() -> Vec<&'static str> {
        Self::all().iter().map(|t| t.key()).collect()
    }

    /// Stable key used in the persisted snapshot and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            ThemeId::Github => "github",
            ThemeId::Dark => "dark",
            ThemeId::Minimal => "minimal",
            ThemeId::Professional => "professional",
            ThemeId::Python => "python",
        }
    }

    /// Resolve a key, falling back to the default theme when unknown.
    pub fn from_key(key: &str) -> Self {
        Self::parse(key).unwrap_or_default()
    }

    /// Strict lookup, `None` when the key is not registered.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::all()
            .iter()
            .copied()
            .find(|t| t.key().eq_ignore_ascii_case(key))
    }

    /// The static definition of this theme.
    pub fn definition(&self) -> &'static ThemeDefinition {
        match self {
            ThemeId::Github => &presets::GITHUB,
            ThemeId::Dark => &presets::DARK,
            ThemeId::Minimal => &presets::MINIMAL,
            ThemeId::Professional => &presets::PROFESSIONAL,
            ThemeId::Python => &presets::PYTHON,
        }
    }

    /// Title and tagline shown in the application banner.
    pub fn banner(&self) -> (&'static str, &'static str) {
        match self {
            ThemeId::Python => (
                "📜 The Scribe's Workshop 📜",
                "Where ancient scrolls meet modern export capabilities",
            ),
            _ => (
                "Markdown to File Converter",
                "Convert markdown to PDF or HTML with syntax highlighting",
            ),
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme Definition
// ─────────────────────────────────────────────────────────────────────────────

/// Static description of a theme.
#[derive(Debug, PartialEq)]
pub struct ThemeDefinition {
    /// Human-readable name
    pub name: &'static str,
    /// Stylesheet applied to rendered content (preview and HTML export)
    pub css: &'static str,
    /// Name of the syntect theme used for code highlighting
    pub highlight_theme: &'static str,
    /// The same styling expressed for the PDF writer
    pub print: PrintPalette,
}

impl ThemeDefinition {
    /// Whether text is light on a dark background.
    pub fn is_dark(&self) -> bool {
        self.print.background.luminance() < 0.5
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Print Palette
// ─────────────────────────────────────────────────────────────────────────────

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Components scaled to `0.0..=1.0`, as PDF color operators expect.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }

    /// Relative luminance approximation in `0.0..=1.0`.
    pub fn luminance(self) -> f32 {
        let (r, g, b) = self.to_unit();
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

/// Body font family of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Sans,
    Serif,
}

/// Colors and fonts the PDF writer applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintPalette {
    pub background: Rgb,
    pub text: Rgb,
    pub heading: Rgb,
    pub link: Rgb,
    pub quote_text: Rgb,
    pub quote_border: Rgb,
    pub code_background: Rgb,
    pub rule: Rgb,
    pub table_border: Rgb,
    pub table_header_background: Rgb,
    pub table_header_text: Rgb,
    pub body_font: FontFamily,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
