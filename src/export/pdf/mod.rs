//! Paginated PDF export
//!
//! The PDF is built from a [`PreviewSnapshot`]: the snapshot's source text is
//! parsed again into a block tree, laid out on A4 pages with the theme's print
//! palette and written with TrueType/OpenType faces found on the system,
//! embedded so any script in the source survives. The live preview is only
//! read through the snapshot and never touched.

mod embed;
mod fonts;
mod layout;
mod table;
mod text;
mod writer;

use log::{debug, info};

use super::Artifact;
use crate::error::{Error, Result};
use crate::markdown::parse_markdown;
use crate::preview::PreviewSnapshot;
use crate::session::Orientation;
use crate::theme::ThemeDefinition;
use fonts::FontBook;
use layout::{layout_document, paginate};
use writer::PdfWriter;

/// Points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// A4 portrait width in points.
pub const A4_WIDTH: f32 = 595.28;
/// A4 portrait height in points.
pub const A4_HEIGHT: f32 = 841.89;
/// Margin on every side, in millimetres.
pub const MARGIN_MM: f32 = 10.0;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageSetup {
    /// A4 with the fixed margins, rotated for landscape.
    pub fn a4(orientation: Orientation) -> Self {
        let (width, height) = match orientation {
            Orientation::Portrait => (A4_WIDTH, A4_HEIGHT),
            Orientation::Landscape => (A4_HEIGHT, A4_WIDTH),
        };
        Self {
            width,
            height,
            margin: MARGIN_MM * PT_PER_MM,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

/// Turns preview snapshots into PDF artifacts.
#[derive(Debug, Default)]
pub struct PdfExporter;

impl PdfExporter {
    pub fn new() -> Self {
        Self
    }

    /// Lay out `snapshot` with `theme` and produce `<filename>.pdf`.
    pub fn export(
        &self,
        snapshot: &PreviewSnapshot,
        theme: &ThemeDefinition,
        filename: &str,
        orientation: Orientation,
    ) -> Result<Artifact> {
        let setup = PageSetup::a4(orientation);
        let bytes = Self::render(snapshot, setup, theme, filename).map_err(|e| match e {
            Error::PdfExport(msg) if msg.starts_with("Failed to generate PDF") => {
                Error::PdfExport(msg)
            }
            other => Error::PdfExport(format!("Failed to generate PDF: {}", other)),
        })?;
        info!("Generated PDF for {} ({} bytes)", filename, bytes.len());

        Ok(Artifact::new(
            format!("{}.pdf", filename),
            PDF_MEDIA_TYPE,
            bytes,
        ))
    }

    fn render(
        snapshot: &PreviewSnapshot,
        setup: PageSetup,
        theme: &ThemeDefinition,
        title: &str,
    ) -> Result<Vec<u8>> {
        let mut fonts = FontBook::new(fonts::system_fonts())?;
        let document = parse_markdown(&snapshot.source);
        let flows = layout_document(&document, &theme.print, setup.content_width(), &mut fonts)?;
        let pages = paginate(flows, setup.content_height());
        debug!("Laid out {} page(s) for {}", pages.len(), title);

        let mut writer = PdfWriter::new(setup, theme.print.background, title, fonts);
        for page in &pages {
            writer.add_page(page)?;
        }
        writer.finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeId;
    use lopdf::{Document, Object};

    fn snapshot(source: &str) -> PreviewSnapshot {
        PreviewSnapshot {
            html: format!("<p>{}</p>", source),
            source: source.to_string(),
        }
    }

    fn media_box(bytes: &[u8]) -> Vec<f32> {
        let doc = Document::load_mem(bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let page = doc.get_dictionary(page_id).unwrap();
        match page.get(b"MediaBox").unwrap() {
            Object::Array(values) => values.iter().map(|v| v.as_float().unwrap()).collect(),
            other => panic!("unexpected media box {:?}", other),
        }
    }

    #[test]
    fn test_page_setup() {
        let portrait = PageSetup::a4(Orientation::Portrait);
        assert!((portrait.margin - 28.346).abs() < 0.01);
        assert!(portrait.height > portrait.width);

        let landscape = PageSetup::a4(Orientation::Landscape);
        assert_eq!(landscape.width, portrait.height);
        assert_eq!(landscape.content_height(), portrait.content_width());
    }

    #[test]
    fn test_export_produces_pdf() {
        let snap = snapshot("# Report\n\nHello **world**.");
        let artifact = PdfExporter::new()
            .export(&snap, ThemeId::Github.definition(), "report", Orientation::Portrait)
            .unwrap();

        assert_eq!(artifact.file_name, "report.pdf");
        assert_eq!(artifact.media_type, PDF_MEDIA_TYPE);
        assert!(artifact.bytes.starts_with(b"%PDF"));
        let mb = media_box(&artifact.bytes);
        assert!(mb[3] > mb[2]);
    }

    #[test]
    fn test_landscape_media_box() {
        let artifact = PdfExporter::new()
            .export(
                &snapshot("wide"),
                ThemeId::Dark.definition(),
                "wide",
                Orientation::Landscape,
            )
            .unwrap();
        let mb = media_box(&artifact.bytes);
        assert!((mb[2] - A4_HEIGHT).abs() < 0.01);
        assert!((mb[3] - A4_WIDTH).abs() < 0.01);
    }

    #[test]
    fn test_snapshot_is_untouched() {
        let snap = snapshot("text");
        let before = snap.clone();
        PdfExporter::new()
            .export(&snap, ThemeId::Minimal.definition(), "doc", Orientation::Portrait)
            .unwrap();
        assert_eq!(snap, before);
    }

    #[test]
    fn test_page_break_marker_adds_page() {
        let source = "first\n\n<div class=\"page-break-after\"></div>\n\nsecond";
        let artifact = PdfExporter::new()
            .export(
                &snapshot(source),
                ThemeId::Professional.definition(),
                "doc",
                Orientation::Portrait,
            )
            .unwrap();
        let doc = Document::load_mem(&artifact.bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_long_document_spans_pages() {
        let source = (0..200)
            .map(|i| format!("Paragraph number {}.", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let artifact = PdfExporter::new()
            .export(
                &snapshot(&source),
                ThemeId::Python.definition(),
                "long",
                Orientation::Portrait,
            )
            .unwrap();
        let doc = Document::load_mem(&artifact.bytes).unwrap();
        assert!(doc.get_pages().len() > 3);
    }

    #[test]
    fn test_non_latin_text_round_trips() {
        let artifact = PdfExporter::new()
            .export(
                &snapshot("# Привет 中文\n\nΚαλημέρα, 😀"),
                ThemeId::Github.definition(),
                "unicode",
                Orientation::Portrait,
            )
            .unwrap();
        let doc = Document::load_mem(&artifact.bytes).unwrap();
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("Привет"), "extracted: {:?}", text);
        assert!(text.contains("中文"), "extracted: {:?}", text);
        assert!(text.contains("Καλημέρα"), "extracted: {:?}", text);
        assert!(text.contains('😀'), "extracted: {:?}", text);
        assert!(!text.contains('?'));
    }

    #[test]
    fn test_table_and_code_text_is_extractable() {
        let source = "| Name | Значение |\n|---|---|\n| key | данные |\n\n```\nfn main() {}\n```";
        let artifact = PdfExporter::new()
            .export(
                &snapshot(source),
                ThemeId::Professional.definition(),
                "table",
                Orientation::Landscape,
            )
            .unwrap();
        let doc = Document::load_mem(&artifact.bytes).unwrap();
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("Значение"));
        assert!(text.contains("данные"));
        assert!(text.contains("fn main() {}"));
    }
}
