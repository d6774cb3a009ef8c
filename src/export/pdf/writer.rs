//! Serializes laid-out pages into a PDF file with lopdf.
//!
//! All pages share one resources dictionary. It is written last, once the
//! pages have shown which faces and characters they use. Content streams
//! are Flate-compressed.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::io::Write;

use super::embed::FontEmbedder;
use super::fonts::{FaceId, FontBook};
use super::layout::{DrawItem, Page};
use super::PageSetup;
use crate::error::{Error, Result};
use crate::theme::Rgb;

/// Builds the PDF object graph page by page.
pub struct PdfWriter<'db> {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    setup: PageSetup,
    background: Rgb,
    fonts: FontEmbedder<'db>,
}

impl<'db> PdfWriter<'db> {
    pub fn new(setup: PageSetup, background: Rgb, title: &str, fonts: FontBook<'db>) -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();

        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![],
                "Count" => 0,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let info_id = document.add_object(dictionary! {
            "Title" => lopdf::text_string(title),
            "Producer" => Object::string_literal(crate::config::APP_NAME),
        });
        document.trailer.set("Info", info_id);

        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            setup,
            background,
            fonts: FontEmbedder::new(fonts),
        }
    }

    /// Append one page.
    pub fn add_page(&mut self, page: &Page) -> Result<()> {
        let mut ctx = PageContext::new(self.setup);
        ctx.fill_background(self.background);
        for item in &page.items {
            ctx.draw(item, &mut self.fonts);
        }

        let encoded = ctx.content.encode()?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&encoded)
            .and_then(|_| encoder.flush())
            .map_err(|e| Error::PdfExport(format!("Failed to compress page: {}", e)))?;
        let compressed = encoder
            .finish()
            .map_err(|e| Error::PdfExport(format!("Failed to compress page: {}", e)))?;
        let content_id = self.document.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            compressed,
        ));

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                self.setup.width.into(),
                self.setup.height.into(),
            ],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Link the pages into the tree and serialize the file.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let fonts = self.fonts.embed(&mut self.document)?;
        self.document.objects.insert(
            self.resources_id,
            Object::Dictionary(dictionary! { "Font" => fonts }),
        );

        if let Ok(Object::Dictionary(pages)) = self.document.get_object_mut(self.pages_id) {
            let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
            pages.set("Kids", kids);
            pages.set("Count", self.page_ids.len() as i64);
        }

        let mut bytes = Vec::new();
        self.document
            .save_to(&mut bytes)
            .map_err(|e| Error::PdfExport(format!("Failed to write PDF: {}", e)))?;
        Ok(bytes)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Page Content
// ─────────────────────────────────────────────────────────────────────────────

/// Graphics state tracked to avoid redundant operators.
#[derive(Default)]
struct PageState {
    font: Option<(FaceId, f32)>,
    fill: Option<Rgb>,
    stroke: Option<Rgb>,
    line_width: Option<f32>,
}

struct PageContext {
    setup: PageSetup,
    content: Content,
    state: PageState,
}

impl PageContext {
    fn new(setup: PageSetup) -> Self {
        Self {
            setup,
            content: Content { operations: vec![] },
            state: PageState::default(),
        }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    /// Page x of a content-area x.
    fn x(&self, x: f32) -> f32 {
        self.setup.margin + x
    }

    /// Page y of a content-area y (which grows downwards).
    fn y(&self, y: f32) -> f32 {
        self.setup.height - self.setup.margin - y
    }

    fn fill_background(&mut self, color: Rgb) {
        // White pages need no fill
        if color == Rgb(255, 255, 255) {
            return;
        }
        self.set_fill(color);
        self.op(
            "re",
            vec![
                0.into(),
                0.into(),
                self.setup.width.into(),
                self.setup.height.into(),
            ],
        );
        self.op("f", vec![]);
    }

    fn set_fill(&mut self, color: Rgb) {
        if self.state.fill != Some(color) {
            let (r, g, b) = color.to_unit();
            self.op("rg", vec![r.into(), g.into(), b.into()]);
            self.state.fill = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Rgb, width: f32) {
        if self.state.stroke != Some(color) {
            let (r, g, b) = color.to_unit();
            self.op("RG", vec![r.into(), g.into(), b.into()]);
            self.state.stroke = Some(color);
        }
        if self.state.line_width != Some(width) {
            self.op("w", vec![width.into()]);
            self.state.line_width = Some(width);
        }
    }

    fn draw(&mut self, item: &DrawItem, fonts: &mut FontEmbedder) {
        match item {
            DrawItem::Text {
                x,
                baseline,
                face,
                size,
                color,
                text,
            } => {
                if text.trim().is_empty() {
                    return;
                }
                self.set_fill(*color);
                self.op("BT", vec![]);
                if self.state.font != Some((*face, *size)) {
                    let name = Object::Name(face.resource_name().into_bytes());
                    self.op("Tf", vec![name, (*size).into()]);
                    self.state.font = Some((*face, *size));
                }
                let (px, py) = (self.x(*x), self.y(*baseline));
                self.op("Td", vec![px.into(), py.into()]);
                let encoded = fonts.encode(*face, text);
                self.op(
                    "Tj",
                    vec![Object::String(encoded, StringFormat::Hexadecimal)],
                );
                self.op("ET", vec![]);
            }
            DrawItem::Fill {
                x,
                y,
                width,
                height,
                color,
            } => {
                self.set_fill(*color);
                // PDF rectangles grow upwards from their lower-left corner
                let (px, py) = (self.x(*x), self.y(*y + *height));
                self.op(
                    "re",
                    vec![px.into(), py.into(), (*width).into(), (*height).into()],
                );
                self.op("f", vec![]);
            }
            DrawItem::Stroke {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                self.set_stroke(*color, *width);
                let (ax, ay) = (self.x(*x1), self.y(*y1));
                let (bx, by) = (self.x(*x2), self.y(*y2));
                self.op("m", vec![ax.into(), ay.into()]);
                self.op("l", vec![bx.into(), by.into()]);
                self.op("S", vec![]);
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::pdf::fonts::{system_fonts, FontRequest};
    use crate::session::Orientation;
    use crate::theme::FontFamily;

    fn book() -> FontBook<'static> {
        FontBook::new(system_fonts()).unwrap()
    }

    fn text_item(face: FaceId, text: &str) -> DrawItem {
        DrawItem::Text {
            x: 0.0,
            baseline: 12.0,
            face,
            size: 11.0,
            color: Rgb(0, 0, 0),
            text: text.to_string(),
        }
    }

    fn writer_with_text(texts: &[&str]) -> Vec<u8> {
        let mut fonts = book();
        let face = fonts.resolve(FontRequest::text(FontFamily::Sans, false, false));
        let mut writer = PdfWriter::new(
            PageSetup::a4(Orientation::Portrait),
            Rgb(255, 255, 255),
            "notes",
            fonts,
        );
        for text in texts {
            let page = Page {
                items: vec![text_item(face, text)],
            };
            writer.add_page(&page).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_writes_loadable_document() {
        let bytes = writer_with_text(&["first", "second"]);
        assert!(bytes.starts_with(b"%PDF-1.7"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
        assert!(doc.extract_text(&[2]).unwrap().contains("second"));
    }

    #[test]
    fn test_used_face_is_embedded() {
        let bytes = writer_with_text(&["embedded"]);
        let doc = Document::load_mem(&bytes).unwrap();
        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let fonts = doc.get_page_fonts(page_id).unwrap();
        assert_eq!(fonts.len(), 1);

        let font = fonts.values().next().unwrap();
        assert_eq!(font.get(b"Subtype").unwrap().as_name().unwrap(), b"Type0");
        assert_eq!(font.get(b"Encoding").unwrap().as_name().unwrap(), b"Identity-H");

        let descendant = match font.get(b"DescendantFonts").unwrap() {
            Object::Array(fonts) => doc.get_dictionary(fonts[0].as_reference().unwrap()).unwrap(),
            other => panic!("unexpected descendants {:?}", other),
        };
        assert_eq!(descendant.get(b"Subtype").unwrap().as_name().unwrap(), b"CIDFontType2");
        let descriptor = doc
            .get_dictionary(descendant.get(b"FontDescriptor").unwrap().as_reference().unwrap())
            .unwrap();
        assert!(descriptor.get(b"FontFile2").is_ok());
    }

    #[test]
    fn test_unicode_title() {
        let mut writer = PdfWriter::new(
            PageSetup::a4(Orientation::Portrait),
            Rgb(255, 255, 255),
            "Отчёт",
            book(),
        );
        writer.add_page(&Page::default()).unwrap();
        let doc = Document::load_mem(&writer.finish().unwrap()).unwrap();
        let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
        let title = doc.get_dictionary(info_id).unwrap().get(b"Title").unwrap();
        assert_eq!(lopdf::decode_text_string(title).unwrap(), "Отчёт");
    }

    #[test]
    fn test_text_is_positioned_inside_margins() {
        let mut fonts = book();
        let face = fonts.resolve(FontRequest::text(FontFamily::Sans, false, false));
        let mut embedder = FontEmbedder::new(fonts);
        let setup = PageSetup::a4(Orientation::Portrait);
        let mut ctx = PageContext::new(setup);
        ctx.draw(&text_item(face, "x"), &mut embedder);

        let td = ctx
            .content
            .operations
            .iter()
            .find(|op| op.operator == "Td")
            .unwrap();
        let x = td.operands[0].as_float().unwrap();
        let y = td.operands[1].as_float().unwrap();
        assert!((x - setup.margin).abs() < 0.01);
        assert!((y - (setup.height - setup.margin - 12.0)).abs() < 0.01);
    }

    #[test]
    fn test_dark_background_is_filled() {
        let setup = PageSetup::a4(Orientation::Landscape);
        let mut ctx = PageContext::new(setup);
        ctx.fill_background(Rgb(13, 17, 23));
        assert!(ctx.content.operations.iter().any(|op| op.operator == "re"));

        let mut white = PageContext::new(setup);
        white.fill_background(Rgb(255, 255, 255));
        assert!(white.content.operations.is_empty());
    }

    #[test]
    fn test_redundant_state_is_not_repeated() {
        let mut fonts = book();
        let face = fonts.resolve(FontRequest::text(FontFamily::Sans, false, false));
        let mut embedder = FontEmbedder::new(fonts);
        let mut ctx = PageContext::new(PageSetup::a4(Orientation::Portrait));
        let item = text_item(face, "a");
        ctx.draw(&item, &mut embedder);
        ctx.draw(&item, &mut embedder);
        let tf = ctx
            .content
            .operations
            .iter()
            .filter(|op| op.operator == "Tf")
            .count();
        assert_eq!(tf, 1);
    }
}
