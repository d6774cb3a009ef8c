//! Embedded fonts for the PDF writer
//!
//! Every face the pages use is embedded whole as a composite (Type0) font
//! with `Identity-H` encoding. Character ids are handed out per face in
//! first-use order, so each id maps back to exactly one character in the
//! `ToUnicode` table, even when the face draws it with `.notdef`.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::io::Write;

use super::fonts::{FaceId, FontBook, Outlines};
use crate::error::{Error, Result};

/// Entries per `bfchar` block; the CMap format allows at most 100.
const BFCHAR_CHUNK: usize = 100;

#[derive(Debug, Clone, Copy)]
struct UsedGlyph {
    cid: u16,
    ch: char,
    gid: u16,
    advance: u16,
}

/// Characters of one face in the order the pages first drew them.
#[derive(Debug, Default)]
struct FaceUsage {
    cids: HashMap<char, u16>,
    glyphs: Vec<UsedGlyph>,
}

/// Encodes page text as character ids and writes the font objects.
pub struct FontEmbedder<'db> {
    book: FontBook<'db>,
    usage: BTreeMap<FaceId, FaceUsage>,
}

impl<'db> FontEmbedder<'db> {
    pub fn new(book: FontBook<'db>) -> Self {
        Self {
            book,
            usage: BTreeMap::new(),
        }
    }

    /// Two-byte character ids of `text` drawn with `face`.
    pub fn encode(&mut self, face: FaceId, text: &str) -> Vec<u8> {
        let cff = self.book.face(face).metrics().outlines == Outlines::Cff;
        let usage = self.usage.entry(face).or_default();
        let mut bytes = Vec::with_capacity(text.len() * 2);

        for ch in text.chars() {
            let cid = match usage.cids.get(&ch) {
                Some(cid) => *cid,
                None => {
                    let glyph = self.book.face_mut(face).glyph(ch);
                    // CFF faces are addressed by glyph id directly
                    let cid = if cff {
                        glyph.id
                    } else {
                        u16::try_from(usage.glyphs.len() + 1).unwrap_or(0)
                    };
                    usage.cids.insert(ch, cid);
                    usage.glyphs.push(UsedGlyph {
                        cid,
                        ch,
                        gid: glyph.id,
                        advance: glyph.advance,
                    });
                    cid
                }
            };
            bytes.extend_from_slice(&cid.to_be_bytes());
        }
        bytes
    }

    /// Write every used face into `document` and return the `Font`
    /// resource dictionary naming them.
    pub fn embed(&self, document: &mut Document) -> Result<Dictionary> {
        let mut fonts = Dictionary::new();
        for (face_id, usage) in &self.usage {
            let font_id = self.embed_face(document, *face_id, usage)?;
            fonts.set(face_id.resource_name(), font_id);
        }
        Ok(fonts)
    }

    fn embed_face(
        &self,
        document: &mut Document,
        face_id: FaceId,
        usage: &FaceUsage,
    ) -> Result<lopdf::ObjectId> {
        let face = self.book.face(face_id);
        let metrics = face.metrics();
        let scale = 1000.0 / f32::from(metrics.units_per_em.max(1));
        let units = |value: i16| (f32::from(value) * scale).round() as i64;
        let base_font = pdf_font_name(&metrics.postscript_name, face_id);

        let program = face.font_program();
        let program_length = program.len() as i64;
        let (file_key, file_dict) = match metrics.outlines {
            Outlines::TrueType => ("FontFile2", dictionary! { "Length1" => program_length }),
            Outlines::Cff => ("FontFile3", dictionary! { "Subtype" => "OpenType" }),
        };
        let file_id = document.add_object(compressed_stream(file_dict, &program)?);

        let mut flags = 32;
        if metrics.monospaced {
            flags |= 1;
        }
        if metrics.italic_angle != 0.0 {
            flags |= 64;
        }
        let [x_min, y_min, x_max, y_max] = metrics.bbox;
        let descriptor_id = document.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(base_font.clone().into_bytes()),
            "Flags" => flags,
            "FontBBox" => vec![
                units(x_min).into(),
                units(y_min).into(),
                units(x_max).into(),
                units(y_max).into(),
            ],
            "ItalicAngle" => metrics.italic_angle,
            "Ascent" => units(metrics.ascender),
            "Descent" => units(metrics.descender),
            "CapHeight" => units(metrics.cap_height),
            "StemV" => 80,
            file_key => file_id,
        });

        let mut glyphs = usage.glyphs.clone();
        glyphs.sort_by_key(|g| g.cid);
        let widths = width_array(&glyphs, scale);

        let mut cid_font = dictionary! {
            "Type" => "Font",
            "Subtype" => match metrics.outlines {
                Outlines::TrueType => "CIDFontType2",
                Outlines::Cff => "CIDFontType0",
            },
            "BaseFont" => Object::Name(base_font.clone().into_bytes()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => 1000,
            "W" => widths,
        };
        if metrics.outlines == Outlines::TrueType {
            let map_id = document.add_object(compressed_stream(
                Dictionary::new(),
                &cid_to_gid_map(&glyphs),
            )?);
            cid_font.set("CIDToGIDMap", map_id);
        }
        let cid_font_id = document.add_object(cid_font);

        let to_unicode_id = document.add_object(compressed_stream(
            Dictionary::new(),
            to_unicode_cmap(&glyphs).as_bytes(),
        )?);

        Ok(document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(base_font.into_bytes()),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![cid_font_id.into()],
            "ToUnicode" => to_unicode_id,
        }))
    }
}

fn compressed_stream(mut dict: Dictionary, data: &[u8]) -> Result<Stream> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| Error::PdfExport(format!("Failed to compress font data: {}", e)))?;
    let compressed = encoder
        .finish()
        .map_err(|e| Error::PdfExport(format!("Failed to compress font data: {}", e)))?;
    dict.set("Filter", "FlateDecode");
    Ok(Stream::new(dict, compressed))
}

/// PostScript name reduced to characters PDF names carry unescaped.
fn pdf_font_name(postscript_name: &str, face_id: FaceId) -> String {
    let name: String = postscript_name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
        .collect();
    if name.is_empty() {
        face_id.resource_name()
    } else {
        name
    }
}

/// `W` array: runs of consecutive ids with their widths in glyph space.
fn width_array(glyphs: &[UsedGlyph], scale: f32) -> Vec<Object> {
    let mut array = Vec::new();
    let mut run_start: Option<u16> = None;
    let mut run: Vec<Object> = Vec::new();
    let mut previous: Option<u16> = None;

    for glyph in glyphs {
        if previous == Some(glyph.cid) {
            continue;
        }
        let contiguous = previous.is_some_and(|p| p.checked_add(1) == Some(glyph.cid));
        if !contiguous {
            if let Some(start) = run_start.take() {
                array.push(i64::from(start).into());
                array.push(Object::Array(std::mem::take(&mut run)));
            }
            run_start = Some(glyph.cid);
        }
        run.push(((f32::from(glyph.advance) * scale).round() as i64).into());
        previous = Some(glyph.cid);
    }
    if let Some(start) = run_start {
        array.push(i64::from(start).into());
        array.push(Object::Array(run));
    }
    array
}

/// Big-endian glyph id per character id, index 0 included.
fn cid_to_gid_map(glyphs: &[UsedGlyph]) -> Vec<u8> {
    let max_cid = glyphs.iter().map(|g| g.cid).max().unwrap_or(0) as usize;
    let mut map = vec![0u8; (max_cid + 1) * 2];
    for glyph in glyphs {
        let at = glyph.cid as usize * 2;
        map[at..at + 2].copy_from_slice(&glyph.gid.to_be_bytes());
    }
    map
}

fn to_unicode_cmap(glyphs: &[UsedGlyph]) -> String {
    let mut seen = std::collections::HashSet::new();
    let entries: Vec<&UsedGlyph> = glyphs.iter().filter(|g| seen.insert(g.cid)).collect();

    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    for chunk in entries.chunks(BFCHAR_CHUNK) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for glyph in chunk {
            let mut units = [0u16; 2];
            let target: String = glyph
                .ch
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            let _ = writeln!(cmap, "<{:04X}> <{}>", glyph.cid, target);
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
