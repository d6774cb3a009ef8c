//! Font discovery and metrics for the PDF export
//!
//! Faces come from the system font database. Text is measured with the
//! advances of the face that will draw it, and a character the preferred
//! face lacks is looked up in the other installed faces.

use fontdb::{Database, Family, Query, Stretch, Style, Weight, ID};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::OnceLock;
use ttf_parser::{Face, GlyphId, RawFace, Tag};

use crate::error::{Error, Result};
use crate::theme::FontFamily;

const SANS_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];
const SERIF_FAMILIES: &[&str] = &[
    "DejaVu Serif",
    "Liberation Serif",
    "Noto Serif",
    "Times New Roman",
    "Times",
];
const MONO_FAMILIES: &[&str] = &[
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "Courier New",
    "Menlo",
];

/// The installed fonts, scanned once per process.
pub fn system_fonts() -> &'static Database {
    static FONTS: OnceLock<Database> = OnceLock::new();
    FONTS.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        debug!("Found {} system font faces", db.len());
        db
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Typeface {
    Sans,
    Serif,
    Mono,
}

impl Typeface {
    fn preferred(&self) -> &'static [&'static str] {
        match self {
            Typeface::Sans => SANS_FAMILIES,
            Typeface::Serif => SERIF_FAMILIES,
            Typeface::Mono => MONO_FAMILIES,
        }
    }

    fn generic(&self) -> Family<'static> {
        match self {
            Typeface::Sans => Family::SansSerif,
            Typeface::Serif => Family::Serif,
            Typeface::Mono => Family::Monospace,
        }
    }
}

impl From<FontFamily> for Typeface {
    fn from(family: FontFamily) -> Self {
        match family {
            FontFamily::Sans => Typeface::Sans,
            FontFamily::Serif => Typeface::Serif,
        }
    }
}

/// The face a run of text asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontRequest {
    pub typeface: Typeface,
    pub bold: bool,
    pub italic: bool,
}

impl FontRequest {
    /// Proportional face of `family` with the given weight and slant.
    pub fn text(family: FontFamily, bold: bool, italic: bool) -> Self {
        Self {
            typeface: family.into(),
            bold,
            italic,
        }
    }

    /// Monospaced face.
    pub fn mono(bold: bool) -> Self {
        Self {
            typeface: Typeface::Mono,
            bold,
            italic: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loaded Faces
// ─────────────────────────────────────────────────────────────────────────────

/// Index of a face loaded into a [`FontBook`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(usize);

impl FaceId {
    /// Name the page resources refer to this face by.
    pub fn resource_name(&self) -> String {
        format!("F{}", self.0 + 1)
    }
}

/// A glyph id and its advance in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub id: u16,
    pub advance: u16,
}

/// Outline format of a face, which decides how it is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlines {
    TrueType,
    Cff,
}

/// Face-wide values of a font descriptor, in font units.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceMetrics {
    pub postscript_name: String,
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub cap_height: i16,
    pub bbox: [i16; 4],
    pub italic_angle: f32,
    pub monospaced: bool,
    pub outlines: Outlines,
}

pub struct LoadedFace {
    data: Vec<u8>,
    index: u32,
    metrics: FaceMetrics,
    glyphs: HashMap<char, Glyph>,
}

impl LoadedFace {
    fn load(db: &Database, id: ID) -> Option<Self> {
        let (data, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
        let face = Face::parse(&data, index).ok()?;
        let postscript_name = db
            .face(id)
            .map(|info| info.post_script_name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Face{:?}", id));
        let bbox = face.global_bounding_box();
        let outlines = if face.raw_face().table(Tag::from_bytes(b"glyf")).is_some() {
            Outlines::TrueType
        } else {
            Outlines::Cff
        };

        let metrics = FaceMetrics {
            postscript_name,
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            cap_height: face.capital_height().unwrap_or_else(|| face.ascender()),
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            italic_angle: face.italic_angle(),
            monospaced: face.is_monospaced(),
            outlines,
        };
        drop(face);

        Some(Self {
            data,
            index,
            metrics,
            glyphs: HashMap::new(),
        })
    }

    pub fn metrics(&self) -> &FaceMetrics {
        &self.metrics
    }

    /// Glyph drawing `c`, or `.notdef` when the face has none.
    pub fn glyph(&mut self, c: char) -> Glyph {
        if let Some(glyph) = self.glyphs.get(&c) {
            return *glyph;
        }
        let glyph = match Face::parse(&self.data, self.index) {
            Ok(face) => {
                let id = face.glyph_index(c).unwrap_or(GlyphId(0));
                let advance = face
                    .glyph_hor_advance(id)
                    .unwrap_or(self.metrics.units_per_em / 2);
                Glyph { id: id.0, advance }
            }
            Err(_) => Glyph {
                id: 0,
                advance: self.metrics.units_per_em / 2,
            },
        };
        self.glyphs.insert(c, glyph);
        glyph
    }

    pub fn has_glyph(&mut self, c: char) -> bool {
        self.glyph(c).id != 0
    }

    /// Width of `text` at `size` points.
    pub fn measure(&mut self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.glyph(c).advance)).sum();
        units as f32 * size / f32::from(self.metrics.units_per_em.max(1))
    }

    /// The font program to embed: the file itself, or the face cut out of
    /// a collection.
    pub fn font_program(&self) -> Vec<u8> {
        if ttf_parser::fonts_in_collection(&self.data).is_none() {
            return self.data.clone();
        }
        match RawFace::parse(&self.data, self.index) {
            Ok(raw) => standalone_sfnt(&raw, self.metrics.outlines),
            Err(_) => self.data.clone(),
        }
    }
}

/// Rebuild one face of a collection as a plain sfnt file.
fn standalone_sfnt(raw: &RawFace<'_>, outlines: Outlines) -> Vec<u8> {
    let tables: Vec<(Tag, &[u8])> = raw
        .table_records
        .into_iter()
        .filter_map(|record| raw.table(record.tag).map(|data| (record.tag, data)))
        .collect();

    let count = tables.len() as u16;
    let entry_selector = if count == 0 { 0 } else { 15 - count.leading_zeros() as u16 };
    let search_range = (1u16 << entry_selector) * 16;
    let range_shift = count * 16 - search_range;
    let version: u32 = match outlines {
        Outlines::TrueType => 0x0001_0000,
        Outlines::Cff => 0x4F54_544F,
    };

    let mut header = Vec::with_capacity(12 + 16 * tables.len());
    header.extend_from_slice(&version.to_be_bytes());
    for value in [count, search_range, entry_selector, range_shift] {
        header.extend_from_slice(&value.to_be_bytes());
    }

    let mut body = Vec::new();
    let start = 12 + 16 * tables.len();
    for (tag, data) in &tables {
        header.extend_from_slice(&tag.to_bytes());
        header.extend_from_slice(&table_checksum(data).to_be_bytes());
        header.extend_from_slice(&((start + body.len()) as u32).to_be_bytes());
        header.extend_from_slice(&(data.len() as u32).to_be_bytes());
        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
    }
    header.extend(body);
    header
}

fn table_checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Font Book
// ─────────────────────────────────────────────────────────────────────────────

/// The faces one export measures and draws with.
pub struct FontBook<'db> {
    db: &'db Database,
    faces: Vec<LoadedFace>,
    loaded: HashMap<ID, FaceId>,
    requests: HashMap<FontRequest, FaceId>,
    fallbacks: HashMap<char, Option<FaceId>>,
    default: FaceId,
}

impl<'db> FontBook<'db> {
    /// Fails when `db` holds no face that can be parsed.
    pub fn new(db: &'db Database) -> Result<Self> {
        let mut book = Self {
            db,
            faces: Vec::new(),
            loaded: HashMap::new(),
            requests: HashMap::new(),
            fallbacks: HashMap::new(),
            default: FaceId(0),
        };

        let regular = FontRequest::text(FontFamily::Sans, false, false);
        let default = book
            .query(regular)
            .or_else(|| db.faces().find_map(|info| book.load(info.id)))
            .ok_or_else(|| {
                Error::PdfExport(
                    "Failed to generate PDF: no usable font found on this system".to_string(),
                )
            })?;
        book.default = default;
        book.requests.insert(regular, default);
        Ok(book)
    }

    pub fn face(&self, id: FaceId) -> &LoadedFace {
        &self.faces[id.0]
    }

    pub fn face_mut(&mut self, id: FaceId) -> &mut LoadedFace {
        &mut self.faces[id.0]
    }

    /// The face answering `request`, or the default face.
    pub fn resolve(&mut self, request: FontRequest) -> FaceId {
        if let Some(face) = self.requests.get(&request) {
            return *face;
        }
        let face = self.query(request).unwrap_or(self.default);
        self.requests.insert(request, face);
        face
    }

    /// The face that draws `c` for `request`.
    pub fn face_for(&mut self, request: FontRequest, c: char) -> FaceId {
        let primary = self.resolve(request);
        if c.is_whitespace() || c.is_control() || self.faces[primary.0].has_glyph(c) {
            return primary;
        }
        if let Some(found) = self.fallbacks.get(&c) {
            return found.unwrap_or(primary);
        }
        let found = self.find_fallback(c);
        if found.is_none() {
            warn!("No installed font draws {:?} (U+{:04X})", c, c as u32);
        }
        self.fallbacks.insert(c, found);
        found.unwrap_or(primary)
    }

    /// Split `text` into runs that share a face.
    pub fn runs(&mut self, request: FontRequest, text: &str) -> Vec<(FaceId, String)> {
        let mut runs: Vec<(FaceId, String)> = Vec::new();
        for c in text.chars() {
            let face = self.face_for(request, c);
            match runs.last_mut() {
                Some((last, run)) if *last == face => run.push(c),
                _ => runs.push((face, c.to_string())),
            }
        }
        runs
    }

    /// Advance of `c` in `face` at `size` points.
    pub fn advance(&mut self, face: FaceId, c: char, size: f32) -> f32 {
        self.faces[face.0].measure(c.encode_utf8(&mut [0; 4]), size)
    }

    pub fn measure(&mut self, face: FaceId, text: &str, size: f32) -> f32 {
        self.faces[face.0].measure(text, size)
    }

    fn query(&mut self, request: FontRequest) -> Option<FaceId> {
        let mut families: Vec<Family<'_>> = request
            .typeface
            .preferred()
            .iter()
            .map(|name| Family::Name(name))
            .collect();
        families.push(request.typeface.generic());

        let query = Query {
            families: &families,
            weight: if request.bold {
                Weight::BOLD
            } else {
                Weight::NORMAL
            },
            stretch: Stretch::Normal,
            style: if request.italic {
                Style::Italic
            } else {
                Style::Normal
            },
        };
        let id = self.db.query(&query)?;
        self.load(id)
    }

    fn find_fallback(&mut self, c: char) -> Option<FaceId> {
        let db = self.db;
        let id = db
            .faces()
            .find(|info| {
                db.with_face_data(info.id, |data, index| {
                    Face::parse(data, index)
                        .ok()
                        .and_then(|face| face.glyph_index(c))
                        .is_some()
                })
                .unwrap_or(false)
            })?
            .id;
        self.load(id)
    }

    fn load(&mut self, id: ID) -> Option<FaceId> {
        if let Some(face) = self.loaded.get(&id) {
            return Some(*face);
        }
        let face = LoadedFace::load(self.db, id)?;
        debug!("Loaded font face {}", face.metrics.postscript_name);
        let face_id = FaceId(self.faces.len());
        self.faces.push(face);
        self.loaded.insert(id, face_id);
        Some(face_id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
