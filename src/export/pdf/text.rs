//! Line breaking for the PDF export
//!
//! Break opportunities follow the Unicode line breaking rules and lines are
//! filled first-fit, both through textwrap. Widths are the advances of the
//! faces that will draw each character, so wrapped lines never run past the
//! measure they were broken for.

use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;
use textwrap::WordSeparator;

use super::fonts::{FaceId, FontBook, FontRequest};
use crate::theme::FontFamily;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub link: bool,
    pub strike: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String, RunStyle),
    Break,
}

/// Typography shared by every run of a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub family: FontFamily,
    pub bold: bool,
}

impl TextStyle {
    pub fn request(&self, style: RunStyle) -> FontRequest {
        if style.code {
            FontRequest::mono(self.bold || style.bold)
        } else {
            FontRequest::text(self.family, self.bold || style.bold, style.italic)
        }
    }
}

/// Same-styled text drawn with one face, placed on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub x: f32,
    pub width: f32,
    pub text: String,
    pub face: FaceId,
    pub style: RunStyle,
}

/// One wrapped line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLine {
    pub spans: Vec<Span>,
    pub width: f32,
}

#[derive(Debug, Clone)]
struct Piece {
    text: String,
    face: FaceId,
    style: RunStyle,
    width: f32,
}

/// A breakable unit: a word and the whitespace after it.
#[derive(Debug, Clone, Default)]
struct Word {
    pieces: Vec<Piece>,
    width: f32,
    space: Vec<Piece>,
    space_width: f32,
}

impl Fragment for Word {
    fn width(&self) -> f64 {
        f64::from(self.width)
    }

    fn whitespace_width(&self) -> f64 {
        f64::from(self.space_width)
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Break `inlines` into lines at most `width` points wide.
///
/// Forced breaks always start a new line. Always returns at least one line.
pub fn wrap(inlines: &[Inline], style: TextStyle, width: f32, fonts: &mut FontBook) -> Vec<TextLine> {
    let mut lines = Vec::new();
    for segment in inlines.split(|inline| matches!(inline, Inline::Break)) {
        let words: Vec<Word> = words(segment, style, fonts)
            .into_iter()
            .flat_map(|word| split_wide(word, width, style.size, fonts))
            .collect();
        if words.is_empty() {
            lines.push(TextLine::default());
            continue;
        }
        for line in wrap_first_fit(&words, &[f64::from(width)]) {
            lines.push(build_line(line));
        }
    }
    if lines.is_empty() {
        lines.push(TextLine::default());
    }
    lines
}

/// Narrowest and widest width `inlines` can be set in without breaking
/// a word.
pub fn content_widths(inlines: &[Inline], style: TextStyle, fonts: &mut FontBook) -> (f32, f32) {
    let mut min: f32 = 0.0;
    let mut max: f32 = 0.0;
    for segment in inlines.split(|inline| matches!(inline, Inline::Break)) {
        let words = words(segment, style, fonts);
        let mut total = 0.0;
        for (i, word) in words.iter().enumerate() {
            min = min.max(word.width);
            total += word.width;
            if i + 1 < words.len() {
                total += word.space_width;
            }
        }
        max = max.max(total);
    }
    (min, max)
}

/// Measured words of one unbroken segment.
fn words(segment: &[Inline], style: TextStyle, fonts: &mut FontBook) -> Vec<Word> {
    let mut full = String::new();
    let mut styles: Vec<(usize, RunStyle)> = Vec::new();
    for inline in segment {
        if let Inline::Text(text, run) = inline {
            styles.push((full.len(), *run));
            full.push_str(text);
        }
    }
    if full.is_empty() {
        return Vec::new();
    }

    let mut words = Vec::new();
    let mut offset = 0;
    for found in WordSeparator::UnicodeBreakProperties.find_words(&full) {
        let word_end = offset + found.word.len();
        let space_end = word_end + found.whitespace.len();
        let (pieces, width) = measure_range(&full, offset, word_end, &styles, style, fonts);
        let (space, space_width) = measure_range(&full, word_end, space_end, &styles, style, fonts);
        words.push(Word {
            pieces,
            width,
            space,
            space_width,
        });
        offset = space_end;
    }
    words
}

/// Styled, face-resolved pieces of `full[start..end]` and their width.
fn measure_range(
    full: &str,
    start: usize,
    end: usize,
    styles: &[(usize, RunStyle)],
    style: TextStyle,
    fonts: &mut FontBook,
) -> (Vec<Piece>, f32) {
    let mut pieces: Vec<Piece> = Vec::new();
    let mut total = 0.0;
    let Some(text) = full.get(start..end) else {
        return (pieces, total);
    };

    for (at, c) in text.char_indices() {
        let run = styles
            .iter()
            .take_while(|(from, _)| *from <= start + at)
            .last()
            .map(|(_, run)| *run)
            .unwrap_or_default();
        let face = fonts.face_for(style.request(run), c);
        let advance = fonts.advance(face, c, style.size);
        total += advance;

        match pieces.last_mut() {
            Some(last) if last.face == face && last.style == run => {
                last.text.push(c);
                last.width += advance;
            }
            _ => pieces.push(Piece {
                text: c.to_string(),
                face,
                style: run,
                width: advance,
            }),
        }
    }
    (pieces, total)
}

/// Split a word wider than `width` into character chunks that fit.
fn split_wide(word: Word, width: f32, size: f32, fonts: &mut FontBook) -> Vec<Word> {
    if word.width <= width {
        return vec![word];
    }

    let mut chunks = Vec::new();
    let mut current = Word::default();
    for piece in word.pieces {
        for c in piece.text.chars() {
            let advance = fonts.advance(piece.face, c, size);
            if current.width + advance > width && !current.pieces.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            match current.pieces.last_mut() {
                Some(last) if last.face == piece.face && last.style == piece.style => {
                    last.text.push(c);
                    last.width += advance;
                }
                _ => current.pieces.push(Piece {
                    text: c.to_string(),
                    face: piece.face,
                    style: piece.style,
                    width: advance,
                }),
            }
            current.width += advance;
        }
    }
    current.space = word.space;
    current.space_width = word.space_width;
    chunks.push(current);
    chunks
}

fn build_line(words: &[Word]) -> TextLine {
    let mut line = TextLine::default();
    for (i, word) in words.iter().enumerate() {
        for piece in &word.pieces {
            push_piece(&mut line, piece);
        }
        // Trailing whitespace does not count towards the line
        if i + 1 < words.len() {
            for piece in &word.space {
                push_piece(&mut line, piece);
            }
        }
    }
    line
}

fn push_piece(line: &mut TextLine, piece: &Piece) {
    if let Some(last) = line.spans.last_mut() {
        if last.face == piece.face && last.style == piece.style {
            last.text.push_str(&piece.text);
            last.width += piece.width;
            line.width += piece.width;
            return;
        }
    }
    line.spans.push(Span {
        x: line.width,
        width: piece.width,
        text: piece.text.clone(),
        face: piece.face,
        style: piece.style,
    });
    line.width += piece.width;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
