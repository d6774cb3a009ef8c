//! Page layout for the PDF export
//!
//! The document tree is flattened into a sequence of [`Flow`] entries:
//! fixed-height lines carrying their draw items, vertical gaps, and forced
//! page breaks. Lines belonging to a code block, table or image share a
//! group id so [`paginate`] can move the whole group to a fresh page instead
//! of splitting it, as long as it fits on one page.
//!
//! Line breaking lives in [`super::text`] and table sizing in
//! [`super::table`]; this module decides what goes on which line.
//!
//! Coordinates inside a line are in points, `x` from the left edge of the
//! content area and `y` downwards from the top of the line.

use std::collections::HashMap;

use super::fonts::{FaceId, FontBook, FontRequest};
use super::table::{layout_table, TableRow, CELL_PADDING};
use super::text::{wrap, Inline, RunStyle, Span, TextStyle};
use crate::error::Result;
use crate::markdown::sanitize::build_sanitizer;
use crate::markdown::{ListType, MarkdownDocument, MarkdownNode, MarkdownNodeType, TableAlignment};
use crate::theme::{PrintPalette, Rgb};

// ─────────────────────────────────────────────────────────────────────────────
// Metrics
// ─────────────────────────────────────────────────────────────────────────────

const BODY_SIZE: f32 = 11.0;
const TABLE_SIZE: f32 = 10.0;
const CODE_SIZE: f32 = 9.0;
const LINE_FACTOR: f32 = 1.45;
const CODE_LINE_FACTOR: f32 = 1.4;
const CODE_PADDING: f32 = 6.0;
const BLOCK_GAP: f32 = 8.0;
const TIGHT_GAP: f32 = 2.0;
const LIST_INDENT: f32 = 18.0;
const QUOTE_INDENT: f32 = 14.0;
const QUOTE_BAR_WIDTH: f32 = 3.0;
const IMAGE_PLACEHOLDER_HEIGHT: f32 = 36.0;
const TAB_WIDTH: usize = 4;

fn heading_size(level: u8) -> f32 {
    match level {
        1 => 22.0,
        2 => 18.0,
        3 => 15.0,
        4 => 13.0,
        5 => 12.0,
        _ => 11.0,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Output Types
// ─────────────────────────────────────────────────────────────────────────────

/// A primitive the PDF writer knows how to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawItem {
    Text {
        x: f32,
        baseline: f32,
        face: FaceId,
        size: f32,
        color: Rgb,
        text: String,
    },
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    Stroke {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Rgb,
    },
}

impl DrawItem {
    fn shifted(self, dy: f32) -> Self {
        match self {
            DrawItem::Text {
                x,
                baseline,
                face,
                size,
                color,
                text,
            } => DrawItem::Text {
                x,
                baseline: baseline + dy,
                face,
                size,
                color,
                text,
            },
            DrawItem::Fill {
                x,
                y,
                width,
                height,
                color,
            } => DrawItem::Fill {
                x,
                y: y + dy,
                width,
                height,
                color,
            },
            DrawItem::Stroke {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => DrawItem::Stroke {
                x1,
                y1: y1 + dy,
                x2,
                y2: y2 + dy,
                width,
                color,
            },
        }
    }
}

/// A fixed-height row of content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub height: f32,
    pub items: Vec<DrawItem>,
    /// Lines sharing a group are kept on one page when possible
    pub group: Option<usize>,
}

/// One step of the vertical flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Line(Line),
    Gap(f32),
    PageBreak,
}

/// Draw items of one page, `y` measured from the top of the content area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<DrawItem>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Pagination
// ─────────────────────────────────────────────────────────────────────────────

/// Distribute `flows` over pages `content_height` points tall.
///
/// Always returns at least one page.
pub fn paginate(flows: Vec<Flow>, content_height: f32) -> Vec<Page> {
    let mut group_heights: HashMap<usize, f32> = HashMap::new();
    for flow in &flows {
        if let Flow::Line(Line {
            height,
            group: Some(g),
            ..
        }) = flow
        {
            *group_heights.entry(*g).or_insert(0.0) += height;
        }
    }

    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut placed = false;
    let mut y = 0.0;
    let mut prev_group = None;

    let mut new_page = |current: &mut Page, placed: &mut bool, y: &mut f32| {
        pages.push(std::mem::take(current));
        *placed = false;
        *y = 0.0;
    };

    for flow in flows {
        match flow {
            Flow::Gap(h) => {
                // Gaps at the top of a page are dropped
                if placed {
                    y += h;
                }
                prev_group = None;
            }
            Flow::PageBreak => {
                if placed {
                    new_page(&mut current, &mut placed, &mut y);
                }
                prev_group = None;
            }
            Flow::Line(line) => {
                if let Some(g) = line.group {
                    if prev_group != Some(g) {
                        let needed = group_heights.get(&g).copied().unwrap_or(line.height);
                        if placed && needed <= content_height && y + needed > content_height {
                            new_page(&mut current, &mut placed, &mut y);
                        }
                    }
                }
                if placed && y + line.height > content_height {
                    new_page(&mut current, &mut placed, &mut y);
                }

                current
                    .items
                    .extend(line.items.into_iter().map(|item| item.shifted(y)));
                y += line.height;
                placed = true;
                prev_group = line.group;
            }
        }
    }

    if placed || pages.is_empty() {
        pages.push(current);
    }
    pages
}

// ─────────────────────────────────────────────────────────────────────────────
// Layout Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Indentation and decoration inherited by nested blocks.
#[derive(Debug, Clone)]
struct Context {
    indent: f32,
    quote_bars: Vec<f32>,
    color: Rgb,
    gap: f32,
}

/// Flatten `doc` into flows for a content area `width` points wide.
pub fn layout_document(
    doc: &MarkdownDocument,
    palette: &PrintPalette,
    width: f32,
    fonts: &mut FontBook,
) -> Result<Vec<Flow>> {
    let mut builder = LayoutBuilder::new(palette, width, fonts);
    let ctx = Context {
        indent: 0.0,
        quote_bars: Vec::new(),
        color: palette.text,
        gap: BLOCK_GAP,
    };
    for node in doc.blocks() {
        builder.block(node, &ctx)?;
    }
    Ok(builder.flows)
}

struct LayoutBuilder<'a, 'db> {
    palette: &'a PrintPalette,
    width: f32,
    fonts: &'a mut FontBook<'db>,
    flows: Vec<Flow>,
    next_group: usize,
    /// List marker waiting for the first line of its item
    pending_marker: Option<(String, f32)>,
}

impl<'a, 'db> LayoutBuilder<'a, 'db> {
    fn new(palette: &'a PrintPalette, width: f32, fonts: &'a mut FontBook<'db>) -> Self {
        Self {
            palette,
            width,
            fonts,
            flows: Vec::new(),
            next_group: 0,
            pending_marker: None,
        }
    }

    fn new_group(&mut self) -> usize {
        let group = self.next_group;
        self.next_group += 1;
        group
    }

    fn gap(&mut self, height: f32) {
        self.flows.push(Flow::Gap(height));
    }

    fn style(&self, size: f32, bold: bool) -> TextStyle {
        TextStyle {
            size,
            family: self.palette.body_font,
            bold,
        }
    }

    /// Text drawn as-is starting at `x`, split into runs by face.
    fn label(
        &mut self,
        text: &str,
        request: FontRequest,
        x: f32,
        baseline: f32,
        size: f32,
        color: Rgb,
    ) -> Vec<DrawItem> {
        let mut items = Vec::new();
        let mut x = x;
        for (face, run) in self.fonts.runs(request, text) {
            let width = self.fonts.measure(face, &run, size);
            items.push(DrawItem::Text {
                x,
                baseline,
                face,
                size,
                color,
                text: run,
            });
            x += width;
        }
        items
    }

    /// Push a line, adding quote bars and any pending list marker.
    fn push_line(&mut self, mut line: Line, ctx: &Context, marker_baseline: Option<f32>) {
        for &bar_x in &ctx.quote_bars {
            line.items.push(DrawItem::Fill {
                x: bar_x,
                y: 0.0,
                width: QUOTE_BAR_WIDTH,
                height: line.height,
                color: self.palette.quote_border,
            });
        }
        if let Some((marker, x)) = self.pending_marker.take() {
            let baseline = marker_baseline.unwrap_or(line.height * 0.7);
            let request = FontRequest::text(self.palette.body_font, false, false);
            let items = self.label(&marker, request, x, baseline, BODY_SIZE, ctx.color);
            line.items.extend(items);
        }
        self.flows.push(Flow::Line(line));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Blocks
    // ─────────────────────────────────────────────────────────────────────────

    fn block(&mut self, node: &MarkdownNode, ctx: &Context) -> Result<()> {
        match &node.node_type {
            MarkdownNodeType::Paragraph => self.paragraph(node, ctx),
            MarkdownNodeType::Heading { level } => self.heading(node, *level, ctx),
            MarkdownNodeType::CodeBlock { literal, .. } => self.code_block(literal, ctx),
            MarkdownNodeType::HtmlBlock(html) => self.html_block(html, ctx),
            MarkdownNodeType::BlockQuote => self.block_quote(node, ctx)?,
            MarkdownNodeType::List { list_type, tight } => {
                self.list(node, *list_type, *tight, ctx)?
            }
            MarkdownNodeType::Table { alignments, .. } => self.table(node, alignments, ctx)?,
            MarkdownNodeType::ThematicBreak => self.rule(ctx),
            _ => {
                for child in &node.children {
                    self.block(child, ctx)?;
                }
            }
        }
        Ok(())
    }

    fn paragraph(&mut self, node: &MarkdownNode, ctx: &Context) {
        if let Some(alt) = sole_image(node) {
            self.image_placeholder(&alt, ctx);
            self.gap(ctx.gap);
            return;
        }

        let inlines = inline_content(node);
        let style = self.style(BODY_SIZE, false);
        self.text_block(&inlines, style, LINE_FACTOR, ctx.color, ctx);
        self.gap(ctx.gap);
    }

    fn heading(&mut self, node: &MarkdownNode, level: u8, ctx: &Context) {
        let inlines = inline_content(node);

        self.gap(if level <= 2 { 10.0 } else { 6.0 });
        let style = self.style(heading_size(level), true);
        self.text_block(&inlines, style, 1.3, self.palette.heading, ctx);

        if level <= 2 {
            let line = Line {
                height: 6.0,
                items: vec![DrawItem::Stroke {
                    x1: ctx.indent,
                    y1: 2.0,
                    x2: self.width,
                    y2: 2.0,
                    width: if level == 1 { 1.0 } else { 0.6 },
                    color: self.palette.rule,
                }],
                group: None,
            };
            self.push_line(line, ctx, None);
        }
        self.gap(6.0);
    }

    /// Wrap and emit inline content.
    fn text_block(
        &mut self,
        inlines: &[Inline],
        style: TextStyle,
        line_factor: f32,
        color: Rgb,
        ctx: &Context,
    ) {
        let available = (self.width - ctx.indent).max(style.size * 2.0);
        let lines = wrap(inlines, style, available, self.fonts);
        let height = style.size * line_factor;
        let baseline = (height - style.size) / 2.0 + style.size * 0.78;

        for text_line in lines {
            let mut items = Vec::new();
            for span in &text_line.spans {
                self.span_items(span, ctx.indent, baseline, style.size, color, &mut items);
            }
            let line = Line {
                height,
                items,
                group: None,
            };
            self.push_line(line, ctx, Some(baseline));
        }
    }

    fn span_items(
        &self,
        span: &Span,
        offset: f32,
        baseline: f32,
        size: f32,
        color: Rgb,
        items: &mut Vec<DrawItem>,
    ) {
        let x = offset + span.x;
        let color = if span.style.link {
            self.palette.link
        } else {
            color
        };

        if span.style.code {
            items.push(DrawItem::Fill {
                x: x - 1.0,
                y: baseline - size * 0.85,
                width: span.width + 2.0,
                height: size * 1.1,
                color: self.palette.code_background,
            });
        }
        items.push(DrawItem::Text {
            x,
            baseline,
            face: span.face,
            size,
            color,
            text: span.text.clone(),
        });
        if span.style.link {
            items.push(DrawItem::Stroke {
                x1: x,
                y1: baseline + 1.2,
                x2: x + span.width,
                y2: baseline + 1.2,
                width: 0.5,
                color,
            });
        }
        if span.style.strike {
            let y = baseline - size * 0.3;
            items.push(DrawItem::Stroke {
                x1: x,
                y1: y,
                x2: x + span.width,
                y2: y,
                width: 0.6,
                color,
            });
        }
    }

    fn code_block(&mut self, literal: &str, ctx: &Context) {
        let group = self.new_group();
        let line_height = CODE_SIZE * CODE_LINE_FACTOR;
        let baseline = (line_height - CODE_SIZE) / 2.0 + CODE_SIZE * 0.78;
        let box_x = ctx.indent;
        let box_width = (self.width - ctx.indent).max(CODE_SIZE * 4.0);
        let text_width = box_width - 2.0 * CODE_PADDING;
        let style = self.style(CODE_SIZE, false);
        let code = RunStyle {
            code: true,
            ..RunStyle::default()
        };
        let background = self.palette.code_background;

        let fill = |height: f32| DrawItem::Fill {
            x: box_x,
            y: 0.0,
            width: box_width,
            height,
            color: background,
        };

        self.push_line(
            Line {
                height: CODE_PADDING,
                items: vec![fill(CODE_PADDING)],
                group: Some(group),
            },
            ctx,
            None,
        );

        let expanded = literal.replace('\t', &" ".repeat(TAB_WIDTH));
        for source_line in expanded.trim_end_matches('\n').split('\n') {
            let inline = Inline::Text(source_line.trim_end_matches('\r').to_string(), code);
            for text_line in wrap(std::slice::from_ref(&inline), style, text_width, self.fonts) {
                let mut items = vec![fill(line_height)];
                for span in text_line.spans {
                    if span.text.trim().is_empty() {
                        continue;
                    }
                    items.push(DrawItem::Text {
                        x: box_x + CODE_PADDING + span.x,
                        baseline,
                        face: span.face,
                        size: CODE_SIZE,
                        color: ctx.color,
                        text: span.text,
                    });
                }
                self.push_line(
                    Line {
                        height: line_height,
                        items,
                        group: Some(group),
                    },
                    ctx,
                    Some(baseline),
                );
            }
        }

        self.push_line(
            Line {
                height: CODE_PADDING,
                items: vec![fill(CODE_PADDING)],
                group: Some(group),
            },
            ctx,
            None,
        );
        self.gap(ctx.gap);
    }

    fn html_block(&mut self, html: &str, ctx: &Context) {
        let lower = html.to_ascii_lowercase();
        let break_before = lower.contains("page-break-before");
        let break_after = lower.contains("page-break-after");

        if break_before {
            self.flows.push(Flow::PageBreak);
        }

        let text = html_to_text(html);
        if !text.trim().is_empty() {
            let mut inlines = Vec::new();
            for (i, line) in text.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
                if i > 0 {
                    inlines.push(Inline::Break);
                }
                inlines.push(Inline::Text(line.to_string(), RunStyle::default()));
            }
            let style = self.style(BODY_SIZE, false);
            self.text_block(&inlines, style, LINE_FACTOR, ctx.color, ctx);
            self.gap(ctx.gap);
        }

        if break_after {
            self.flows.push(Flow::PageBreak);
        }
    }

    fn block_quote(&mut self, node: &MarkdownNode, ctx: &Context) -> Result<()> {
        let mut inner = ctx.clone();
        inner.quote_bars.push(ctx.indent);
        inner.indent += QUOTE_INDENT;
        inner.color = self.palette.quote_text;

        for child in &node.children {
            self.block(child, &inner)?;
        }
        Ok(())
    }

    fn list(
        &mut self,
        node: &MarkdownNode,
        list_type: ListType,
        tight: bool,
        ctx: &Context,
    ) -> Result<()> {
        let mut inner = ctx.clone();
        inner.indent += LIST_INDENT;
        if tight {
            inner.gap = TIGHT_GAP;
        }

        for (index, item) in node.children.iter().enumerate() {
            let mut marker = match list_type {
                ListType::Bullet => "\u{2022}".to_string(),
                ListType::Ordered { start, delimiter } => {
                    format!("{}{}", start as usize + index, delimiter)
                }
            };
            if let MarkdownNodeType::TaskItem { checked } = item.node_type {
                marker = if checked { "[x]" } else { "[ ]" }.to_string();
            }
            self.pending_marker = Some((marker, ctx.indent + 2.0));

            let before = self.flows.len();
            for child in &item.children {
                self.block(child, &inner)?;
            }
            if self.flows.len() == before || self.pending_marker.is_some() {
                // Empty item: still show its marker
                let height = BODY_SIZE * LINE_FACTOR;
                self.push_line(
                    Line {
                        height,
                        items: Vec::new(),
                        group: None,
                    },
                    &inner,
                    None,
                );
            }
        }
        self.gap(ctx.gap);
        Ok(())
    }

    fn table(
        &mut self,
        node: &MarkdownNode,
        alignments: &[TableAlignment],
        ctx: &Context,
    ) -> Result<()> {
        let line_height = TABLE_SIZE * LINE_FACTOR;
        let rows: Vec<TableRow> = node
            .children
            .iter()
            .map(|row| {
                let header = matches!(row.node_type, MarkdownNodeType::TableRow { header: true });
                TableRow {
                    style: self.style(TABLE_SIZE, header),
                    line_height,
                    cells: row.children.iter().map(inline_content).collect(),
                }
            })
            .collect();

        let table_width = (self.width - ctx.indent).max(TABLE_SIZE * 4.0);
        let placed = layout_table(&rows, table_width, self.fonts)?;
        if placed.is_empty() {
            return Ok(());
        }

        let group = self.new_group();
        let baseline = (line_height - TABLE_SIZE) / 2.0 + TABLE_SIZE * 0.78;
        let border = self.palette.table_border;
        let left = ctx.indent;
        let right = ctx.indent + table_width;

        for (row_index, (row, geometry)) in rows.iter().zip(&placed).enumerate() {
            let header = row.style.bold;
            let color = if header {
                self.palette.table_header_text
            } else {
                ctx.color
            };

            let mut items = Vec::new();
            if header {
                items.push(DrawItem::Fill {
                    x: left,
                    y: 0.0,
                    width: table_width,
                    height: geometry.height,
                    color: self.palette.table_header_background,
                });
            }

            for (c, cell) in geometry.cells.iter().enumerate() {
                let align = alignments.get(c).copied().unwrap_or_default();
                let inner_width = cell.width - 2.0 * CELL_PADDING;
                for (l, text_line) in cell.lines.iter().enumerate() {
                    let offset = match align {
                        TableAlignment::Center => (inner_width - text_line.width).max(0.0) / 2.0,
                        TableAlignment::Right => (inner_width - text_line.width).max(0.0),
                        TableAlignment::Left | TableAlignment::None => 0.0,
                    };
                    let line_baseline = CELL_PADDING + l as f32 * line_height + baseline;
                    for span in &text_line.spans {
                        self.span_items(
                            span,
                            left + cell.x + CELL_PADDING + offset,
                            line_baseline,
                            TABLE_SIZE,
                            color,
                            &mut items,
                        );
                    }
                }
            }

            // Cell borders
            if row_index == 0 {
                items.push(stroke(left, 0.0, right, 0.0, border));
            }
            items.push(stroke(left, geometry.height, right, geometry.height, border));
            items.push(stroke(left, 0.0, left, geometry.height, border));
            for cell in &geometry.cells {
                let x = left + cell.x + cell.width;
                items.push(stroke(x, 0.0, x, geometry.height, border));
            }

            self.push_line(
                Line {
                    height: geometry.height,
                    items,
                    group: Some(group),
                },
                ctx,
                None,
            );
        }
        self.gap(ctx.gap);
        Ok(())
    }

    fn rule(&mut self, ctx: &Context) {
        let line = Line {
            height: 12.0,
            items: vec![DrawItem::Stroke {
                x1: ctx.indent,
                y1: 6.0,
                x2: self.width,
                y2: 6.0,
                width: 1.0,
                color: self.palette.rule,
            }],
            group: None,
        };
        self.push_line(line, ctx, None);
        self.gap(ctx.gap);
    }

    fn image_placeholder(&mut self, alt: &str, ctx: &Context) {
        let group = self.new_group();
        let right = self.width;
        let bottom = IMAGE_PLACEHOLDER_HEIGHT;
        let border = self.palette.table_border;
        let label = if alt.trim().is_empty() {
            "[image]".to_string()
        } else {
            format!("[image: {}]", alt.trim())
        };

        let mut items = vec![
            stroke(ctx.indent, 0.0, right, 0.0, border),
            stroke(ctx.indent, bottom, right, bottom, border),
            stroke(ctx.indent, 0.0, ctx.indent, bottom, border),
            stroke(right, 0.0, right, bottom, border),
        ];
        let request = FontRequest::text(self.palette.body_font, false, true);
        items.extend(self.label(
            &label,
            request,
            ctx.indent + CELL_PADDING * 2.0,
            bottom / 2.0 + BODY_SIZE * 0.35,
            BODY_SIZE,
            self.palette.quote_text,
        ));
        self.push_line(
            Line {
                height: bottom,
                items,
                group: Some(group),
            },
            ctx,
            None,
        );
    }
}

fn stroke(x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb) -> DrawItem {
    DrawItem::Stroke {
        x1,
        y1,
        x2,
        y2,
        width: 0.5,
        color,
    }
}

/// Styled runs of a block's inline children.
fn inline_content(node: &MarkdownNode) -> Vec<Inline> {
    let mut inlines = Vec::new();
    let mut skipping = false;
    for child in &node.children {
        collect_inlines(child, RunStyle::default(), &mut inlines, &mut skipping);
    }
    inlines
}

/// Alt text of a paragraph consisting of a single image.
fn sole_image(node: &MarkdownNode) -> Option<String> {
    let mut content = node.children.iter().filter(|c| {
        !matches!(&c.node_type, MarkdownNodeType::Text(t) if t.trim().is_empty())
            && !matches!(c.node_type, MarkdownNodeType::SoftBreak | MarkdownNodeType::LineBreak)
    });
    let first = content.next()?;
    if content.next().is_some() {
        return None;
    }
    match first.node_type {
        MarkdownNodeType::Image { .. } => Some(first.text_content()),
        _ => None,
    }
}

/// Flatten an inline subtree into styled runs.
///
/// Raw inline `<script>`/`<style>` elements and their content are skipped,
/// as the sanitizer removes them from the preview.
fn collect_inlines(node: &MarkdownNode, style: RunStyle, out: &mut Vec<Inline>, skipping: &mut bool) {
    let push_children = |style: RunStyle, out: &mut Vec<Inline>, skipping: &mut bool| {
        for child in &node.children {
            collect_inlines(child, style, out, skipping);
        }
    };

    match &node.node_type {
        MarkdownNodeType::Text(text) => {
            if !*skipping {
                out.push(Inline::Text(text.clone(), style));
            }
        }
        MarkdownNodeType::Code(code) => {
            if !*skipping {
                out.push(Inline::Text(code.clone(), RunStyle { code: true, ..style }));
            }
        }
        MarkdownNodeType::SoftBreak | MarkdownNodeType::LineBreak => {
            if !*skipping {
                out.push(Inline::Break);
            }
        }
        MarkdownNodeType::HtmlInline(html) => {
            let tag = html.trim_start_matches('<').to_ascii_lowercase();
            if tag.starts_with("script") || tag.starts_with("style") {
                *skipping = true;
            } else if tag.starts_with("/script") || tag.starts_with("/style") {
                *skipping = false;
            } else if tag.starts_with("br") && !*skipping {
                out.push(Inline::Break);
            }
        }
        MarkdownNodeType::Emphasis => push_children(RunStyle { italic: true, ..style }, out, skipping),
        MarkdownNodeType::Strong => push_children(RunStyle { bold: true, ..style }, out, skipping),
        MarkdownNodeType::Strikethrough => {
            push_children(RunStyle { strike: true, ..style }, out, skipping)
        }
        MarkdownNodeType::Link { .. } => push_children(RunStyle { link: true, ..style }, out, skipping),
        MarkdownNodeType::Image { .. } => {
            if !*skipping {
                let alt = node.text_content();
                let label = if alt.trim().is_empty() {
                    "[image]".to_string()
                } else {
                    format!("[{}]", alt.trim())
                };
                out.push(Inline::Text(label, RunStyle { italic: true, ..style }));
            }
        }
        _ => push_children(style, out, skipping),
    }
}

/// Visible text of a raw HTML block after sanitization.
fn html_to_text(html: &str) -> String {
    let clean = build_sanitizer().clean(html).to_string();
    let mut text = String::with_capacity(clean.len());
    let mut chars = clean.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '<' {
            text.push(c);
            continue;
        }
        let mut tag = String::new();
        for t in chars.by_ref() {
            if t == '>' {
                break;
            }
            tag.push(t);
        }
        let name: String = tag
            .trim_start_matches('/')
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if matches!(
            name.as_str(),
            "br" | "p" | "div" | "li" | "tr" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
        ) {
            text.push('\n');
        }
    }

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
