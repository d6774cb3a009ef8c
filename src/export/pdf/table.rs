//! Table geometry for the PDF export
//!
//! A table is a CSS grid of `auto` columns computed by taffy. Each cell is
//! a measured leaf: its min-content width is its longest word, its
//! max-content width its unbroken text, and its height the lines it wraps to.

use taffy::prelude::*;

use super::fonts::FontBook;
use super::text::{content_widths, wrap, Inline, TextLine, TextStyle};
use crate::error::{Error, Result};

pub const CELL_PADDING: f32 = 4.0;

/// One table row as the layout receives it.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub style: TextStyle,
    pub line_height: f32,
    pub cells: Vec<Vec<Inline>>,
}

/// A placed cell, relative to the top-left corner of its row.
#[derive(Debug, Clone, PartialEq)]
pub struct CellBox {
    pub x: f32,
    pub width: f32,
    pub lines: Vec<TextLine>,
}

/// A placed row with cells for every column.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBox {
    pub height: f32,
    pub cells: Vec<CellBox>,
}

/// Size the columns and rows of `rows` for a table `width` points wide.
pub fn layout_table(rows: &[TableRow], width: f32, fonts: &mut FontBook) -> Result<Vec<RowBox>> {
    let columns = rows.iter().map(|row| row.cells.len()).max().unwrap_or(0);
    if columns == 0 {
        return Ok(Vec::new());
    }
    // No word may force the table wider than the page
    let min_cap = (width / columns as f32 - 2.0 * CELL_PADDING).max(1.0);

    let empty: Vec<Inline> = Vec::new();
    let cell = |r: usize, c: usize| rows[r].cells.get(c).unwrap_or(&empty);

    let mut extents = vec![vec![(0.0f32, 0.0f32); columns]; rows.len()];
    for (r, row) in rows.iter().enumerate() {
        for (c, extent) in extents[r].iter_mut().enumerate() {
            let (min, max) = content_widths(cell(r, c), row.style, fonts);
            *extent = (min.min(min_cap), max);
        }
    }

    let mut taffy: TaffyTree<(usize, usize)> = TaffyTree::new();
    taffy.disable_rounding();

    let mut nodes = Vec::with_capacity(rows.len());
    for r in 0..rows.len() {
        let mut row_nodes = Vec::with_capacity(columns);
        for c in 0..columns {
            let node = taffy
                .new_leaf_with_context(cell_style(), (r, c))
                .map_err(layout_error)?;
            row_nodes.push(node);
        }
        nodes.push(row_nodes);
    }

    let grid = Style {
        display: Display::Grid,
        size: Size {
            width: length(width),
            height: auto(),
        },
        grid_template_columns: vec![auto(); columns],
        ..Default::default()
    };
    let children: Vec<NodeId> = nodes.iter().flatten().copied().collect();
    let root = taffy.new_with_children(grid, &children).map_err(layout_error)?;

    taffy
        .compute_layout_with_measure(
            root,
            Size {
                width: AvailableSpace::Definite(width),
                height: AvailableSpace::MaxContent,
            },
            |known, available, _node_id, context, _style| {
                let Some(&mut (r, c)) = context else {
                    return Size::ZERO;
                };
                let (min, max) = extents[r][c];
                let width = known.width.unwrap_or(match available.width {
                    AvailableSpace::MinContent => min,
                    AvailableSpace::MaxContent => max,
                    AvailableSpace::Definite(w) => w.max(min).min(max),
                });
                let lines = wrap(cell(r, c), rows[r].style, width, fonts);
                Size {
                    width,
                    height: lines.len() as f32 * rows[r].line_height,
                }
            },
        )
        .map_err(layout_error)?;

    let mut placed = Vec::with_capacity(rows.len());
    for (r, row_nodes) in nodes.iter().enumerate() {
        let mut height: f32 = 0.0;
        let mut cells = Vec::with_capacity(columns);
        for (c, node) in row_nodes.iter().enumerate() {
            let layout = taffy.layout(*node).map_err(layout_error)?;
            height = height.max(layout.size.height);
            let inner = (layout.size.width - 2.0 * CELL_PADDING).max(1.0);
            cells.push(CellBox {
                x: layout.location.x,
                width: layout.size.width,
                lines: wrap(cell(r, c), rows[r].style, inner, fonts),
            });
        }
        placed.push(RowBox { height, cells });
    }
    Ok(placed)
}

fn cell_style() -> Style {
    Style {
        padding: Rect {
            left: length(CELL_PADDING),
            right: length(CELL_PADDING),
            top: length(CELL_PADDING),
            bottom: length(CELL_PADDING),
        },
        ..Default::default()
    }
}

fn layout_error(err: taffy::TaffyError) -> Error {
    Error::PdfExport(format!("Failed to generate PDF: table layout failed: {:?}", err))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::pdf::fonts::system_fonts;
    use crate::export::pdf::text::RunStyle;
    use crate::theme::FontFamily;

    const STYLE: TextStyle = TextStyle {
        size: 10.0,
        family: FontFamily::Sans,
        bold: false,
    };

    fn row(cells: &[&str]) -> TableRow {
        TableRow {
            style: STYLE,
            line_height: 14.0,
            cells: cells
                .iter()
                .map(|text| vec![Inline::Text(text.to_string(), RunStyle::default())])
                .collect(),
        }
    }

    fn book() -> FontBook<'static> {
        FontBook::new(system_fonts()).unwrap()
    }

    #[test]
    fn test_columns_fill_the_width() {
        let mut fonts = book();
        let rows = layout_table(&[row(&["A", "B"]), row(&["1", "2"])], 400.0, &mut fonts).unwrap();
        assert_eq!(rows.len(), 2);
        let cells = &rows[0].cells;
        assert_eq!(cells[0].x, 0.0);
        assert!((cells[0].width + cells[1].width - 400.0).abs() < 0.5);
        assert!((cells[1].x - cells[0].width).abs() < 0.5);
        // Columns line up across rows
        assert_eq!(rows[1].cells[1].x, cells[1].x);
    }

    #[test]
    fn test_wider_content_gets_wider_column() {
        let mut fonts = book();
        let rows = layout_table(
            &[row(&["id", "a much longer description of the item"])],
            400.0,
            &mut fonts,
        )
        .unwrap();
        assert!(rows[0].cells[1].width > rows[0].cells[0].width);
    }

    #[test]
    fn test_long_cells_wrap_and_grow_the_row() {
        let mut fonts = book();
        let long = "words ".repeat(40);
        let rows = layout_table(&[row(&["short", &long])], 300.0, &mut fonts).unwrap();
        let cell = &rows[0].cells[1];
        assert!(cell.lines.len() > 1);
        assert!(rows[0].height >= cell.lines.len() as f32 * 14.0);
        assert!(cell.lines.iter().all(|l| l.width <= cell.width - 2.0 * CELL_PADDING + 0.01));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut fonts = book();
        let rows = layout_table(&[row(&["a", "b", "c"]), row(&["only"])], 300.0, &mut fonts).unwrap();
        assert_eq!(rows[1].cells.len(), 3);
        assert!(rows[1].cells[2].lines[0].spans.is_empty());
    }

    #[test]
    fn test_empty_table() {
        let mut fonts = book();
        assert!(layout_table(&[], 300.0, &mut fonts).unwrap().is_empty());
    }
}
