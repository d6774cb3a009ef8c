//! Markdown parser implementation using comrak
//!
//! This module wraps comrak's parser and converts its arena-allocated AST
//! into an owned tree. The renderer and the PDF layout both start from the
//! same [`MarkdownOptions`], so the preview and the printed page agree on
//! what the text means.

use comrak::{
    nodes::{
        AstNode, ListDelimType, ListType as ComrakListType, NodeValue,
        TableAlignment as ComrakTableAlignment,
    },
    parse_document, Arena, Options,
};

// ─────────────────────────────────────────────────────────────────────────────
// Public Types
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for markdown parsing and rendering.
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Enable task lists (- [ ] and - [x])
    pub tasklist: bool,
    /// Render a single newline as a line break
    pub hard_breaks: bool,
    /// Generate GitHub-style heading IDs with this prefix
    pub header_ids: Option<String>,
    /// Pass raw HTML through to the output
    pub raw_html: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            tasklist: true,
            hard_breaks: true,
            header_ids: Some(String::new()),
            // The sanitizer decides what survives, not the converter
            raw_html: true,
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    pub(crate) fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        // Extension options
        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.tasklist = self.tasklist;
        options.extension.header_ids = self.header_ids.clone();

        // Render options
        options.render.hardbreaks = self.hard_breaks;
        options.render.unsafe_ = self.raw_html;

        options
    }
}

/// List type (ordered or unordered)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListType {
    Bullet,
    Ordered { start: u32, delimiter: char },
}

/// Table cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl From<ComrakTableAlignment> for TableAlignment {
    fn from(align: ComrakTableAlignment) -> Self {
        match align {
            ComrakTableAlignment::None => TableAlignment::None,
            ComrakTableAlignment::Left => TableAlignment::Left,
            ComrakTableAlignment::Center => TableAlignment::Center,
            ComrakTableAlignment::Right => TableAlignment::Right,
        }
    }
}

/// Represents the type of a markdown node.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkdownNodeType {
    /// Root document node
    Document,
    /// Block quote (>)
    BlockQuote,
    /// List container
    List { list_type: ListType, tight: bool },
    /// List item
    Item,
    /// Code block with its info string
    CodeBlock { info: String, literal: String },
    /// HTML block
    HtmlBlock(String),
    /// Paragraph
    Paragraph,
    /// Heading (level 1-6)
    Heading { level: u8 },
    /// Thematic break (horizontal rule)
    ThematicBreak,
    /// Table
    Table {
        alignments: Vec<TableAlignment>,
        num_columns: usize,
    },
    /// Table row
    TableRow { header: bool },
    /// Table cell
    TableCell,
    /// Inline text content
    Text(String),
    /// Task list marker
    TaskItem { checked: bool },
    /// Soft line break
    SoftBreak,
    /// Hard line break
    LineBreak,
    /// Inline code
    Code(String),
    /// Inline HTML
    HtmlInline(String),
    /// Emphasis (italic)
    Emphasis,
    /// Strong emphasis (bold)
    Strong,
    /// Strikethrough
    Strikethrough,
    /// Link
    Link { url: String, title: String },
    /// Image
    Image { url: String, title: String },
    /// Anything else comrak produces; its children are still kept
    Other,
}

/// A node in the markdown AST with position information.
#[derive(Debug, Clone)]
pub struct MarkdownNode {
    /// The type of this node
    pub node_type: MarkdownNodeType,
    /// Child nodes
    pub children: Vec<MarkdownNode>,
    /// Start line in source (1-indexed)
    pub start_line: usize,
}

impl MarkdownNode {
    /// Get all text content from this node and its descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, output: &mut String) {
        match &self.node_type {
            MarkdownNodeType::Text(t) => output.push_str(t),
            MarkdownNodeType::Code(t) => output.push_str(t),
            MarkdownNodeType::SoftBreak => output.push(' '),
            MarkdownNodeType::LineBreak => output.push('\n'),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(output);
        }
    }
}

/// A parsed markdown document.
#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    /// Root node of the AST
    pub root: MarkdownNode,
}

impl MarkdownDocument {
    /// Top-level block nodes.
    pub fn blocks(&self) -> &[MarkdownNode] {
        &self.root.children
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Parse markdown text into an owned AST document.
///
/// Parsing cannot fail: comrak accepts any input and produces a tree.
///
/// # Example
/// ```ignore
/// let doc = parse_markdown("# Hello\n\nWorld");
/// assert_eq!(doc.blocks().len(), 2);
/// ```
pub fn parse_markdown(markdown: &str) -> MarkdownDocument {
    parse_markdown_with_options(markdown, &MarkdownOptions::default())
}

/// Parse markdown text with custom options.
pub fn parse_markdown_with_options(markdown: &str, options: &MarkdownOptions) -> MarkdownDocument {
    let arena = Arena::new();
    let comrak_options = options.to_comrak_options();

    let root = parse_document(&arena, markdown, &comrak_options);

    MarkdownDocument {
        root: convert_node(root),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Conversion Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a comrak AST node to our MarkdownNode structure.
fn convert_node<'a>(node: &'a AstNode<'a>) -> MarkdownNode {
    let ast = node.data.borrow();

    MarkdownNode {
        node_type: convert_node_value(&ast.value),
        children: node.children().map(convert_node).collect(),
        start_line: ast.sourcepos.start.line,
    }
}

/// Convert a comrak NodeValue to our MarkdownNodeType.
fn convert_node_value(value: &NodeValue) -> MarkdownNodeType {
    match value {
        NodeValue::Document => MarkdownNodeType::Document,
        NodeValue::BlockQuote => MarkdownNodeType::BlockQuote,
        NodeValue::List(list) => {
            let list_type = match list.list_type {
                ComrakListType::Bullet => ListType::Bullet,
                ComrakListType::Ordered => ListType::Ordered {
                    start: list.start as u32,
                    delimiter: if list.delimiter == ListDelimType::Period {
                        '.'
                    } else {
                        ')'
                    },
                },
            };
            MarkdownNodeType::List {
                list_type,
                tight: list.tight,
            }
        }
        NodeValue::Item(_) => MarkdownNodeType::Item,
        NodeValue::CodeBlock(code) => MarkdownNodeType::CodeBlock {
            info: code.info.clone(),
            literal: code.literal.clone(),
        },
        NodeValue::HtmlBlock(html) => MarkdownNodeType::HtmlBlock(html.literal.clone()),
        NodeValue::Paragraph => MarkdownNodeType::Paragraph,
        NodeValue::Heading(heading) => MarkdownNodeType::Heading {
            level: heading.level,
        },
        NodeValue::ThematicBreak => MarkdownNodeType::ThematicBreak,
        NodeValue::Table(table) => MarkdownNodeType::Table {
            alignments: table
                .alignments
                .iter()
                .map(|a| TableAlignment::from(*a))
                .collect(),
            num_columns: table.num_columns,
        },
        NodeValue::TableRow(header) => MarkdownNodeType::TableRow { header: *header },
        NodeValue::TableCell => MarkdownNodeType::TableCell,
        NodeValue::Text(text) => MarkdownNodeType::Text(text.clone()),
        NodeValue::TaskItem(checked) => MarkdownNodeType::TaskItem {
            checked: checked.map(|c| c == 'x' || c == 'X').unwrap_or(false),
        },
        NodeValue::SoftBreak => MarkdownNodeType::SoftBreak,
        NodeValue::LineBreak => MarkdownNodeType::LineBreak,
        NodeValue::Code(code) => MarkdownNodeType::Code(code.literal.clone()),
        NodeValue::HtmlInline(html) => MarkdownNodeType::HtmlInline(html.clone()),
        NodeValue::Emph => MarkdownNodeType::Emphasis,
        NodeValue::Strong => MarkdownNodeType::Strong,
        NodeValue::Strikethrough => MarkdownNodeType::Strikethrough,
        NodeValue::Link(link) => MarkdownNodeType::Link {
            url: link.url.clone(),
            title: link.title.clone(),
        },
        NodeValue::Image(image) => MarkdownNodeType::Image {
            url: image.url.clone(),
            title: image.title.clone(),
        },
        _ => MarkdownNodeType::Other,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Basic Parsing Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_empty_document() {
        let doc = parse_markdown("");
        assert!(doc.blocks().is_empty());
    }

    #[test]
    fn test_parse_simple_paragraph() {
        let doc = parse_markdown("Hello, world!");
        assert_eq!(doc.blocks().len(), 1);
        assert!(matches!(
            doc.blocks()[0].node_type,
            MarkdownNodeType::Paragraph
        ));
    }

    #[test]
    fn test_parse_heading_level() {
        let doc = parse_markdown("## Heading 2");
        assert_eq!(
            doc.blocks()[0].node_type,
            MarkdownNodeType::Heading { level: 2 }
        );
        assert_eq!(doc.blocks()[0].text_content(), "Heading 2");
    }

    #[test]
    fn test_single_newline_is_kept_as_break() {
        let doc = parse_markdown("one\ntwo");
        let para = &doc.blocks()[0];
        assert!(para
            .children
            .iter()
            .any(|c| c.node_type == MarkdownNodeType::SoftBreak));
        assert_eq!(para.text_content(), "one two");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // List Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_ordered_list() {
        let doc = parse_markdown("3. First\n4. Second");
        let list = &doc.blocks()[0];
        match &list.node_type {
            MarkdownNodeType::List {
                list_type: ListType::Ordered { start, delimiter },
                ..
            } => {
                assert_eq!(*start, 3);
                assert_eq!(*delimiter, '.');
            }
            other => panic!("Expected ordered list, got {:?}", other),
        }
        assert_eq!(list.children.len(), 2);
    }

    #[test]
    fn test_parse_task_list() {
        let doc = parse_markdown("- [ ] Unchecked\n- [x] Checked");
        let list = &doc.blocks()[0];
        let states: Vec<_> = list
            .children
            .iter()
            .map(|item| {
                matches!(item.node_type, MarkdownNodeType::TaskItem { checked: true })
            })
            .collect();
        assert_eq!(states, vec![false, true]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Block Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_code_block() {
        let doc = parse_markdown("```rust\nfn main() {}\n```");
        match &doc.blocks()[0].node_type {
            MarkdownNodeType::CodeBlock { info, literal } => {
                assert_eq!(info, "rust");
                assert_eq!(literal, "fn main() {}\n");
            }
            other => panic!("Expected code block, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_table() {
        let doc = parse_markdown("| A | B |\n|:--|--:|\n| 1 | 2 |");
        match &doc.blocks()[0].node_type {
            MarkdownNodeType::Table {
                alignments,
                num_columns,
            } => {
                assert_eq!(*num_columns, 2);
                assert_eq!(alignments[0], TableAlignment::Left);
                assert_eq!(alignments[1], TableAlignment::Right);
            }
            other => panic!("Expected table, got {:?}", other),
        }
        assert_eq!(
            doc.blocks()[0].children[0].node_type,
            MarkdownNodeType::TableRow { header: true }
        );
    }

    #[test]
    fn test_parse_html_block_literal() {
        let doc = parse_markdown("<div class=\"page-break-after\"></div>\n\nNext");
        match &doc.blocks()[0].node_type {
            MarkdownNodeType::HtmlBlock(html) => assert!(html.contains("page-break-after")),
            other => panic!("Expected HTML block, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_link_and_image() {
        let doc = parse_markdown("[site](https://example.com \"T\") ![alt](img.png)");
        let para = &doc.blocks()[0];
        assert!(para.children.iter().any(|c| matches!(
            &c.node_type,
            MarkdownNodeType::Link { url, title } if url == "https://example.com" && title == "T"
        )));
        assert!(para.children.iter().any(|c| matches!(
            &c.node_type,
            MarkdownNodeType::Image { url, .. } if url == "img.png"
        )));
    }

    #[test]
    fn test_start_line_positions() {
        let doc = parse_markdown("# A\n\npara\n\n---");
        let lines: Vec<_> = doc.blocks().iter().map(|b| b.start_line).collect();
        assert_eq!(lines, vec![1, 3, 5]);
    }
}
