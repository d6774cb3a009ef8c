//! Advisory checks on document text.
//!
//! Validation never blocks rendering; it only produces warnings the
//! controller may surface.

/// Default character count above which a document counts as large.
pub const DEFAULT_LARGE_DOCUMENT_THRESHOLD: usize = 500_000;

pub const UNCLOSED_CODE_BLOCK: &str = "Unclosed code block detected";
pub const LARGE_DOCUMENT: &str = "Large document detected - rendering may be slow";

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Validation {
    pub valid: bool,
    pub warnings: Vec<String>,
}

/// Check `text` for an unbalanced code fence and excessive size.
pub fn validate(text: &str, large_document_threshold: usize) -> Validation {
    let mut warnings = Vec::new();

    if text.matches("```").count() % 2 != 0 {
        warnings.push(UNCLOSED_CODE_BLOCK.to_string());
    }

    if text.chars().count() > large_document_threshold {
        warnings.push(LARGE_DOCUMENT.to_string());
    }

    Validation {
        valid: warnings.is_empty(),
        warnings,
    }
}
