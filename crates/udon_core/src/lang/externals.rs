//! External token vocabulary.
//!
//! These are the token kinds a UDON grammar delegates to the layout scanner instead of matching
//! them with its own rules. Their order is the order of the grammar's `externals` list, so a
//! host that hands the scanner a `&[bool]` of acceptable symbols indexes it with
//! [`ExternalToken::index`].
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and also accepts the grammar symbol names
//!   (`_indent`, `_raw_block_content`, ...).
//! - This module is vocabulary only. It does not scan source text.
//!
//! ## Examples
//! ```rust
//! use udon_core::lang::externals::{self, ExternalToken};
//!
//! assert_eq!(ExternalToken::from_index(2), Some(ExternalToken::Newline));
//! assert_eq!(externals::from_str("_freeform_content"), Some(ExternalToken::FreeformContent));
//! assert!(externals::info_for(ExternalToken::Indent).zero_width);
//! ```

/// Broad grouping for external tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExternalCategory {
    /// Nesting structure: INDENT and DEDENT.
    Structure,
    /// Line boundaries.
    Line,
    /// Opaque captured text (freeform and raw bodies).
    Content,
    /// End of the document.
    Terminal,
}

/// Stable identifier for an external token, in grammar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExternalToken {
    Indent,
    Dedent,
    Newline,
    RawBlockContent,
    FreeformContent,
    EndOfFile,
}

impl ExternalToken {
    /// Every external token, in grammar order.
    pub const ALL: [ExternalToken; 6] = [
        ExternalToken::Indent,
        ExternalToken::Dedent,
        ExternalToken::Newline,
        ExternalToken::RawBlockContent,
        ExternalToken::FreeformContent,
        ExternalToken::EndOfFile,
    ];

    /// Position of this token in the grammar's `externals` list.
    pub const fn index(self) -> usize {
        match self {
            ExternalToken::Indent => 0,
            ExternalToken::Dedent => 1,
            ExternalToken::Newline => 2,
            ExternalToken::RawBlockContent => 3,
            ExternalToken::FreeformContent => 4,
            ExternalToken::EndOfFile => 5,
        }
    }

    /// Resolve a grammar `externals` index back to its token.
    pub const fn from_index(index: usize) -> Option<ExternalToken> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }
}

impl std::fmt::Display for ExternalToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(as_str(*self))
    }
}

/// Metadata for an external token.
#[derive(Debug, Clone, Copy)]
pub struct ExternalInfo {
    pub id: ExternalToken,
    /// Upper-case spelling used in docs and token dumps.
    pub canonical: &'static str,
    /// Symbol name in the grammar's `externals` list.
    pub grammar_symbol: &'static str,
    pub category: ExternalCategory,
    /// The token never covers source text.
    pub zero_width: bool,
    pub description: &'static str,
}

/// Registry of all external tokens, in grammar order.
pub const EXTERNALS: &[ExternalInfo] = &[
    info(
        ExternalToken::Indent,
        "INDENT",
        "_indent",
        ExternalCategory::Structure,
        true,
        "Entry into a deeper indentation level.",
    ),
    info(
        ExternalToken::Dedent,
        "DEDENT",
        "_dedent",
        ExternalCategory::Structure,
        true,
        "Exit from one indentation level; one is emitted per closed level.",
    ),
    info(
        ExternalToken::Newline,
        "NEWLINE",
        "_newline",
        ExternalCategory::Line,
        false,
        "A line terminator, including the terminator of a blank line.",
    ),
    info(
        ExternalToken::RawBlockContent,
        "RAW_BLOCK_CONTENT",
        "_raw_block_content",
        ExternalCategory::Content,
        false,
        "Verbatim body of a raw directive, captured until indentation returns to the base column.",
    ),
    info(
        ExternalToken::FreeformContent,
        "FREEFORM_CONTENT",
        "_freeform_content",
        ExternalCategory::Content,
        false,
        "Verbatim body between triple-backtick fences.",
    ),
    info(
        ExternalToken::EndOfFile,
        "END_OF_FILE",
        "_eof",
        ExternalCategory::Terminal,
        true,
        "End of the document, emitted once every open level has been closed.",
    ),
];

/// Return the canonical spelling for an external token.
pub fn as_str(id: ExternalToken) -> &'static str {
    info_for(id).canonical
}

/// Return the category for an external token.
pub fn category(id: ExternalToken) -> ExternalCategory {
    info_for(id).category
}

/// Return the full metadata entry for an external token.
pub fn info_for(id: ExternalToken) -> &'static ExternalInfo {
    // The registry is laid out in grammar order, so the index is the table position.
    &EXTERNALS[id.index()]
}

/// Resolve a canonical spelling or grammar symbol name to its identifier.
///
/// ## Notes
/// - Matching is **case-sensitive**.
pub fn from_str(s: &str) -> Option<ExternalToken> {
    EXTERNALS
        .iter()
        .find(|e| e.canonical == s || e.grammar_symbol == s)
        .map(|e| e.id)
}

const fn info(
    id: ExternalToken,
    canonical: &'static str,
    grammar_symbol: &'static str,
    category: ExternalCategory,
    zero_width: bool,
    description: &'static str,
) -> ExternalInfo {
    ExternalInfo {
        id,
        canonical,
        grammar_symbol,
        category,
        zero_width,
        description,
    }
}
