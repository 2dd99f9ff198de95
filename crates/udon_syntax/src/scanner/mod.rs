//! Layout scanner for UDON.
//!
//! Decides, once per call, whether the text at the cursor is a structural token the grammar
//! delegates to us (INDENT, DEDENT, NEWLINE, END_OF_FILE) or the body of a delimited block
//! (freeform or raw), or whether the grammar's own rules should handle it.
//!
//! ## Module Structure
//!
//! - `indent` - indent stack and line-start decisions
//! - `freeform` - capture between triple-backtick fences
//! - `raw_block` - capture of raw directive bodies
//! - `state` - serialize/restore for incremental reparsing

mod freeform;
mod indent;
mod raw_block;
mod state;

pub use indent::IndentStack;
pub use state::{MAX_SERIALIZED_LEN, StateDecodeError};

use crate::cursor::Cursor;
use crate::valid::ValidTokens;
use udon_core::{ExternalToken, LINE_TERMINATOR};

// ============================================================================
// SCANNER STATE
// ----------------------------------------------------------------------------
// Per-call flow (first match wins):
//
// pending dedents? ──► DEDENT
// end of input?    ──► DEDENT per open level, then END_OF_FILE
// freeform open?   ──► FREEFORM_CONTENT up to a closing fence
// raw block open?  ──► RAW_BLOCK_CONTENT up to a dedented line
// column 0?        ──► blank line NEWLINE | fence (defer) | INDENT | DEDENT | defer
// mid-line '\n'?   ──► NEWLINE
// ============================================================================

/// Result of one [`Scanner::scan`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanOutcome {
    Indent,
    Dedent,
    Newline,
    RawBlockContent,
    FreeformContent,
    EndOfFile,
    /// No token here; the grammar's own rules take over from the original position.
    Deferred,
}

impl ScanOutcome {
    /// The produced token, or `None` for [`ScanOutcome::Deferred`].
    pub fn token(self) -> Option<ExternalToken> {
        match self {
            ScanOutcome::Indent => Some(ExternalToken::Indent),
            ScanOutcome::Dedent => Some(ExternalToken::Dedent),
            ScanOutcome::Newline => Some(ExternalToken::Newline),
            ScanOutcome::RawBlockContent => Some(ExternalToken::RawBlockContent),
            ScanOutcome::FreeformContent => Some(ExternalToken::FreeformContent),
            ScanOutcome::EndOfFile => Some(ExternalToken::EndOfFile),
            ScanOutcome::Deferred => None,
        }
    }

    pub fn is_deferred(self) -> bool {
        self == ScanOutcome::Deferred
    }
}

impl From<ExternalToken> for ScanOutcome {
    fn from(token: ExternalToken) -> Self {
        match token {
            ExternalToken::Indent => ScanOutcome::Indent,
            ExternalToken::Dedent => ScanOutcome::Dedent,
            ExternalToken::Newline => ScanOutcome::Newline,
            ExternalToken::RawBlockContent => ScanOutcome::RawBlockContent,
            ExternalToken::FreeformContent => ScanOutcome::FreeformContent,
            ExternalToken::EndOfFile => ScanOutcome::EndOfFile,
        }
    }
}

/// Cross-call layout state for one parse session.
///
/// The scanner is a plain value: the embedding host owns it and passes it by `&mut` into every
/// [`scan`](Self::scan). Between incremental reparses it travels as bytes through
/// [`serialize`](Self::serialize) and [`restore`](Self::restore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scanner {
    indents: IndentStack,
    /// DEDENT tokens owed after a line closed several levels at once.
    pending_dedents: u16,
    /// Indentation width of the line that opened the current freeform block.
    freeform_anchor: Option<u16>,
    /// Base column of the current raw block, as supplied by the grammar.
    raw_base: Option<u16>,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Create a scanner in the initial state: stack `[0]`, nothing pending, no open block.
    pub fn new() -> Self {
        Self {
            indents: IndentStack::new(),
            pending_dedents: 0,
            freeform_anchor: None,
            raw_base: None,
        }
    }

    /// Return to the initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of open indentation levels, including the base level.
    pub fn depth(&self) -> usize {
        self.indents.depth()
    }

    /// Open indentation widths, bottom (always 0) first.
    pub fn indents(&self) -> &[u16] {
        self.indents.as_slice()
    }

    /// Width of the innermost open indentation level.
    pub fn current_indent(&self) -> u16 {
        self.indents.top()
    }

    pub fn pending_dedents(&self) -> u16 {
        self.pending_dedents
    }

    /// Anchor column of the open freeform block, if any.
    pub fn freeform_anchor(&self) -> Option<u16> {
        self.freeform_anchor
    }

    /// Base column of the open raw block, if any.
    pub fn raw_block_base(&self) -> Option<u16> {
        self.raw_base
    }

    /// Open a raw block whose body ends at the first non-blank line indented at or below
    /// `base_column`.
    ///
    /// The grammar calls this after recognizing a raw directive (`!raw:lang` or `!:lang:`),
    /// usually with the indentation width of the directive's line. The next scan that accepts
    /// RAW_BLOCK_CONTENT performs the capture.
    pub fn open_raw_block(&mut self, base_column: u16) {
        self.raw_base = Some(base_column);
    }

    /// Decide the next token at `cursor`.
    ///
    /// ## Parameters
    /// - `cursor`: lookahead over the document, positioned where the grammar wants a token.
    /// - `valid`: external tokens the grammar accepts at this position.
    ///
    /// ## Returns
    /// - (`ScanOutcome`): the produced token, or [`ScanOutcome::Deferred`]. On `Deferred` the
    ///   cursor may have moved; the host rewinds it to where the call started.
    ///
    /// ## Notes
    /// - At most one token is produced per call. A line that closes several levels yields one
    ///   DEDENT now and the rest on the following calls.
    pub fn scan<C: Cursor + ?Sized>(&mut self, cursor: &mut C, valid: ValidTokens) -> ScanOutcome {
        let outcome = self.dispatch(cursor, valid);
        tracing::trace!(
            ?outcome,
            depth = self.depth(),
            pending = self.pending_dedents,
            "scan"
        );
        outcome
    }

    fn dispatch<C: Cursor + ?Sized>(&mut self, cursor: &mut C, valid: ValidTokens) -> ScanOutcome {
        if self.pending_dedents > 0 && valid.accepts(ExternalToken::Dedent) {
            self.pending_dedents -= 1;
            return ScanOutcome::Dedent;
        }

        if cursor.is_eof() {
            return self.scan_end_of_input(valid);
        }

        if let Some(anchor) = self.freeform_anchor {
            if valid.accepts(ExternalToken::FreeformContent) {
                return self.scan_freeform(cursor, anchor);
            }
        }

        if let Some(base) = self.raw_base {
            if valid.accepts(ExternalToken::RawBlockContent) {
                return self.scan_raw_block(cursor, base);
            }
        }

        if cursor.column() == 0 {
            return self.scan_line_start(cursor, valid);
        }

        if cursor.lookahead() == Some(LINE_TERMINATOR) && valid.accepts(ExternalToken::Newline) {
            cursor.advance();
            return ScanOutcome::Newline;
        }

        ScanOutcome::Deferred
    }

    /// Close open levels one DEDENT per call, then emit END_OF_FILE.
    fn scan_end_of_input(&mut self, valid: ValidTokens) -> ScanOutcome {
        if self.indents.depth() > 1 && valid.accepts(ExternalToken::Dedent) {
            self.indents.pop();
            return ScanOutcome::Dedent;
        }
        if valid.accepts(ExternalToken::EndOfFile) {
            let freeform = self.freeform_anchor.take();
            let raw = self.raw_base.take();
            if freeform.is_some() || raw.is_some() {
                tracing::debug!(?freeform, ?raw, "open block closed by end of input");
            }
            return ScanOutcome::EndOfFile;
        }
        ScanOutcome::Deferred
    }
}
