//! Indentation handling for the UDON scanner
//!
//! Implements Python-style INDENT/DEDENT tokens over a bounded stack of column widths.

use super::{ScanOutcome, Scanner};
use crate::cursor::Cursor;
use crate::valid::ValidTokens;
use udon_core::lang::layout::{advance_width, is_indent_char};
use udon_core::{ExternalToken, FENCE_CHAR, FENCE_LEN, LINE_TERMINATOR, MAX_INDENT_DEPTH};

/// Open indentation levels, strictly increasing from the base level 0.
///
/// Holds at most [`MAX_INDENT_DEPTH`] entries; pushes past that are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentStack {
    levels: Vec<u16>,
}

impl Default for IndentStack {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentStack {
    pub fn new() -> Self {
        Self { levels: vec![0] }
    }

    /// Build a stack from raw levels, or `None` if they break the stack invariants.
    pub(super) fn from_levels(levels: Vec<u16>) -> Option<Self> {
        let well_formed = levels.first() == Some(&0)
            && levels.len() <= MAX_INDENT_DEPTH
            && levels.windows(2).all(|pair| pair[0] < pair[1]);
        well_formed.then_some(Self { levels })
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Width of the innermost level.
    pub fn top(&self) -> u16 {
        self.levels.last().copied().unwrap_or(0)
    }

    pub fn is_full(&self) -> bool {
        self.levels.len() >= MAX_INDENT_DEPTH
    }

    /// Push a deeper level.
    ///
    /// ## Returns
    /// - (`bool`): `false` if the stack is full and the level was not tracked.
    pub fn push(&mut self, width: u16) -> bool {
        debug_assert!(width > self.top(), "indent levels must strictly increase");
        if self.is_full() {
            return false;
        }
        self.levels.push(width);
        true
    }

    /// Pop the innermost level. The base level is never popped.
    pub fn pop(&mut self) -> Option<u16> {
        if self.levels.len() > 1 { self.levels.pop() } else { None }
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.levels
    }
}

/// Consume the indentation at the cursor and return its tab-expanded width.
///
/// With `include` the whitespace becomes part of the token; otherwise it is skipped.
pub(super) fn measure_indent<C: Cursor + ?Sized>(cursor: &mut C, include: bool) -> u16 {
    let mut width = 0;
    while let Some(c) = cursor.lookahead() {
        if !is_indent_char(c) {
            break;
        }
        width = advance_width(width, c);
        if include {
            cursor.advance();
        } else {
            cursor.skip();
        }
    }
    width
}

/// Consume up to [`FENCE_LEN`] fence characters and report whether a full fence was there.
pub(super) fn consume_fence<C: Cursor + ?Sized>(cursor: &mut C) -> bool {
    let mut run = 0;
    while run < FENCE_LEN && cursor.lookahead() == Some(FENCE_CHAR) {
        cursor.advance();
        run += 1;
    }
    run == FENCE_LEN
}

impl Scanner {
    /// Decide the token for a line the cursor sits at the start of.
    pub(super) fn scan_line_start<C: Cursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        valid: ValidTokens,
    ) -> ScanOutcome {
        let width = measure_indent(cursor, false);

        // Blank lines never touch the stack
        match cursor.lookahead() {
            Some(LINE_TERMINATOR) => {
                if valid.accepts(ExternalToken::Newline) {
                    cursor.advance();
                    return ScanOutcome::Newline;
                }
                return ScanOutcome::Deferred;
            }
            None => return ScanOutcome::Deferred,
            Some(_) => {}
        }

        // Comment-only lines fall through: they take part in indentation like any other line.

        // INDENT/DEDENT end right after the indentation, whatever the fence probe consumes
        cursor.mark_end();
        if cursor.lookahead() == Some(FENCE_CHAR) && consume_fence(cursor) {
            // The fence itself is the grammar's token
            self.freeform_anchor = Some(width);
            return ScanOutcome::Deferred;
        }

        let current = self.indents.top();

        if width > current && valid.accepts(ExternalToken::Indent) {
            if !self.indents.push(width) {
                tracing::debug!(width, depth = self.indents.depth(), "indent depth limit reached");
            }
            return ScanOutcome::Indent;
        }

        if width < current && valid.accepts(ExternalToken::Dedent) {
            while self.indents.top() > width && self.indents.pop().is_some() {
                self.pending_dedents += 1;
            }
            if self.pending_dedents > 0 {
                self.pending_dedents -= 1;
                return ScanOutcome::Dedent;
            }
        }

        ScanOutcome::Deferred
    }
}
