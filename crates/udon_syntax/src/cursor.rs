//! Lookahead cursor abstraction used by the scanner.
//!
//! The cursor is owned by whoever embeds the scanner (a tree-sitter binding, the reference
//! [`host`](crate::host), a test). The scanner only ever sees the [`Cursor`] trait.
//!
//! ## Token boundary model
//!
//! - [`Cursor::advance`] consumes the lookahead and includes it in the token being built.
//! - [`Cursor::skip`] consumes the lookahead and moves the token start past it.
//! - [`Cursor::mark_end`] freezes the token end at the current position; the scanner may keep
//!   looking ahead afterwards. Without a `mark_end`, the token ends wherever the cursor stops.

/// Position and lookahead over the text being scanned.
pub trait Cursor {
    /// Current code point, or `None` at end of input.
    fn lookahead(&self) -> Option<char>;

    /// Consume the lookahead, including it in the current token.
    fn advance(&mut self);

    /// Consume the lookahead, excluding it from the current token.
    fn skip(&mut self);

    /// Zero-based column of the lookahead, counted in code points from the start of the line.
    fn column(&self) -> u32;

    /// Check whether the cursor has reached the end of input.
    fn is_eof(&self) -> bool;

    /// Commit the token end at the current position.
    fn mark_end(&mut self);
}

/// In-memory [`Cursor`] over a `&str`.
///
/// Tracks a byte offset, the code-point column of that offset, and the boundaries of the token
/// currently being built.
#[derive(Debug, Clone)]
pub struct StrCursor<'a> {
    source: &'a str,
    pos: usize,
    column: u32,
    token_start: usize,
    token_end: Option<usize>,
}

impl<'a> StrCursor<'a> {
    /// Create a cursor at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            column: 0,
            token_start: 0,
            token_end: None,
        }
    }

    /// Create a cursor at byte `offset` of `source`.
    ///
    /// ## Notes
    /// - Offsets past the end clamp to the end; offsets inside a multi-byte character move back
    ///   to the start of that character.
    pub fn at(source: &'a str, offset: usize) -> Self {
        let mut cursor = Self::new(source);
        cursor.seek(offset);
        cursor
    }

    /// The full source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Text from the cursor to the end of input.
    pub fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Move to byte `offset`, recomputing the column, and start a new token there.
    pub fn seek(&mut self, offset: usize) {
        let mut offset = offset.min(self.source.len());
        while !self.source.is_char_boundary(offset) {
            offset -= 1;
        }
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        self.pos = offset;
        self.column = self.source[line_start..offset].chars().count() as u32;
        self.begin_token();
    }

    /// Start a new token at the current position.
    pub fn begin_token(&mut self) {
        self.token_start = self.pos;
        self.token_end = None;
    }

    /// Byte span of the token built since the last [`begin_token`](Self::begin_token).
    pub fn token_span(&self) -> crate::Span {
        let end = self.token_end.unwrap_or(self.pos).max(self.token_start);
        crate::Span::new(self.token_start, end)
    }

    fn bump(&mut self) {
        if let Some(c) = self.lookahead() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }
}

impl Cursor for StrCursor<'_> {
    fn lookahead(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        self.bump();
    }

    fn skip(&mut self) {
        self.bump();
        self.token_start = self.pos;
    }

    fn column(&self) -> u32 {
        self.column
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn mark_end(&mut self) {
        self.token_end = Some(self.pos);
    }
}
