//! Reference host: drives the [`Scanner`] over a whole UDON document.
//!
//! A real grammar decides which external tokens are acceptable from its parse state. This host
//! approximates that with a small line-oriented mode machine, lexes the tokens the grammar would
//! own (text, comments, directives, fences) itself, and performs the raw-block handshake. It is
//! what the CLI, the lint layer, and the integration tests run against.
//!
//! ## Notes
//! - Before every token the host can report a [`Checkpoint`]; resuming from it replays the
//!   remaining tokens exactly. This mirrors how an incremental parser restores serialized
//!   scanner state at a reparse point.

mod tokens;

pub use tokens::{Token, TokenKind};

use crate::cursor::{Cursor, StrCursor};
use crate::scanner::Scanner;
use crate::valid::ValidTokens;
use crate::Span;
use udon_core::lang::layout::{fence_len, indent_width, is_indent_char};
use udon_core::{ExternalToken, LINE_TERMINATOR};

/// Where the host is within the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostMode {
    /// At column 0, before any token of the line.
    LineStart,
    /// Inside ordinary line content.
    Line,
    /// After an opening fence, before the end of its line.
    FenceInfo,
    /// At the start of a freeform body.
    FreeformBody,
    /// At the closing fence of a freeform block.
    FenceClose,
    /// After a raw directive, before the end of its line.
    RawHeader,
    /// END_OF_FILE has been produced.
    Finished,
}

impl HostMode {
    fn skips_inline_whitespace(self) -> bool {
        matches!(self, HostMode::Line | HostMode::FenceInfo | HostMode::RawHeader)
    }
}

/// Everything needed to resume lexing at a token boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub offset: usize,
    pub mode: HostMode,
    /// Output of [`Scanner::serialize`].
    pub state: Vec<u8>,
}

/// Token stream over one document.
#[derive(Debug, Clone)]
pub struct Host<'a> {
    cursor: StrCursor<'a>,
    scanner: Scanner,
    mode: HostMode,
}

impl<'a> Host<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: StrCursor::new(source),
            scanner: Scanner::new(),
            mode: HostMode::LineStart,
        }
    }

    /// Resume at `checkpoint`, restoring the scanner from its serialized state.
    pub fn from_checkpoint(source: &'a str, checkpoint: &Checkpoint) -> Self {
        let mut scanner = Scanner::new();
        scanner.restore(&checkpoint.state);
        Self {
            cursor: StrCursor::at(source, checkpoint.offset),
            scanner,
            mode: checkpoint.mode,
        }
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn mode(&self) -> HostMode {
        self.mode
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    /// Capture the current position and scanner state.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            offset: self.cursor.offset(),
            mode: self.mode,
            state: self.scanner.serialize(),
        }
    }

    /// Produce the next token, or `None` once END_OF_FILE has been produced.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if self.mode == HostMode::Finished {
                return None;
            }
            if self.mode.skips_inline_whitespace() {
                self.skip_inline_whitespace();
            }

            let valid = self.valid_tokens();
            if !valid.is_empty() {
                if let Some(token) = self.scan_external(valid) {
                    return Some(token);
                }
            }

            if let Some(token) = self.lex_own() {
                return Some(token);
            }
        }
    }

    /// External tokens the grammar would accept in the current mode.
    fn valid_tokens(&self) -> ValidTokens {
        if self.cursor.is_eof() {
            return ValidTokens::DEDENT | ValidTokens::END_OF_FILE;
        }
        match self.mode {
            HostMode::LineStart => {
                ValidTokens::INDENT
                    | ValidTokens::DEDENT
                    | ValidTokens::NEWLINE
                    | ValidTokens::END_OF_FILE
            }
            HostMode::Line => ValidTokens::DEDENT | ValidTokens::NEWLINE | ValidTokens::END_OF_FILE,
            HostMode::FenceInfo => ValidTokens::NEWLINE,
            HostMode::FreeformBody => ValidTokens::FREEFORM_CONTENT,
            HostMode::RawHeader if self.cursor.lookahead() == Some(LINE_TERMINATOR) => {
                ValidTokens::RAW_BLOCK_CONTENT
            }
            HostMode::RawHeader | HostMode::FenceClose | HostMode::Finished => ValidTokens::empty(),
        }
    }

    /// Offer the scanner a turn; rewind on a decline.
    fn scan_external(&mut self, valid: ValidTokens) -> Option<Token> {
        let start = self.cursor.offset();
        self.cursor.begin_token();
        let outcome = self.scanner.scan(&mut self.cursor, valid);
        let Some(external) = outcome.token() else {
            self.cursor.seek(start);
            return None;
        };

        let span = self.cursor.token_span();
        self.cursor.seek(span.end);
        self.mode = match external {
            ExternalToken::Indent | ExternalToken::Dedent => match self.mode {
                HostMode::LineStart => HostMode::Line,
                other => other,
            },
            ExternalToken::Newline if self.mode == HostMode::FenceInfo => HostMode::FreeformBody,
            ExternalToken::Newline | ExternalToken::RawBlockContent => HostMode::LineStart,
            ExternalToken::FreeformContent => HostMode::FenceClose,
            ExternalToken::EndOfFile => HostMode::Finished,
        };
        Some(Token::new(TokenKind::External(external), span))
    }

    /// Lex a token the scanner does not own. `None` means the mode changed and the caller
    /// should try again.
    fn lex_own(&mut self) -> Option<Token> {
        match self.mode {
            HostMode::LineStart => {
                self.skip_inline_whitespace();
                if self.cursor.is_eof() {
                    return None;
                }
                if self.scanner.freeform_anchor().is_some() {
                    if let Some(len) = fence_len(self.cursor.rest()) {
                        self.mode = HostMode::FenceInfo;
                        return Some(self.emit(TokenKind::Fence, len));
                    }
                }
                self.mode = HostMode::Line;
                self.lex_line_content()
            }
            HostMode::Line | HostMode::RawHeader => self.lex_line_content(),
            HostMode::FenceInfo => {
                if self.at_line_end() {
                    return self.bail_to_line();
                }
                let (kind, len) = tokens::lex_rest_of_line(self.cursor.rest());
                Some(self.emit(kind, len))
            }
            HostMode::FenceClose => match fence_len(self.cursor.rest()) {
                Some(len) => {
                    self.mode = HostMode::Line;
                    Some(self.emit(TokenKind::Fence, len))
                }
                None => self.bail_to_line(),
            },
            HostMode::FreeformBody => {
                self.mode = HostMode::FenceClose;
                None
            }
            HostMode::Finished => None,
        }
    }

    fn lex_line_content(&mut self) -> Option<Token> {
        if self.at_line_end() {
            return self.bail_to_line();
        }
        let (kind, len) = tokens::lex_line_content(self.cursor.rest());
        if kind == TokenKind::RawDirective {
            self.scanner.open_raw_block(self.current_line_indent());
            self.mode = HostMode::RawHeader;
        }
        Some(self.emit(kind, len))
    }

    /// Fall back to ordinary line mode, where the scanner owns terminators. Already in line
    /// mode, a declined terminator is stepped over so the host always makes progress.
    fn bail_to_line(&mut self) -> Option<Token> {
        if self.mode != HostMode::Line {
            self.mode = HostMode::Line;
        } else if self.cursor.lookahead() == Some(LINE_TERMINATOR) {
            self.cursor.advance();
            self.mode = HostMode::LineStart;
        }
        tracing::trace!(offset = self.cursor.offset(), mode = ?self.mode, "host recovered");
        None
    }

    fn at_line_end(&self) -> bool {
        matches!(self.cursor.lookahead(), None | Some(LINE_TERMINATOR))
    }

    fn emit(&mut self, kind: TokenKind, len: usize) -> Token {
        let start = self.cursor.offset();
        let span = Span::new(start, start + len);
        self.cursor.seek(span.end);
        Token::new(kind, span)
    }

    fn skip_inline_whitespace(&mut self) {
        while self.cursor.lookahead().is_some_and(is_indent_char) {
            self.cursor.skip();
        }
    }

    /// Indentation width of the line the cursor is on.
    fn current_line_indent(&self) -> u16 {
        let source = self.cursor.source();
        let offset = self.cursor.offset();
        let line_start = source[..offset].rfind(LINE_TERMINATOR).map_or(0, |i| i + 1);
        indent_width(&source[line_start..])
    }
}

impl Iterator for Host<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Lex a whole document.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize(source: &str) -> Vec<Token> {
    Host::new(source).collect()
}

/// Lex a whole document, recording the checkpoint taken before each token.
///
/// ## Returns
/// - (`Vec<Token>`, `Vec<Checkpoint>`): equal lengths; `checkpoints[i]` precedes `tokens[i]`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize_with_checkpoints(source: &str) -> (Vec<Token>, Vec<Checkpoint>) {
    let mut host = Host::new(source);
    let mut tokens = Vec::new();
    let mut checkpoints = Vec::new();
    loop {
        let checkpoint = host.checkpoint();
        let Some(token) = host.next_token() else {
            break;
        };
        tokens.push(token);
        checkpoints.push(checkpoint);
    }
    (tokens, checkpoints)
}

/// Lex the rest of `source` from `checkpoint`.
pub fn resume(source: &str, checkpoint: &Checkpoint) -> Vec<Token> {
    Host::from_checkpoint(source, checkpoint).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<String> {
        tokenize(source)
            .iter()
            .map(|t| format!("{}:{:?}", t.kind, t.text(source)))
            .collect()
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(kinds(""), vec![r#"END_OF_FILE:"""#]);
    }

    #[test]
    fn test_nested_elements() {
        let source = "|a\n  |b\n|c\n";
        assert_eq!(
            kinds(source),
            vec![
                r#"TEXT:"|a""#,
                r#"NEWLINE:"\n""#,
                r#"INDENT:"""#,
                r#"TEXT:"|b""#,
                r#"NEWLINE:"\n""#,
                r#"DEDENT:"""#,
                r#"TEXT:"|c""#,
                r#"NEWLINE:"\n""#,
                r#"END_OF_FILE:"""#,
            ]
        );
    }

    #[test]
    fn test_comment_and_directive() {
        let source = "!if x ; why\n";
        assert_eq!(
            kinds(source),
            vec![
                r#"DIRECTIVE:"!if""#,
                r#"TEXT:"x""#,
                r#"COMMENT:"; why""#,
                r#"NEWLINE:"\n""#,
                r#"END_OF_FILE:"""#,
            ]
        );
    }

    #[test]
    fn test_freeform_block() {
        let source = "```rust\nlet x;\n```\n";
        assert_eq!(
            kinds(source),
            vec![
                r#"FENCE:"```""#,
                r#"TEXT:"rust""#,
                r#"NEWLINE:"\n""#,
                r#"FREEFORM_CONTENT:"let x;\n""#,
                r#"FENCE:"```""#,
                r#"NEWLINE:"\n""#,
                r#"END_OF_FILE:"""#,
            ]
        );
    }

    #[test]
    fn test_raw_block_uses_directive_indent() {
        let source = "|q\n  !raw:sql\n    select 1\n  |next\n";
        let tokens = tokenize(source);
        let raw = tokens
            .iter()
            .find(|t| t.kind == TokenKind::External(ExternalToken::RawBlockContent))
            .map(|t| t.text(source));
        assert_eq!(raw, Some("    select 1\n"));
        let next = tokens.iter().find(|t| t.text(source) == "|next");
        assert!(next.is_some());
    }

    #[test]
    fn test_raw_directive_without_body() {
        let source = "!raw:sql\nnext\n";
        assert_eq!(
            kinds(source),
            vec![
                r#"RAW_DIRECTIVE:"!raw:sql""#,
                r#"NEWLINE:"\n""#,
                r#"TEXT:"next""#,
                r#"NEWLINE:"\n""#,
                r#"END_OF_FILE:"""#,
            ]
        );
    }

    #[test]
    fn test_unterminated_freeform_runs_to_end() {
        let source = "```\nabc";
        assert_eq!(
            kinds(source),
            vec![
                r#"FENCE:"```""#,
                r#"NEWLINE:"\n""#,
                r#"FREEFORM_CONTENT:"abc""#,
                r#"END_OF_FILE:"""#,
            ]
        );
    }

    #[test]
    fn test_resume_from_every_checkpoint() {
        let source = "|a\n  |b\n    ```\n    x\n    ```\n  !raw:py\n    pass\n|c ; end";
        let (tokens, checkpoints) = tokenize_with_checkpoints(source);
        assert_eq!(tokens.len(), checkpoints.len());
        for (i, checkpoint) in checkpoints.iter().enumerate() {
            assert_eq!(resume(source, checkpoint), tokens[i..], "resume at token {i}");
        }
    }

    #[test]
    fn test_trailing_whitespace_line() {
        let source = "|a\n   ";
        assert_eq!(
            kinds(source),
            vec![r#"TEXT:"|a""#, r#"NEWLINE:"\n""#, r#"END_OF_FILE:"""#]
        );
    }
}
