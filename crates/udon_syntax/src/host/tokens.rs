//! Tokens the reference host produces, and the lexing of everything the scanner does not own.

use crate::Span;
use udon_core::lang::externals;
use udon_core::lang::layout::is_indent_char;
use udon_core::{ExternalToken, LINE_TERMINATOR};

/// Kind of a host token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Produced by the layout scanner.
    External(ExternalToken),
    /// Element names, attributes, values: anything not otherwise classified, up to end of line
    /// or a comment.
    Text,
    /// `; ...` to end of line.
    Comment,
    /// `!name`
    Directive,
    /// `!raw:lang` or `!:lang:`; its body is captured by the scanner.
    RawDirective,
    /// A triple-backtick fence, opening or closing.
    Fence,
}

impl TokenKind {
    /// Display name used in token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::External(token) => externals::as_str(token),
            TokenKind::Text => "TEXT",
            TokenKind::Comment => "COMMENT",
            TokenKind::Directive => "DIRECTIVE",
            TokenKind::RawDirective => "RAW_DIRECTIVE",
            TokenKind::Fence => "FENCE",
        }
    }

    pub fn is_external(self) -> bool {
        matches!(self, TokenKind::External(_))
    }

    /// The external token, if the scanner produced this one.
    pub fn external(self) -> Option<ExternalToken> {
        match self {
            TokenKind::External(token) => Some(token),
            _ => None,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A token with its byte span in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span.text(source)
    }
}

// ============================================================================
// LINE CONTENT
// ============================================================================

/// Classify the content at the start of `rest` and measure it.
///
/// ## Parameters
/// - `rest`: source from the cursor on; must not start with whitespace or a line terminator.
///
/// ## Returns
/// - (`TokenKind`, `usize`): the kind and byte length, always at least one character.
pub(super) fn lex_line_content(rest: &str) -> (TokenKind, usize) {
    let len = match rest.chars().next() {
        Some(';') => return (TokenKind::Comment, line_len(rest)),
        Some('!') => return lex_directive(rest),
        _ => text_len(rest),
    };
    let min = rest.chars().next().map_or(0, char::len_utf8);
    (TokenKind::Text, len.max(min))
}

/// Lex everything up to the end of the line as one text token, without comment detection.
pub(super) fn lex_rest_of_line(rest: &str) -> (TokenKind, usize) {
    let len = rest[..line_len(rest)].trim_end_matches(is_indent_char).len();
    let min = rest.chars().next().map_or(0, char::len_utf8);
    (TokenKind::Text, len.max(min))
}

fn line_len(rest: &str) -> usize {
    rest.find(LINE_TERMINATOR).unwrap_or(rest.len())
}

/// Text runs to end of line or to a `;` that follows whitespace, trailing whitespace excluded.
fn text_len(rest: &str) -> usize {
    let mut prev_blank = false;
    let mut end = line_len(rest);
    for (i, c) in rest[..end].char_indices() {
        if c == ';' && prev_blank {
            end = i;
            break;
        }
        prev_blank = is_indent_char(c);
    }
    rest[..end].trim_end_matches(is_indent_char).len()
}

fn name_len(s: &str) -> usize {
    s.chars()
        .take_while(|&c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .map(char::len_utf8)
        .sum()
}

fn lex_directive(rest: &str) -> (TokenKind, usize) {
    let body = &rest[1..];
    if let Some(lang) = body.strip_prefix("raw:") {
        return (TokenKind::RawDirective, 1 + "raw:".len() + name_len(lang));
    }
    if let Some(inner) = body.strip_prefix(':') {
        let n = name_len(inner);
        if inner[n..].starts_with(':') {
            return (TokenKind::RawDirective, 1 + 1 + n + 1);
        }
    }
    (TokenKind::Directive, 1 + name_len(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_runs_to_end_of_line() {
        assert_eq!(lex_line_content("; note\nnext"), (TokenKind::Comment, 6));
        assert_eq!(lex_line_content(";"), (TokenKind::Comment, 1));
    }

    #[test]
    fn test_text_stops_at_trailing_comment() {
        let rest = "|a :b 1  ; why\n";
        assert_eq!(lex_line_content(rest), (TokenKind::Text, 7));
    }

    #[test]
    fn test_semicolon_inside_word_is_text() {
        assert_eq!(lex_line_content("a;b\n"), (TokenKind::Text, 3));
    }

    #[test]
    fn test_directives() {
        assert_eq!(lex_line_content("!if x"), (TokenKind::Directive, 3));
        assert_eq!(lex_line_content("!raw:sql\n"), (TokenKind::RawDirective, 8));
        assert_eq!(lex_line_content("!:json: x"), (TokenKind::RawDirective, 7));
        assert_eq!(lex_line_content("!:json x"), (TokenKind::Directive, 1));
        assert_eq!(lex_line_content("! x"), (TokenKind::Directive, 1));
    }

    #[test]
    fn test_rest_of_line_keeps_semicolons() {
        assert_eq!(lex_rest_of_line("rust ; x  \n"), (TokenKind::Text, 8));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TokenKind::External(ExternalToken::Dedent).name(), "DEDENT");
        assert_eq!(TokenKind::RawDirective.to_string(), "RAW_DIRECTIVE");
        assert!(TokenKind::External(ExternalToken::Newline).is_external());
        assert_eq!(TokenKind::Text.external(), None);
    }
}
