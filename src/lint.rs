//! Advisory layout lints.
//!
//! The scanner never fails: tabs are expanded, odd dedents are accepted, unterminated blocks run
//! to the end of the document. This module replays a document through the reference host and
//! reports the spots where that leniency probably hides a mistake.
//!
//! ## Notes
//! - Lints are `miette` diagnostics; render them with [`render_report`] for terminal output.
//! - Lines inside freeform and raw bodies are verbatim and are never linted.

use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;
use udon_core::lang::layout::{indent_width, is_indent_char};
use udon_core::{ExternalToken, LINE_TERMINATOR, MAX_INDENT_DEPTH};
use udon_syntax::Span;
use udon_syntax::host::{Host, HostMode, TokenKind};

/// A layout problem the scanner tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum LayoutLint {
    #[error("tab in indentation")]
    #[diagnostic(
        code(udon::layout::tab),
        severity(Warning),
        help("tabs advance to the next multiple of 8 columns; mixed with spaces they hide the nesting")
    )]
    TabIndentation {
        #[label("tab")]
        span: SourceSpan,
    },

    #[error("dedent to column {width} does not match any enclosing level")]
    #[diagnostic(
        code(udon::layout::inconsistent_dedent),
        severity(Warning),
        help("the enclosing level starts at column {enclosing}")
    )]
    InconsistentDedent {
        width: u16,
        enclosing: u16,
        #[label("dedented here")]
        span: SourceSpan,
    },

    #[error("nesting deeper than {max} levels is not tracked")]
    #[diagnostic(code(udon::layout::too_deep), severity(Warning))]
    DepthExceeded {
        max: usize,
        #[label("this level is ignored")]
        span: SourceSpan,
    },

    #[error("freeform block is never closed")]
    #[diagnostic(
        code(udon::layout::unterminated_fence),
        severity(Warning),
        help("close it with ``` at or left of the opening fence")
    )]
    UnterminatedFence {
        #[label("opened here")]
        span: SourceSpan,
    },

    #[error("raw directive has an empty body")]
    #[diagnostic(
        code(udon::layout::empty_raw_body),
        severity(Advice),
        help("indent the body past the directive's column")
    )]
    EmptyRawBody {
        #[label("no indented lines follow")]
        span: SourceSpan,
    },
}

impl LayoutLint {
    pub fn span(&self) -> SourceSpan {
        match self {
            LayoutLint::TabIndentation { span }
            | LayoutLint::InconsistentDedent { span, .. }
            | LayoutLint::DepthExceeded { span, .. }
            | LayoutLint::UnterminatedFence { span }
            | LayoutLint::EmptyRawBody { span } => *span,
        }
    }
}

fn source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

/// Start offset of the line containing `offset`.
fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind(LINE_TERMINATOR).map_or(0, |i| i + 1)
}

/// Lint `source`.
///
/// ## Returns
/// - (`Vec<LayoutLint>`): ordered by position; empty for a clean document.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn check_source(source: &str) -> Vec<LayoutLint> {
    let mut lints = Vec::new();
    let mut host = Host::new(source);
    let mut open_fence: Option<Span> = None;
    let mut open_raw: Option<Span> = None;
    let mut verbatim: Vec<Span> = Vec::new();

    while let Some(token) = host.next_token() {
        let scanner = host.scanner();
        match token.kind {
            TokenKind::External(ExternalToken::Indent) => {
                let start = line_start(source, token.span.start);
                let width = indent_width(&source[start..]);
                if scanner.current_indent() < width {
                    lints.push(LayoutLint::DepthExceeded {
                        max: MAX_INDENT_DEPTH,
                        span: source_span(Span::new(start, token.span.start)),
                    });
                }
            }
            // Only the last DEDENT of a line sees the final stack.
            TokenKind::External(ExternalToken::Dedent)
                if token.span.start < source.len() && scanner.pending_dedents() == 0 =>
            {
                let start = line_start(source, token.span.start);
                let width = indent_width(&source[start..]);
                if scanner.current_indent() != width {
                    lints.push(LayoutLint::InconsistentDedent {
                        width,
                        enclosing: scanner.current_indent(),
                        span: source_span(Span::new(start, token.span.start)),
                    });
                }
            }
            TokenKind::Fence if host.mode() == HostMode::FenceInfo => open_fence = Some(token.span),
            TokenKind::Fence => open_fence = None,
            TokenKind::RawDirective => open_raw = Some(token.span),
            TokenKind::External(ExternalToken::FreeformContent) => verbatim.push(token.span),
            TokenKind::External(ExternalToken::RawBlockContent) => {
                verbatim.push(token.span);
                open_raw = None;
            }
            TokenKind::External(ExternalToken::Newline | ExternalToken::EndOfFile) => {
                if let Some(span) = open_raw.take() {
                    lints.push(LayoutLint::EmptyRawBody { span: source_span(span) });
                }
            }
            _ => {}
        }
    }

    if let Some(span) = open_fence {
        lints.push(LayoutLint::UnterminatedFence { span: source_span(span) });
    }

    lints.extend(tab_lints(source, &verbatim));
    lints.sort_by_key(|lint| lint.span().offset());
    tracing::debug!(count = lints.len(), "layout lints");
    lints
}

/// One lint per non-blank line with a tab in its indentation, skipping verbatim bodies.
fn tab_lints(source: &str, verbatim: &[Span]) -> Vec<LayoutLint> {
    let mut lints = Vec::new();
    let mut offset = 0;
    for line in source.split_inclusive(LINE_TERMINATOR) {
        let start = offset;
        offset += line.len();

        if verbatim.iter().any(|span| span.start <= start && start < span.end) {
            continue;
        }
        let indent = line.len() - line.trim_start_matches(is_indent_char).len();
        let blank = line[indent..].trim_end_matches(LINE_TERMINATOR).is_empty();
        if blank {
            continue;
        }
        if let Some(tab) = line[..indent].find('\t') {
            lints.push(LayoutLint::TabIndentation {
                span: source_span(Span::new(start + tab, start + tab + 1)),
            });
        }
    }
    lints
}

/// Render one lint as a terminal report with the offending source excerpt.
pub fn render_report(lint: &LayoutLint, name: &str, source: &str) -> String {
    let report = Report::new(lint.clone()).with_source_code(NamedSource::new(name, source.to_string()));
    format!("{report:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_document() {
        let source = "|a\n  |b\n    ```\n\tverbatim\n    ```\n  !raw:sh\n    \techo\n|c\n";
        assert_eq!(check_source(source), vec![]);
    }

    #[test]
    fn test_tab_indentation() {
        let lints = check_source("|a\n\t|b\n");
        assert_eq!(lints.len(), 1);
        assert!(matches!(lints[0], LayoutLint::TabIndentation { .. }));
        assert_eq!(lints[0].span(), SourceSpan::from(3..4));
    }

    #[test]
    fn test_blank_tab_line_is_ignored() {
        assert_eq!(check_source("|a\n\t\n|b\n"), vec![]);
    }

    #[test]
    fn test_inconsistent_dedent() {
        let lints = check_source("|a\n    |b\n  |c\n");
        assert_eq!(
            lints,
            vec![LayoutLint::InconsistentDedent {
                width: 2,
                enclosing: 0,
                span: SourceSpan::from(10..12),
            }]
        );
    }

    #[test]
    fn test_multi_level_dedent_is_consistent() {
        assert_eq!(check_source("|a\n  |b\n    |c\n|d\n"), vec![]);
    }

    #[test]
    fn test_unterminated_fence() {
        let lints = check_source("|a\n```\ntext\n");
        assert_eq!(lints, vec![LayoutLint::UnterminatedFence { span: SourceSpan::from(3..6) }]);
    }

    #[test]
    fn test_empty_raw_body() {
        let lints = check_source("!raw:sql\n|next\n");
        assert_eq!(lints, vec![LayoutLint::EmptyRawBody { span: SourceSpan::from(0..8) }]);
        let lints = check_source("!:json:");
        assert_eq!(lints, vec![LayoutLint::EmptyRawBody { span: SourceSpan::from(0..7) }]);
    }

    #[test]
    fn test_depth_exceeded() {
        let source: String = (0..=MAX_INDENT_DEPTH).map(|depth| format!("{}|x\n", " ".repeat(depth))).collect();
        let lints = check_source(&source);
        assert_eq!(lints.len(), 1);
        assert!(matches!(lints[0], LayoutLint::DepthExceeded { max: MAX_INDENT_DEPTH, .. }));
    }

    #[test]
    fn test_report_mentions_message_and_file() {
        let source = "|a\n\t|b\n";
        let lints = check_source(source);
        let rendered = render_report(&lints[0], "doc.udon", source);
        assert!(rendered.contains("tab in indentation"));
        assert!(rendered.contains("doc.udon"));
    }
}
