//! Raw block capture.
//!
//! After the grammar recognizes a raw directive and calls [`Scanner::open_raw_block`], the body
//! is every following line indented past the base column. Blank lines never end the body. The
//! captured text is verbatim, indentation included.

use super::indent::measure_indent;
use super::{ScanOutcome, Scanner};
use crate::cursor::Cursor;
use udon_core::LINE_TERMINATOR;

impl Scanner {
    /// Capture a raw body starting at the terminator of the directive line.
    ///
    /// ## Returns
    /// - `RawBlockContent` if at least one non-blank character was captured, else `Deferred`.
    ///   Either way the raw block is closed afterwards.
    pub(super) fn scan_raw_block<C: Cursor + ?Sized>(&mut self, cursor: &mut C, base: u16) -> ScanOutcome {
        if cursor.lookahead() == Some(LINE_TERMINATOR) {
            cursor.skip();
        }

        let mut captured = false;
        while !cursor.is_eof() {
            let width = measure_indent(cursor, true);
            let blank = cursor.lookahead() == Some(LINE_TERMINATOR);
            if !blank && width <= base {
                // The dedented line belongs to the grammar again
                self.raw_base = None;
                return Self::raw_outcome(captured);
            }

            while let Some(c) = cursor.lookahead() {
                if c == LINE_TERMINATOR {
                    break;
                }
                cursor.advance();
                captured = true;
            }
            cursor.mark_end();

            if cursor.lookahead() == Some(LINE_TERMINATOR) {
                cursor.advance();
                cursor.mark_end();
            }
        }

        tracing::debug!(captured, "raw block closed by end of input");
        self.raw_base = None;
        Self::raw_outcome(captured)
    }

    fn raw_outcome(captured: bool) -> ScanOutcome {
        if captured {
            ScanOutcome::RawBlockContent
        } else {
            ScanOutcome::Deferred
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::StrCursor;
    use crate::valid::ValidTokens;

    fn capture(source: &str, offset: usize, base: u16) -> (ScanOutcome, String, StrCursor<'_>) {
        let mut scanner = Scanner::new();
        scanner.open_raw_block(base);
        let mut cursor = StrCursor::at(source, offset);
        let outcome = scanner.scan(&mut cursor, ValidTokens::RAW_BLOCK_CONTENT);
        assert_eq!(scanner.raw_block_base(), None, "raw block must close after capture");
        let text = cursor.token_span().text(source).to_string();
        (outcome, text, cursor)
    }

    #[test]
    fn test_captures_indented_lines() {
        let source = "!raw:sql\n    a\n    b\nc\n";
        let (outcome, text, cursor) = capture(source, 8, 0);
        assert_eq!(outcome, ScanOutcome::RawBlockContent);
        assert_eq!(text, "    a\n    b\n");
        assert_eq!(cursor.token_span().end, source.find('c').unwrap());
    }

    #[test]
    fn test_blank_lines_do_not_terminate() {
        let source = "!raw:sh\n  echo 1\n\n  echo 2\nnext\n";
        let (_, text, _) = capture(source, 7, 0);
        assert_eq!(text, "  echo 1\n\n  echo 2\n");
    }

    #[test]
    fn test_line_at_base_column_terminates() {
        let source = "  !:py:\n    x = 1\n  y\n";
        let (_, text, _) = capture(source, 7, 2);
        assert_eq!(text, "    x = 1\n");
    }

    #[test]
    fn test_nothing_captured_defers() {
        let source = "!raw:sql\nnext\n";
        let (outcome, _, _) = capture(source, 8, 0);
        assert_eq!(outcome, ScanOutcome::Deferred);
    }

    #[test]
    fn test_only_blank_lines_defers() {
        let source = "!raw:sql\n\n   \n";
        let (outcome, _, _) = capture(source, 8, 0);
        assert_eq!(outcome, ScanOutcome::Deferred);
    }

    #[test]
    fn test_end_of_input_mid_block() {
        let source = "!raw:sql\n  select 1";
        let (outcome, text, cursor) = capture(source, 8, 0);
        assert_eq!(outcome, ScanOutcome::RawBlockContent);
        assert_eq!(text, "  select 1");
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_tab_indented_body() {
        let source = "!raw:c\n\tint x;\n  y\n";
        let (_, text, _) = capture(source, 6, 4);
        assert_eq!(text, "\tint x;\n");
    }

    #[test]
    fn test_not_captured_unless_accepted() {
        let mut scanner = Scanner::new();
        scanner.open_raw_block(0);
        let mut cursor = StrCursor::at("!raw:sql\n  a\n", 8);
        assert_eq!(scanner.scan(&mut cursor, ValidTokens::NEWLINE), ScanOutcome::Newline);
        assert_eq!(scanner.raw_block_base(), Some(0));
    }
}
