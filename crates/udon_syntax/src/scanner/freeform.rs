//! Freeform block capture.
//!
//! A freeform block opens on a line whose first non-blank characters are a triple-backtick fence
//! (see `indent::scan_line_start`) and runs until a fence at or left of the opening line's
//! indentation. Fences further right are content.

use super::indent::consume_fence;
use super::{ScanOutcome, Scanner};
use crate::cursor::Cursor;
use udon_core::FENCE_CHAR;

impl Scanner {
    /// Capture freeform content up to (not including) the closing fence.
    ///
    /// ## Notes
    /// - The token may be empty when the closing fence comes first.
    /// - An unterminated block ends at end of input with whatever was captured.
    pub(super) fn scan_freeform<C: Cursor + ?Sized>(&mut self, cursor: &mut C, anchor: u16) -> ScanOutcome {
        let anchor = u32::from(anchor);
        cursor.mark_end();

        loop {
            match cursor.lookahead() {
                None => break,
                Some(FENCE_CHAR) if cursor.column() <= anchor => {
                    if consume_fence(cursor) {
                        self.freeform_anchor = None;
                        return ScanOutcome::FreeformContent;
                    }
                    // One or two backticks: content after all
                    cursor.mark_end();
                }
                Some(_) => {
                    cursor.advance();
                    cursor.mark_end();
                }
            }
        }

        tracing::debug!("freeform block closed by end of input");
        self.freeform_anchor = None;
        ScanOutcome::FreeformContent
    }
}
