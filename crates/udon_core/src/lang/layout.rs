//! Layout constants and indentation arithmetic.
//!
//! Everything that measures indentation (the scanner, the reference host, the lint layer) goes
//! through [`advance_width`] so they all agree on how tabs expand.
//!
//! ## Examples
//! ```rust
//! use udon_core::lang::layout::{indent_width, advance_width};
//!
//! assert_eq!(indent_width("\tx"), 8);
//! assert_eq!(indent_width("  \tx"), 8);
//! assert_eq!(advance_width(9, '\t'), 16);
//! ```

/// Tabs advance to the next multiple of this column.
pub const TAB_STOP: u16 = 8;

/// Maximum number of tracked indentation levels, including the base level 0.
pub const MAX_INDENT_DEPTH: usize = 256;

/// Character that opens and closes a freeform block when repeated [`FENCE_LEN`] times.
pub const FENCE_CHAR: char = '`';

/// Number of consecutive [`FENCE_CHAR`]s that form a fence.
pub const FENCE_LEN: usize = 3;

/// The only line terminator the scanner recognizes. A preceding `\r` is ordinary line content.
pub const LINE_TERMINATOR: char = '\n';

/// Check whether `c` counts as indentation.
#[inline]
pub fn is_indent_char(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Width after adding one indentation character to `width`.
///
/// ## Parameters
/// - `width`: indentation measured so far.
/// - `c`: a space or a tab.
///
/// ## Returns
/// - (`u16`): the new width; a tab moves to the next multiple of [`TAB_STOP`]. Saturates
///   instead of wrapping on absurdly long runs of whitespace.
#[inline]
pub fn advance_width(width: u16, c: char) -> u16 {
    if c == '\t' {
        width.saturating_add(TAB_STOP - width % TAB_STOP)
    } else {
        width.saturating_add(1)
    }
}

/// Measure the leading indentation of `line`.
pub fn indent_width(line: &str) -> u16 {
    line.chars()
        .take_while(|&c| is_indent_char(c))
        .fold(0, advance_width)
}

/// Length in bytes of a fence at the start of `rest`, if there is one.
///
/// Only the first [`FENCE_LEN`] characters are checked; a longer backtick run still yields a
/// fence of [`FENCE_LEN`] characters.
pub fn fence_len(rest: &str) -> Option<usize> {
    let run = rest.chars().take(FENCE_LEN).take_while(|&c| c == FENCE_CHAR).count();
    (run == FENCE_LEN).then_some(FENCE_LEN * FENCE_CHAR.len_utf8())
}
