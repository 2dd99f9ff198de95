//! Byte encoding of [`Scanner`] state.
//!
//! All integers are little-endian:
//!
//! ```text
//! depth: u16 | levels: depth × u16 | pending: u16 | freeform: u8 flag, u16 anchor | raw: u8 flag, u16 base
//! ```
//!
//! Writer and reader live side by side so the layout cannot drift.

use super::indent::IndentStack;
use super::Scanner;
use thiserror::Error;
use udon_core::MAX_INDENT_DEPTH;

/// Upper bound on [`Scanner::serialized_len`].
pub const MAX_SERIALIZED_LEN: usize = 2 + 2 * MAX_INDENT_DEPTH + 2 + 3 + 3;

/// Why a byte buffer could not be decoded into scanner state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateDecodeError {
    #[error("empty state buffer")]
    Empty,

    #[error("state buffer truncated: needed {needed} bytes, found {found}")]
    Truncated { needed: usize, found: usize },

    #[error("indent depth {0} outside 1..={max}", max = MAX_INDENT_DEPTH)]
    DepthOutOfRange(usize),

    #[error("indent stack does not start at column 0")]
    NonZeroBase,

    #[error("indent level {0} does not increase")]
    NotIncreasing(u16),

    #[error("invalid flag byte {0:#04x}")]
    InvalidFlag(u8),

    #[error("{pending} pending dedents exceed the depth limit")]
    TooManyPending { pending: u16 },

    #[error("{0} trailing bytes after state")]
    TrailingBytes(usize),
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], StateDecodeError> {
        let end = self.pos + N;
        let chunk = self
            .bytes
            .get(self.pos..end)
            .ok_or(StateDecodeError::Truncated { needed: end, found: self.bytes.len() })?;
        self.pos = end;
        let mut out = [0; N];
        out.copy_from_slice(chunk);
        Ok(out)
    }

    fn u16(&mut self) -> Result<u16, StateDecodeError> {
        self.take::<2>().map(u16::from_le_bytes)
    }

    fn flagged_u16(&mut self) -> Result<Option<u16>, StateDecodeError> {
        let [flag] = self.take::<1>()?;
        let value = self.u16()?;
        match flag {
            0 => Ok(None),
            1 => Ok(Some(value)),
            other => Err(StateDecodeError::InvalidFlag(other)),
        }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

fn push_flagged(out: &mut Vec<u8>, value: Option<u16>) {
    out.push(u8::from(value.is_some()));
    out.extend_from_slice(&value.unwrap_or(0).to_le_bytes());
}

impl Scanner {
    /// Exact length of [`serialize`](Self::serialize) for the current state.
    pub fn serialized_len(&self) -> usize {
        2 + 2 * self.indents.depth() + 2 + 3 + 3
    }

    /// Encode the current state.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_len());
        // Depth is bounded by MAX_INDENT_DEPTH, which fits in u16
        out.extend_from_slice(&(self.indents.depth() as u16).to_le_bytes());
        for level in self.indents.as_slice() {
            out.extend_from_slice(&level.to_le_bytes());
        }
        out.extend_from_slice(&self.pending_dedents.to_le_bytes());
        push_flagged(&mut out, self.freeform_anchor);
        push_flagged(&mut out, self.raw_base);
        out
    }

    /// Encode into a caller-provided buffer, such as the one a tree-sitter runtime hands over.
    ///
    /// ## Returns
    /// - (`usize`): bytes written, or 0 if `buffer` is too small. A zero-length state restores
    ///   to the initial state.
    pub fn serialize_into(&self, buffer: &mut [u8]) -> usize {
        let bytes = self.serialize();
        match buffer.get_mut(..bytes.len()) {
            Some(target) => {
                target.copy_from_slice(&bytes);
                bytes.len()
            }
            None => 0,
        }
    }

    /// Decode state produced by [`serialize`](Self::serialize), validating every field.
    pub fn decode(bytes: &[u8]) -> Result<Scanner, StateDecodeError> {
        if bytes.is_empty() {
            return Err(StateDecodeError::Empty);
        }
        let mut reader = Reader::new(bytes);

        let depth = usize::from(reader.u16()?);
        if !(1..=MAX_INDENT_DEPTH).contains(&depth) {
            return Err(StateDecodeError::DepthOutOfRange(depth));
        }
        let mut levels = Vec::with_capacity(depth);
        for _ in 0..depth {
            let level = reader.u16()?;
            match levels.last() {
                None if level != 0 => return Err(StateDecodeError::NonZeroBase),
                Some(&prev) if level <= prev => return Err(StateDecodeError::NotIncreasing(level)),
                _ => levels.push(level),
            }
        }

        // One dedent line pops fewer levels than the limit; levels pushed while those dedents
        // stay owed do not count against them.
        let pending = reader.u16()?;
        if usize::from(pending) >= MAX_INDENT_DEPTH {
            return Err(StateDecodeError::TooManyPending { pending });
        }

        let freeform_anchor = reader.flagged_u16()?;
        let raw_base = reader.flagged_u16()?;

        if reader.remaining() > 0 {
            return Err(StateDecodeError::TrailingBytes(reader.remaining()));
        }

        let indents = IndentStack::from_levels(levels).ok_or(StateDecodeError::NonZeroBase)?;
        Ok(Scanner { indents, pending_dedents: pending, freeform_anchor, raw_base })
    }

    /// Replace the current state with the decoded `bytes`.
    ///
    /// Never fails: empty or malformed input leaves the scanner in the initial state.
    pub fn restore(&mut self, bytes: &[u8]) {
        match Self::decode(bytes) {
            Ok(scanner) => *self = scanner,
            Err(StateDecodeError::Empty) => self.reset(),
            Err(err) => {
                tracing::debug!(%err, len = bytes.len(), "discarding malformed scanner state");
                self.reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::StrCursor;
    use crate::scanner::ScanOutcome;
    use crate::valid::ValidTokens;

    fn deep_scanner() -> Scanner {
        let mut scanner = Scanner::new();
        for width in 1..MAX_INDENT_DEPTH as u16 {
            assert!(scanner.indents.push(width * 2));
        }
        scanner
    }

    #[test]
    fn test_initial_state_layout() {
        let bytes = Scanner::new().serialize();
        assert_eq!(bytes, vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(bytes.len(), Scanner::new().serialized_len());
    }

    #[test]
    fn test_round_trip_with_open_blocks() {
        let mut scanner = Scanner::new();
        scanner.indents.push(4);
        scanner.indents.push(9);
        scanner.pending_dedents = 2;
        scanner.freeform_anchor = Some(4);
        scanner.open_raw_block(9);

        let mut restored = Scanner::new();
        restored.restore(&scanner.serialize());
        assert_eq!(restored, scanner);
    }

    #[test]
    fn test_round_trip_at_max_depth() {
        let scanner = deep_scanner();
        let bytes = scanner.serialize();
        assert_eq!(bytes.len(), MAX_SERIALIZED_LEN);
        assert_eq!(Scanner::decode(&bytes), Ok(scanner));
    }

    #[test]
    fn test_round_trip_with_dedents_owed_under_new_levels() {
        let mut scanner = deep_scanner();
        let mut cursor = StrCursor::new("z");
        assert_eq!(scanner.scan(&mut cursor, ValidTokens::DEDENT), ScanOutcome::Dedent);
        assert_eq!(scanner.pending_dedents(), 254);

        // The grammar keeps declining DEDENT while deeper lines arrive.
        for line in ["  z", "    z"] {
            let mut cursor = StrCursor::new(line);
            assert_eq!(scanner.scan(&mut cursor, ValidTokens::INDENT), ScanOutcome::Indent);
        }
        assert_eq!(scanner.indents(), &[0, 2, 4]);
        assert_eq!(scanner.pending_dedents(), 254);

        let bytes = scanner.serialize();
        assert_eq!(Scanner::decode(&bytes), Ok(scanner.clone()));
        let mut restored = Scanner::new();
        restored.restore(&bytes);
        assert_eq!(restored, scanner);
    }

    #[test]
    fn test_pending_bound_is_independent_of_depth() {
        let mut bytes = deep_scanner().serialize();
        let pending_at = 2 + 2 * MAX_INDENT_DEPTH;
        bytes[pending_at..pending_at + 2].copy_from_slice(&255u16.to_le_bytes());
        assert_eq!(Scanner::decode(&bytes).map(|s| s.pending_dedents()), Ok(255));

        bytes[pending_at..pending_at + 2].copy_from_slice(&256u16.to_le_bytes());
        assert_eq!(
            Scanner::decode(&bytes),
            Err(StateDecodeError::TooManyPending { pending: 256 })
        );
    }

    #[test]
    fn test_serialize_into_small_buffer_writes_nothing() {
        let scanner = deep_scanner();
        let mut small = [0u8; 16];
        assert_eq!(scanner.serialize_into(&mut small), 0);

        let mut buffer = [0u8; 1024];
        let written = scanner.serialize_into(&mut buffer);
        assert_eq!(written, MAX_SERIALIZED_LEN);
        assert_eq!(Scanner::decode(&buffer[..written]), Ok(scanner));
    }

    #[test]
    fn test_empty_restores_initial_state() {
        let mut scanner = deep_scanner();
        scanner.restore(&[]);
        assert_eq!(scanner, Scanner::new());
        assert_eq!(Scanner::decode(&[]), Err(StateDecodeError::Empty));
    }

    #[test]
    fn test_truncated_restores_initial_state() {
        let mut source = Scanner::new();
        source.indents.push(2);
        let bytes = source.serialize();
        let mut scanner = source.clone();
        scanner.restore(&bytes[..5]);
        assert_eq!(scanner, Scanner::new());
        assert!(matches!(
            Scanner::decode(&bytes[..5]),
            Err(StateDecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_fields() {
        let cases: Vec<(Vec<u8>, StateDecodeError)> = vec![
            (vec![0, 0], StateDecodeError::DepthOutOfRange(0)),
            (vec![1, 1], StateDecodeError::DepthOutOfRange(257)),
            (vec![1, 0, 3, 0], StateDecodeError::NonZeroBase),
            (vec![2, 0, 0, 0, 0, 0], StateDecodeError::NotIncreasing(0)),
            (vec![1, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0, 0], StateDecodeError::InvalidFlag(2)),
            (vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 5, 0, 0], StateDecodeError::InvalidFlag(5)),
            (
                vec![1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0],
                StateDecodeError::TooManyPending { pending: 256 },
            ),
            (vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 7], StateDecodeError::TrailingBytes(1)),
        ];
        for (bytes, expected) in &cases {
            assert_eq!(Scanner::decode(bytes).as_ref(), Err(expected), "bytes {bytes:?}");
        }
    }

    #[test]
    fn test_malformed_state_resets() {
        let mut scanner = deep_scanner();
        scanner.restore(&[2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(scanner, Scanner::new());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            StateDecodeError::DepthOutOfRange(300).to_string(),
            "indent depth 300 outside 1..=256"
        );
        assert_eq!(StateDecodeError::InvalidFlag(9).to_string(), "invalid flag byte 0x09");
    }
}
