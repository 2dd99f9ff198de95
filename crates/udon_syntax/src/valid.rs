//! Sets of token kinds the grammar accepts at the current position.

use bitflags::bitflags;
use udon_core::ExternalToken;

bitflags! {
    /// External tokens the grammar would accept at the current position.
    ///
    /// Bit `i` corresponds to [`ExternalToken::index`] `i`, so the set lines up with the
    /// `valid_symbols` array a tree-sitter runtime hands to an external scanner.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ValidTokens: u8 {
        const INDENT = 1 << 0;
        const DEDENT = 1 << 1;
        const NEWLINE = 1 << 2;
        const RAW_BLOCK_CONTENT = 1 << 3;
        const FREEFORM_CONTENT = 1 << 4;
        const END_OF_FILE = 1 << 5;
    }
}

impl ValidTokens {
    /// The singleton set for `token`.
    pub const fn of(token: ExternalToken) -> Self {
        Self::from_bits_retain(1 << token.index() as u32)
    }

    /// Check whether `token` is acceptable.
    #[inline]
    pub fn accepts(self, token: ExternalToken) -> bool {
        self.contains(Self::of(token))
    }

    /// Build a set from a grammar-ordered `valid_symbols` slice.
    ///
    /// ## Notes
    /// - Entries past the known external tokens are ignored, and a short slice leaves the
    ///   missing tokens unaccepted.
    pub fn from_symbols(valid_symbols: &[bool]) -> Self {
        valid_symbols
            .iter()
            .enumerate()
            .filter(|&(_, &accepted)| accepted)
            .filter_map(|(index, _)| ExternalToken::from_index(index))
            .fold(Self::empty(), |set, token| set | Self::of(token))
    }

    /// Iterate over the accepted tokens in grammar order.
    pub fn tokens(self) -> impl Iterator<Item = ExternalToken> {
        ExternalToken::ALL.into_iter().filter(move |&t| self.accepts(t))
    }
}

impl From<ExternalToken> for ValidTokens {
    fn from(token: ExternalToken) -> Self {
        Self::of(token)
    }
}
