//! Layout scanner for UDON: indentation structure, freeform fences, and raw directive bodies.
//!
//! A grammar-driven parser hands the [`Scanner`] a cursor and the set of token kinds it would
//! accept at the current position. The scanner either produces one structural token or defers to
//! the grammar's own rules. Everything it must remember between calls (indent stack, pending
//! dedents, open block anchors) lives in the `Scanner` value, which can be serialized and restored
//! across incremental reparses.
//!
//! ## Notes
//! - This crate is "layout-only": it does not build a tree and it does not report diagnostics.
//! - Token vocabulary and layout constants come from `udon_core::lang`.
//! - [`host`] is a small reference driver that plays the grammar's role over a whole document.
//!
//! ## Examples
//! ```rust
//! use udon_syntax::host;
//! use udon_syntax::host::TokenKind;
//! use udon_core::ExternalToken;
//!
//! let tokens = host::tokenize("|a\n  |b\n");
//! let indents = tokens
//!     .iter()
//!     .filter(|t| t.kind == TokenKind::External(ExternalToken::Indent))
//!     .count();
//! assert_eq!(indents, 1);
//! ```

pub mod cursor;
pub mod host;
pub mod scanner;
pub mod span;
pub mod valid;

pub use cursor::{Cursor, StrCursor};
pub use scanner::{MAX_SERIALIZED_LEN, ScanOutcome, Scanner, StateDecodeError};
pub use span::Span;
pub use valid::ValidTokens;
