//! Provide the canonical, dependency-free vocabulary shared by the UDON scanner and its tooling.
//!
//! This crate is intentionally small. It contains the external token registry (the token kinds a
//! grammar delegates to the layout scanner) and the layout constants every consumer must agree on:
//! tab stops, the maximum tracked nesting depth, and the fence and terminator characters.
//!
//! ## Notes
//!
//! - This is a "vocabulary" crate: **no IO**, no global state, and no scanner state types.
//! - The scanner itself lives in `udon_syntax`; diagnostics live in the `udon` binary crate.

pub mod lang;

pub use lang::externals::ExternalToken;
pub use lang::layout::{FENCE_CHAR, FENCE_LEN, LINE_TERMINATOR, MAX_INDENT_DEPTH, TAB_STOP};
