#![forbid(unsafe_code)]
//! UDON layout tooling
//!
//! Command-line and library front end over the `udon_syntax` layout scanner: token dumps,
//! scanner-state dumps, and advisory layout lints.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod config;
pub mod dump;
pub mod lint;
pub mod version;

pub use config::{DumpConfig, OutputFormat};
pub use dump::{render_states, render_tokens};
pub use lint::{LayoutLint, check_source};
pub use udon_syntax::host::{self, Token, TokenKind};
