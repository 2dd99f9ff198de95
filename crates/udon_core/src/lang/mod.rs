//! UDON layout vocabulary registries.
//!
//! Callers work with **stable IDs** (e.g. [`externals::ExternalToken`]) and look up spellings and
//! metadata via registry tables instead of comparing strings.
//!
//! ## Examples
//! ```rust
//! use udon_core::lang::externals::{self, ExternalToken};
//!
//! assert_eq!(externals::from_str("DEDENT"), Some(ExternalToken::Dedent));
//! assert_eq!(externals::as_str(ExternalToken::Dedent), "DEDENT");
//! ```

pub mod externals;
pub mod layout;
