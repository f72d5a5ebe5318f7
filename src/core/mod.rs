//! Core types shared across pbxlink.
//!
//! # Modules
//!
//! ## `error` - Error Handling
//!
//! - [`PbxError`] is the strongly-typed error returned by every engine
//!   operation: documents, target queries, mutation primitives and the linker.
//! - [`ErrorContext`] wraps an error with details and a suggestion for display
//!   on the command line.
//! - [`user_friendly_error`] converts any [`anyhow::Error`] into an
//!   [`ErrorContext`], recognising [`PbxError`], I/O and TOML errors.

pub mod error;

pub use error::{ErrorContext, PbxError, user_friendly_error};
