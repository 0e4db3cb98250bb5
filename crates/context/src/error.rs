//! Error types for the context store

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Error type for context lookups
///
/// Every variant signals a programming error in the caller (a slot read
/// before it was written), not a condition to recover from.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The slot was never bound in this context chain
    #[error("Context has no value bound for slot '{slot}'")]
    #[diagnostic(
        code(credref::context::missing_binding),
        help("Bind the value with `Context::with_value` before passing the context down")
    )]
    MissingBinding {
        /// Name of the slot that was read
        slot: &'static str,
    },
}

/// Result type for context lookups
pub type Result<T> = std::result::Result<T, ContextError>;
