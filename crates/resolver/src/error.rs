//! Error types for the resolver crate

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use crate::ListError;
use miette::Diagnostic;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Error type for resolver cache operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The listing collaborator failed; the collaborator's error is the source
    #[error("Listing credential records via '{lister}' failed")]
    #[diagnostic(
        code(credref::resolver::listing_failed),
        help("The previously published index is still in use; populate again once the backend is reachable")
    )]
    ListingFailed {
        /// Name of the lister that failed
        lister: &'static str,
        /// The collaborator's error, unchanged
        #[source]
        source: ListError,
    },

    /// The listing call exceeded the configured timeout
    #[error("Listing credential records via '{lister}' timed out after {timeout:?}")]
    #[diagnostic(
        code(credref::resolver::listing_timed_out),
        help("Raise `list_timeout_ms` or check connectivity to the cluster")
    )]
    ListingTimedOut {
        /// Name of the lister that timed out
        lister: &'static str,
        /// Configured timeout
        timeout: Duration,
    },

    /// Populate was cancelled before the listing completed
    #[error("Populating from '{lister}' was cancelled")]
    #[diagnostic(code(credref::resolver::cancelled))]
    Cancelled {
        /// Name of the lister whose call was abandoned
        lister: &'static str,
    },

    /// Invalid resolver configuration
    #[error("Resolver configuration error: {message}")]
    #[diagnostic(code(credref::resolver::config))]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// I/O error while reading configuration
    #[error("I/O {operation} failed{}", path.as_ref().map_or(String::new(), |p| format!(": {}", p.display())))]
    #[diagnostic(
        code(credref::resolver::io),
        help("Check file permissions and ensure the path exists")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error, if available
        path: Option<Box<Path>>,
        /// Operation that failed (e.g., "read")
        operation: String,
    },
}

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create an I/O error with path context
    #[must_use]
    pub fn io(
        source: std::io::Error,
        path: impl AsRef<Path>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.as_ref().into()),
            operation: operation.into(),
        }
    }
}

/// Result type for resolver cache operations
pub type Result<T> = std::result::Result<T, Error>;
