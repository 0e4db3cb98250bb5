//! Error types for credential resolution

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Error returned by resolver function values
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A resolver could not answer the request
    #[error("Credential resolution failed: {message}")]
    #[diagnostic(code(credref::credentials::resolution))]
    Resolution {
        /// Error message from the resolver
        message: String,
    },

    /// No version satisfies the requested constraint
    #[error("No version of '{name}' at {url} satisfies '{constraint}'")]
    #[diagnostic(
        code(credref::credentials::version_not_found),
        help("Check the repository index and the version constraint")
    )]
    VersionNotFound {
        /// Repository URL
        url: String,
        /// Artifact name within the repository
        name: String,
        /// Constraint that could not be satisfied
        constraint: String,
    },
}

impl Error {
    /// Create a resolution error
    #[must_use]
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution {
            message: msg.into(),
        }
    }

    /// Create a version-not-found error
    #[must_use]
    pub fn version_not_found(
        url: impl Into<String>,
        name: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self::VersionNotFound {
            url: url.into(),
            name: name.into(),
            constraint: constraint.into(),
        }
    }
}

/// Result type for credential resolution
pub type Result<T> = std::result::Result<T, Error>;
