//! Listing collaborator interface

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use async_trait::async_trait;
use credref_credentials::CredentialRecord;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Equality-based label selector (`key=value`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LabelSelector {
    /// Label key
    pub key: String,
    /// Required label value
    pub value: String,
}

impl LabelSelector {
    /// Create a selector matching `key=value`
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Check whether a record carries the selected label
    #[must_use]
    pub fn matches(&self, record: &CredentialRecord) -> bool {
        record.has_label(&self.key, &self.value)
    }
}

impl fmt::Display for LabelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Error returned by a listing collaborator
#[derive(Error, Debug, Diagnostic)]
pub enum ListError {
    /// The backend client could not be configured
    #[error("Failed to set up lister client: {message}")]
    #[diagnostic(
        code(credref::lister::client),
        help("Check the kubeconfig path, context name and target namespace")
    )]
    Client {
        /// What went wrong
        message: String,
    },

    /// The API server rejected the listing request
    #[error("API server returned {code}: {message}")]
    #[diagnostic(code(credref::lister::api))]
    Api {
        /// HTTP status code
        code: u16,
        /// Server-provided message
        message: String,
    },

    /// Any other backend failure
    #[error("Backend '{backend}' failed")]
    #[diagnostic(code(credref::lister::backend))]
    Backend {
        /// Backend name
        backend: String,
        /// Underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ListError {
    /// Create a client setup error
    #[must_use]
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Create an API rejection error
    #[must_use]
    pub fn api(code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Wrap an arbitrary backend error
    #[must_use]
    pub fn backend(
        backend: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Backend {
            backend: backend.into(),
            source: source.into(),
        }
    }
}

/// Capability to list candidate credential records by label.
///
/// Implementors abstract the backing store (API server, fixture, ...). A
/// listing is expected to be a consistent snapshot; the resolver cache calls
/// [`list`](CredentialLister::list) once per populate and never retries.
#[async_trait]
pub trait CredentialLister: Send + Sync {
    /// List records carrying the selected label.
    ///
    /// Implementations may return records that do not match `selector`; the
    /// cache re-checks eligibility itself.
    async fn list(&self, selector: &LabelSelector) -> Result<Vec<CredentialRecord>, ListError>;

    /// Lister identifier used in logs and errors, e.g. `"kubernetes"`
    fn lister_name(&self) -> &'static str;
}
