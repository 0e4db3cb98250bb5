//! Resolution keys

use crate::CredentialKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite (URL, credential kind) key used to index credentials.
///
/// Two keys are equal iff both the URL and the kind are equal. The URL is
/// compared byte-for-byte; no normalization (trailing slashes, scheme case)
/// is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResolutionKey {
    url: String,
    kind: CredentialKind,
}

impl ResolutionKey {
    /// Create a new resolution key
    #[must_use]
    pub fn new(url: impl Into<String>, kind: CredentialKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// Repository URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Expected credential kind
    #[must_use]
    pub fn kind(&self) -> &CredentialKind {
        &self.kind
    }
}

impl fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.url)
    }
}
