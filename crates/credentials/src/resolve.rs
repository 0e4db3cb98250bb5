//! Resolver function values
//!
//! Downstream consumers receive resolvers as plain function values so they
//! never depend on a concrete cache implementation.

use crate::{CredentialRef, ResolutionKey, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Bound credential lookup.
///
/// `Ok(None)` means no credential is configured for the key, which is a
/// valid outcome and distinct from `Err` (the lookup itself failed).
pub type SecretResolveFn =
    Arc<dyn Fn(&ResolutionKey) -> Result<Option<CredentialRef>> + Send + Sync>;

/// Bound version lookup, answering which concrete version satisfies a request.
pub type VersionResolveFn = Arc<dyn Fn(&VersionRequest) -> Result<String> + Send + Sync>;

/// Request for a concrete artifact version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionRequest {
    /// Repository URL
    pub url: String,
    /// Artifact (chart, image) name within the repository
    pub name: String,
    /// Version constraint, e.g. `>=1.2.0`
    pub constraint: String,
}

impl VersionRequest {
    /// Create a version request
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            constraint: constraint.into(),
        }
    }
}

/// Wrap a closure as a [`SecretResolveFn`]
pub fn secret_resolve_fn<F>(f: F) -> SecretResolveFn
where
    F: Fn(&ResolutionKey) -> Result<Option<CredentialRef>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a closure as a [`VersionResolveFn`]
pub fn version_resolve_fn<F>(f: F) -> VersionResolveFn
where
    F: Fn(&VersionRequest) -> Result<String> + Send + Sync + 'static,
{
    Arc::new(f)
}
