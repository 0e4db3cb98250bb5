//! Slots threaded through a reconciliation
//!
//! Each slot has a typed constructor/accessor pair on [`Context`], so call
//! sites never spell out the slot marker.

use crate::{Context, Result, Slot};
use credref_credentials::{KubeconfigRef, SecretResolveFn, VersionResolveFn};

/// Namespace of the tenant being reconciled
pub enum TenantNamespace {}

impl Slot for TenantNamespace {
    type Value = String;
    const NAME: &'static str = "tenant-namespace";
}

/// Kubeconfig used to reach the tenant's cluster
pub enum Kubeconfig {}

impl Slot for Kubeconfig {
    type Value = KubeconfigRef;
    const NAME: &'static str = "kubeconfig";
}

/// Function resolving artifact versions
pub enum VersionResolver {}

impl Slot for VersionResolver {
    type Value = VersionResolveFn;
    const NAME: &'static str = "version-resolver";
}

/// Function resolving credential references
pub enum SecretResolver {}

impl Slot for SecretResolver {
    type Value = SecretResolveFn;
    const NAME: &'static str = "secret-resolver";
}

impl Context {
    /// Bind the tenant namespace
    #[must_use]
    pub fn with_tenant_namespace(&self, namespace: impl Into<String>) -> Self {
        self.with_value::<TenantNamespace>(namespace.into())
    }

    /// Tenant namespace bound on this context
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingBinding`](crate::ContextError::MissingBinding)
    /// if no namespace was bound.
    pub fn tenant_namespace(&self) -> Result<&str> {
        self.require::<TenantNamespace>().map(String::as_str)
    }

    /// Bind a kubeconfig reference
    #[must_use]
    pub fn with_kubeconfig(&self, kubeconfig: KubeconfigRef) -> Self {
        self.with_value::<Kubeconfig>(kubeconfig)
    }

    /// Kubeconfig reference bound on this context
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingBinding`](crate::ContextError::MissingBinding)
    /// if no kubeconfig was bound.
    pub fn kubeconfig(&self) -> Result<&KubeconfigRef> {
        self.require::<Kubeconfig>()
    }

    /// Bind a version resolver
    #[must_use]
    pub fn with_version_resolver(&self, resolver: VersionResolveFn) -> Self {
        self.with_value::<VersionResolver>(resolver)
    }

    /// Version resolver bound on this context
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingBinding`](crate::ContextError::MissingBinding)
    /// if no version resolver was bound.
    pub fn version_resolver(&self) -> Result<VersionResolveFn> {
        self.value::<VersionResolver>()
    }

    /// Bind a secret resolver
    #[must_use]
    pub fn with_secret_resolver(&self, resolver: SecretResolveFn) -> Self {
        self.with_value::<SecretResolver>(resolver)
    }

    /// Secret resolver bound on this context
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::MissingBinding`](crate::ContextError::MissingBinding)
    /// if no secret resolver was bound.
    pub fn secret_resolver(&self) -> Result<SecretResolveFn> {
        self.value::<SecretResolver>()
    }
}
