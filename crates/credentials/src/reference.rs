//! References handed out to callers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key under which a kubeconfig Secret stores its payload
pub const KUBECONFIG_KEY: &str = "kubeconfig";

/// Reference to a credential-holding Secret, by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialRef {
    /// Secret name
    pub name: String,
}

impl CredentialRef {
    /// Create a reference to the named Secret
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Pointer to a kubeconfig stored in a Secret
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KubeconfigRef {
    /// The Secret holding the kubeconfig
    pub secret: CredentialRef,
    /// Data key inside the Secret
    pub key: String,
}

impl KubeconfigRef {
    /// Reference the kubeconfig stored under [`KUBECONFIG_KEY`] in `secret`
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: CredentialRef::new(secret),
            key: KUBECONFIG_KEY.to_string(),
        }
    }
}
