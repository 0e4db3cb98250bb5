//! Credential kinds (Kubernetes Secret types)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The type of a credential-holding Secret.
///
/// Serializes to the Kubernetes `type` field value (e.g.
/// `kubernetes.io/basic-auth`). Unknown types are preserved in
/// [`CredentialKind::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialKind {
    /// `Opaque`, the Kubernetes default
    #[default]
    Opaque,
    /// `kubernetes.io/basic-auth`
    BasicAuth,
    /// `kubernetes.io/ssh-auth`
    SshAuth,
    /// `kubernetes.io/dockercfg`
    DockerConfig,
    /// `kubernetes.io/dockerconfigjson`
    DockerConfigJson,
    /// `kubernetes.io/tls`
    Tls,
    /// `kubernetes.io/service-account-token`
    ServiceAccountToken,
    /// `bootstrap.kubernetes.io/token`
    BootstrapToken,
    /// Any other type string, kept verbatim
    Other(String),
}

impl CredentialKind {
    /// The Kubernetes `type` string for this kind
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Opaque => "Opaque",
            Self::BasicAuth => "kubernetes.io/basic-auth",
            Self::SshAuth => "kubernetes.io/ssh-auth",
            Self::DockerConfig => "kubernetes.io/dockercfg",
            Self::DockerConfigJson => "kubernetes.io/dockerconfigjson",
            Self::Tls => "kubernetes.io/tls",
            Self::ServiceAccountToken => "kubernetes.io/service-account-token",
            Self::BootstrapToken => "bootstrap.kubernetes.io/token",
            Self::Other(other) => other,
        }
    }

    /// Parse a Kubernetes `type` string; an empty string is `Opaque`
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "Opaque" => Self::Opaque,
            "kubernetes.io/basic-auth" => Self::BasicAuth,
            "kubernetes.io/ssh-auth" => Self::SshAuth,
            "kubernetes.io/dockercfg" => Self::DockerConfig,
            "kubernetes.io/dockerconfigjson" => Self::DockerConfigJson,
            "kubernetes.io/tls" => Self::Tls,
            "kubernetes.io/service-account-token" => Self::ServiceAccountToken,
            "bootstrap.kubernetes.io/token" => Self::BootstrapToken,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for CredentialKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CredentialKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}
