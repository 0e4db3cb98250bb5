//! Credential-reference resolution for credref
//!
//! Given a repository URL and the expected credential kind, the
//! [`ResolverCache`] answers with a reference to the Secret holding matching
//! credentials. It is built in one pass from a [`CredentialLister`] and then
//! queried any number of times:
//!
//! ```ignore
//! use credref_credentials::{CredentialKind, ResolutionKey};
//! use credref_resolver::{KubeLister, ResolverCache, ResolverConfig};
//!
//! let cache = ResolverCache::with_config(ResolverConfig::load("credref.toml")?);
//! cache.populate(&KubeLister::connect("tenants", None, None).await?).await?;
//!
//! let key = ResolutionKey::new("https://charts.example.com", CredentialKind::BasicAuth);
//! match cache.resolve(&key)? {
//!     Some(secret) => attach_pull_secret(&secret.name),
//!     None => tracing::debug!(%key, "No credential configured"),
//! }
//! ```
//!
//! # Indexing rules
//!
//! Only records labeled `eligibility=true` are indexed. Their
//! `credential-urls` annotation is split on `,` and each URL becomes one key
//! paired with the record's Secret type. Both names are configurable through
//! [`ResolverConfig`].

mod cache;
mod config;
mod error;
mod lister;
pub mod listers;

pub use cache::{CredentialIndex, ResolverCache};
pub use config::{
    DEFAULT_ELIGIBILITY_LABEL, DEFAULT_ELIGIBILITY_VALUE, DEFAULT_URL_ANNOTATION, EmptyUrlPolicy,
    RepopulateMode, ResolverConfig,
};
pub use error::{Error, Result};
pub use lister::{CredentialLister, LabelSelector, ListError};
pub use listers::{KubeLister, StaticLister};
