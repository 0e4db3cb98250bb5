//! Credential vocabulary for credref
//!
//! This crate holds the value types shared by the resolver cache and the
//! typed context store:
//! - [`ResolutionKey`]: the immutable (URL, credential kind) index key
//! - [`CredentialKind`]: Kubernetes Secret types
//! - [`CredentialRecord`]: a candidate Secret as handed over by a listing collaborator
//! - [`CredentialRef`] / [`KubeconfigRef`]: what callers get back
//! - [`SecretResolveFn`] / [`VersionResolveFn`]: resolver function values
//!   threaded through a call chain
//!
//! # Example
//!
//! ```ignore
//! use credref_credentials::{CredentialKind, ResolutionKey};
//!
//! let key = ResolutionKey::new("https://charts.example.com", CredentialKind::BasicAuth);
//! let reference = resolve(&key)?;
//! ```

mod error;
mod key;
mod kind;
mod record;
mod reference;
mod resolve;

pub use error::{Error, Result};
pub use key::ResolutionKey;
pub use kind::CredentialKind;
pub use record::CredentialRecord;
pub use reference::{CredentialRef, KUBECONFIG_KEY, KubeconfigRef};
pub use resolve::{
    SecretResolveFn, VersionRequest, VersionResolveFn, secret_resolve_fn, version_resolve_fn,
};
