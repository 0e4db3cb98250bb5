//! Listing collaborator implementations
//!
//! - [`StaticLister`] - A fixed set of records, for embedding and tests
//! - [`KubeLister`] - Secrets in one namespace, read through the Kubernetes API

mod cluster;
mod fixed;

pub use cluster::KubeLister;
pub use fixed::StaticLister;
