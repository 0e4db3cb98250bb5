//! In-memory lister

use crate::{CredentialLister, LabelSelector, ListError};
use async_trait::async_trait;
use credref_credentials::CredentialRecord;

/// Lists a fixed set of records in insertion order.
///
/// By default only records matching the selector are returned, like a real
/// object store. [`unfiltered`](Self::unfiltered) returns every record
/// regardless of labels.
#[derive(Debug, Clone)]
pub struct StaticLister {
    records: Vec<CredentialRecord>,
    filter: bool,
}

impl StaticLister {
    /// Create a lister that filters by selector
    #[must_use]
    pub fn new(records: Vec<CredentialRecord>) -> Self {
        Self {
            records,
            filter: true,
        }
    }

    /// Create a lister that ignores the selector
    #[must_use]
    pub fn unfiltered(records: Vec<CredentialRecord>) -> Self {
        Self {
            records,
            filter: false,
        }
    }

    /// Append a record
    pub fn push(&mut self, record: CredentialRecord) {
        self.records.push(record);
    }
}

impl Default for StaticLister {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl CredentialLister for StaticLister {
    fn lister_name(&self) -> &'static str {
        "static"
    }

    async fn list(&self, selector: &LabelSelector) -> Result<Vec<CredentialRecord>, ListError> {
        Ok(self
            .records
            .iter()
            .filter(|record| !self.filter || selector.matches(record))
            .cloned()
            .collect())
    }
}
