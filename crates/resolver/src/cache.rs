//! Credential resolution cache

use crate::{CredentialLister, EmptyUrlPolicy, Error, RepopulateMode, ResolverConfig, Result};
use credref_credentials::{
    CredentialRecord, CredentialRef, ResolutionKey, SecretResolveFn, secret_resolve_fn,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Published index: resolution key -> credential name
pub type CredentialIndex = HashMap<ResolutionKey, String>;

/// Maps (URL, credential kind) pairs to the Secret that holds the credentials.
///
/// The cache is filled by [`populate`](Self::populate) from a listing
/// collaborator and queried with [`resolve`](Self::resolve). Each populate
/// builds a complete index privately and publishes it in one swap, so
/// lookups running concurrently see either the previous index or the new
/// one, never a partial build.
///
/// # Example
///
/// ```ignore
/// use credref_resolver::{KubeLister, ResolverCache};
///
/// let cache = Arc::new(ResolverCache::new());
/// cache.populate(&KubeLister::new(client, "tenants")?).await?;
///
/// let ctx = Context::new().with_secret_resolver(cache.bind());
/// ```
pub struct ResolverCache {
    config: ResolverConfig,
    index: RwLock<Arc<CredentialIndex>>,
    // Serializes populates so two rebuilds never interleave their publishes
    populating: tokio::sync::Mutex<()>,
}

impl Default for ResolverCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverCache {
    /// Create an empty cache with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Create an empty cache with the given configuration
    #[must_use]
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            index: RwLock::new(Arc::new(CredentialIndex::new())),
            populating: tokio::sync::Mutex::new(()),
        }
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// List eligible records once and publish a new index.
    ///
    /// Records without the eligibility label or without the URL annotation
    /// are skipped. Every URL in the annotation yields one key with the
    /// record's kind; when several records claim the same key, the one
    /// listed last wins.
    ///
    /// Returns the number of entries in the published index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ListingFailed`] with the lister's error as source, or
    /// [`Error::ListingTimedOut`] if a listing timeout is configured and
    /// expires. On error nothing is published and the previous index stays
    /// in place.
    #[tracing::instrument(skip_all, fields(lister = lister.lister_name()))]
    pub async fn populate<L>(&self, lister: &L) -> Result<usize>
    where
        L: CredentialLister + ?Sized,
    {
        let _populating = self.populating.lock().await;

        let records = self.list(lister).await?;
        let fresh = self.build_index(&records);

        let index = match self.config.repopulate {
            RepopulateMode::Replace => fresh,
            RepopulateMode::Merge => {
                let mut merged = CredentialIndex::clone(&self.snapshot());
                merged.extend(fresh);
                merged
            }
        };

        let entries = index.len();
        *self.index.write() = Arc::new(index);

        tracing::info!(
            records = records.len(),
            entries,
            mode = ?self.config.repopulate,
            "Credential index populated"
        );
        Ok(entries)
    }

    /// Like [`populate`](Self::populate), abandoning the listing when `token` fires.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if the token is cancelled before the
    /// populate completes, or any error from [`populate`](Self::populate).
    pub async fn populate_with_cancellation<L>(
        &self,
        lister: &L,
        token: &CancellationToken,
    ) -> Result<usize>
    where
        L: CredentialLister + ?Sized,
    {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                tracing::debug!(lister = lister.lister_name(), "Populate cancelled");
                Err(Error::Cancelled { lister: lister.lister_name() })
            }
            result = self.populate(lister) => result,
        }
    }

    async fn list<L>(&self, lister: &L) -> Result<Vec<CredentialRecord>>
    where
        L: CredentialLister + ?Sized,
    {
        let name = lister.lister_name();
        let selector = self.config.selector();
        let listing = lister.list(&selector);

        let listed = match self.config.list_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, listing)
                .await
                .map_err(|_| Error::ListingTimedOut {
                    lister: name,
                    timeout,
                })?,
            None => listing.await,
        };

        listed.map_err(|source| Error::ListingFailed {
            lister: name,
            source,
        })
    }

    fn build_index(&self, records: &[CredentialRecord]) -> CredentialIndex {
        let config = &self.config;
        let mut index = CredentialIndex::new();

        for record in records {
            if !record.has_label(&config.eligibility_label, &config.eligibility_value) {
                tracing::debug!(record = %record.name, "Skipping record without eligibility label");
                continue;
            }
            let Some(urls) = record.annotation(&config.url_annotation) else {
                tracing::debug!(record = %record.name, "Skipping record without URL annotation");
                continue;
            };

            for url in urls.split(',') {
                if url.is_empty() && config.empty_urls == EmptyUrlPolicy::Skip {
                    tracing::warn!(
                        record = %record.name,
                        annotation = %urls,
                        "Ignoring empty URL in credential annotation"
                    );
                    continue;
                }

                let key = ResolutionKey::new(url, record.kind.clone());
                if let Some(previous) = index.insert(key, record.name.clone())
                    && previous != record.name
                {
                    tracing::warn!(
                        url,
                        kind = %record.kind,
                        previous = %previous,
                        winner = %record.name,
                        "Credential claimed by multiple records; last listed wins"
                    );
                }
            }

            tracing::debug!(
                record = %record.name,
                namespace = record.namespace.as_deref().unwrap_or_default(),
                kind = %record.kind,
                "Indexed credential record"
            );
        }

        index
    }

    /// Look up the credential for `key`.
    ///
    /// Returns `Ok(None)` when no credential is configured for the key. The
    /// error branch is never taken today; it keeps the signature in line
    /// with [`SecretResolveFn`].
    #[allow(clippy::unnecessary_wraps)]
    pub fn resolve(
        &self,
        key: &ResolutionKey,
    ) -> credref_credentials::Result<Option<CredentialRef>> {
        let index = self.index.read();
        Ok(index.get(key).map(|name| CredentialRef::new(name.clone())))
    }

    /// Wrap [`resolve`](Self::resolve) as a function value for injection
    /// through a context
    #[must_use]
    pub fn bind(self: &Arc<Self>) -> SecretResolveFn {
        let cache = Arc::clone(self);
        secret_resolve_fn(move |key| cache.resolve(key))
    }

    /// Currently published index
    #[must_use]
    pub fn snapshot(&self) -> Arc<CredentialIndex> {
        Arc::clone(&self.index.read())
    }

    /// Number of indexed keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.read().len()
    }

    /// Check whether the index is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.read().is_empty()
    }

    /// Indexed keys in sorted order
    #[must_use]
    pub fn keys(&self) -> Vec<ResolutionKey> {
        let mut keys: Vec<_> = self.index.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl std::fmt::Debug for ResolverCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverCache")
            .field("entries", &self.len())
            .field("config", &self.config)
            .finish()
    }
}
