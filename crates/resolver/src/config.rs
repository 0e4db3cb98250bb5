//! Resolver cache configuration

use crate::{Error, LabelSelector, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default eligibility label key
pub const DEFAULT_ELIGIBILITY_LABEL: &str = "eligibility";
/// Default eligibility label value
pub const DEFAULT_ELIGIBILITY_VALUE: &str = "true";
/// Default annotation carrying the comma-separated URL list
pub const DEFAULT_URL_ANNOTATION: &str = "credential-urls";

/// What to do with empty segments in the URL annotation (`a,,b`, `a,`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyUrlPolicy {
    /// Drop empty segments
    #[default]
    Skip,
    /// Index empty segments as literal empty-string URLs
    Keep,
}

/// How a populate treats entries published by an earlier populate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepopulateMode {
    /// Rebuild from scratch; keys missing from the new listing disappear
    #[default]
    Replace,
    /// Overlay the new listing on the current index
    Merge,
}

/// Configuration for a [`ResolverCache`](crate::ResolverCache)
///
/// Every field has a default, so an empty TOML document is a valid config:
///
/// ```toml
/// eligibility_label = "eligibility"
/// eligibility_value = "true"
/// url_annotation = "credential-urls"
/// empty_urls = "skip"
/// repopulate = "replace"
/// list_timeout_ms = 30000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Label key marking records as eligible for indexing
    pub eligibility_label: String,
    /// Label value marking records as eligible for indexing
    pub eligibility_value: String,
    /// Annotation holding the comma-separated URL list
    pub url_annotation: String,
    /// Handling of empty URL segments
    pub empty_urls: EmptyUrlPolicy,
    /// Handling of entries from an earlier populate
    pub repopulate: RepopulateMode,
    /// Upper bound on the listing call, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_timeout_ms: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            eligibility_label: DEFAULT_ELIGIBILITY_LABEL.to_string(),
            eligibility_value: DEFAULT_ELIGIBILITY_VALUE.to_string(),
            url_annotation: DEFAULT_URL_ANNOTATION.to_string(),
            empty_urls: EmptyUrlPolicy::default(),
            repopulate: RepopulateMode::default(),
            list_timeout_ms: None,
        }
    }
}

impl ResolverConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the document is not valid TOML,
    /// has unknown value types, or fails [`validate`](Self::validate).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid resolver config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or any error from
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(e, path, "read"))?;
        tracing::debug!(path = %path.display(), "Loaded resolver config");
        Self::from_toml_str(&content)
    }

    /// Check that label and annotation keys are usable
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the eligibility label or the URL
    /// annotation key is empty.
    pub fn validate(&self) -> Result<()> {
        if self.eligibility_label.trim().is_empty() {
            return Err(Error::configuration("eligibility_label must not be empty"));
        }
        if self.url_annotation.trim().is_empty() {
            return Err(Error::configuration("url_annotation must not be empty"));
        }
        if self.list_timeout_ms == Some(0) {
            return Err(Error::configuration(
                "list_timeout_ms must be positive; omit it to disable the timeout",
            ));
        }
        Ok(())
    }

    /// Selector handed to the listing collaborator
    #[must_use]
    pub fn selector(&self) -> LabelSelector {
        LabelSelector::new(&self.eligibility_label, &self.eligibility_value)
    }

    /// Listing timeout, if configured
    #[must_use]
    pub fn list_timeout(&self) -> Option<Duration> {
        self.list_timeout_ms.map(Duration::from_millis)
    }

    /// Set the empty URL segment policy
    #[must_use]
    pub fn with_empty_urls(mut self, policy: EmptyUrlPolicy) -> Self {
        self.empty_urls = policy;
        self
    }

    /// Set the repopulate mode
    #[must_use]
    pub fn with_repopulate(mut self, mode: RepopulateMode) -> Self {
        self.repopulate = mode;
        self
    }

    /// Set the listing timeout.
    ///
    /// The timeout is kept with millisecond precision: anything below one
    /// millisecond becomes one millisecond, and sub-millisecond remainders
    /// are truncated.
    #[must_use]
    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.list_timeout_ms = Some(millis.max(1));
        self
    }
}
