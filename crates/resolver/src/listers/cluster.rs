//! Kubernetes API lister

use crate::{CredentialLister, LabelSelector, ListError};
use async_trait::async_trait;
use credref_credentials::{CredentialKind, CredentialRecord};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{
    Client, Config,
    api::{Api, ListParams},
    config::{KubeConfigOptions, Kubeconfig},
};
use std::fmt;
use std::path::Path;

/// Lists Secrets in one namespace through the Kubernetes API.
///
/// Resolved references carry only a Secret name, so a lister is always
/// bound to a single namespace; Secrets reported from any other namespace
/// are dropped. Only metadata and the Secret type are read, never `data`.
#[derive(Clone)]
pub struct KubeLister {
    client: Client,
    namespace: String,
}

impl KubeLister {
    /// Create a lister over an existing client
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Client`] if `namespace` is empty.
    pub fn new(client: Client, namespace: impl Into<String>) -> Result<Self, ListError> {
        let namespace = namespace.into();
        if namespace.trim().is_empty() {
            return Err(ListError::client("namespace must not be empty"));
        }
        Ok(Self { client, namespace })
    }

    /// Build a client from a kubeconfig file, or from the environment when
    /// `kubeconfig` is `None`, and create a lister over it.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::Client`] if the kubeconfig cannot be read, the
    /// client cannot be created, or `namespace` is empty.
    pub async fn connect(
        namespace: impl Into<String>,
        kubeconfig: Option<&Path>,
        context: Option<&str>,
    ) -> Result<Self, ListError> {
        let options = KubeConfigOptions {
            context: context.map(str::to_string),
            cluster: None,
            user: None,
        };

        let config = match (kubeconfig, context) {
            (Some(path), _) => {
                let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
                    ListError::client(format!(
                        "Failed to read kubeconfig from {}: {e}",
                        path.display()
                    ))
                })?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| {
                        ListError::client(format!("Failed to create Kubernetes config: {e}"))
                    })?
            }
            (None, Some(_)) => Config::from_kubeconfig(&options).await.map_err(|e| {
                ListError::client(format!("Failed to create Kubernetes config: {e}"))
            })?,
            (None, None) => Config::infer().await.map_err(|e| {
                ListError::client(format!("Failed to infer Kubernetes config: {e}"))
            })?,
        };

        let client = Client::try_from(config)
            .map_err(|e| ListError::client(format!("Failed to create Kubernetes client: {e}")))?;
        Self::new(client, namespace)
    }

    /// Namespace this lister reads from
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl fmt::Debug for KubeLister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeLister")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialLister for KubeLister {
    fn lister_name(&self) -> &'static str {
        "kubernetes"
    }

    async fn list(&self, selector: &LabelSelector) -> Result<Vec<CredentialRecord>, ListError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), &self.namespace);
        let params = ListParams::default().labels(&selector.to_string());

        tracing::debug!(namespace = %self.namespace, %selector, "Listing secrets");
        let list = secrets.list(&params).await.map_err(|e| match e {
            kube::Error::Api(response) => ListError::api(response.code, response.message),
            other => ListError::backend("kubernetes", other),
        })?;

        Ok(list
            .items
            .into_iter()
            .filter_map(record_from_secret)
            .filter(|record| {
                let in_scope = record
                    .namespace
                    .as_deref()
                    .is_none_or(|namespace| namespace == self.namespace);
                if !in_scope {
                    tracing::warn!(
                        record = %record.name,
                        namespace = ?record.namespace,
                        expected = %self.namespace,
                        "Dropping secret from another namespace"
                    );
                }
                in_scope
            })
            .collect())
    }
}

/// Convert a Secret into a record; unnamed Secrets yield `None`
fn record_from_secret(secret: Secret) -> Option<CredentialRecord> {
    let ObjectMeta {
        name,
        namespace,
        labels,
        annotations,
        ..
    } = secret.metadata;

    Some(CredentialRecord {
        name: name?,
        namespace,
        kind: CredentialKind::parse(secret.type_.as_deref().unwrap_or_default()),
        labels: labels.unwrap_or_default(),
        annotations: annotations.unwrap_or_default(),
    })
}
