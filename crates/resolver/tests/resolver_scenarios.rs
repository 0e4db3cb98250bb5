//! End-to-end scenarios for the resolver cache: populate from a lister,
//! resolve, and hand the bound resolver down through a context.

// Integration tests can use unwrap/expect for cleaner assertions
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use async_trait::async_trait;
use credref_context::Context;
use credref_credentials::{
    CredentialKind, CredentialRecord, CredentialRef, KubeconfigRef, ResolutionKey,
};
use credref_resolver::{
    CredentialLister, Error, LabelSelector, ListError, ResolverCache, ResolverConfig,
    StaticLister,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn eligible(name: &str, kind: CredentialKind, urls: &str) -> CredentialRecord {
    CredentialRecord::new(name, kind)
        .with_label("eligibility", "true")
        .with_annotation("credential-urls", urls)
}

/// Lister that never answers
struct HangingLister;

#[async_trait]
impl CredentialLister for HangingLister {
    fn lister_name(&self) -> &'static str {
        "hanging"
    }

    async fn list(&self, _: &LabelSelector) -> Result<Vec<CredentialRecord>, ListError> {
        std::future::pending().await
    }
}

/// Lister that answers once the gate is opened
struct GatedLister {
    gate: Arc<Notify>,
    records: Vec<CredentialRecord>,
}

#[async_trait]
impl CredentialLister for GatedLister {
    fn lister_name(&self) -> &'static str {
        "gated"
    }

    async fn list(&self, _: &LabelSelector) -> Result<Vec<CredentialRecord>, ListError> {
        self.gate.notified().await;
        Ok(self.records.clone())
    }
}

/// Lister counting calls and recording the selector it received
#[derive(Default)]
struct CountingLister {
    calls: AtomicUsize,
    selector: parking_lot::Mutex<Option<LabelSelector>>,
}

#[async_trait]
impl CredentialLister for CountingLister {
    fn lister_name(&self) -> &'static str {
        "counting"
    }

    async fn list(&self, selector: &LabelSelector) -> Result<Vec<CredentialRecord>, ListError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.selector.lock() = Some(selector.clone());
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn helm_and_docker_secrets_for_same_url() {
    init_tracing();

    let cache = ResolverCache::new();
    let lister = StaticLister::new(vec![
        eligible("helm-secret", CredentialKind::BasicAuth, "https://test.com"),
        eligible("docker-secret", CredentialKind::DockerConfig, "https://test.com"),
    ]);

    cache.populate(&lister).await.unwrap();

    let basic = ResolutionKey::new("https://test.com", CredentialKind::BasicAuth);
    let docker = ResolutionKey::new("https://test.com", CredentialKind::DockerConfig);
    let other = ResolutionKey::new("https://test.com", CredentialKind::SshAuth);

    assert_eq!(
        cache.resolve(&basic).unwrap(),
        Some(CredentialRef::new("helm-secret"))
    );
    assert_eq!(
        cache.resolve(&docker).unwrap(),
        Some(CredentialRef::new("docker-secret"))
    );
    assert_eq!(cache.resolve(&other).unwrap(), None);
}

#[tokio::test]
async fn zero_records_yield_empty_index() {
    let cache = ResolverCache::new();
    let entries = cache.populate(&StaticLister::default()).await.unwrap();

    assert_eq!(entries, 0);
    assert!(cache.is_empty());
    for kind in [
        CredentialKind::BasicAuth,
        CredentialKind::DockerConfigJson,
        CredentialKind::Opaque,
    ] {
        let key = ResolutionKey::new("https://test.com", kind);
        assert_eq!(cache.resolve(&key).unwrap(), None);
    }
}

#[tokio::test]
async fn lister_called_once_with_eligibility_selector() {
    let cache = ResolverCache::new();
    let lister = CountingLister::default();

    cache.populate(&lister).await.unwrap();

    assert_eq!(lister.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        lister.selector.lock().clone(),
        Some(LabelSelector::new("eligibility", "true"))
    );
}

#[tokio::test]
async fn custom_label_and_annotation_names() {
    let config = ResolverConfig::from_toml_str(
        r#"
        eligibility_label = "credref.io/index"
        eligibility_value = "yes"
        url_annotation = "credref.io/urls"
        "#,
    )
    .unwrap();
    let cache = ResolverCache::with_config(config);
    let lister = StaticLister::new(vec![
        CredentialRecord::new("custom", CredentialKind::BasicAuth)
            .with_label("credref.io/index", "yes")
            .with_annotation("credref.io/urls", "https://charts.example.com"),
        eligible("default-names", CredentialKind::BasicAuth, "https://test.com"),
    ]);

    assert_eq!(cache.populate(&lister).await.unwrap(), 1);
    assert_eq!(
        cache
            .resolve(&ResolutionKey::new(
                "https://charts.example.com",
                CredentialKind::BasicAuth
            ))
            .unwrap(),
        Some(CredentialRef::new("custom"))
    );
}

#[tokio::test(start_paused = true)]
async fn listing_timeout() {
    let cache = ResolverCache::with_config(
        ResolverConfig::default().with_list_timeout(Duration::from_secs(2)),
    );

    let result = cache.populate(&HangingLister).await;
    match result {
        Err(Error::ListingTimedOut { lister, timeout }) => {
            assert_eq!(lister, "hanging");
            assert_eq!(timeout, Duration::from_secs(2));
        }
        other => panic!("Expected ListingTimedOut, got {other:?}"),
    }
    assert!(cache.is_empty());
}

#[tokio::test]
async fn cancellation_abandons_listing() {
    let cache = ResolverCache::new();
    let token = CancellationToken::new();

    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            token.cancel();
        })
    };

    let result = cache
        .populate_with_cancellation(&HangingLister, &token)
        .await;
    canceller.await.unwrap();

    assert!(matches!(result, Err(Error::Cancelled { lister: "hanging" })));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn cancellation_token_unused_when_populate_finishes() {
    let cache = ResolverCache::new();
    let token = CancellationToken::new();
    let lister = StaticLister::new(vec![eligible(
        "helm-secret",
        CredentialKind::BasicAuth,
        "https://test.com",
    )]);

    let entries = cache
        .populate_with_cancellation(&lister, &token)
        .await
        .unwrap();
    assert_eq!(entries, 1);
}

#[tokio::test]
async fn lookups_during_populate_see_previous_index() {
    let cache = ResolverCache::new();
    cache
        .populate(&StaticLister::new(vec![eligible(
            "old-secret",
            CredentialKind::BasicAuth,
            "https://test.com",
        )]))
        .await
        .unwrap();

    let gate = Arc::new(Notify::new());
    let lister = GatedLister {
        gate: Arc::clone(&gate),
        records: vec![eligible(
            "new-secret",
            CredentialKind::BasicAuth,
            "https://test.com",
        )],
    };
    let key = ResolutionKey::new("https://test.com", CredentialKind::BasicAuth);

    let observe = async {
        tokio::task::yield_now().await;
        assert_eq!(
            cache.resolve(&key).unwrap(),
            Some(CredentialRef::new("old-secret"))
        );
        gate.notify_one();
    };
    let (populated, ()) = tokio::join!(cache.populate(&lister), observe);

    populated.unwrap();
    assert_eq!(
        cache.resolve(&key).unwrap(),
        Some(CredentialRef::new("new-secret"))
    );
}

#[tokio::test]
async fn concurrent_lookups_from_many_tasks() {
    let cache = Arc::new(ResolverCache::new());
    cache
        .populate(&StaticLister::new(vec![eligible(
            "registry",
            CredentialKind::DockerConfigJson,
            "oci://registry.example.com",
        )]))
        .await
        .unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let resolve = cache.bind();
            tokio::spawn(async move {
                resolve(&ResolutionKey::new(
                    "oci://registry.example.com",
                    CredentialKind::DockerConfigJson,
                ))
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.await.unwrap().unwrap(),
            Some(CredentialRef::new("registry"))
        );
    }
}

/// Stand-in for a manifest generator that only sees the context
fn pull_secrets_for(ctx: &Context, repositories: &[&str]) -> Vec<String> {
    let resolve = ctx.secret_resolver().unwrap();
    repositories
        .iter()
        .filter_map(|url| {
            resolve(&ResolutionKey::new(*url, CredentialKind::DockerConfigJson))
                .unwrap()
                .map(|secret| secret.name)
        })
        .collect()
}

#[tokio::test]
async fn bound_resolver_through_context() {
    let cache = Arc::new(ResolverCache::new());
    cache
        .populate(&StaticLister::new(vec![
            eligible(
                "registry-a",
                CredentialKind::DockerConfigJson,
                "oci://a.example.com",
            ),
            eligible(
                "registry-b",
                CredentialKind::DockerConfigJson,
                "oci://b.example.com",
            ),
        ]))
        .await
        .unwrap();

    let tenant = Context::new()
        .with_tenant_namespace("tenant-a")
        .with_kubeconfig(KubeconfigRef::new("tenant-a-kubeconfig"))
        .with_secret_resolver(cache.bind());

    let secrets = pull_secrets_for(
        &tenant,
        &[
            "oci://a.example.com",
            "oci://unknown.example.com",
            "oci://b.example.com",
        ],
    );

    assert_eq!(secrets, vec!["registry-a", "registry-b"]);
    assert_eq!(tenant.tenant_namespace().unwrap(), "tenant-a");
}
