//! Release time resolution with a run-scoped cache
//!
//! `ReleaseResolver` answers "when was `name@version` published?" through a
//! registry adapter and remembers every definitive answer, including "not
//! found", for the rest of the run. Bulk registries are asked once per
//! package, per-version registries once per (package, version). Transient
//! failures are not cached, so a later commit asks again.

use crate::error::RegistryError;
use crate::registry::{LookupMode, RegistryAdapter, ReleaseTimes};
use crate::version::canonicalize;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Default concurrency limit for registry requests
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Everything known about one package
#[derive(Debug, Default)]
struct PackageReleases {
    /// Publication time per version string
    times: ReleaseTimes,
    /// Versions known to be unpublished, with the failure
    missing: HashMap<String, RegistryError>,
    /// Bulk fetch result: `None` until a definitive answer arrived
    bulk: Option<Result<(), RegistryError>>,
}

/// Release times cached for the duration of one run
#[derive(Debug)]
pub struct ReleaseCache {
    registry: &'static str,
    mode: LookupMode,
    packages: HashMap<String, PackageReleases>,
}

impl ReleaseCache {
    /// Create an empty cache for a registry
    pub fn new(registry: &'static str, mode: LookupMode) -> Self {
        Self {
            registry,
            mode,
            packages: HashMap::new(),
        }
    }

    /// Look up a cached answer; `None` means the registry must be asked
    pub fn lookup(&self, name: &str, version: &str) -> Option<Result<DateTime<Utc>, RegistryError>> {
        let package = self.packages.get(name)?;

        if let Some(time) = find_time(&package.times, version) {
            return Some(Ok(time));
        }
        if let Some(err) = package.missing.get(version) {
            return Some(Err(err.clone()));
        }

        match (&self.mode, &package.bulk) {
            (LookupMode::Bulk, Some(Err(err))) => Some(Err(err.clone())),
            (LookupMode::Bulk, Some(Ok(()))) => Some(Err(RegistryError::version_not_found(
                name,
                version,
                self.registry,
            ))),
            _ => None,
        }
    }

    /// Whether a fetch for (name, version) is still needed
    pub fn needs_fetch(&self, name: &str, version: &str) -> bool {
        self.lookup(name, version).is_none()
    }

    /// Record the outcome of a registry fetch; transient failures are dropped
    pub fn record(
        &mut self,
        name: &str,
        version: &str,
        result: Result<ReleaseTimes, RegistryError>,
    ) {
        if let Err(err) = &result {
            if !err.is_definitive() {
                debug!("not caching transient failure for {}@{}: {}", name, version, err);
                return;
            }
        }

        let package = self.packages.entry(name.to_string()).or_default();

        match (self.mode, result) {
            (LookupMode::Bulk, Ok(times)) => {
                package.times.extend(times);
                package.bulk = Some(Ok(()));
            }
            (LookupMode::Bulk, Err(err)) => {
                package.bulk = Some(Err(err));
            }
            (LookupMode::PerVersion, Ok(times)) => {
                package.times.extend(times);
                if find_time(&package.times, version).is_none() {
                    package.missing.insert(
                        version.to_string(),
                        RegistryError::version_not_found(name, version, self.registry),
                    );
                }
            }
            (LookupMode::PerVersion, Err(err)) => {
                package.missing.insert(version.to_string(), err);
            }
        }
    }

    /// Number of packages with at least one cached answer
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether nothing has been cached yet
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Exact version key first, then any key with the same canonical version
/// (`1.2` against a registry that lists `1.2.0`)
fn find_time(times: &ReleaseTimes, version: &str) -> Option<DateTime<Utc>> {
    if let Some(time) = times.get(version) {
        return Some(*time);
    }
    let wanted = canonicalize(version)?;
    times
        .iter()
        .filter(|(key, _)| canonicalize(key).as_ref() == Some(&wanted))
        .map(|(_, time)| *time)
        .min()
}

/// Resolves release times through an adapter and a `ReleaseCache`
pub struct ReleaseResolver {
    adapter: Box<dyn RegistryAdapter>,
    cache: ReleaseCache,
    concurrency: usize,
    fetches: usize,
}

impl ReleaseResolver {
    /// Create a resolver with an empty cache
    pub fn new(adapter: Box<dyn RegistryAdapter>) -> Self {
        let cache = ReleaseCache::new(adapter.registry_name(), adapter.lookup_mode());
        Self {
            adapter,
            cache,
            concurrency: DEFAULT_CONCURRENCY,
            fetches: 0,
        }
    }

    /// Set the number of concurrent prefetch requests
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Name of the registry behind this resolver
    pub fn registry_name(&self) -> &'static str {
        self.adapter.registry_name()
    }

    /// Number of registry requests issued so far
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    /// Read-only view of the cache
    pub fn cache(&self) -> &ReleaseCache {
        &self.cache
    }

    /// Resolve the publication time of `name@version`
    pub async fn resolve(
        &mut self,
        name: &str,
        version: &str,
    ) -> Result<DateTime<Utc>, RegistryError> {
        if let Some(cached) = self.cache.lookup(name, version) {
            return cached;
        }

        debug!("fetching release times for {}@{}", name, version);
        self.fetches += 1;
        let result = self.adapter.fetch_release_times(name, version).await;
        if let Err(err) = &result {
            if !err.is_definitive() {
                return Err(err.clone());
            }
        }
        self.cache.record(name, version, result);

        self.cache.lookup(name, version).unwrap_or_else(|| {
            Err(RegistryError::version_not_found(
                name,
                version,
                self.registry_name(),
            ))
        })
    }

    /// Warm the cache for a batch of lookups with concurrent requests
    ///
    /// Results are merged into the cache in request order once every request
    /// has finished, so later `resolve` calls see the same answers as they
    /// would without prefetching.
    pub async fn prefetch(&mut self, requests: &[(String, String)]) {
        let mut seen = HashSet::new();
        let pending: Vec<(&str, &str)> = requests
            .iter()
            .filter(|(name, version)| self.cache.needs_fetch(name, version))
            .filter(|(name, version)| {
                let key = match self.adapter.lookup_mode() {
                    LookupMode::Bulk => (name.as_str(), ""),
                    LookupMode::PerVersion => (name.as_str(), version.as_str()),
                };
                seen.insert(key)
            })
            .map(|(name, version)| (name.as_str(), version.as_str()))
            .collect();

        if pending.is_empty() {
            return;
        }
        debug!("prefetching {} release lookups", pending.len());

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let adapter = &self.adapter;
        let fetches = pending.iter().map(|&(name, version)| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire().await;
                (name, version, adapter.fetch_release_times(name, version).await)
            }
        });
        let results = join_all(fetches).await;

        self.fetches += results.len();
        for (name, version, result) in results {
            self.cache.record(name, version, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Ecosystem;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Adapter serving a fixed table and counting requests
    struct FakeAdapter {
        mode: LookupMode,
        table: HashMap<String, ReleaseTimes>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeAdapter {
        fn new(mode: LookupMode) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let adapter = Self {
                mode,
                table: HashMap::new(),
                calls: Arc::clone(&calls),
            };
            (adapter, calls)
        }

        fn with(mut self, name: &str, version: &str, day: u32) -> Self {
            self.table
                .entry(name.to_string())
                .or_default()
                .insert(version.to_string(), date(day));
            self
        }
    }

    #[async_trait]
    impl RegistryAdapter for FakeAdapter {
        fn ecosystem(&self) -> Ecosystem {
            Ecosystem::Npm
        }

        fn registry_name(&self) -> &'static str {
            "fake"
        }

        fn lookup_mode(&self) -> LookupMode {
            self.mode
        }

        async fn fetch_release_times(
            &self,
            package: &str,
            version: &str,
        ) -> Result<ReleaseTimes, RegistryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let times = self
                .table
                .get(package)
                .ok_or_else(|| RegistryError::package_not_found(package, "fake"))?;
            Ok(match self.mode {
                LookupMode::Bulk => times.clone(),
                LookupMode::PerVersion => times
                    .iter()
                    .filter(|(v, _)| v.as_str() == version)
                    .map(|(v, t)| (v.clone(), *t))
                    .collect(),
            })
        }
    }

    /// Bulk adapter whose first request fails with a network error
    struct FlakyAdapter {
        times: ReleaseTimes,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RegistryAdapter for FlakyAdapter {
        fn ecosystem(&self) -> Ecosystem {
            Ecosystem::Npm
        }

        fn registry_name(&self) -> &'static str {
            "flaky"
        }

        fn lookup_mode(&self) -> LookupMode {
            LookupMode::Bulk
        }

        async fn fetch_release_times(
            &self,
            package: &str,
            _version: &str,
        ) -> Result<ReleaseTimes, RegistryError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(RegistryError::network_error(package, "flaky", "connection reset"));
            }
            Ok(self.times.clone())
        }
    }

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_bulk_adapter_queried_once_per_package() {
        let (adapter, calls) = FakeAdapter::new(LookupMode::Bulk);
        let adapter = adapter.with("lodash", "1.0.0", 1).with("lodash", "1.1.0", 5);
        let mut resolver = ReleaseResolver::new(Box::new(adapter));

        assert_eq!(resolver.resolve("lodash", "1.0.0").await.unwrap(), date(1));
        assert_eq!(resolver.resolve("lodash", "1.1.0").await.unwrap(), date(5));
        assert!(resolver.resolve("lodash", "9.9.9").await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_per_version_adapter_queried_once_per_version() {
        let (adapter, calls) = FakeAdapter::new(LookupMode::PerVersion);
        let adapter = adapter.with("mod", "v1.0.0", 1).with("mod", "v1.1.0", 2);
        let mut resolver = ReleaseResolver::new(Box::new(adapter));

        resolver.resolve("mod", "v1.0.0").await.unwrap();
        resolver.resolve("mod", "v1.0.0").await.unwrap();
        resolver.resolve("mod", "v1.1.0").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_cached() {
        let (adapter, calls) = FakeAdapter::new(LookupMode::Bulk);
        let mut resolver = ReleaseResolver::new(Box::new(adapter));

        let first = resolver.resolve("ghost", "1.0.0").await.unwrap_err();
        let second = resolver.resolve("ghost", "2.0.0").await.unwrap_err();
        assert!(matches!(first, RegistryError::PackageNotFound { .. }));
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let adapter = FlakyAdapter {
            times: ReleaseTimes::from([
                ("1.1.0".to_string(), date(3)),
                ("1.2.0".to_string(), date(6)),
            ]),
            calls: Arc::clone(&calls),
        };
        let mut resolver = ReleaseResolver::new(Box::new(adapter));

        let err = resolver.resolve("x", "1.1.0").await.unwrap_err();
        assert!(matches!(err, RegistryError::NetworkError { .. }));
        assert!(resolver.cache().is_empty());

        assert_eq!(resolver.resolve("x", "1.2.0").await.unwrap(), date(6));
        assert_eq!(resolver.resolve("x", "1.1.0").await.unwrap(), date(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_prefetch_drops_transient_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let adapter = FlakyAdapter {
            times: ReleaseTimes::from([("1.1.0".to_string(), date(3))]),
            calls: Arc::clone(&calls),
        };
        let mut resolver = ReleaseResolver::new(Box::new(adapter));

        resolver.prefetch(&pairs(&[("x", "1.1.0")])).await;
        assert!(resolver.cache().needs_fetch("x", "1.1.0"));
        assert_eq!(resolver.resolve("x", "1.1.0").await.unwrap(), date(3));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_per_version_missing_version_is_cached() {
        let (adapter, calls) = FakeAdapter::new(LookupMode::PerVersion);
        let adapter = adapter.with("mod", "v1.0.0", 1);
        let mut resolver = ReleaseResolver::new(Box::new(adapter));

        let err = resolver.resolve("mod", "v2.0.0").await.unwrap_err();
        assert!(matches!(err, RegistryError::VersionNotFound { .. }));
        resolver.resolve("mod", "v2.0.0").await.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_canonical_fallback() {
        let (adapter, _) = FakeAdapter::new(LookupMode::Bulk);
        let adapter = adapter.with("flask", "3.0.0", 7);
        let mut resolver = ReleaseResolver::new(Box::new(adapter));

        assert_eq!(resolver.resolve("flask", "3.0").await.unwrap(), date(7));
    }

    #[tokio::test]
    async fn test_prefetch_then_resolve_hits_cache() {
        let (adapter, calls) = FakeAdapter::new(LookupMode::Bulk);
        let adapter = adapter.with("a", "1.0.0", 1).with("b", "2.0.0", 2);
        let mut resolver = ReleaseResolver::new(Box::new(adapter)).with_concurrency(2);

        resolver
            .prefetch(&pairs(&[("a", "1.0.0"), ("b", "2.0.0"), ("a", "1.0.1"), ("c", "1.0.0")]))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(resolver.cache().len(), 3);

        assert_eq!(resolver.resolve("a", "1.0.0").await.unwrap(), date(1));
        assert_eq!(resolver.resolve("b", "2.0.0").await.unwrap(), date(2));
        assert!(resolver.resolve("c", "1.0.0").await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_prefetch_skips_cached_entries() {
        let (adapter, calls) = FakeAdapter::new(LookupMode::PerVersion);
        let adapter = adapter.with("mod", "v1.0.0", 1);
        let mut resolver = ReleaseResolver::new(Box::new(adapter));

        resolver.resolve("mod", "v1.0.0").await.unwrap();
        resolver.prefetch(&pairs(&[("mod", "v1.0.0")])).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cache_lookup_unknown_package() {
        let cache = ReleaseCache::new("npm", LookupMode::Bulk);
        assert!(cache.lookup("lodash", "1.0.0").is_none());
        assert!(cache.needs_fetch("lodash", "1.0.0"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_bulk_record_answers_every_version() {
        let mut cache = ReleaseCache::new("npm", LookupMode::Bulk);
        cache.record(
            "lodash",
            "1.0.0",
            Ok(ReleaseTimes::from([("1.0.0".to_string(), date(3))])),
        );
        assert_eq!(cache.lookup("lodash", "1.0.0"), Some(Ok(date(3))));
        assert!(matches!(
            cache.lookup("lodash", "2.0.0"),
            Some(Err(RegistryError::VersionNotFound { .. }))
        ));
    }
}
