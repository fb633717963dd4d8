//! Registry adapters for resolving release timestamps
//!
//! This module provides:
//! - HTTP client shared foundation with retry logic
//! - npm Registry adapter
//! - PyPI JSON API adapter
//! - Go Module Proxy adapter
//! - A run-scoped release cache and the resolver that drives it

mod client;
mod go_proxy;
mod npm;
mod pypi;
mod resolver;

pub use client::HttpClient;
pub use go_proxy::{GoProxyAdapter, GO_PROXY_URL};
pub use npm::{NpmAdapter, NPM_REGISTRY_URL};
pub use pypi::{PyPIAdapter, PYPI_URL};
pub use resolver::{ReleaseCache, ReleaseResolver, DEFAULT_CONCURRENCY};

use crate::config::RegistryConfig;
use crate::domain::Ecosystem;
use crate::error::RegistryError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Publication time per version string, as reported by a registry
pub type ReleaseTimes = HashMap<String, DateTime<Utc>>;

/// How much a single registry request returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupMode {
    /// One request returns the release times of every version of a package
    Bulk,
    /// One request returns the release time of a single version
    PerVersion,
}

/// Trait for registry adapters
#[async_trait]
pub trait RegistryAdapter: Send + Sync {
    /// Get the ecosystem this adapter handles
    fn ecosystem(&self) -> Ecosystem;

    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Whether a fetch covers the whole package or one version
    fn lookup_mode(&self) -> LookupMode;

    /// Fetch release times for a package
    ///
    /// Bulk adapters ignore `version` and return every known version;
    /// per-version adapters return at most the requested one.
    async fn fetch_release_times(
        &self,
        package: &str,
        version: &str,
    ) -> Result<ReleaseTimes, RegistryError>;
}

/// Create a registry adapter for the given ecosystem
pub fn create_adapter(
    ecosystem: Ecosystem,
    client: HttpClient,
    config: &RegistryConfig,
) -> Box<dyn RegistryAdapter> {
    match ecosystem {
        Ecosystem::Npm => Box::new(NpmAdapter::with_base_url(
            client.with_bearer_token(config.npm_token.clone()),
            &config.npm_url,
        )),
        Ecosystem::Go => Box::new(GoProxyAdapter::with_base_url(client, &config.go_proxy_url)),
        Ecosystem::Python => Box::new(PyPIAdapter::with_base_url(client, &config.pypi_url)),
    }
}
