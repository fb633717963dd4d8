//! npm Registry adapter
//!
//! Reads the `time` map of the package document, which carries the publish
//! time of every version.
//! API endpoint: https://registry.npmjs.org/{package}

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, LookupMode, RegistryAdapter, ReleaseTimes};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// npm registry base URL
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Keys of the `time` map that are not versions
const NON_VERSION_KEYS: &[&str] = &["created", "modified"];

/// npm Registry adapter
pub struct NpmAdapter {
    client: HttpClient,
    base_url: String,
}

/// npm package metadata response
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    /// Publish time keyed by version
    #[serde(default)]
    time: HashMap<String, String>,
}

impl NpmAdapter {
    /// Create a new npm adapter against the public registry
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, NPM_REGISTRY_URL)
    }

    /// Create a new npm adapter against a custom registry
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/{}", self.base_url, package)
    }
}

#[async_trait]
impl RegistryAdapter for NpmAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn registry_name(&self) -> &'static str {
        "npm"
    }

    fn lookup_mode(&self) -> LookupMode {
        LookupMode::Bulk
    }

    async fn fetch_release_times(
        &self,
        package: &str,
        _version: &str,
    ) -> Result<ReleaseTimes, RegistryError> {
        let url = self.build_url(package);
        let response: NpmPackageResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        let mut times = ReleaseTimes::new();
        for (version, time_str) in response.time {
            if NON_VERSION_KEYS.contains(&version.as_str()) {
                continue;
            }
            match time_str.parse::<DateTime<Utc>>() {
                Ok(published_at) => {
                    times.insert(version, published_at);
                }
                Err(e) => debug!("ignoring bad npm time for {}@{}: {}", package, version, e),
            }
        }

        Ok(times)
    }
}
