//! PyPI JSON API adapter
//!
//! A release's publication time is the earliest upload time among its files.
//! API endpoint: https://pypi.org/pypi/{package}/json

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, LookupMode, RegistryAdapter, ReleaseTimes};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// PyPI base URL
pub const PYPI_URL: &str = "https://pypi.org";

/// PyPI adapter
pub struct PyPIAdapter {
    client: HttpClient,
    base_url: String,
}

/// PyPI package metadata response
#[derive(Debug, Deserialize)]
struct PyPIResponse {
    /// Release files keyed by version
    #[serde(default)]
    releases: HashMap<String, Vec<ReleaseFile>>,
}

/// Release file information
#[derive(Debug, Deserialize)]
struct ReleaseFile {
    upload_time_iso_8601: Option<String>,
}

impl PyPIAdapter {
    /// Create a new PyPI adapter against pypi.org
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, PYPI_URL)
    }

    /// Create a new PyPI adapter against a mirror
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for a package
    fn build_url(&self, package: &str) -> String {
        format!("{}/pypi/{}/json", self.base_url, package)
    }
}

/// Earliest parseable upload time of a release, if any
fn earliest_upload(files: &[ReleaseFile]) -> Option<DateTime<Utc>> {
    files
        .iter()
        .filter_map(|file| file.upload_time_iso_8601.as_deref())
        .filter_map(|time| time.parse::<DateTime<Utc>>().ok())
        .min()
}

#[async_trait]
impl RegistryAdapter for PyPIAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn registry_name(&self) -> &'static str {
        "PyPI"
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
        let response: PyPIResponse = self
            .client
            .get_json(&url, package, self.registry_name())
            .await?;

        Ok(response
            .releases
            .into_iter()
            .filter_map(|(version, files)| {
                earliest_upload(&files).map(|uploaded_at| (version, uploaded_at))
            })
            .collect())
    }
}
