//! Go Module Proxy adapter
//!
//! The proxy has no endpoint listing every version with its timestamp, so
//! release times are looked up one version at a time.
//! API endpoint: https://proxy.golang.org/{module}/@v/{version}.info

use crate::domain::Ecosystem;
use crate::error::RegistryError;
use crate::registry::{HttpClient, LookupMode, RegistryAdapter, ReleaseTimes};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Go Module Proxy base URL
pub const GO_PROXY_URL: &str = "https://proxy.golang.org";

/// Go Module Proxy adapter
pub struct GoProxyAdapter {
    client: HttpClient,
    base_url: String,
}

/// Version info response
#[derive(Debug, Deserialize)]
struct VersionInfoResponse {
    #[serde(rename = "Time")]
    time: String,
}

impl GoProxyAdapter {
    /// Create a new Go Proxy adapter against proxy.golang.org
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, GO_PROXY_URL)
    }

    /// Create a new Go Proxy adapter against a custom GOPROXY
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for version info
    fn build_info_url(&self, module: &str, version: &str) -> String {
        format!(
            "{}/{}/@v/{}.info",
            self.base_url,
            Self::escape_path(module),
            Self::escape_path(version)
        )
    }

    /// Escape a module path or version for the proxy protocol
    ///
    /// Upper-case letters become `!` followed by the lower-case letter.
    fn escape_path(path: &str) -> String {
        let mut escaped = String::with_capacity(path.len());
        for ch in path.chars() {
            if ch.is_ascii_uppercase() {
                escaped.push('!');
                escaped.push(ch.to_ascii_lowercase());
            } else {
                escaped.push(ch);
            }
        }
        escaped
    }
}

#[async_trait]
impl RegistryAdapter for GoProxyAdapter {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Go
    }

    fn registry_name(&self) -> &'static str {
        "Go Proxy"
    }

    fn lookup_mode(&self) -> LookupMode {
        LookupMode::PerVersion
    }

    async fn fetch_release_times(
        &self,
        module: &str,
        version: &str,
    ) -> Result<ReleaseTimes, RegistryError> {
        let url = self.build_info_url(module, version);
        let info: VersionInfoResponse = self
            .client
            .get_json(&url, module, self.registry_name())
            .await
            .map_err(|e| match e {
                RegistryError::PackageNotFound { .. } => {
                    RegistryError::version_not_found(module, version, self.registry_name())
                }
                other => other,
            })?;

        let published_at =
            info.time
                .parse::<DateTime<Utc>>()
                .map_err(|e| RegistryError::InvalidResponse {
                    package: module.to_string(),
                    registry: self.registry_name().to_string(),
                    message: format!("invalid Time '{}': {}", info.time, e),
                })?;

        Ok(ReleaseTimes::from([(version.to_string(), published_at)]))
    }
}
