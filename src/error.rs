//! Application error types using thiserror
//!
//! Error hierarchy:
//! - RepositoryError: Issues opening or reading the git history (fatal)
//! - RegistryError: Issues with package registry communication (per dependency)
//! - ConfigError: Issues with CLI configuration (fatal)

use std::path::PathBuf;
use thiserror::Error;

/// Errors related to reading the repository history
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Path is not inside a git work tree
    #[error("not a git repository: {path}")]
    NotARepository { path: PathBuf },

    /// A git command exited unsuccessfully
    #[error("git {command} failed: {message}")]
    GitFailed { command: String, message: String },

    /// The git executable could not be started
    #[error("failed to run git: {source}")]
    Spawn {
        #[source]
        source: std::io::Error,
    },

    /// git log produced a line that is not `<hash> <timestamp>`
    #[error("unexpected git log output: {line}")]
    InvalidLogLine { line: String },
}

/// Errors related to package registry communication
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Package not found in registry
    #[error("package '{package}' not found in {registry} registry")]
    PackageNotFound { package: String, registry: String },

    /// Package exists but the requested version has no release record
    #[error("no release date for {package}@{version} in {registry} registry")]
    VersionNotFound {
        package: String,
        version: String,
        registry: String,
    },

    /// Network request failed
    #[error("failed to fetch package '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry} registry")]
    RateLimitExceeded { registry: String },

    /// Invalid response from registry
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// None of --commits, --changes, --days was given
    #[error("exactly one of --commits, --changes or --days must be set")]
    NoStoppingRule,

    /// More than one stopping rule was given
    #[error("conflicting options: only one of --commits, --changes or --days may be set (got {given})")]
    MultipleStoppingRules { given: String },

    /// A stopping rule was given a zero value
    #[error("{option} must be a positive number")]
    NonPositive { option: String },

    /// Unknown ecosystem selector
    #[error("unknown ecosystem '{value}': expected 'npm', 'go' or 'python'")]
    UnknownEcosystem { value: String },

    /// A numeric option is too large to turn into a date
    #[error("{option} is out of range")]
    OutOfRange { option: String },

    /// Date option could not be parsed
    #[error("invalid date '{value}': expected YYYY-MM-DD or RFC 3339")]
    InvalidDate { value: String },
}

impl RepositoryError {
    /// Creates a new NotARepository error
    pub fn not_a_repository(path: impl Into<PathBuf>) -> Self {
        RepositoryError::NotARepository { path: path.into() }
    }

    /// Creates a new GitFailed error
    pub fn git_failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        RepositoryError::GitFailed {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl RegistryError {
    /// Whether a repeated request would get the same answer
    ///
    /// Network failures, timeouts, rate limits and malformed responses may
    /// clear up on a later attempt.
    pub fn is_definitive(&self) -> bool {
        matches!(
            self,
            RegistryError::PackageNotFound { .. } | RegistryError::VersionNotFound { .. }
        )
    }

    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new VersionNotFound error
    pub fn version_not_found(
        package: impl Into<String>,
        version: impl Into<String>,
        registry: impl Into<String>,
    ) -> Self {
        RegistryError::VersionNotFound {
            package: package.into(),
            version: version.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new RateLimitExceeded error
    pub fn rate_limit_exceeded(registry: impl Into<String>) -> Self {
        RegistryError::RateLimitExceeded {
            registry: registry.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_a_repository() {
        let err = RepositoryError::not_a_repository("/tmp/nowhere");
        let msg = format!("{}", err);
        assert!(msg.contains("not a git repository"));
        assert!(msg.contains("/tmp/nowhere"));
    }

    #[test]
    fn test_repository_error_git_failed() {
        let err = RepositoryError::git_failed("log", "bad revision");
        let msg = format!("{}", err);
        assert!(msg.contains("git log failed"));
        assert!(msg.contains("bad revision"));
    }

    #[test]
    fn test_registry_error_package_not_found() {
        let err = RegistryError::package_not_found("nonexistent-package", "npm");
        let msg = format!("{}", err);
        assert!(msg.contains("package 'nonexistent-package' not found"));
        assert!(msg.contains("npm"));
    }

    #[test]
    fn test_registry_error_version_not_found() {
        let err = RegistryError::version_not_found("requests", "9.9.9", "PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("requests@9.9.9"));
        assert!(msg.contains("PyPI"));
    }

    #[test]
    fn test_registry_error_network() {
        let err = RegistryError::network_error("lodash", "npm", "connection refused");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to fetch"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_registry_error_rate_limit() {
        let err = RegistryError::rate_limit_exceeded("PyPI");
        let msg = format!("{}", err);
        assert!(msg.contains("rate limit exceeded"));
        assert!(msg.contains("PyPI"));
    }

    #[test]
    fn test_registry_error_timeout() {
        let err = RegistryError::timeout("golang.org/x/text", "Go Proxy");
        let msg = format!("{}", err);
        assert!(msg.contains("timeout"));
        assert!(msg.contains("golang.org/x/text"));
    }

    #[test]
    fn test_config_error_messages() {
        assert!(ConfigError::NoStoppingRule
            .to_string()
            .contains("exactly one of --commits, --changes or --days"));

        let err = ConfigError::MultipleStoppingRules {
            given: "--commits, --days".to_string(),
        };
        assert!(err.to_string().contains("conflicting options"));

        let err = ConfigError::NonPositive {
            option: "--changes".to_string(),
        };
        assert_eq!(err.to_string(), "--changes must be a positive number");

        let err = ConfigError::UnknownEcosystem {
            value: "maven".to_string(),
        };
        assert!(err.to_string().contains("maven"));
    }

    #[test]
    fn test_registry_error_is_definitive() {
        assert!(RegistryError::package_not_found("pkg", "npm").is_definitive());
        assert!(RegistryError::version_not_found("pkg", "1.0.0", "npm").is_definitive());
        assert!(!RegistryError::network_error("pkg", "npm", "reset").is_definitive());
        assert!(!RegistryError::timeout("pkg", "npm").is_definitive());
        assert!(!RegistryError::rate_limit_exceeded("npm").is_definitive());
    }

    #[test]
    fn test_error_debug_trait() {
        let err = RepositoryError::not_a_repository("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotARepository"));
    }
}
