//! Ecosystem type definitions for supported package registries

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported package ecosystems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ecosystem {
    /// npm (package.json)
    Npm,
    /// Go modules (go.mod)
    Go,
    /// Python (requirements.txt, setup.cfg)
    Python,
}

impl Ecosystem {
    /// Returns the manifest paths, relative to the repository root, that are
    /// read at every commit
    pub fn manifest_paths(&self) -> &'static [&'static str] {
        match self {
            Ecosystem::Npm => &["package.json"],
            Ecosystem::Go => &["go.mod"],
            Ecosystem::Python => &["requirements.txt", "setup.cfg"],
        }
    }

    /// Returns the display name for this ecosystem
    pub fn display_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Go => "Go",
            Ecosystem::Python => "Python",
        }
    }

    /// Returns the name of the registry release dates are resolved against
    pub fn registry_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Go => "Go Proxy",
            Ecosystem::Python => "PyPI",
        }
    }

    /// Returns all supported ecosystems
    pub fn all() -> &'static [Ecosystem] {
        &[Ecosystem::Npm, Ecosystem::Go, Ecosystem::Python]
    }
}

impl FromStr for Ecosystem {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" | "node" => Ok(Ecosystem::Npm),
            "go" | "golang" => Ok(Ecosystem::Go),
            "py" | "python" | "pypi" => Ok(Ecosystem::Python),
            _ => Err(ConfigError::UnknownEcosystem {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
