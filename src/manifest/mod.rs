//! Manifest snapshot extraction
//!
//! This module turns the manifest files of one commit into a
//! `DependencySnapshot`:
//! - package.json (npm)
//! - go.mod (Go modules)
//! - requirements.txt and setup.cfg (Python)
//!
//! Parsing is best-effort text processing. Malformed or unusual syntax is
//! skipped line by line and never turned into an error; a manifest that cannot
//! be read at all simply contributes no dependencies.

mod go_mod;
mod package_json;
mod requirements;
mod setup_cfg;

pub use go_mod::GoModExtractor;
pub use package_json::PackageJsonExtractor;
pub use requirements::RequirementsExtractor;

use crate::domain::{DependencySnapshot, Ecosystem};

/// Contents of one manifest file at one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFile {
    /// Path relative to the repository root
    pub path: String,
    /// File contents
    pub content: String,
}

impl ManifestFile {
    /// Creates a new manifest file
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Returns the final path component
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Trait for turning manifest files into dependency snapshots
pub trait SnapshotExtractor: Send + Sync {
    /// Returns the ecosystem this extractor handles
    fn ecosystem(&self) -> Ecosystem;

    /// Parses a single manifest file
    fn parse_file(&self, file: &ManifestFile) -> DependencySnapshot;

    /// Parses all manifest files of a commit; later files override earlier
    /// ones on name collisions
    fn extract(&self, files: &[ManifestFile]) -> DependencySnapshot {
        let mut snapshot = DependencySnapshot::new();
        for file in files {
            snapshot.merge(self.parse_file(file));
        }
        snapshot
    }
}

/// Get a snapshot extractor for the specified ecosystem
pub fn get_extractor(ecosystem: Ecosystem) -> Box<dyn SnapshotExtractor> {
    match ecosystem {
        Ecosystem::Npm => Box::new(PackageJsonExtractor),
        Ecosystem::Go => Box::new(GoModExtractor),
        Ecosystem::Python => Box::new(RequirementsExtractor),
    }
}
