//! requirements.txt extractor for Python projects
//!
//! Only exact pins (`name==version`) are read from requirements.txt. The
//! `install_requires` list of setup.cfg is handled by `setup_cfg` and wins on
//! name collisions because it is read after requirements.txt.

use crate::domain::{DependencySnapshot, Ecosystem};
use crate::manifest::setup_cfg;
use crate::manifest::{ManifestFile, SnapshotExtractor};
use regex::Regex;
use std::sync::LazyLock;

/// Extractor for requirements.txt and setup.cfg
pub struct RequirementsExtractor;

static PINNED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_.\-]+)==([0-9A-Za-z.+\-]+)$").unwrap());

impl SnapshotExtractor for RequirementsExtractor {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Python
    }

    fn parse_file(&self, file: &ManifestFile) -> DependencySnapshot {
        match file.file_name() {
            "setup.cfg" => setup_cfg::parse_install_requires(&file.content),
            _ => parse_pinned(&file.content),
        }
    }
}

/// Parses exact `name==version` pins, lower-casing names
pub fn parse_pinned(content: &str) -> DependencySnapshot {
    let mut snapshot = DependencySnapshot::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some(caps) = PINNED_RE.captures(trimmed) {
            snapshot.insert(caps[1].to_lowercase(), &caps[2]);
        }
    }

    snapshot
}
