//! package.json extractor for npm projects
//!
//! Reads the `dependencies` object. Range operators in front of the declared
//! version are stripped (`^1.2.3` → `1.2.3`); anything that is still not a bare
//! version afterwards is kept as-is and rejected later by the canonicalizer.

use crate::domain::{DependencySnapshot, Ecosystem};
use crate::manifest::{ManifestFile, SnapshotExtractor};
use serde_json::Value;
use tracing::debug;

/// Characters stripped from the front of a declared npm version
const RANGE_PREFIX_CHARS: &[char] = &['^', '~', '>', '<', '=', ' ', '\t'];

/// Extractor for package.json files
pub struct PackageJsonExtractor;

impl SnapshotExtractor for PackageJsonExtractor {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Npm
    }

    fn parse_file(&self, file: &ManifestFile) -> DependencySnapshot {
        parse_dependencies(&file.content)
    }
}

/// Parses the `dependencies` section of a package.json document
pub fn parse_dependencies(content: &str) -> DependencySnapshot {
    let mut snapshot = DependencySnapshot::new();

    let json: Value = match serde_json::from_str(content) {
        Ok(json) => json,
        Err(e) => {
            debug!("skipping unparseable package.json: {}", e);
            return snapshot;
        }
    };

    if let Some(deps) = json.get("dependencies").and_then(|v| v.as_object()) {
        for (name, value) in deps {
            if let Some(declared) = value.as_str() {
                snapshot.insert(name.clone(), strip_range_operators(declared));
            }
        }
    }

    snapshot
}

/// Strips leading range operators and surrounding whitespace
fn strip_range_operators(declared: &str) -> String {
    declared
        .trim_start_matches(RANGE_PREFIX_CHARS)
        .trim()
        .to_string()
}
