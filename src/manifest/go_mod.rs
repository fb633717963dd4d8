//! go.mod extractor for Go modules
//!
//! Handles:
//! - single-line `require module/path v1.2.3`
//! - `require ( ... )` blocks
//! - trailing comments such as `// indirect`
//! - replace and exclude directives (ignored)

use crate::domain::{DependencySnapshot, Ecosystem};
use crate::manifest::{ManifestFile, SnapshotExtractor};
use regex::Regex;
use std::sync::LazyLock;

/// Extractor for go.mod files
pub struct GoModExtractor;

// Module path followed by a v-prefixed version token
static REQUIRE_ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w./\-~+]+)\s+(v\S+)").unwrap());

/// Which directive block the parser is currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Require,
    Other,
}

impl SnapshotExtractor for GoModExtractor {
    fn ecosystem(&self) -> Ecosystem {
        Ecosystem::Go
    }

    fn parse_file(&self, file: &ManifestFile) -> DependencySnapshot {
        parse_requirements(&file.content)
    }
}

/// Parses the require directives of a go.mod document
pub fn parse_requirements(content: &str) -> DependencySnapshot {
    let mut snapshot = DependencySnapshot::new();
    let mut block = Block::None;

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        if block != Block::None {
            if trimmed.starts_with(')') {
                block = Block::None;
            } else if block == Block::Require {
                insert_entry(&mut snapshot, trimmed);
            }
            continue;
        }

        let Some((directive, rest)) = split_directive(trimmed) else {
            continue;
        };
        let rest = rest.trim();

        if rest.starts_with('(') {
            block = if directive == "require" {
                Block::Require
            } else {
                Block::Other
            };
            continue;
        }

        if directive == "require" {
            insert_entry(&mut snapshot, rest);
        }
    }

    snapshot
}

/// Splits `require foo v1` into (`require`, `foo v1`)
fn split_directive(line: &str) -> Option<(&str, &str)> {
    let end = line
        .find(|c: char| c.is_whitespace() || c == '(')
        .unwrap_or(line.len());
    let (directive, rest) = line.split_at(end);
    match directive {
        "require" | "replace" | "exclude" | "retract" | "tool" | "godebug" => {
            Some((directive, rest))
        }
        _ => None,
    }
}

fn insert_entry(snapshot: &mut DependencySnapshot, entry: &str) {
    if let Some(caps) = REQUIRE_ENTRY_RE.captures(entry) {
        let module = &caps[1];
        let version = &caps[2];
        snapshot.insert(module, version);
    }
}
