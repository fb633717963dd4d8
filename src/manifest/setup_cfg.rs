//! setup.cfg `install_requires` parser
//!
//! The key line may carry inline comma-separated entries and may be followed
//! by an indented block of entries. The block ends at a blank line, a
//! non-indented line or a `[section]` header.

use crate::domain::DependencySnapshot;
use regex::Regex;
use std::sync::LazyLock;

static KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^install_requires\s*=\s*(.*)$").unwrap());

// Requirement name followed by an optional constraint starting with an operator
static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^#;\s][^><=!~\s]*)\s*([><=!~].+)?$").unwrap());

/// Characters trimmed from the front of a constraint
const OPERATOR_CHARS: &[char] = &['=', '<', '>', '!', '~', ' '];

/// Parses the `install_requires` entries of a setup.cfg document
pub fn parse_install_requires(content: &str) -> DependencySnapshot {
    let mut snapshot = DependencySnapshot::new();
    let mut in_block = false;

    for raw in content.lines() {
        let line = raw.trim_end_matches(['\r', '\t', ' ']);

        if line.starts_with('[') {
            in_block = false;
        }

        if let Some(caps) = KEY_RE.captures(line) {
            in_block = true;
            let inline = caps[1].trim();
            if !inline.is_empty() {
                for entry in inline.split(',') {
                    insert_entry(&mut snapshot, entry.trim());
                }
            }
            continue;
        }

        if !in_block {
            continue;
        }

        if line.trim().is_empty() {
            in_block = false;
            continue;
        }

        if raw.starts_with([' ', '\t']) {
            insert_entry(&mut snapshot, line.trim());
        } else {
            in_block = false;
        }
    }

    snapshot
}

fn insert_entry(snapshot: &mut DependencySnapshot, entry: &str) {
    if entry.is_empty() || entry.starts_with('#') {
        return;
    }
    let Some(caps) = ENTRY_RE.captures(entry) else {
        return;
    };

    // Drop extras such as `requests[socks]`
    let name = caps[1].split('[').next().unwrap_or_default().to_lowercase();
    if name.is_empty() {
        return;
    }

    let version = caps
        .get(2)
        .map(|constraint| first_clause(constraint.as_str()))
        .unwrap_or_default();
    snapshot.insert(name, version);
}

/// Keeps the version of the first clause of a constraint (`>=1.2,<2` → `1.2`)
fn first_clause(constraint: &str) -> String {
    let clause = constraint
        .split([',', ';'])
        .next()
        .unwrap_or_default();
    clause.trim_start_matches(OPERATOR_CHARS).trim().to_string()
}
