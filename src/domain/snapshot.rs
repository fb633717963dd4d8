//! Per-commit dependency snapshots

use std::collections::BTreeMap;

/// Dependencies declared by the manifests of one commit
///
/// Maps a dependency name (normalized the way its ecosystem expects) to the raw
/// version string found in the manifest. Entries iterate in ascending name
/// order, which keeps event order within a commit reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySnapshot {
    entries: BTreeMap<String, String>,
}

impl DependencySnapshot {
    /// Creates an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a dependency, replacing any earlier declaration of the same name
    pub fn insert(&mut self, name: impl Into<String>, version: impl Into<String>) {
        self.entries.insert(name.into(), version.into());
    }

    /// Merges another snapshot into this one; `other` wins on name collisions
    pub fn merge(&mut self, other: DependencySnapshot) {
        self.entries.extend(other.entries);
    }

    /// Returns the raw version declared for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Iterates over (name, raw version) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, version)| (name.as_str(), version.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for DependencySnapshot {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut snapshot = Self::new();
        for (name, version) in iter {
            snapshot.insert(name, version);
        }
        snapshot
    }
}
