//! In-memory commit source
//!
//! Each commit records the full contents of the files it carries. A commit
//! "touches" a path when that path's contents differ from the previous commit.

use crate::domain::Commit;
use crate::error::RepositoryError;
use crate::history::CommitSource;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A linear history held in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryHistory {
    commits: Vec<(Commit, HashMap<String, String>)>,
}

impl MemoryHistory {
    /// Creates an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a commit holding `files` as `(path, contents)` pairs
    pub fn commit(mut self, hash: &str, authored_at: DateTime<Utc>, files: &[(&str, &str)]) -> Self {
        let files = files
            .iter()
            .map(|(path, content)| (path.to_string(), content.to_string()))
            .collect();
        self.commits.push((Commit::new(hash, authored_at), files));
        self
    }

    /// Number of commits in the history
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Whether the history has no commits
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

impl CommitSource for MemoryHistory {
    fn log(&self, paths: &[&str]) -> Result<Vec<Commit>, RepositoryError> {
        let mut previous: Option<&HashMap<String, String>> = None;
        let mut touched = Vec::new();

        for (commit, files) in &self.commits {
            let changed = paths.iter().any(|path| {
                let before = previous.and_then(|prev| prev.get(*path));
                before != files.get(*path)
            });
            if changed {
                touched.push(commit.clone());
            }
            previous = Some(files);
        }

        Ok(touched)
    }

    fn read_file(&self, hash: &str, path: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self
            .commits
            .iter()
            .find(|(commit, _)| commit.hash == hash)
            .and_then(|(_, files)| files.get(path).cloned()))
    }
}
