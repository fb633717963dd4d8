//! Commit references produced by the history walker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the abbreviated commit hash used in reports
const SHORT_HASH_LEN: usize = 7;

/// A commit on the walked history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full commit hash
    pub hash: String,
    /// Author timestamp
    pub authored_at: DateTime<Utc>,
}

impl Commit {
    /// Creates a new commit reference
    pub fn new(hash: impl Into<String>, authored_at: DateTime<Utc>) -> Self {
        Self {
            hash: hash.into(),
            authored_at,
        }
    }

    /// Returns the abbreviated hash
    pub fn short_hash(&self) -> &str {
        short_hash(&self.hash)
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.short_hash(),
            self.authored_at.format("%Y-%m-%d")
        )
    }
}

/// Abbreviates a commit hash, leaving short inputs untouched
pub fn short_hash(hash: &str) -> &str {
    hash.get(..SHORT_HASH_LEN).unwrap_or(hash)
}
