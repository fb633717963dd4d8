//! Commit history access
//!
//! This module provides:
//! - `CommitSource`: the read-only view of a repository the analysis needs
//! - `GitRepository`: a `CommitSource` backed by the `git` executable
//! - `MemoryHistory`: an in-memory `CommitSource` built commit by commit
//! - `HistoryWalker`: time-window and commit-count bounds over a source

mod git;
mod memory;
mod walker;

pub use git::GitRepository;
pub use memory::MemoryHistory;
pub use walker::{CapEnd, HistoryWalker, WalkBounds};

use crate::domain::Commit;
use crate::error::RepositoryError;

/// Read-only access to a commit history
pub trait CommitSource: Send + Sync {
    /// Lists first-parent commits that touched at least one of `paths`,
    /// oldest first
    fn log(&self, paths: &[&str]) -> Result<Vec<Commit>, RepositoryError>;

    /// Reads a file at a commit; `None` when the file does not exist there
    fn read_file(&self, hash: &str, path: &str) -> Result<Option<String>, RepositoryError>;
}
