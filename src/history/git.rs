//! `git` executable backed commit source

use crate::domain::Commit;
use crate::error::RepositoryError;
use crate::history::CommitSource;
use chrono::DateTime;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// A local git work tree
#[derive(Debug, Clone)]
pub struct GitRepository {
    root: PathBuf,
}

impl GitRepository {
    /// Opens the work tree containing `path`
    ///
    /// Fails with `NotARepository` when `path` is not inside a git work tree
    /// and with `Spawn` when git itself cannot be run.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(RepositoryError::not_a_repository(path));
        }

        let output = run_git(path, &["rev-parse", "--show-toplevel"])?;
        if !output.status.success() {
            return Err(RepositoryError::not_a_repository(path));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("opened git repository at {}", root);
        Ok(Self {
            root: PathBuf::from(root),
        })
    }
}

impl CommitSource for GitRepository {
    fn log(&self, paths: &[&str]) -> Result<Vec<Commit>, RepositoryError> {
        let mut args = vec!["log", "--first-parent", "--reverse", "--format=%H %at", "--"];
        args.extend_from_slice(paths);

        let output = run_git(&self.root, &args)?;
        if !output.status.success() {
            return Err(RepositoryError::git_failed(
                "log",
                String::from_utf8_lossy(&output.stderr).trim(),
            ));
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_log_line)
            .collect()
    }

    fn read_file(&self, hash: &str, path: &str) -> Result<Option<String>, RepositoryError> {
        let object = format!("{}:{}", hash, path);
        let output = run_git(&self.root, &["show", &object])?;
        if !output.status.success() {
            debug!(
                "{} not present at {}: {}",
                path,
                hash,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<Output, RepositoryError> {
    Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|source| RepositoryError::Spawn { source })
}

/// Parses one `<hash> <unix seconds>` line of `git log`
fn parse_log_line(line: &str) -> Result<Commit, RepositoryError> {
    let invalid = || RepositoryError::InvalidLogLine {
        line: line.to_string(),
    };

    let (hash, timestamp) = line.trim().split_once(' ').ok_or_else(invalid)?;
    let seconds: i64 = timestamp.trim().parse().map_err(|_| invalid())?;
    let authored_at = DateTime::from_timestamp(seconds, 0).ok_or_else(invalid)?;

    Ok(Commit::new(hash, authored_at))
}
