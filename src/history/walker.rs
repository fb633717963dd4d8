//! Bounded enumeration of manifest-touching commits

use crate::domain::Commit;
use crate::error::RepositoryError;
use crate::history::CommitSource;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Which end of the history a commit-count cap keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapEnd {
    /// Keep the most recent commits
    #[default]
    Newest,
    /// Keep the earliest commits
    Oldest,
}

/// Time and count bounds applied to the walked history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkBounds {
    /// Earliest author time, inclusive
    pub since: Option<DateTime<Utc>>,
    /// Latest author time, inclusive
    pub until: Option<DateTime<Utc>>,
    /// Maximum number of commits to visit
    pub max_commits: Option<usize>,
    /// End of the history kept by `max_commits`
    pub cap_end: CapEnd,
}

/// Enumerates the commits an analysis visits
#[derive(Debug, Clone, Default)]
pub struct HistoryWalker {
    bounds: WalkBounds,
}

impl HistoryWalker {
    /// Creates a walker with the given bounds
    pub fn new(bounds: WalkBounds) -> Self {
        Self { bounds }
    }

    /// Lists the commits touching `paths`, oldest first, within bounds
    pub fn enumerate(
        &self,
        source: &dyn CommitSource,
        paths: &[&str],
    ) -> Result<Vec<Commit>, RepositoryError> {
        let all = source.log(paths)?;
        let total = all.len();

        let mut commits: Vec<Commit> = all
            .into_iter()
            .filter(|commit| self.in_window(commit))
            .collect();

        if let Some(max) = self.bounds.max_commits {
            if commits.len() > max {
                match self.bounds.cap_end {
                    CapEnd::Newest => {
                        commits.drain(..commits.len() - max);
                    }
                    CapEnd::Oldest => commits.truncate(max),
                }
            }
        }

        debug!(
            "{} of {} manifest commits selected for {}",
            commits.len(),
            total,
            paths.join(", ")
        );
        Ok(commits)
    }

    fn in_window(&self, commit: &Commit) -> bool {
        let after_since = self
            .bounds
            .since
            .is_none_or(|since| commit.authored_at >= since);
        let before_until = self
            .bounds
            .until
            .is_none_or(|until| commit.authored_at <= until);
        after_since && before_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::MemoryHistory;
    use chrono::TimeZone;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
    }

    fn history() -> MemoryHistory {
        (1..=5).fold(MemoryHistory::new(), |h, d| {
            h.commit(&format!("c{}", d), day(d), &[("go.mod", d.to_string().as_str())])
        })
    }

    fn hashes(commits: Vec<Commit>) -> Vec<String> {
        commits.into_iter().map(|c| c.hash).collect()
    }

    #[test]
    fn test_unbounded_walk() {
        let walker = HistoryWalker::default();
        let commits = walker.enumerate(&history(), &["go.mod"]).unwrap();
        assert_eq!(hashes(commits), vec!["c1", "c2", "c3", "c4", "c5"]);
    }

    #[test]
    fn test_time_window_is_inclusive() {
        let walker = HistoryWalker::new(WalkBounds {
            since: Some(day(2)),
            until: Some(day(4)),
            ..Default::default()
        });
        let commits = walker.enumerate(&history(), &["go.mod"]).unwrap();
        assert_eq!(hashes(commits), vec!["c2", "c3", "c4"]);
    }

    #[test]
    fn test_cap_keeps_newest_in_chronological_order() {
        let walker = HistoryWalker::new(WalkBounds {
            max_commits: Some(2),
            ..Default::default()
        });
        let commits = walker.enumerate(&history(), &["go.mod"]).unwrap();
        assert_eq!(hashes(commits), vec!["c4", "c5"]);
    }

    #[test]
    fn test_cap_keeps_oldest() {
        let walker = HistoryWalker::new(WalkBounds {
            max_commits: Some(2),
            cap_end: CapEnd::Oldest,
            ..Default::default()
        });
        let commits = walker.enumerate(&history(), &["go.mod"]).unwrap();
        assert_eq!(hashes(commits), vec!["c1", "c2"]);
    }

    #[test]
    fn test_cap_larger_than_history() {
        let walker = HistoryWalker::new(WalkBounds {
            max_commits: Some(50),
            ..Default::default()
        });
        assert_eq!(walker.enumerate(&history(), &["go.mod"]).unwrap().len(), 5);
    }

    #[test]
    fn test_empty_history() {
        let walker = HistoryWalker::default();
        assert!(walker
            .enumerate(&MemoryHistory::new(), &["go.mod"])
            .unwrap()
            .is_empty());
    }
}
