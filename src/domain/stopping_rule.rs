//! Run termination conditions

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single condition that bounds one analysis run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "limit", rename_all = "snake_case")]
pub enum StoppingRule {
    /// Walk at most this many manifest-touching commits
    MaxCommits(usize),
    /// Halt as soon as this many upgrades were accepted
    MaxChanges(usize),
    /// Only walk commits authored within this many days before now
    LookbackDays(u32),
}

impl StoppingRule {
    /// Returns the commit cap, if this rule is a commit count
    pub fn commit_limit(&self) -> Option<usize> {
        match self {
            StoppingRule::MaxCommits(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the accepted-change cap, if this rule is a change count
    pub fn change_limit(&self) -> Option<usize> {
        match self {
            StoppingRule::MaxChanges(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the lookback window in days, if this rule is a window
    pub fn lookback_days(&self) -> Option<u32> {
        match self {
            StoppingRule::LookbackDays(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for StoppingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoppingRule::MaxCommits(n) => write!(f, "{} commits", n),
            StoppingRule::MaxChanges(n) => write!(f, "stop after {} changes", n),
            StoppingRule::LookbackDays(n) => write!(f, "last {} days", n),
        }
    }
}
