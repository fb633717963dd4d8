//! Upgrade events and the lag samples derived from them

use super::commit::short_hash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason why a changed dependency produced no event at a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Old or new value is not a semantic version
    InvalidVersion,
    /// New value is equal to or lower than the baseline
    NotAnUpgrade,
    /// The registry has no release date for the new version
    ReleaseNotFound(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidVersion => write!(f, "not a semantic version"),
            SkipReason::NotAnUpgrade => write!(f, "not an upgrade"),
            SkipReason::ReleaseNotFound(msg) => write!(f, "release date unknown: {}", msg),
        }
    }
}

/// A semantically valid upgrade of one dependency at one commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEvent {
    /// Dependency name
    pub dependency: String,
    /// Baseline version before the commit
    pub old_version: String,
    /// Version adopted by the commit
    pub new_version: String,
    /// Full hash of the commit
    pub commit_hash: String,
    /// Author time of the commit
    pub committed_at: DateTime<Utc>,
}

impl UpdateEvent {
    /// Creates a new update event
    pub fn new(
        dependency: impl Into<String>,
        old_version: impl Into<String>,
        new_version: impl Into<String>,
        commit_hash: impl Into<String>,
        committed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            dependency: dependency.into(),
            old_version: old_version.into(),
            new_version: new_version.into(),
            commit_hash: commit_hash.into(),
            committed_at,
        }
    }

    /// Returns the abbreviated commit hash
    pub fn short_hash(&self) -> &str {
        short_hash(&self.commit_hash)
    }
}

impl fmt::Display for UpdateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  {:<38}  {} → {}",
            self.committed_at.format("%Y-%m-%d"),
            self.short_hash(),
            self.dependency,
            self.old_version,
            self.new_version
        )
    }
}

/// An accepted upgrade together with its adoption lag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagSample {
    /// The upgrade
    pub event: UpdateEvent,
    /// Days between the release of the new version and the commit
    pub lag_days: f64,
}

impl LagSample {
    pub fn new(event: UpdateEvent, lag_days: f64) -> Self {
        Self { event, lag_days }
    }
}

/// An accepted upgrade whose lag was negative or implausibly large
///
/// It advances the baseline and consumes the change budget but is excluded
/// from the statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscardedUpdate {
    /// The upgrade
    pub event: UpdateEvent,
    /// The lag that failed the plausibility filter
    pub lag_days: f64,
}

impl DiscardedUpdate {
    pub fn new(event: UpdateEvent, lag_days: f64) -> Self {
        Self { event, lag_days }
    }
}
