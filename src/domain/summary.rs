//! Analysis result summary types
//!
//! Collects everything one run of the lag engine produced.

use super::{DiscardedUpdate, Ecosystem, LagSample, SkipReason, StoppingRule};
use serde::{Deserialize, Serialize};

/// How often each skip reason was hit while walking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipCounts {
    /// Old or new value was not a semantic version
    pub invalid_version: usize,
    /// New value was not greater than the baseline
    pub not_an_upgrade: usize,
    /// Release date could not be resolved
    pub release_not_found: usize,
}

impl SkipCounts {
    /// Records one skip
    pub fn record(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::InvalidVersion => self.invalid_version += 1,
            SkipReason::NotAnUpgrade => self.not_an_upgrade += 1,
            SkipReason::ReleaseNotFound(_) => self.release_not_found += 1,
        }
    }

    /// Returns the total number of skips
    pub fn total(&self) -> usize {
        self.invalid_version + self.not_an_upgrade + self.release_not_found
    }
}

/// Result of one analyzer invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Ecosystem that was analyzed
    pub ecosystem: Ecosystem,
    /// Stopping rule the run was configured with
    pub stopping_rule: StoppingRule,
    /// Accepted upgrades with a plausible lag, in discovery order
    pub samples: Vec<LagSample>,
    /// Accepted upgrades excluded from the statistics
    pub discarded: Vec<DiscardedUpdate>,
    /// Commits handed over by the history walker
    pub commits_walked: usize,
    /// Commits without any readable manifest content
    pub commits_skipped: usize,
    /// Skip counters
    pub skips: SkipCounts,
    /// Whether the change budget stopped the run early
    pub halted: bool,
}

impl AnalysisSummary {
    /// Creates an empty summary
    pub fn new(ecosystem: Ecosystem, stopping_rule: StoppingRule) -> Self {
        Self {
            ecosystem,
            stopping_rule,
            samples: Vec::new(),
            discarded: Vec::new(),
            commits_walked: 0,
            commits_skipped: 0,
            skips: SkipCounts::default(),
            halted: false,
        }
    }

    /// Returns the number of accepted upgrades, discarded ones included
    pub fn accepted_changes(&self) -> usize {
        self.samples.len() + self.discarded.len()
    }
}
