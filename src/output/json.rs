//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of lag samples, discarded updates and skip counters
//! - Summary statistics and the ranked slowest updates

use crate::domain::{
    AnalysisSummary, Ecosystem, LagSample, SkipCounts, StoppingRule, UpdateEvent,
};
use crate::output::OutputFormatter;
use crate::report::{slowest, LagStatistics};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    top: usize,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(top: usize) -> Self {
        Self { top }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    ecosystem: Ecosystem,
    stopping_rule: StoppingRule,
    commits_walked: usize,
    commits_skipped: usize,
    halted: bool,
    /// `null` when no update was sampled
    statistics: Option<LagStatistics>,
    updates: Vec<JsonUpdate<'a>>,
    slowest: Vec<JsonUpdate<'a>>,
    discarded: Vec<JsonUpdate<'a>>,
    skipped: SkipCounts,
}

/// JSON representation of one upgrade
#[derive(Serialize)]
struct JsonUpdate<'a> {
    dependency: &'a str,
    from: &'a str,
    to: &'a str,
    commit: &'a str,
    committed_at: DateTime<Utc>,
    lag_days: f64,
}

impl<'a> JsonUpdate<'a> {
    fn from_sample(sample: &'a LagSample) -> Self {
        Self::new(&sample.event, sample.lag_days)
    }

    fn new(event: &'a UpdateEvent, lag_days: f64) -> Self {
        Self {
            dependency: &event.dependency,
            from: &event.old_version,
            to: &event.new_version,
            commit: &event.commit_hash,
            committed_at: event.committed_at,
            lag_days,
        }
    }
}

impl JsonFormatter {
    fn to_json<'a>(&self, summary: &'a AnalysisSummary) -> JsonOutput<'a> {
        JsonOutput {
            ecosystem: summary.ecosystem,
            stopping_rule: summary.stopping_rule,
            commits_walked: summary.commits_walked,
            commits_skipped: summary.commits_skipped,
            halted: summary.halted,
            statistics: LagStatistics::from_samples(&summary.samples),
            updates: summary.samples.iter().map(JsonUpdate::from_sample).collect(),
            slowest: slowest(&summary.samples, self.top)
                .into_iter()
                .map(JsonUpdate::from_sample)
                .collect(),
            discarded: summary
                .discarded
                .iter()
                .map(|d| JsonUpdate::new(&d.event, d.lag_days))
                .collect(),
            skipped: summary.skips,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, summary: &AnalysisSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = self.to_json(summary);
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
