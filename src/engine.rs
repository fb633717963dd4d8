//! Update lag engine
//!
//! Walks commits oldest first, compares each commit's dependency snapshot with
//! the running baseline, and turns genuine upgrades into lag samples:
//!
//! 1. The first commit with manifest content seeds the baseline.
//! 2. A changed dependency must have valid old and new versions and the new
//!    one must be strictly greater.
//! 3. The new version's release time is resolved through the registry.
//! 4. `lag = commit time - release time`; lags outside `0..=365` days are
//!    discarded but still count as accepted changes.
//!
//! The baseline only advances on accepted upgrades, so a skipped change
//! leaves later commits compared against the older version.

use crate::domain::{
    AnalysisSummary, Commit, DependencySnapshot, DiscardedUpdate, Ecosystem, LagSample,
    SkipReason, StoppingRule, UpdateEvent,
};
use crate::history::CommitSource;
use crate::manifest::{get_extractor, ManifestFile, SnapshotExtractor};
use crate::progress::Progress;
use crate::registry::ReleaseResolver;
use crate::version::canonicalize;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Largest lag, in days, still considered plausible
pub const MAX_PLAUSIBLE_LAG_DAYS: f64 = 365.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Lifecycle of one engine run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No manifest content seen yet
    Uninitialized,
    /// Baseline seeded, comparing commits against it
    Tracking,
    /// Change budget reached
    Halted,
    /// History exhausted
    Done,
}

/// A dependency whose declared version differs from the baseline
#[derive(Debug, Clone)]
struct Change {
    name: String,
    old: String,
    new: String,
}

/// Outcome of evaluating one change
enum Verdict {
    Skip(SkipReason),
    Sample(LagSample),
    Discard(DiscardedUpdate),
}

/// Drives one analysis over a commit history
pub struct LagEngine<'a> {
    source: &'a dyn CommitSource,
    extractor: Box<dyn SnapshotExtractor>,
    resolver: ReleaseResolver,
    ecosystem: Ecosystem,
    stopping_rule: StoppingRule,
    prefetch: bool,
    state: EngineState,
    baseline: DependencySnapshot,
}

impl<'a> LagEngine<'a> {
    /// Create an engine for one ecosystem
    pub fn new(
        source: &'a dyn CommitSource,
        ecosystem: Ecosystem,
        stopping_rule: StoppingRule,
        resolver: ReleaseResolver,
    ) -> Self {
        Self {
            source,
            extractor: get_extractor(ecosystem),
            resolver,
            ecosystem,
            stopping_rule,
            prefetch: true,
            state: EngineState::Uninitialized,
            baseline: DependencySnapshot::new(),
        }
    }

    /// Enable or disable concurrent release lookups per commit
    pub fn with_prefetch(mut self, prefetch: bool) -> Self {
        self.prefetch = prefetch;
        self
    }

    /// Current state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Last accepted version per dependency
    pub fn baseline(&self) -> &DependencySnapshot {
        &self.baseline
    }

    /// Visit `commits` in order and collect lag samples
    pub async fn run(&mut self, commits: &[Commit], progress: &mut Progress) -> AnalysisSummary {
        let mut summary = AnalysisSummary::new(self.ecosystem, self.stopping_rule);
        progress.walk(commits.len());

        for commit in commits {
            summary.commits_walked += 1;
            self.visit(commit, &mut summary).await;
            progress.advance(commit);

            if self.state == EngineState::Halted {
                summary.halted = true;
                break;
            }
        }

        if self.state != EngineState::Halted {
            self.state = EngineState::Done;
        }
        progress.finish_and_clear();

        info!(
            "walked {} commits: {} samples, {} discarded, {} skipped changes",
            summary.commits_walked,
            summary.samples.len(),
            summary.discarded.len(),
            summary.skips.total()
        );
        summary
    }

    async fn visit(&mut self, commit: &Commit, summary: &mut AnalysisSummary) {
        let files = self.read_manifests(commit);
        if files.is_empty() {
            debug!("{}: no manifest content, skipping", commit);
            summary.commits_skipped += 1;
            return;
        }

        let snapshot = self.extractor.extract(&files);

        match self.state {
            EngineState::Uninitialized => {
                debug!("{}: baseline seeded with {} dependencies", commit, snapshot.len());
                self.baseline = snapshot;
                self.state = EngineState::Tracking;
                return;
            }
            EngineState::Tracking => {}
            EngineState::Halted | EngineState::Done => return,
        }

        let changes = self.collect_changes(&snapshot);

        if self.prefetch {
            let lookups: Vec<(String, String)> = changes
                .iter()
                .filter(|change| screen(change).is_ok())
                .map(|change| (change.name.clone(), change.new.clone()))
                .collect();
            self.resolver.prefetch(&lookups).await;
        }

        for change in changes {
            match self.evaluate(commit, &change).await {
                Verdict::Skip(reason) => {
                    debug!(
                        "{}: {} {} → {} skipped: {}",
                        commit.short_hash(),
                        change.name,
                        change.old,
                        change.new,
                        reason
                    );
                    summary.skips.record(&reason);
                    continue;
                }
                Verdict::Sample(sample) => {
                    info!("{}", sample.event);
                    summary.samples.push(sample);
                }
                Verdict::Discard(discarded) => {
                    info!(
                        "{}  (discarded: lag {:.1} days)",
                        discarded.event, discarded.lag_days
                    );
                    summary.discarded.push(discarded);
                }
            }

            self.baseline.insert(change.name, change.new);

            if let Some(limit) = self.stopping_rule.change_limit() {
                if summary.accepted_changes() >= limit {
                    debug!("change limit of {} reached", limit);
                    self.state = EngineState::Halted;
                    return;
                }
            }
        }
    }

    /// Reads every manifest path of the ecosystem, keeping non-empty files
    fn read_manifests(&self, commit: &Commit) -> Vec<ManifestFile> {
        self.ecosystem
            .manifest_paths()
            .iter()
            .filter_map(|path| match self.source.read_file(&commit.hash, path) {
                Ok(Some(content)) if !content.trim().is_empty() => {
                    Some(ManifestFile::new(*path, content))
                }
                Ok(_) => None,
                Err(e) => {
                    debug!("{}: cannot read {}: {}", commit.short_hash(), path, e);
                    None
                }
            })
            .collect()
    }

    /// Lists dependencies whose version differs from the baseline, ascending
    /// by name. A dependency missing from the baseline has an empty old
    /// version, so it never passes the version screen.
    fn collect_changes(&self, snapshot: &DependencySnapshot) -> Vec<Change> {
        snapshot
            .iter()
            .filter(|(name, new)| self.baseline.get(name) != Some(*new))
            .map(|(name, new)| Change {
                name: name.to_string(),
                old: self.baseline.get(name).unwrap_or_default().to_string(),
                new: new.to_string(),
            })
            .collect()
    }

    async fn evaluate(&mut self, commit: &Commit, change: &Change) -> Verdict {
        if let Err(reason) = screen(change) {
            return Verdict::Skip(reason);
        }

        let released_at = match self.resolver.resolve(&change.name, &change.new).await {
            Ok(time) => time,
            Err(e) => return Verdict::Skip(SkipReason::ReleaseNotFound(e.to_string())),
        };

        let event = UpdateEvent::new(
            &change.name,
            &change.old,
            &change.new,
            &commit.hash,
            commit.authored_at,
        );
        let lag = lag_days(commit.authored_at, released_at);

        if is_plausible(lag) {
            Verdict::Sample(LagSample::new(event, lag))
        } else {
            Verdict::Discard(DiscardedUpdate::new(event, lag))
        }
    }
}

/// Version checks that need no registry lookup
fn screen(change: &Change) -> Result<(), SkipReason> {
    let (Some(old), Some(new)) = (canonicalize(&change.old), canonicalize(&change.new)) else {
        return Err(SkipReason::InvalidVersion);
    };
    if new <= old {
        return Err(SkipReason::NotAnUpgrade);
    }
    Ok(())
}

/// Fractional days from `released_at` to `committed_at`
pub fn lag_days(committed_at: DateTime<Utc>, released_at: DateTime<Utc>) -> f64 {
    (committed_at - released_at).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Whether a lag falls in `0..=365` days
pub fn is_plausible(lag_days: f64) -> bool {
    (0.0..=MAX_PLAUSIBLE_LAG_DAYS).contains(&lag_days)
}
