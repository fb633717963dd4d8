//! Core domain models for deplag
//!
//! This module contains the fundamental types used throughout the application:
//! - Ecosystem types for supported registries
//! - Commits and per-commit dependency snapshots
//! - Upgrade events, lag samples and skip reasons
//! - Stopping rules and the run summary

mod commit;
mod ecosystem;
mod snapshot;
mod stopping_rule;
mod summary;
mod update_event;

pub use commit::{short_hash, Commit};
pub use ecosystem::Ecosystem;
pub use snapshot::DependencySnapshot;
pub use stopping_rule::StoppingRule;
pub use summary::{AnalysisSummary, SkipCounts};
pub use update_event::{DiscardedUpdate, LagSample, SkipReason, UpdateEvent};
