//! Run configuration
//!
//! `RunConfig` is validated from the command line; `RegistryConfig` is read
//! from the environment. Environment lookups go through a closure so tests can
//! supply their own values.

use crate::cli::CliArgs;
use crate::domain::{Ecosystem, StoppingRule};
use crate::error::ConfigError;
use crate::history::{CapEnd, WalkBounds};
use crate::output::OutputConfig;
use crate::registry::{GO_PROXY_URL, NPM_REGISTRY_URL, PYPI_URL};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use std::path::PathBuf;

/// Environment variable holding a bearer token for the npm registry
pub const NPM_TOKEN_ENV: &str = "NPM_TOKEN";
/// Environment variable overriding the npm registry URL
pub const NPM_REGISTRY_ENV: &str = "NPM_CONFIG_REGISTRY";
/// Environment variable listing Go module proxies
pub const GOPROXY_ENV: &str = "GOPROXY";
/// Environment variable overriding the PyPI base URL
pub const PYPI_URL_ENV: &str = "PYPI_URL";

/// Validated settings for one analysis run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Repository to analyze
    pub repo_path: PathBuf,
    /// Ecosystem to analyze
    pub ecosystem: Ecosystem,
    /// The single stopping rule
    pub stopping_rule: StoppingRule,
    /// History bounds derived from the stopping rule and `--until`
    pub bounds: WalkBounds,
    /// Output settings
    pub output: OutputConfig,
    /// Whether release dates are prefetched concurrently
    pub prefetch: bool,
    /// Verbose logging
    pub verbose: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl RunConfig {
    /// Validate command-line arguments against the current time
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        Self::from_cli_at(args, Utc::now())
    }

    /// Validate command-line arguments; `now` anchors `--days`
    pub fn from_cli_at(args: &CliArgs, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        let ecosystem: Ecosystem = args.eco.parse()?;
        let stopping_rule = stopping_rule(args)?;

        let until = args.until.as_deref().map(parse_until).transpose()?;
        let since = stopping_rule
            .lookback_days()
            .map(|days| lookback_start(now, days))
            .transpose()?;
        let bounds = WalkBounds {
            since,
            until,
            max_commits: stopping_rule.commit_limit(),
            cap_end: if args.keep_oldest {
                CapEnd::Oldest
            } else {
                CapEnd::Newest
            },
        };

        Ok(Self {
            repo_path: args.path.clone(),
            ecosystem,
            stopping_rule,
            bounds,
            output: OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.top),
            prefetch: !args.no_prefetch,
            verbose: args.verbose,
            quiet: args.quiet,
        })
    }

    /// Whether the progress display should be shown
    pub fn show_progress(&self) -> bool {
        !(self.quiet || self.verbose || self.output.format == crate::output::OutputFormat::Json)
    }
}

/// Picks the single stopping rule out of `--commits`, `--changes`, `--days`
fn stopping_rule(args: &CliArgs) -> Result<StoppingRule, ConfigError> {
    let mut given = Vec::new();
    if args.commits.is_some() {
        given.push("--commits");
    }
    if args.changes.is_some() {
        given.push("--changes");
    }
    if args.days.is_some() {
        given.push("--days");
    }

    if given.len() > 1 {
        return Err(ConfigError::MultipleStoppingRules {
            given: given.join(", "),
        });
    }

    let non_positive = |option: &str| ConfigError::NonPositive {
        option: option.to_string(),
    };

    match (args.commits, args.changes, args.days) {
        (Some(0), _, _) => Err(non_positive("--commits")),
        (_, Some(0), _) => Err(non_positive("--changes")),
        (_, _, Some(0)) => Err(non_positive("--days")),
        (Some(n), _, _) => Ok(StoppingRule::MaxCommits(n)),
        (_, Some(n), _) => Ok(StoppingRule::MaxChanges(n)),
        (_, _, Some(n)) => Ok(StoppingRule::LookbackDays(n)),
        (None, None, None) => Err(ConfigError::NoStoppingRule),
    }
}

/// `now` minus `days`, or `OutOfRange` when that predates chrono's range
fn lookback_start(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>, ConfigError> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or_else(|| ConfigError::OutOfRange {
            option: "--days".to_string(),
        })
}

/// Parses `--until`; a bare date covers the whole day (UTC)
pub fn parse_until(value: &str) -> Result<DateTime<Utc>, ConfigError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(end_of_day) = date.and_hms_opt(23, 59, 59) {
            return Ok(end_of_day.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ConfigError::InvalidDate {
            value: value.to_string(),
        })
}

/// Registry endpoints and credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// npm registry base URL
    pub npm_url: String,
    /// Bearer token sent to the npm registry
    pub npm_token: Option<String>,
    /// Go module proxy base URL
    pub go_proxy_url: String,
    /// PyPI base URL
    pub pypi_url: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            npm_url: NPM_REGISTRY_URL.to_string(),
            npm_token: None,
            go_proxy_url: GO_PROXY_URL.to_string(),
            pypi_url: PYPI_URL.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Read registry settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read registry settings through `lookup`; unset or blank values fall
    /// back to the public registries
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            npm_url: get(NPM_REGISTRY_ENV).unwrap_or(defaults.npm_url),
            npm_token: get(NPM_TOKEN_ENV),
            go_proxy_url: get(GOPROXY_ENV)
                .and_then(|list| first_proxy_url(&list))
                .unwrap_or(defaults.go_proxy_url),
            pypi_url: get(PYPI_URL_ENV).unwrap_or(defaults.pypi_url),
        }
    }
}

/// First URL entry of a GOPROXY list; `direct` and `off` are skipped
fn first_proxy_url(list: &str) -> Option<String> {
    list.split([',', '|'])
        .map(str::trim)
        .find(|entry| entry.starts_with("https://") || entry.starts_with("http://"))
        .map(str::to_string)
}
