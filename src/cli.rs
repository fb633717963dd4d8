//! CLI argument parsing module for deplag

use clap::Parser;
use std::path::PathBuf;

/// Measure how long a project takes to adopt new dependency releases
#[derive(Parser, Debug, Clone)]
#[command(
    name = "deplag",
    version,
    about = "Measure how long a project takes to adopt new dependency releases"
)]
pub struct CliArgs {
    /// Repository to analyze (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Ecosystem to analyze: npm, go or python (py)
    #[arg(long, value_name = "ECOSYSTEM")]
    pub eco: String,

    // Stopping rules (exactly one)
    /// Walk at most N manifest-changing commits
    #[arg(long, value_name = "N")]
    pub commits: Option<usize>,

    /// Stop after N accepted upgrades
    #[arg(long, value_name = "N")]
    pub changes: Option<usize>,

    /// Only walk commits authored in the last N days
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    // History options
    /// Ignore commits authored after this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    pub until: Option<String>,

    /// With --commits, keep the oldest N commits instead of the newest
    #[arg(long)]
    pub keep_oldest: bool,

    // Output options
    /// Number of slowest updates to list
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub top: usize,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Log every accepted upgrade
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable quiet mode - summary line only
    #[arg(short, long)]
    pub quiet: bool,

    /// Resolve release dates one at a time instead of concurrently
    #[arg(long)]
    pub no_prefetch: bool,
}
