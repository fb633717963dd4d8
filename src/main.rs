//! deplag - dependency update lag analyzer CLI tool
//!
//! Measures how many days a project took to adopt each new dependency
//! release for one ecosystem:
//! - Node.js (package.json)
//! - Go (go.mod)
//! - Python (requirements.txt, setup.cfg)

use clap::Parser;
use deplag::cli::CliArgs;
use deplag::config::{RegistryConfig, RunConfig};
use deplag::engine::LagEngine;
use deplag::history::{GitRepository, HistoryWalker};
use deplag::output::create_formatter;
use deplag::progress::Progress;
use deplag::registry::{create_adapter, HttpClient, ReleaseResolver};
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = RunConfig::from_cli(&args)?;
    deplag::logging::init(config.verbose);

    info!(
        "deplag v{} analyzing {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        config.repo_path.display(),
        config.ecosystem,
        config.stopping_rule
    );

    let repository = GitRepository::open(&config.repo_path)?;
    let mut progress = Progress::new(config.show_progress());

    progress.spinner("Listing manifest commits...");
    let walker = HistoryWalker::new(config.bounds.clone());
    let commits = walker.enumerate(&repository, config.ecosystem.manifest_paths());
    progress.finish_and_clear();
    let commits = commits?;

    let registry_config = RegistryConfig::from_env();
    let client = HttpClient::new()?;
    let adapter = create_adapter(config.ecosystem, client, &registry_config);
    let resolver = ReleaseResolver::new(adapter);

    let mut engine = LagEngine::new(
        &repository,
        config.ecosystem,
        config.stopping_rule,
        resolver,
    )
    .with_prefetch(config.prefetch);
    let summary = engine.run(&commits, &mut progress).await;

    let formatter = create_formatter(config.output.clone());
    let mut stdout = io::stdout().lock();
    formatter.format(&summary, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}
