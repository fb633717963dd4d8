//! Diagnostic logging setup
//!
//! Logs go to stderr so stdout stays reserved for the report. `RUST_LOG`
//! overrides the level chosen from the command line.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "deplag=info"
    } else {
        "deplag=warn"
    }
}

/// Builds the filter from `RUST_LOG`, falling back to `default_directive`
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Installs the global subscriber; a second call is a no-op
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}
