//! deplag - dependency update lag analyzer library
//!
//! Walks a repository's history, detects dependency upgrades in its
//! manifests and measures how long each upgrade trailed the release it
//! adopted:
//! - Node.js (package.json)
//! - Go (go.mod)
//! - Python (requirements.txt, setup.cfg)

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod history;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod progress;
pub mod registry;
pub mod report;
pub mod version;
