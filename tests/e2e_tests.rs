//! End-to-end tests for the deplag CLI
//!
//! These tests verify:
//! - Option validation and exit codes
//! - A full run over a real git repository against a mock npm registry
//! - JSON output schema

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn deplag() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_deplag"));
    cmd.env_remove("RUST_LOG")
        .env_remove("NPM_TOKEN")
        .env_remove("NPM_CONFIG_REGISTRY")
        .env_remove("GOPROXY")
        .env_remove("PYPI_URL");
    cmd
}

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str], date: &str) {
    let status = std::process::Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .status()
        .expect("Failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// Repository whose package.json upgrades lodash on 2024-03-11
fn create_npm_repository() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let dir = temp_dir.path();
    git(dir, &["init", "-q"], "2024-01-01T00:00:00Z");

    let commits = [
        ("2024-01-01T00:00:00Z", "^4.17.20"),
        ("2024-03-11T00:00:00Z", "^4.17.21"),
    ];
    for (date, lodash) in commits {
        let package_json = format!(
            "{{\n  \"name\": \"app\",\n  \"dependencies\": {{\n    \"lodash\": \"{}\"\n  }}\n}}\n",
            lodash
        );
        fs::write(dir.join("package.json"), package_json).unwrap();
        git(dir, &["add", "package.json"], date);
        git(dir, &["commit", "-q", "-m", "bump lodash"], date);
    }
    temp_dir
}

mod option_validation {
    use super::*;

    #[test]
    fn test_help() {
        deplag()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--eco"))
            .stdout(predicate::str::contains("--commits"))
            .stdout(predicate::str::contains("--changes"))
            .stdout(predicate::str::contains("--days"));
    }

    #[test]
    fn test_missing_stopping_rule_exits_one() {
        deplag()
            .args(["--eco", "npm", "."])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("exactly one of"));
    }

    #[test]
    fn test_conflicting_stopping_rules_exit_one() {
        deplag()
            .args(["--eco", "npm", "--commits", "5", "--changes", "2", "."])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("--commits, --changes"));
    }

    #[test]
    fn test_zero_limit_exits_one() {
        deplag()
            .args(["--eco", "go", "--days", "0", "."])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("--days must be a positive number"));
    }

    #[test]
    fn test_huge_lookback_exits_one() {
        deplag()
            .args(["--eco", "npm", "--days", "4294967295", "."])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("--days is out of range"));
    }

    #[test]
    fn test_unknown_ecosystem_exits_one() {
        deplag()
            .args(["--eco", "cargo", "--commits", "5", "."])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("unknown ecosystem 'cargo'"));
    }

    #[test]
    fn test_invalid_until_exits_one() {
        deplag()
            .args(["--eco", "npm", "--commits", "5", "--until", "yesterday", "."])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("invalid date"));
    }

    #[test]
    fn test_not_a_repository_exits_one() {
        if !git_available() {
            return;
        }
        let temp_dir = tempfile::tempdir().unwrap();
        deplag()
            .args(["--eco", "npm", "--commits", "5"])
            .arg(temp_dir.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("not a git repository"));
    }
}

mod full_run {
    use super::*;

    fn mock_lodash(server: &mut mockito::ServerGuard) -> mockito::Mock {
        server
            .mock("GET", "/lodash")
            .with_status(200)
            .with_body(
                r#"{"time": {
                    "created": "2012-04-23T16:37:11.912Z",
                    "4.17.20": "2020-08-13T16:53:54.152Z",
                    "4.17.21": "2024-03-01T00:00:00.000Z"
                }}"#,
            )
            .expect(1)
            .create()
    }

    #[test]
    fn test_json_report() {
        if !git_available() {
            return;
        }
        let repo = create_npm_repository();
        let mut server = mockito::Server::new();
        let mock = mock_lodash(&mut server);

        let output = deplag()
            .env("NPM_CONFIG_REGISTRY", server.url())
            .args(["--eco", "npm", "--commits", "10", "--json"])
            .arg(repo.path())
            .output()
            .expect("Failed to execute command");

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["ecosystem"], "npm");
        assert_eq!(json["commits_walked"], 2);
        assert_eq!(json["stopping_rule"]["rule"], "max_commits");
        assert_eq!(json["updates"][0]["dependency"], "lodash");
        assert_eq!(json["updates"][0]["from"], "4.17.20");
        assert_eq!(json["updates"][0]["to"], "4.17.21");
        assert_eq!(json["updates"][0]["lag_days"], 10.0);
        assert_eq!(json["statistics"]["mean"], 10.0);
        mock.assert();
    }

    #[test]
    fn test_quiet_text_report() {
        if !git_available() {
            return;
        }
        let repo = create_npm_repository();
        let mut server = mockito::Server::new();
        let _mock = mock_lodash(&mut server);

        deplag()
            .env("NPM_CONFIG_REGISTRY", server.url())
            .args(["--eco", "npm", "--changes", "1", "-q"])
            .arg(repo.path())
            .assert()
            .success()
            .stdout("1 updates, mean lag 10.0 days, median 10.0 days\n");
    }

    #[test]
    fn test_registry_failure_is_not_fatal() {
        if !git_available() {
            return;
        }
        let repo = create_npm_repository();
        let mut server = mockito::Server::new();
        let _mock = server.mock("GET", "/lodash").with_status(404).create();

        deplag()
            .env("NPM_CONFIG_REGISTRY", server.url())
            .args(["--eco", "npm", "--commits", "10", "-q"])
            .arg(repo.path())
            .assert()
            .success()
            .stdout("No updates detected\n");
    }

    #[test]
    fn test_repository_without_manifests() {
        if !git_available() {
            return;
        }
        let repo = create_npm_repository();

        deplag()
            .args(["--eco", "go", "--commits", "10", "--json"])
            .arg(repo.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"commits_walked\": 0"));
    }
}
