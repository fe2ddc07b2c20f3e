//! CLI tests against a config whose markets are all cached, so no network
//! access is needed.

mod support;

use assert_cmd::Command;
use marketpair::testkit::domain::{binary_entry, categorical_entry};
use predicates::prelude::*;
use support::registry::Workspace;

fn marketpair() -> Command {
    let mut cmd = Command::cargo_bin("marketpair").expect("binary built");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn build_from_cache_rewrites_registry() {
    let ws = Workspace::new();
    ws.write_registry(&[
        binary_entry("old btc name", "1", "btc"),
        categorical_entry("Fed", "61", "fed"),
        binary_entry("Unconfigured", "9", "gone"),
    ]);
    let config = ws.write_config(&[
        ("Fed", "categorical", "61", "fed"),
        ("BTC", "binary", "1", "btc"),
    ]);

    marketpair()
        .args(["build", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 2 entries"))
        .stdout(predicate::str::contains("2 cached, 0 built, 0 stale, 0 failed"));

    let names: Vec<String> = ws.read_registry().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["Fed", "BTC"]);
}

#[test]
fn output_flag_overrides_config() {
    let ws = Workspace::new();
    ws.write_registry(&[binary_entry("BTC", "1", "btc")]);
    let config = ws.write_config(&[("BTC", "binary", "1", "btc")]);
    let other = ws.dir.path().join("other.json");

    marketpair()
        .args(["build", "--config"])
        .arg(&config)
        .arg("--output")
        .arg(&other)
        .assert()
        .success();

    // The override points at an empty store, so the market is rebuilt and
    // fails against the unroutable host.
    assert!(support::registry::read_entries(&other).is_empty());
}

#[test]
fn cli_returns_nonzero_on_config_error() {
    let ws = Workspace::new();
    std::fs::write(ws.config_path(), "[build]\nworkers = 0\n").expect("write config");

    marketpair()
        .args(["build", "--config"])
        .arg(ws.config_path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("build.workers"));
}

#[test]
fn cli_returns_nonzero_on_missing_config() {
    marketpair()
        .args(["build", "--config", "/nonexistent/marketpair.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
}

#[test]
fn help_lists_build_flags() {
    marketpair()
        .args(["build", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--refresh"))
        .stdout(predicate::str::contains("--expiry-grace-hours"));
}
