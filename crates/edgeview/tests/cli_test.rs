//! Integration tests for the `edgeview` CLI binary.
//!
//! Every data command runs against the built-in mock source with
//! `--latency-scale 0` and a fixed seed, so runs are fast and reproducible.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `edgeview` binary with env isolation.
///
/// Points config directories at `home` and clears `EDGEVIEW_*` overrides so
/// tests never touch the user's real configuration.
fn edgeview_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("edgeview");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("EDGEVIEW_DEFAULTS__OUTPUT")
        .env_remove("EDGEVIEW_DEFAULTS__COLOR")
        .env_remove("EDGEVIEW_DASHBOARD__TIME_RANGE")
        .env_remove("EDGEVIEW_SOURCE__LATENCY_SCALE")
        .env_remove("EDGEVIEW_SOURCE__FAILURE_RATE")
        .env_remove("EDGEVIEW_SOURCE__SEED");
    cmd
}

/// Same as [`edgeview_cmd`] with an instant, seeded mock source.
fn fast_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = edgeview_cmd(home);
    cmd.args(["--latency-scale", "0", "--seed", "42"]);
    cmd
}

fn json_stdout(cmd: &mut assert_cmd::Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = edgeview_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in:\n{stderr}");
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    edgeview_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("summary")
                .and(predicate::str::contains("nodes"))
                .and(predicate::str::contains("watch"))
                .and(predicate::str::contains("--range")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    edgeview_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("edgeview"));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    edgeview_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("edgeview"));
}

#[test]
fn test_invalid_range_is_a_usage_error() {
    let home = tempfile::tempdir().unwrap();
    edgeview_cmd(home.path())
        .args(["summary", "--range", "2h"])
        .assert()
        .code(2);
}

// ── Data commands ───────────────────────────────────────────────────

#[test]
fn test_nodes_json_lists_fleet() {
    let home = tempfile::tempdir().unwrap();
    let nodes = json_stdout(fast_cmd(home.path()).args(["nodes", "-o", "json"]));
    let nodes = nodes.as_array().unwrap();
    assert_eq!(nodes.len(), 6);
    assert_eq!(nodes[0]["location"], "New York");
    assert!(nodes[0]["responseTime"].is_number());
}

#[test]
fn test_nodes_status_filter_plain() {
    let home = tempfile::tempdir().unwrap();
    fast_cmd(home.path())
        .args(["nodes", "--status", "healthy", "-o", "plain"])
        .assert()
        .success()
        .stdout("1\n3\n5\n6\n");
}

#[test]
fn test_nodes_table_has_footer() {
    let home = tempfile::tempdir().unwrap();
    fast_cmd(home.path())
        .args(["nodes", "--status", "unhealthy"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Sydney").and(predicate::str::contains("1 of 6 nodes shown")),
        );
}

#[test]
fn test_metrics_scale_with_range() {
    let home = tempfile::tempdir().unwrap();
    let metrics = json_stdout(fast_cmd(home.path()).args(["metrics", "-o", "json", "-r", "7d"]));
    assert_eq!(metrics["totalRequests"], 2_485_000);
}

#[test]
fn test_summary_json_reports_range_and_nodes() {
    let home = tempfile::tempdir().unwrap();
    let summary = json_stdout(fast_cmd(home.path()).args(["summary", "-o", "json", "-r", "1h"]));
    assert_eq!(summary["range"], "1h");
    assert_eq!(summary["totalNodes"], 6);
    assert_eq!(summary["healthyNodes"], 4);
    assert_eq!(summary["statusCounts"]["error"], 1);
}

#[test]
fn test_regions_top_five_plain() {
    let home = tempfile::tempdir().unwrap();
    fast_cmd(home.path())
        .args(["regions", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("North America\n"));
}

#[test]
fn test_traffic_recent_and_full_series() {
    let home = tempfile::tempdir().unwrap();
    let recent = json_stdout(fast_cmd(home.path()).args(["traffic", "-o", "json"]));
    assert_eq!(recent.as_array().unwrap().len(), 24);

    let full = json_stdout(fast_cmd(home.path()).args(["traffic", "--all", "-o", "json", "-r", "1h"]));
    assert_eq!(full.as_array().unwrap().len(), 12);
}

#[test]
fn test_source_failure_exit_code() {
    let home = tempfile::tempdir().unwrap();
    fast_cmd(home.path())
        .args(["metrics", "--failure-rate", "1"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Failed to load metrics"));
}

#[test]
fn test_absurd_latency_scale_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    edgeview_cmd(home.path())
        .args(["--latency-scale", "1e300", "nodes"])
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("source.latency_scale"));
}

#[test]
fn test_quiet_suppresses_output() {
    let home = tempfile::tempdir().unwrap();
    fast_cmd(home.path())
        .args(["summary", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// ── Watch ───────────────────────────────────────────────────────────

#[test]
fn test_watch_streams_tags_until_duration() {
    let home = tempfile::tempdir().unwrap();
    fast_cmd(home.path())
        .args(["watch", "--duration", "1s", "--no-auto-refresh", "-o", "plain"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[Dashboard] Load Edge Nodes\n")
                .and(predicate::str::contains("[Dashboard] Load Metrics Success")),
        );
}

#[test]
fn test_watch_json_emits_one_action_per_line() {
    let home = tempfile::tempdir().unwrap();
    let output = fast_cmd(home.path())
        .args(["watch", "--duration", "1s", "--no-auto-refresh", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(first["type"], "LoadEdgeNodes");
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_follows_xdg() {
    let home = tempfile::tempdir().unwrap();
    edgeview_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("edgeview").and(predicate::str::contains("config.toml")));
}

#[test]
fn test_config_init_show_and_conflict() {
    let home = tempfile::tempdir().unwrap();
    edgeview_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .success();

    let shown = json_stdout(edgeview_cmd(home.path()).args(["config", "show", "-o", "json"]));
    assert_eq!(shown["dashboard"]["time_range"], "24h");
    assert_eq!(shown["defaults"]["output"], "table");

    edgeview_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_config_file_sets_default_output() {
    let home = tempfile::tempdir().unwrap();
    edgeview_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .success();
    let path = String::from_utf8(
        edgeview_cmd(home.path())
            .args(["config", "path"])
            .output()
            .unwrap()
            .stdout,
    )
    .unwrap();
    let path = path.trim();
    let text = std::fs::read_to_string(path).unwrap();
    std::fs::write(path, text.replace("output = \"table\"", "output = \"plain\"")).unwrap();

    fast_cmd(home.path())
        .args(["regions"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("North America\n"));
}

#[test]
fn test_invalid_env_override_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    fast_cmd(home.path())
        .env("EDGEVIEW_SOURCE__FAILURE_RATE", "2")
        .arg("summary")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("source.failure_rate"));
}
