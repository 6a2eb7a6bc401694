//! Integration tests for the `atlasom` CLI binary.
//!
//! Argument parsing, help, completions and error handling run without an
//! appliance; the session tests talk to a wiremock appliance.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `atlasom` binary with env isolation.
///
/// Clears all `ATLASOM_*` env vars and points config and cache
/// directories into `home` so tests never touch real configuration.
fn atlasom_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("atlasom");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env("NO_COLOR", "1")
        .env_remove("ATLASOM_PROFILE")
        .env_remove("ATLASOM_ENDPOINT")
        .env_remove("ATLASOM_USER")
        .env_remove("ATLASOM_OUTPUT")
        .env_remove("ATLASOM_LANG")
        .env_remove("ATLASOM_INSECURE")
        .env_remove("ATLASOM_TIMEOUT")
        .env_remove("ATLASOM_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn session_file(home: &Path) -> PathBuf {
    home.join("cache")
        .join("atlasom")
        .join("sessions")
        .join("default.json")
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// An appliance that accepts `admin` and reports an Atlas 500 without
/// extension modules.
async fn appliance() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/redfish/v1/SessionService/Sessions"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Auth-Token", "token-1")
                .set_body_json(json!({ "Id": "s1", "UserName": "admin" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Model": "Atlas 500 Model 3000",
            "HostName": "edge-01"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems/Modules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Members": [] })))
        .mount(&server)
        .await;
    server
}

fn login(home: &Path, endpoint: &str) {
    atlasom_cmd(home)
        .args(["-e", endpoint, "-u", "admin", "login", "--password-stdin"])
        .write_stdin("Edge@12345\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged in"));
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = atlasom_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    atlasom_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("Atlas 500")
            .and(predicate::str::contains("network"))
            .and(predicate::str::contains("firmware"))
            .and(predicate::str::contains("alarms")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    atlasom_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("atlasom"));
}

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    atlasom_cmd(home.path())
        .arg("frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    for shell in ["bash", "zsh", "fish"] {
        atlasom_cmd(home.path())
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains("atlasom"));
    }
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_set_ip_requires_an_address() {
    let home = TempDir::new().unwrap();
    atlasom_cmd(home.path())
        .args(["network", "set-ip", "GMAC0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--address"));
}

#[test]
fn test_lte_enable_off_conflicts_with_data() {
    let home = TempDir::new().unwrap();
    atlasom_cmd(home.path())
        .args(["network", "lte", "enable", "--off", "--data"])
        .assert()
        .code(2);
}

#[test]
fn test_timeout_out_of_range_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    for value in ["0", "86401", "18446744073709551615"] {
        atlasom_cmd(home.path())
            .args(["--timeout", value, "logs", "list"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("--timeout"));
    }
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_no_endpoint_points_to_config_init() {
    let home = TempDir::new().unwrap();
    atlasom_cmd(home.path())
        .args(["system", "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config init"));
}

#[test]
fn test_unknown_profile() {
    let home = TempDir::new().unwrap();
    atlasom_cmd(home.path())
        .args(["-p", "lab", "system", "info"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("lab"));
}

#[test]
fn test_config_set_then_profiles() {
    let home = TempDir::new().unwrap();
    atlasom_cmd(home.path())
        .args(["config", "set", "profiles.edge.endpoint", "https://192.168.2.111"])
        .assert()
        .success();
    atlasom_cmd(home.path())
        .args(["config", "use", "edge"])
        .assert()
        .success();
    atlasom_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("edge *"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    atlasom_cmd(home.path())
        .args(["config", "set", "site", "default"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

// ── Sessions against a mock appliance ───────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_session_for_later_commands() {
    let server = appliance().await;
    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems/Alarm/AlarmInfo"))
        .and(header("X-Auth-Token", "token-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AlarMessages": [{
                "AlarmId": "00000002",
                "AlarmName": "NPU overheated",
                "PerceivedSeverity": "0",
                "UniquelyIdentifies": "0A000001"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let endpoint = server.uri();
    login(home.path(), &endpoint);
    assert!(session_file(home.path()).exists());

    atlasom_cmd(home.path())
        .args(["-e", &endpoint, "-o", "json", "alarms", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NPU overheated"));

    atlasom_cmd(home.path())
        .args(["-e", &endpoint, "-o", "json", "whoami"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"logged_in\": true")
                .and(predicate::str::contains("Atlas 500 Model 3000")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_session_is_dropped() {
    let server = appliance().await;
    Mock::given(method("GET"))
        .and(path("/redfish/v1/Systems/Alarm/AlarmInfo"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let endpoint = server.uri();
    login(home.path(), &endpoint);

    atlasom_cmd(home.path())
        .args(["-e", &endpoint, "alarms", "list"])
        .assert()
        .code(3);
    assert!(!session_file(home.path()).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_clears_session() {
    let server = appliance().await;
    Mock::given(method("DELETE"))
        .and(path("/redfish/v1/SessionService/Sessions/s1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let endpoint = server.uri();
    login(home.path(), &endpoint);

    atlasom_cmd(home.path())
        .args(["-e", &endpoint, "logout"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Logged out"));
    assert!(!session_file(home.path()).exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reboot_needs_yes_without_terminal() {
    let server = appliance().await;
    let home = TempDir::new().unwrap();
    let endpoint = server.uri();
    login(home.path(), &endpoint);

    atlasom_cmd(home.path())
        .args(["-e", &endpoint, "system", "reboot"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lte_needs_the_extension_module() {
    let server = appliance().await;
    let home = TempDir::new().unwrap();
    let endpoint = server.uri();
    login(home.path(), &endpoint);

    atlasom_cmd(home.path())
        .args(["-e", &endpoint, "network", "lte", "status"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("whoami"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/redfish/v1/SessionService/Sessions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {
                "code": "Base.1.0.GeneralError",
                "@Message.ExtendedInfo": [{ "Message": "Invalid user name or password." }]
            }
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    atlasom_cmd(home.path())
        .args(["-e", &server.uri(), "-u", "admin", "login", "--password-stdin"])
        .write_stdin("wrong\n")
        .assert()
        .code(3);
    assert!(!session_file(home.path()).exists());
}
