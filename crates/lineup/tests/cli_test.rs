//! Integration tests for the `lineup` CLI binary.
//!
//! Argument parsing, help, completions and error handling run without a
//! server; the queue commands run against a wiremock backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `lineup` binary with env isolation.
///
/// Clears all `LINEUP_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn lineup_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("lineup");
    cmd.env("HOME", "/tmp/lineup-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/lineup-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("LINEUP_PROFILE")
        .env_remove("LINEUP_SERVER")
        .env_remove("LINEUP_TOKEN")
        .env_remove("LINEUP_OUTPUT")
        .env_remove("LINEUP_INSECURE")
        .env_remove("LINEUP_TIMEOUT");
    cmd
}

/// `lineup` pointed at `server` with a fixed token.
fn against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = lineup_cmd();
    cmd.args(["--server", &server.uri(), "--token", "t0k"]);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn entry(id: i64, name: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "lineId": 7,
        "attendeeName": name,
        "attendeePhone": format!("010-0000-{id:04}"),
        "attendeeAttributes": "{\"party\":\"2\"}",
        "status": status,
        "createdAt": "2026-03-01T09:30:00Z"
    })
}

async fn mount_queue(server: &MockServer, entries: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/queue/list"))
        .and(query_param("line_id", "7"))
        .and(header("authorization", "Bearer t0k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entries))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = lineup_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    lineup_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("waiting queues")
            .and(predicate::str::contains("lines"))
            .and(predicate::str::contains("queue"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    lineup_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lineup"));
}

#[test]
fn test_queue_help_lists_move() {
    lineup_cmd()
        .args(["queue", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("move").and(predicate::str::contains("status")));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    lineup_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    lineup_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lineup"));
}

#[test]
fn test_completions_fish() {
    lineup_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    lineup_cmd().arg("frobnicate").assert().failure().code(2);
}

#[test]
fn test_invalid_output_format() {
    lineup_cmd()
        .args(["--output", "xml", "lines", "list"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_invalid_status_value() {
    lineup_cmd()
        .args(["queue", "status", "3", "seated"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_malformed_attr_is_rejected() {
    let output = lineup_cmd()
        .args(["queue", "add", "7", "--name", "Ara", "--phone", "1", "--attr", "party"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("KEY=VALUE"));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_no_config_fails_with_hint() {
    let output = lineup_cmd().args(["lines", "list"]).output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("config init"), "Expected setup hint:\n{text}");
}

#[test]
fn test_server_without_token_is_auth_error() {
    lineup_cmd()
        .args(["--server", "http://127.0.0.1:9", "lines", "list"])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn test_config_show_without_file() {
    lineup_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[defaults]"));
}

#[test]
fn test_config_path_prints_location() {
    lineup_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_delete_without_terminal_requires_yes() {
    lineup_cmd()
        .args(["--server", "http://127.0.0.1:9", "--token", "x", "queue", "remove", "3"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_profile_from_config_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/line/list"))
        .and(header("authorization", "Bearer from-env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "name": "Brunch", "uuid": "6f1c2b1e-4d57-4a8e-9d7c-0a1b2c3d4e5f" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempfile::tempdir().unwrap();
    let dir = home.path().join("lineup");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        format!(
            "default_profile = \"front\"\n\n[profiles.front]\nserver = \"{}\"\ntoken_env = \"LINEUP_TEST_TOKEN\"\n",
            server.uri()
        ),
    )
    .unwrap();

    lineup_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("LINEUP_TEST_TOKEN", "from-env")
        .args(["-o", "plain", "lines", "list"])
        .assert()
        .success()
        .stdout("7\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_queue_list_json() {
    let server = MockServer::start().await;
    mount_queue(
        &server,
        json!([entry(1, "Ara", "WAITING"), entry(2, "Bo", "ENTERED"), entry(3, "Chan", "WAITING")]),
    )
    .await;

    let output = against(&server)
        .args(["-o", "json", "queue", "list", "7", "--numbers"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = listed.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["sequence"], 1);
    assert_eq!(rows[1]["sequence"], serde_json::Value::Null);
    assert_eq!(rows[2]["sequence"], 2);
    assert_eq!(rows[2]["position"], 3);
    assert_eq!(rows[0]["attendee_name"], "Ara");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_queue_list_plain_hides_entered() {
    let server = MockServer::start().await;
    mount_queue(
        &server,
        json!([entry(1, "Ara", "WAITING"), entry(2, "Bo", "ENTERED"), entry(3, "Chan", "WAITING")]),
    )
    .await;

    against(&server)
        .args(["-o", "plain", "queue", "list", "7", "--hide-entered"])
        .assert()
        .success()
        .stdout("1\n3\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_queue_move_sends_relative_reorder() {
    let server = MockServer::start().await;
    mount_queue(
        &server,
        json!([entry(1, "Ara", "WAITING"), entry(2, "Bo", "WAITING"), entry(3, "Chan", "WAITING")]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/queue/reorder"))
        .and(body_json(json!({
            "lineId": 7,
            "movedQueueId": 3,
            "targetQueueId": 1,
            "direction": "up"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    against(&server)
        .args(["-o", "plain", "queue", "move", "7", "3", "1"])
        .assert()
        .success()
        .stdout("3\n1\n2\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_queue_move_rejected_exits_with_conflict() {
    let server = MockServer::start().await;
    mount_queue(
        &server,
        json!([entry(1, "Ara", "WAITING"), entry(2, "Bo", "WAITING")]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/queue/reorder"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "queue changed",
            "code": "QUEUE_CONFLICT"
        })))
        .mount(&server)
        .await;

    against(&server)
        .args(["queue", "move", "7", "1", "2"])
        .assert()
        .failure()
        .code(6);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_queue_move_onto_itself_is_a_no_op() {
    let server = MockServer::start().await;
    mount_queue(&server, json!([entry(1, "Ara", "WAITING"), entry(2, "Bo", "WAITING")])).await;
    Mock::given(method("PUT"))
        .and(path("/queue/reorder"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    against(&server)
        .args(["-o", "plain", "queue", "move", "7", "2", "2"])
        .assert()
        .success()
        .stdout("1\n2\n")
        .stderr(predicate::str::contains("nothing to move"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_queue_move_unknown_entry_is_not_found() {
    let server = MockServer::start().await;
    mount_queue(&server, json!([entry(1, "Ara", "WAITING")])).await;

    against(&server)
        .args(["queue", "move", "7", "1", "99"])
        .assert()
        .failure()
        .code(4);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_queue_status_puts_uppercase_status() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/queue/3/status"))
        .and(body_json(json!({ "status": "ENTERED" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    against(&server)
        .args(["queue", "status", "3", "entered"])
        .assert()
        .success()
        .stderr(predicate::str::contains("entered"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_token_exits_with_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/line/list"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    against(&server)
        .args(["lines", "list"])
        .assert()
        .failure()
        .code(3);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lines_share_uses_server_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/line/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "name": "Brunch",
            "uuid": "6f1c2b1e-4d57-4a8e-9d7c-0a1b2c3d4e5f"
        })))
        .mount(&server)
        .await;

    against(&server)
        .args(["lines", "share", "7", "--base", "https://q.example.com/"])
        .assert()
        .success()
        .stdout("https://q.example.com/line/6f1c2b1e-4d57-4a8e-9d7c-0a1b2c3d4e5f\n");
}
