//! The `desk` binary end to end against a scripted backend.

use std::process::{Command, Output};

use desk_http::testing::{MockResponse, MockServer};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

struct Harness {
    server: MockServer,
    home: TempDir,
}

impl Harness {
    fn start() -> Self {
        Self {
            server: MockServer::start().unwrap(),
            home: tempfile::tempdir().unwrap(),
        }
    }

    fn desk(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_desk"))
            .args(args)
            .current_dir(self.home.path())
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path())
            .env("ORGDESK_API__BASE_URL", self.server.base_url())
            .env("ORGDESK_SESSION__BACKEND", "memory")
            .env_remove("ORGDESK_LOG")
            .output()
            .unwrap()
    }

    fn desk_json(&self, args: &[&str]) -> Value {
        let mut full = args.to_vec();
        full.extend(["--format", "json"]);
        let output = self.desk(&full);
        assert!(
            output.status.success(),
            "desk failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

fn ok(data: Value) -> MockResponse {
    MockResponse::json(200, &json!({"success": true, "data": data}))
}

fn acme() -> Value {
    json!({"id": 42, "name": "Acme Old", "email": "old@acme.test", "phone": "555-0100"})
}

#[test]
fn status_reports_signed_out_memory_session() {
    let harness = Harness::start();

    let status = harness.desk_json(&["auth", "status"]);

    assert_eq!(status["authenticated"], json!(false));
    assert_eq!(status["backend"], json!("memory"));
    assert!(harness.server.requests().is_empty());
}

#[test]
fn show_prints_decorated_card() {
    let harness = Harness::start();
    harness.server.mock("GET", "/organisations/42", ok(acme()));

    let report = harness.desk_json(&["org", "show", "42"]);

    assert_eq!(report["card"]["name"], json!("Acme Old"));
    assert_eq!(report["card"]["decorations"]["avatar"], json!("AO"));
    assert_eq!(report["card"]["decorations"]["role"], json!("Guest"));
    assert_eq!(report["banner"], Value::Null);
}

#[test]
fn failed_show_exits_non_zero_with_message() {
    let harness = Harness::start();
    harness.server.mock(
        "GET",
        "/organisations/9",
        MockResponse::json(404, &json!({"success": false, "message": "Organization not found"})),
    );

    let output = harness.desk(&["org", "show", "9"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("desk error: Organization not found"), "{stderr}");
}

#[test]
fn create_without_email_never_calls_the_backend() {
    let harness = Harness::start();

    let output = harness.desk(&["org", "create", "--name", "Initech"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Organization name and email are required"), "{stderr}");
    assert!(harness.server.requests().is_empty());
}

#[test]
fn edit_sends_only_changed_fields() {
    let harness = Harness::start();
    harness.server.mock("GET", "/organisations/42", ok(acme()));
    harness.server.mock(
        "PUT",
        "/organisations/42",
        ok(json!({"id": 42, "name": "Acme", "email": "old@acme.test"})),
    );

    let report = harness.desk_json(&["org", "edit", "42", "--name", "Acme", "--phone", ""]);

    let puts = harness.server.requests_to("PUT", "/organisations/42");
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].json(), Some(json!({"name": "Acme", "phone": ""})));
    assert_eq!(report["banner"]["text"], json!("Organization updated successfully"));
    assert_eq!(report["card"]["name"], json!("Acme"));
    assert_eq!(report["card"]["phone"], Value::Null);
}

#[test]
fn delete_with_yes_skips_the_prompt() {
    let harness = Harness::start();
    harness.server.mock("GET", "/organisations/42", ok(acme()));
    harness.server.mock(
        "DELETE",
        "/organisations/42",
        MockResponse::json(200, &json!({"success": true, "message": "Deleted"})),
    );

    let report = harness.desk_json(&["org", "delete", "42", "--yes"]);

    assert_eq!(harness.server.requests_to("DELETE", "/organisations/42").len(), 1);
    assert_eq!(report["banner"]["text"], json!("Deleted"));
    assert_eq!(report["card"], Value::Null);
}

#[test]
fn list_uses_configured_page_size() {
    let harness = Harness::start();
    harness.server.mock(
        "GET",
        "/organisations",
        ok(json!({"data": [acme()], "current_page": 1, "last_page": 1, "total": 1})),
    );

    let page = harness.desk_json(&["org", "list"]);

    let request = &harness.server.requests_to("GET", "/organisations")[0];
    assert_eq!(
        request.query_pairs(),
        vec![
            ("page".to_string(), "1".to_string()),
            ("per_page".to_string(), "15".to_string()),
        ]
    );
    assert_eq!(page["items"][0]["name"], json!("Acme Old"));
    assert_eq!(page["total"], json!(1));
}
