//! CLI tests against a mock record service.
//!
//! The binary is spawned as a child process and pointed at a wiremock
//! server through `--url`.

use std::process::Output;

use serde_json::{Value, json};
use tokio::process::Command;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENV_VARS: &[&str] = &[
    "PBASE_URL",
    "PBASE_ADMIN_EMAIL",
    "PBASE_ADMIN_PASSWORD",
    "PBASE_USER_EMAIL",
    "PBASE_USER_PASSWORD",
    "PBASE_AUTH_COLLECTION",
    "PBASE_ADMIN_TOKEN",
    "PBASE_USER_TOKEN",
];

/// Run the CLI binary against `server` with retries off.
async fn run_cli(server: &MockServer, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pbase"));
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.args(["--url", &server.uri(), "--retries", "0"]);
    cmd.args(args);
    cmd.output().await.expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
async fn run_cli_success(server: &MockServer, args: &[&str]) -> String {
    let output = run_cli(server, args).await;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

async fn mount_admin_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/collections/_superusers/auth-with-password"))
        .and(body_json(json!({
            "identity": "root@example.com",
            "password": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok",
            "record": {"id": "su1", "email": "root@example.com"}
        })))
        .mount(server)
        .await;
}

const ADMIN: &[&str] = &[
    "--admin-email",
    "root@example.com",
    "--admin-password",
    "secret",
];

fn with_admin<'a>(args: &[&'a str]) -> Vec<&'a str> {
    let mut all: Vec<&str> = ADMIN.to_vec();
    all.extend_from_slice(args);
    all
}

#[tokio::test]
async fn test_version() {
    let server = MockServer::start().await;
    let stdout = run_cli_success(&server, &["--version"]).await;
    assert!(stdout.starts_with("pbase "));
}

#[tokio::test]
async fn test_whoami_logs_in() {
    let server = MockServer::start().await;
    mount_admin_login(&server).await;

    let stdout = run_cli_success(&server, &with_admin(&["whoami", "--record"])).await;
    assert!(stdout.contains("email-password"));
    assert!(stdout.contains("_superusers"));
    assert!(stdout.contains("su1"));
}

#[tokio::test]
async fn test_records_get() {
    let server = MockServer::start().await;
    mount_admin_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/collections/notes/records/r1"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r1",
            "title": "hello"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stdout = run_cli_success(&server, &with_admin(&["records", "get", "notes", "r1"])).await;
    let record: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["title"], "hello");
}

#[tokio::test]
async fn test_debug_logs_hide_credentials() {
    let server = MockServer::start().await;
    mount_admin_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/collections/notes/records/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "r1",
            "title": "visible"
        })))
        .mount(&server)
        .await;

    let output = run_cli(
        &server,
        &with_admin(&["--debug", "-vv", "records", "get", "notes", "r1"]),
    )
    .await;
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("auth-with-password"));
    assert!(stderr.contains("REDACTED"));
    assert!(!stderr.contains("secret"));
    assert!(!stderr.contains(r#""token":"tok""#));
    // Record bodies are still logged in debug mode.
    assert!(stderr.contains("visible"));
}

#[tokio::test]
async fn test_path_arguments_are_escaped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/collections/my%20notes/records/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "a/b"})))
        .expect(1)
        .mount(&server)
        .await;

    let stdout = run_cli_success(&server, &["records", "get", "my notes", "a/b"]).await;
    let record: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(record["id"], "a/b");
}

#[tokio::test]
async fn test_records_create_prints_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/collections/notes/records"))
        .and(body_json(json!({"title": "x"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc123",
            "title": "x"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stdout = run_cli_success(
        &server,
        &["records", "create", "notes", "--data", r#"{"title":"x"}"#],
    )
    .await;
    assert_eq!(stdout.trim(), "abc123");
}

#[tokio::test]
async fn test_records_update_and_delete() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/collections/notes/records/r1"))
        .and(body_json(json!({"done": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "r1"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/collections/notes/records/r1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    run_cli_success(
        &server,
        &["records", "update", "notes", "r1", "--data", r#"{"done":true}"#],
    )
    .await;
    run_cli_success(&server, &["records", "delete", "notes", "r1"]).await;
}

#[tokio::test]
async fn test_records_list_passes_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/collections/notes/records"))
        .and(query_param("page", "2"))
        .and(query_param("perPage", "10"))
        .and(query_param("filter", "done=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "perPage": 10,
            "totalItems": 12,
            "totalPages": 2,
            "items": [{"id": "k"}, {"id": "l"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stdout = run_cli_success(
        &server,
        &[
            "records",
            "list",
            "notes",
            "--page",
            "2",
            "--per-page",
            "10",
            "--filter",
            "done=true",
        ],
    )
    .await;

    let ids: Vec<String> = stdout
        .lines()
        .map(|line| serde_json::from_str::<Value>(line).unwrap()["id"].to_string())
        .collect();
    assert_eq!(ids, vec![r#""k""#, r#""l""#]);
}

#[tokio::test]
async fn test_records_full_list_walks_pages() {
    let server = MockServer::start().await;

    for (page, id) in [("1", "a"), ("2", "b")] {
        Mock::given(method("GET"))
            .and(path("/api/collections/notes/records"))
            .and(query_param("page", page))
            .and(query_param("perPage", "500"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "page": page.parse::<i64>().unwrap(),
                "perPage": 500,
                "totalItems": 2,
                "totalPages": 2,
                "items": [{"id": id}]
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let stdout = run_cli_success(&server, &["records", "full-list", "notes"]).await;
    assert_eq!(stdout.lines().count(), 2);
}

#[tokio::test]
async fn test_records_full_list_failure_prints_partial() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/collections/notes/records"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "perPage": 500,
            "totalItems": 3,
            "totalPages": 2,
            "items": [{"id": "a"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/collections/notes/records"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output = run_cli(&server, &["records", "full-list", "notes"]).await;
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 1);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("500"));
}

#[tokio::test]
async fn test_not_found_exits_nonzero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/collections/notes/records/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "message": "The requested resource wasn't found."
        })))
        .mount(&server)
        .await;

    let output = run_cli(&server, &["records", "get", "notes", "nope"]).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to get record"));
    assert!(stderr.contains("wasn't found"));
}

#[tokio::test]
async fn test_auth_failure_exits_nonzero() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/collections/_superusers/auth-with-password"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let output = run_cli(&server, &with_admin(&["records", "get", "notes", "r1"])).await;
    assert!(!output.status.success());

    // Only the login was attempted.
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_collections_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/collections"))
        .and(query_param("filters", "system=false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "perPage": 30,
            "totalItems": 1,
            "totalPages": 1,
            "items": [{"id": "c1", "name": "notes", "type": "base"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stdout = run_cli_success(
        &server,
        &["collections", "list", "--filter", "system=false"],
    )
    .await;
    assert!(stdout.contains("notes"));
    assert!(stdout.contains("base"));
}

#[tokio::test]
async fn test_backups_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/backups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"key": "a.zip", "size": 10, "modified": "2024-01-01 00:00:00.000Z"}
        ])))
        .mount(&server)
        .await;

    let stdout = run_cli_success(&server, &["backups", "list"]).await;
    assert!(stdout.contains("a.zip"));
}

#[tokio::test]
async fn test_files_url_needs_no_server() {
    let server = MockServer::start().await;

    let stdout = run_cli_success(
        &server,
        &["files", "url", "posts", "r1", "cover.png", "--thumb", "100x100"],
    )
    .await;
    assert_eq!(
        stdout.trim(),
        format!("{}/api/files/posts/r1/cover.png?thumb=100x100", server.uri())
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}
