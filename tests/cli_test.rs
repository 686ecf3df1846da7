#![allow(deprecated)]

//! End-to-end tests of the `callsum` binary
//!
//! The binary runs with a file-backed session store inside a temporary
//! directory and a `wiremock` backend, so no keyring or real server is
//! touched.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn callsum(dir: &Path) -> Command {
    callsum_with_config(dir, &dir.join("missing-config.yaml"))
}

fn callsum_with_config(dir: &Path, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("callsum").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("CALLSUM_API_BASE_URL")
        .env_remove("CALLSUM_SESSION_STORE")
        .env("CALLSUM_SESSION_FILE", dir.join("session.json"))
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    callsum(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("files"));
}

#[test]
fn test_protected_command_without_session_fails() {
    let dir = TempDir::new().unwrap();
    callsum(dir.path())
        .args(["files", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"))
        .stderr(predicate::str::contains("/auth"));
}

#[test]
fn test_summarize_without_session_fails_before_reading_file() {
    let dir = TempDir::new().unwrap();
    callsum(dir.path())
        .args(["summarize", "does-not-exist.wav"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_tmp, config_path) = common::temp_config_file(
        r#"
api:
  timeout_seconds: 0
"#,
    );
    let dir = TempDir::new().unwrap();
    callsum_with_config(dir.path(), &config_path)
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_seconds"));
}

#[tokio::test]
async fn test_health_prints_service_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Call Summarizer API",
            "version": "1.0.0",
            "docs": "/docs",
            "model": "gemini"
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    callsum(dir.path())
        .args(["--base-url", server.uri().as_str(), "health"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Call Summarizer API"))
        .stdout(predicate::str::contains("1.0.0"));
}

#[tokio::test]
async fn test_health_when_backend_down() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let dir = TempDir::new().unwrap();
    callsum(dir.path())
        .args(["--base-url", uri.as_str(), "health"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Unable to connect to the server. Please ensure the backend is running.",
        ));
}

#[tokio::test]
async fn test_signin_persists_session_for_later_commands() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .and(body_json(json!({"email": "ana@example.com", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::auth_response_json("cli-token")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/storage/files"))
        .and(header("authorization", "Bearer cli-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "f-1",
            "user_id": "user-1",
            "filename": "client-call.wav",
            "storage_path": "user-1/f-1.wav",
            "file_size": 1536,
            "created_at": "2025-01-01T10:00:00"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    callsum(dir.path())
        .args(["--base-url", server.uri().as_str()])
        .args(["auth", "signin", "--email", "ana@example.com", "--password", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as ana@example.com"));

    assert!(dir.path().join("session.json").exists());

    callsum(dir.path())
        .args(["--base-url", server.uri().as_str(), "files", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("client-call.wav"))
        .stdout(predicate::str::contains("1.5 KB"));
}

#[tokio::test]
async fn test_signout_clears_session_even_if_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::auth_response_json("tok")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/signout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    callsum(dir.path())
        .args(["--base-url", server.uri().as_str()])
        .args(["auth", "signin", "-e", "ana@example.com", "-p", "secret"])
        .assert()
        .success();

    callsum(dir.path())
        .args(["--base-url", server.uri().as_str(), "auth", "signout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out locally"))
        .stderr(predicate::str::contains("Request failed with status code 500"));

    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_summarize_rejects_unsupported_file_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::auth_response_json("tok")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "meeting notes").unwrap();

    callsum(dir.path())
        .args(["--base-url", server.uri().as_str()])
        .args(["auth", "signin", "-e", "ana@example.com", "-p", "secret"])
        .assert()
        .success();

    callsum(dir.path())
        .args(["--base-url", server.uri().as_str(), "summarize"])
        .arg(&notes)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid file format. Supported formats: .wav, .mp3, .m4a, .flac, .ogg",
        ));
}

#[tokio::test]
async fn test_transcribe_prints_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::auth_response_json("tok")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/transcript"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(" Good morning, team.")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let recording = dir.path().join("standup.wav");
    std::fs::write(&recording, b"RIFF").unwrap();

    callsum(dir.path())
        .args(["--base-url", server.uri().as_str()])
        .args(["auth", "signin", "-e", "ana@example.com", "-p", "secret"])
        .assert()
        .success();

    callsum(dir.path())
        .args(["--base-url", server.uri().as_str(), "transcribe"])
        .arg(&recording)
        .assert()
        .success()
        .stdout(predicate::str::contains("Good morning, team."));
}
