use std::process::{Output, Stdio};

use serde_json::json;
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BINARY: &str = env!("CARGO_BIN_EXE_opsbuddy");
const GREETING: &str =
    "Hello! I'm OpsBuddy, your intelligent incident resolution assistant. How can I help you today?";

fn command(dir: &TempDir, args: &[&str]) -> Command {
    let mut cmd = Command::new(BINARY);
    cmd.args(args)
        .current_dir(dir.path())
        .env_clear()
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env("NO_COLOR", "1")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

async fn chat(args: &[&str], input: &str) -> Output {
    let dir = TempDir::new().unwrap();
    let mut child = command(&dir, args).spawn().expect("Failed to spawn opsbuddy");

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(input.as_bytes()).await.unwrap();
    drop(stdin);

    child.wait_with_output().await.unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[tokio::test]
async fn test_chat_session_answers_in_order() {
    let output = chat(
        &["chat", "--no-delay", "--mode", "local"],
        "INC0010002\nfind vpn\n\nsummary\nexit\n",
    )
    .await;
    let out = stdout(&output);

    assert!(output.status.success());
    let greeting = out.find(GREETING).expect("greeting shown");
    let lookup = out.find("Incident INC0010002: Primary database replication lag").unwrap();
    let search = out.find("Found 1 incident matching \"vpn\"").unwrap();
    let summary = out.find("Total incidents: 10").unwrap();
    let goodbye = out.find("Goodbye!").unwrap();

    assert!(greeting < lookup && lookup < search && search < summary && summary < goodbye);
    assert!(out.contains("OpsBuddy is typing..."));
}

#[tokio::test]
async fn test_chat_ends_on_eof() {
    let output = chat(&["chat", "--no-delay"], "stats\n").await;
    assert!(output.status.success());
    assert!(stdout(&output).contains("Open incidents: 6"));
}

#[tokio::test]
async fn test_chat_backend_mode_uses_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "intent": "CI Health Check",
            "sub_intent": "None",
            "response": {
                "ci": "ServerX",
                "health_status": "Warning",
                "details": "Disk at 91%",
                "recent_updates": "None",
                "dashboard": "No dashboard available"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = chat(
        &[
            "--mode",
            "backend",
            "--backend-url",
            &server.uri(),
            "chat",
            "--no-delay",
        ],
        "how healthy is ServerX\nquit\n",
    )
    .await;
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("CI: ServerX"));
    assert!(out.contains("- Health Status: Warning"));
}

#[tokio::test]
async fn test_chat_backend_down_shows_fallback_notice() {
    let output = chat(
        &[
            "--mode",
            "backend",
            "--backend-url",
            "http://127.0.0.1:9",
            "chat",
            "--no-delay",
        ],
        "why do deploys keep failing\nexit\n",
    )
    .await;
    let out = stdout(&output);

    assert!(output.status.success());
    assert!(out.contains("I couldn't connect to the backend service."));
    assert!(out.contains("Correlate the incident start time"));
}

#[tokio::test]
async fn test_probe_reports_both_states() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "intent": "General Queries",
            "response": {"message": "pong"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let up = command(&dir, &["--backend-url", &server.uri(), "probe"])
        .output()
        .await
        .unwrap();
    assert!(up.status.success());
    assert!(stdout(&up).contains("Backend connected"));

    let down = command(&dir, &["--backend-url", "http://127.0.0.1:9", "probe", "--format", "json"])
        .output()
        .await
        .unwrap();
    assert!(down.status.success());
    let json: serde_json::Value = serde_json::from_slice(&down.stdout).unwrap();
    assert_eq!(json["connected"], false);
    assert_eq!(json["status"], "Using fallback mode");
}
