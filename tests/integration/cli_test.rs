use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const BINARY: &str = env!("CARGO_BIN_EXE_opsbuddy");

/// Runs the binary in an empty directory with a scrubbed environment so no
/// local config, .env file or API key leaks into the test.
fn run_opsbuddy_in(dir: &Path, args: &[&str], env_vars: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(BINARY);
    cmd.args(args)
        .current_dir(dir)
        .env_clear()
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("NO_COLOR", "1");
    for (key, value) in env_vars {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute opsbuddy command")
}

fn run_opsbuddy(args: &[&str]) -> Output {
    let dir = TempDir::new().unwrap();
    run_opsbuddy_in(dir.path(), args, &[])
}

fn output_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

mod version_command_tests {
    use super::*;

    #[test]
    fn test_version_command_basic() {
        let output = run_opsbuddy(&["version"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "version command should succeed");
        assert!(stdout.contains("opsbuddy"));
        assert!(stdout.contains("0.1.0"), "output should contain version number");
    }

    #[test]
    fn test_version_command_detailed() {
        let output = run_opsbuddy(&["version", "--detailed"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "version --detailed should succeed");
        assert!(stdout.contains("Version"));
        assert!(stdout.contains("Apache-2.0"));
        assert!(stdout.contains("Response Modes"));
    }
}

mod ask_command_tests {
    use super::*;

    #[test]
    fn test_ask_incident_lookup() {
        let output = run_opsbuddy(&["ask", "what", "about", "inc0010002?"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "stderr: {}", stderr_to_string(&output));
        assert!(stdout.contains("Incident INC0010002: Primary database replication lag"));
    }

    #[test]
    fn test_ask_json_output() {
        let output = run_opsbuddy(&["ask", "--format", "json", "give me a summary"]);
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["mode"], "local");
        assert_eq!(json["severity"], "critical");
        assert!(json["content"]
            .as_str()
            .unwrap()
            .contains("Total incidents: 10"));
    }

    #[test]
    fn test_ask_search_without_matches() {
        let output = run_opsbuddy(&["ask", "search for mainframe tape robot"]);
        assert!(output.status.success());
        assert!(output_to_string(&output).contains("couldn't find"));
    }

    #[test]
    fn test_ask_requires_text() {
        let output = run_opsbuddy(&["ask"]);
        assert!(!output.status.success());
    }
}

mod incidents_command_tests {
    use super::*;

    #[test]
    fn test_incidents_list() {
        let output = run_opsbuddy(&["incidents", "list"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("INC0010001"));
        assert!(stdout.contains("INC0010010"));
        assert!(stdout.contains("Total: 10 incidents"));
    }

    #[test]
    fn test_incidents_list_open_json() {
        let output = run_opsbuddy(&["incidents", "list", "--open", "--format", "json"]);
        assert!(output.status.success());

        let json: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json.len(), 6);
        assert!(json.iter().all(|i| i["status"] != "Resolved"));
    }

    #[test]
    fn test_incidents_show_missing_id_fails_with_code() {
        let output = run_opsbuddy(&["incidents", "show", "INC0000404"]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(stderr.contains("E3001"), "stderr: {}", stderr);
        assert!(stderr.contains("INC0000404"));
    }

    #[test]
    fn test_incidents_summary_json() {
        let output = run_opsbuddy(&["incidents", "summary", "--format", "json"]);
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["total"], 10);
        assert_eq!(json["open"], 6);
        assert_eq!(json["critical"], 3);
    }

    #[test]
    fn test_incidents_search() {
        let output = run_opsbuddy(&["incidents", "search", "Network"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("INC0010003"));
        assert!(stdout.contains("INC0010007"));
        assert!(stdout.contains("Found: 2 incidents"));
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_invalid_mode_flag_is_rejected() {
        let output = run_opsbuddy(&["--mode", "psychic", "ask", "hello"]);
        assert!(!output.status.success());
    }

    #[test]
    fn test_invalid_backend_url_reports_config_error() {
        let output = run_opsbuddy(&["--backend-url", "localhost:5000", "ask", "hello"]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(stderr.contains("E2005"), "stderr: {}", stderr);
    }

    #[test]
    fn test_config_file_replaces_dataset() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("incidents.json"),
            r#"[{
                "id": "INC7777777",
                "short_description": "Only incident in the custom file",
                "description": "Loaded through data.incidents_path",
                "status": "Open",
                "priority": "3-Moderate",
                "category": "Software",
                "subcategory": "Config",
                "affected_service": "custom-svc",
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:00:00Z"
            }]"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("opsbuddy.toml"),
            format!(
                "[data]\nincidents_path = \"{}\"\n",
                dir.path().join("incidents.json").display()
            ),
        )
        .unwrap();

        let output = run_opsbuddy_in(dir.path(), &["incidents", "summary", "--format", "json"], &[]);
        assert!(output.status.success(), "stderr: {}", stderr_to_string(&output));

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["total"], 1);
    }

    #[test]
    fn test_blank_api_key_does_not_block_startup() {
        let dir = TempDir::new().unwrap();
        let output = run_opsbuddy_in(
            dir.path(),
            &["ask", "why is the network slow"],
            &[("OPSBUDDY_LLM__API_KEY", ""), ("OPENAI_API_KEY", " ")],
        );

        assert!(output.status.success(), "stderr: {}", stderr_to_string(&output));
        assert!(output_to_string(&output).contains("network related"));
    }

    #[test]
    fn test_rust_log_off_is_accepted() {
        let dir = TempDir::new().unwrap();
        for filter in ["off", "opsbuddy_core"] {
            let output = run_opsbuddy_in(dir.path(), &["ask", "stats"], &[("RUST_LOG", filter)]);
            assert!(
                output.status.success(),
                "RUST_LOG={} stderr: {}",
                filter,
                stderr_to_string(&output)
            );
        }
    }

    #[test]
    fn test_environment_sets_mode() {
        let dir = TempDir::new().unwrap();
        let output = run_opsbuddy_in(
            dir.path(),
            &["ask", "--format", "json", "stats"],
            &[("OPSBUDDY_MODE", "backend")],
        );
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["mode"], "backend");
    }
}
