//! Basic CLI E2E tests.
//!
//! Each test points the binary at its own data directory.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command against `data_dir` and return (stdout, stderr, code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_stillwater"))
        .args(args)
        .env("STILLWATER_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command failed {:?}: {}", args, stderr);
    stdout
}

fn parse_json(json: &str) -> serde_json::Value {
    serde_json::from_str(json).expect("Failed to parse JSON output")
}

#[test]
fn test_presets_list_json() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["presets", "list", "--json"]);
    let presets = parse_json(&out);
    let presets = presets.as_array().unwrap();
    assert_eq!(presets.len(), 11);
    assert!(presets.iter().any(|p| p["id"] == "box-breathing"));
}

#[test]
fn test_presets_show() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(dir.path(), &["presets", "show", "box-breathing"]);
    let preset = parse_json(&out);
    assert_eq!(preset["type"], "box_breathing");
    assert_eq!(preset["duration_secs"], 300);
    assert_eq!(preset["phases"].as_array().unwrap().len(), 4);
}

#[test]
fn test_presets_show_unknown() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["presets", "show", "nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown preset"));
}

#[test]
fn test_custom_preset_lifecycle() {
    let dir = TempDir::new().unwrap();
    let out = run_cli_success(
        dir.path(),
        &[
            "presets", "create",
            "--name", "Evening",
            "--description", "Slow exhale",
            "--duration", "120",
            "--cycles", "12",
            "--phase", "inhale:4:Breathe in",
            "--phase", "exhale:6",
        ],
    );
    let created = parse_json(&out);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["phases"][1]["instruction"], "Exhale");

    let listed = parse_json(&run_cli_success(dir.path(), &["presets", "list", "--json"]));
    assert_eq!(listed.as_array().unwrap().len(), 12);

    let shown = parse_json(&run_cli_success(dir.path(), &["presets", "show", &id]));
    assert_eq!(shown["name"], "Evening");

    run_cli_success(dir.path(), &["presets", "delete", &id]);
    let (_, _, code) = run_cli(dir.path(), &["presets", "show", &id]);
    assert_ne!(code, 0);
}

#[test]
fn test_custom_preset_validation() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(
        dir.path(),
        &["presets", "create", "--name", "Short", "--description", "Too short", "--duration", "30"],
    );
    assert_ne!(code, 0);
}

#[test]
fn test_builtin_preset_cannot_be_deleted() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["presets", "delete", "countdown-5"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("built-in"));
}

#[test]
fn test_run_records_session() {
    let dir = TempDir::new().unwrap();
    run_cli_success(dir.path(), &["config", "set", "session.return_delay_secs", "0"]);

    let out = run_cli_success(
        dir.path(),
        &["run", "countdown-5", "--tick-ms", "1", "--json", "--quiet"],
    );
    let events: Vec<serde_json::Value> = out.lines().map(parse_json).collect();
    assert_eq!(events.first().unwrap()["type"], "session_started");
    assert_eq!(events.last().unwrap()["type"], "session_completed");

    let sessions = parse_json(&run_cli_success(dir.path(), &["sessions", "list"]));
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["preset_id"], "countdown-5");

    let stats = parse_json(&run_cli_success(dir.path(), &["sessions", "stats"]));
    assert_eq!(stats["total_sessions"], 1);
    assert_eq!(stats["total_minutes"], 5);
    assert_eq!(stats["current_streak"], 1);

    let last = run_cli_success(dir.path(), &["config", "get", "last_used_preset"]);
    assert_eq!(last.trim(), "countdown-5");
}

#[test]
fn test_run_unknown_preset() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["run", "missing", "--tick-ms", "1"]);
    assert_ne!(code, 0);
}

#[test]
fn test_sessions_empty() {
    let dir = TempDir::new().unwrap();
    let sessions = parse_json(&run_cli_success(dir.path(), &["sessions", "list", "--limit", "5"]));
    assert!(sessions.as_array().unwrap().is_empty());
}

#[test]
fn test_config_get_set_reset() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "sound.volume"]).trim(), "50");

    run_cli_success(dir.path(), &["config", "set", "sound.volume", "80"]);
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "sound.volume"]).trim(), "80");

    let list = parse_json(&run_cli_success(dir.path(), &["config", "list"]));
    assert_eq!(list["sound"]["volume"], 80);

    run_cli_success(dir.path(), &["config", "reset"]);
    assert_eq!(run_cli_success(dir.path(), &["config", "get", "sound.volume"]).trim(), "50");
}

#[test]
fn test_config_unknown_key() {
    let dir = TempDir::new().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["config", "get", "theme"]);
    assert_ne!(code, 0);
    let (_, _, code) = run_cli(dir.path(), &["config", "set", "theme", "dark"]);
    assert_ne!(code, 0);
}
