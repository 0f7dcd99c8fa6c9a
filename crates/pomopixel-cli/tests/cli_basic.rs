//! Basic CLI E2E tests.
//!
//! Every invocation points `--config` into a temp dir so the user's real
//! config is never read or written.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(config: &Path, args: &[&str], stdin: Option<&str>) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pomopixel-cli"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    {
        let mut pipe = child.stdin.take().expect("stdin is piped");
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&path, &["config", "path"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), path.display().to_string());
}

#[test]
fn test_config_list_is_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&path, &["config", "list"], None);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["timer"]["poll_interval_ms"], 250);
    assert_eq!(parsed["alerts"]["cue"], "short");
}

#[test]
fn test_config_get() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&path, &["config", "get", "timer.automatic_sequence"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "true");

    let (code, _, stderr) = run_cli(&path, &["config", "get", "timer.nope"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_init() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let (code, _, _) = run_cli(&path, &["config", "init"], None);
    assert_eq!(code, 0, "config init failed");
    assert!(path.exists());

    let (code, _, stderr) = run_cli(&path, &["config", "init"], None);
    assert_eq!(code, 1);
    assert!(stderr.contains("already exists"));

    let (code, _, _) = run_cli(&path, &["config", "init", "--force"], None);
    assert_eq!(code, 0);
}

#[test]
fn test_malformed_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[timer\nbroken").unwrap();
    let (code, _, stderr) = run_cli(&path, &["status"], None);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_status_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&path, &["status"], None);
    assert_eq!(code, 0, "status failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["type"], "StateSnapshot");
    assert_eq!(parsed["mode"], "focus");
    assert_eq!(parsed["remaining_secs"], 1500);
    assert_eq!(parsed["running"], false);
}

#[test]
fn test_run_reads_commands_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(
        &path,
        &["run", "--no-auto"],
        Some("mode short\nstatus\nbogus\nquit\n"),
    );
    assert_eq!(code, 0, "run failed");
    assert!(stdout.contains("25:00"));
    assert!(stdout.contains("05:00"));
    assert!(stdout.contains("unknown command: bogus"));
}

#[test]
fn test_run_reports_rejected_intents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let (code, stdout, _) = run_cli(&path, &["run"], Some("pause\ncontinue\nquit\n"));
    assert_eq!(code, 0, "run failed");
    assert!(stdout.contains("ignored: timer is not running"));
    assert!(stdout.contains("ignored: no finished session is waiting"));
}

#[test]
fn test_run_rejects_unknown_cue() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let (code, _, stderr) = run_cli(&path, &["run", "--cue", "gong"], Some("quit\n"));
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown cue"));
}
