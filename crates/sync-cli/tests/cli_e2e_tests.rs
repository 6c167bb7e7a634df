//! End-to-end tests that invoke the compiled `settings-sync` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const REMOTE: &str = r#"{
  "editor.fontSize": 13,

  // @sync os=mac
  "terminal.integrated.shell.osx": "/bin/zsh",

  // @sync os=linux
  "terminal.integrated.shell.linux": "/bin/bash",

  // @sync host=workstation
  "http.proxy": "http://proxy.corp:8080"
}
"#;

/// A `settings-sync` command isolated from the user's config and environment.
fn sync_cmd(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("settings-sync").expect("Failed to find settings-sync binary");
    cmd.env("SETTINGS_SYNC_CONFIG", temp.path().join("config.toml"))
        .env_remove("SETTINGS_SYNC_HOST")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

#[test]
fn test_help_exits_zero() {
    let temp = TempDir::new().unwrap();
    sync_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("prepare"))
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_prepare_prints_upload_form() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("settings.json");
    write(
        &file,
        "{\n  // @sync-ignore\n  \"github.token\": \"secret\",\n  // @sync os = mac\n  //  \"a\": 1\n}\n",
    );

    sync_cmd(&temp)
        .args(["prepare", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout("{\n  // @sync os=mac\n  \"a\": 1\n}\n");
}

#[test]
fn test_apply_rewrites_for_os() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("settings.json");
    let remote = temp.path().join("remote.json");
    write(&local, "{\n  // @sync-ignore\n  \"github.token\": \"secret\",\n}\n");
    write(&remote, REMOTE);

    sync_cmd(&temp)
        .args(["apply", local.to_str().unwrap(), "--incoming", remote.to_str().unwrap()])
        .args(["--os", "linux"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated"));

    let written = fs::read_to_string(&local).unwrap();
    assert!(written.contains("  //  \"terminal.integrated.shell.osx\""));
    assert!(written.contains("\n  \"terminal.integrated.shell.linux\""));
    assert!(written.contains("  //  \"http.proxy\""));
    assert!(written.contains("  // @sync-ignore\n  \"github.token\": \"secret\","));

    sync_cmd(&temp)
        .args(["apply", local.to_str().unwrap(), "-i", remote.to_str().unwrap()])
        .args(["--os", "linux"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));
}

#[test]
fn test_apply_host_from_environment() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("settings.json");
    let remote = temp.path().join("remote.json");
    write(&remote, REMOTE);

    sync_cmd(&temp)
        .env("SETTINGS_SYNC_HOST", "workstation")
        .args(["apply", local.to_str().unwrap(), "-i", remote.to_str().unwrap()])
        .args(["--os", "mac"])
        .assert()
        .success();

    let written = fs::read_to_string(&local).unwrap();
    assert!(written.contains("\n  \"http.proxy\""));
    assert!(written.contains("\n  \"terminal.integrated.shell.osx\""));
}

#[test]
fn test_apply_host_from_config_file() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("settings.json");
    let remote = temp.path().join("remote.json");
    write(&temp.path().join("config.toml"), "host_name = \"workstation\"\nos = \"linux\"\n");
    write(&remote, REMOTE);

    sync_cmd(&temp)
        .args(["apply", local.to_str().unwrap(), "-i", remote.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("linux (workstation)"));

    let written = fs::read_to_string(&local).unwrap();
    assert!(written.contains("\n  \"http.proxy\""));
}

#[test]
fn test_apply_dry_run_prints_diff() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("settings.json");
    let remote = temp.path().join("remote.json");
    write(&local, REMOTE);
    write(&remote, REMOTE);

    sync_cmd(&temp)
        .args(["apply", local.to_str().unwrap(), "-i", remote.to_str().unwrap()])
        .args(["--os", "windows", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+++ b/"))
        .stdout(predicate::str::contains("-  \"terminal.integrated.shell.osx\""))
        .stdout(predicate::str::contains("+  //  \"terminal.integrated.shell.osx\""));

    assert_eq!(fs::read_to_string(&local).unwrap(), REMOTE);
}

#[test]
fn test_apply_missing_incoming_fails() {
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("settings.json");

    sync_cmd(&temp)
        .args(["apply", local.to_str().unwrap(), "-i", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_unknown_os_flag_is_rejected() {
    let temp = TempDir::new().unwrap();
    sync_cmd(&temp)
        .args(["inspect", "settings.json", "--os", "plan9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("plan9"));
}

#[test]
fn test_check_well_formed() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("settings.json");
    write(&file, REMOTE);

    sync_cmd(&temp)
        .args(["check", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("is well-formed"));
}

#[test]
fn test_check_malformed_exits_non_zero() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("settings.json");
    write(&file, "{\n  \"a\": 1\n  \"b\": 2\n}\n");

    sync_cmd(&temp)
        .args(["check", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not well-formed"));
}

#[test]
fn test_inspect_json() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("settings.json");
    write(&file, REMOTE);

    let output = sync_cmd(&temp)
        .args(["inspect", file.to_str().unwrap(), "--json", "--os", "mac"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["line"], 4);
    assert_eq!(reports[0]["verdict"]["verdict"], "applies");
    assert_eq!(reports[1]["verdict"]["verdict"], "excluded");
    assert_eq!(reports[2]["directive"]["conditions"][0]["key"], "host");
}

#[test]
fn test_inspect_human_output() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("settings.json");
    write(&file, REMOTE);

    sync_cmd(&temp)
        .args(["inspect", file.to_str().unwrap(), "--os", "linux"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "line 4: @sync os=mac -> commented out (line 5)",
        ))
        .stdout(predicate::str::contains("line 7: @sync os=linux -> active (line 8)"));
}
