//! CLI integration tests
//!
//! Tests the sshw CLI using assert_cmd. Only non-interactive paths are
//! covered; the picker needs a real terminal.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SAMPLE_CONFIG: &str = r#"
[[groups]]
name = "prod"

[[groups.targets]]
name = "web1"
host = "10.0.0.5"
password = "secret"

[[groups.targets]]
name = "db1"
alias = "db"
host = "10.0.0.9"
user = "postgres"
port = 2222
"#;

fn sshw() -> Command {
    Command::cargo_bin("sshw")
        .expect("Failed to locate sshw binary - ensure it's built before running tests")
}

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("sshw.toml");
    std::fs::write(&path, content).expect("Failed to write test config");
    path
}

fn with_cfg(path: &Path) -> Command {
    let mut cmd = sshw();
    cmd.arg("--cfg").arg(path);
    cmd
}

#[test]
fn test_cli_help() {
    sshw()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sshw"))
        .stdout(predicate::str::contains("Interactive SSH host launcher"));
}

#[test]
fn test_cli_version() {
    sshw()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sshw"));

    sshw()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_config_help() {
    sshw()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("backup"));
}

#[test]
fn test_cli_config_path_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");

    with_cfg(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_cli_list() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SAMPLE_CONFIG);

    with_cfg(&path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("web1"))
        .stdout(predicate::str::contains("root"))
        .stdout(predicate::str::contains("2222"))
        .stdout(predicate::str::contains("postgres"));
}

#[test]
fn test_cli_list_long_hides_secrets() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SAMPLE_CONFIG);

    with_cfg(&path)
        .args(["list", "--long"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ALIAS"))
        .stdout(predicate::str::contains("secret").not());
}

#[test]
fn test_cli_config_show_redacts() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SAMPLE_CONFIG);

    with_cfg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web1"))
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("\"secret\"").not());
}

#[test]
fn test_cli_config_validate_ok() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SAMPLE_CONFIG);

    with_cfg(&path)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));
}

#[test]
fn test_cli_config_validate_rejects_missing_host() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[[groups]]\nname = \"prod\"\n\n[[groups.targets]]\nname = \"web1\"\nhost = \"\"\n",
    );

    with_cfg(&path)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("web1"));
}

#[test]
fn test_cli_config_backup() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SAMPLE_CONFIG);

    with_cfg(&path)
        .args(["config", "backup"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".bak"));

    let backups = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".bak"))
        .count();
    assert_eq!(backups, 1);
}

#[test]
fn test_cli_config_init() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sshw.toml");

    with_cfg(&path).args(["config", "init"]).assert().success();
    assert!(path.exists());

    with_cfg(&path)
        .args(["config", "validate"])
        .assert()
        .success();
}

#[test]
fn test_cli_config_init_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SAMPLE_CONFIG);

    with_cfg(&path)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);

    with_cfg(&path)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_cli_missing_config_is_generated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.toml");

    with_cfg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("default configuration was generated"));

    assert!(path.exists());
}

#[test]
fn test_cli_unknown_command() {
    sshw().arg("frobnicate").assert().failure();
}
