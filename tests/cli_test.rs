//! Integration tests for the devstrap binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Catalog that never touches the host: `sh` is always present, the
/// other command never is, and the only install methods are echoes.
const TEST_CATALOG: &str = r#"
software:
  - name: Shell
    platforms: [darwin, linux]
    check: { commands: [sh] }
    methods:
      - mac_manual: echo shell
      - linux_manual: echo shell
  - name: Devstrap Missing Tool
    platforms: [darwin, linux]
    check: { commands: [devstrap-missing-tool-3f9a] }
    methods:
      - mac_manual: echo devstrap
      - linux_manual: echo devstrap
  - name: Windows Only
    category: ui
    platforms: [windows]
    check: { commands: [notepad] }
"#;

fn write_config(content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yml");
    fs::write(&path, content).unwrap();
    (temp, path)
}

fn devstrap() -> Command {
    let mut cmd = Command::new(cargo_bin("devstrap"));
    cmd.env("NO_COLOR", "1").env_remove("DEVSTRAP_CONFIG");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    devstrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workstation provisioning"))
        .stdout(predicate::str::contains("list"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    devstrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn list_marks_installed_state() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp, config) = write_config(TEST_CATALOG);
    devstrap()
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ shell"))
        .stdout(predicate::str::contains("✗ devstrap-missing-tool"))
        .stdout(predicate::str::contains("windows-only").not());
    Ok(())
}

#[test]
fn list_all_includes_other_platforms() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp, config) = write_config(TEST_CATALOG);
    devstrap()
        .arg("--config")
        .arg(&config)
        .args(["list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- windows-only"));
    Ok(())
}

#[test]
fn list_json_is_machine_readable() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp, config) = write_config(TEST_CATALOG);
    let output = devstrap()
        .arg("--config")
        .arg(&config)
        .args(["list", "--json"])
        .output()?;
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let rows = rows.as_array().ok_or("expected a JSON array")?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], "shell");
    assert_eq!(rows[0]["state"], "installed");
    assert_eq!(rows[1]["state"], "missing");
    Ok(())
}

#[test]
fn list_builtin_catalog_without_config() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    devstrap()
        .env("HOME", home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("zsh"))
        .stdout(predicate::str::contains("visual-studio-code"));
    Ok(())
}

#[test]
fn dry_run_plans_missing_software() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp, config) = write_config(TEST_CATALOG);
    devstrap()
        .arg("--config")
        .arg(&config)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Shell is already installed"))
        .stdout(predicate::str::contains(
            "Devstrap Missing Tool would be installed",
        ))
        .stdout(predicate::str::contains("$ sh -c 'echo devstrap'"))
        .stdout(predicate::str::contains("1 to install, 1 already installed"));
    Ok(())
}

#[test]
fn quiet_dry_run_drops_the_banner() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp, config) = write_config(TEST_CATALOG);
    devstrap()
        .arg("--config")
        .arg(&config)
        .args(["-q", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Provisioning").not())
        .stdout(predicate::str::contains("Devstrap Missing Tool would be installed"));
    Ok(())
}

#[test]
fn check_alias_and_allow_list() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp, config) = write_config(TEST_CATALOG);
    devstrap()
        .arg("--config")
        .arg(&config)
        .args(["install", "--check", "Shell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Provisioning 1 package"))
        .stdout(predicate::str::contains("Missing Tool").not());
    Ok(())
}

#[test]
fn unknown_software_fails() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp, config) = write_config(TEST_CATALOG);
    devstrap()
        .arg("--config")
        .arg(&config)
        .args(["--dry-run", "emacs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown software 'emacs'"))
        .stderr(predicate::str::contains("shell"));
    Ok(())
}

#[test]
fn entry_without_applicable_method_fails_the_run() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp, config) = write_config(
        r#"
software:
  - name: Mac App
    platforms: [darwin, linux]
    check: { commands: [devstrap-missing-tool-3f9a] }
    methods:
      - flatpak: { package: org.example.MacApp }
  - name: Shell
    platforms: [darwin, linux]
    check: { commands: [sh] }
"#,
    );
    devstrap()
        .arg("--config")
        .arg(&config)
        .arg("--dry-run")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Shell is already installed"))
        .stderr(predicate::str::contains("Failed: Mac App"));
    Ok(())
}

#[test]
fn missing_config_file_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    devstrap()
        .arg("--config")
        .arg(temp.path().join("nope.yml"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration not found"));
    Ok(())
}

#[test]
fn invalid_config_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let (_temp, config) = write_config("software: [ {name: ");
    devstrap()
        .arg("--config")
        .arg(&config)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
    Ok(())
}

#[test]
fn completions_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    devstrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_devstrap"));
    Ok(())
}
