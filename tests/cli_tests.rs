//! Integration tests for the `login-agent` binary: flag parsing and exit codes.
//!
//! Every test clears the inherited environment and runs from an empty
//! temporary directory so no `.env` file or developer credentials leak in.

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn login_agent(workdir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo::cargo_bin_cmd!("login-agent");
    cmd.env_clear().current_dir(workdir.path());
    cmd
}

fn with_valid_env(cmd: &mut assert_cmd::Command) -> &mut assert_cmd::Command {
    cmd.env("OPENAI_API_KEY", "sk-cli-test")
        .env("BASE_URL", "https://practicetestautomation.com/practice-test-login/")
        .env("AUTH_USERNAME", "student")
        .env("AUTH_PASSWORD", "Password123")
}

#[test]
fn test_help_exits_successfully() {
    let dir = TempDir::new().unwrap();
    login_agent(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--headless"))
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--model"));
}

#[test]
fn test_short_help_exits_successfully() {
    let dir = TempDir::new().unwrap();
    login_agent(&dir).arg("-h").assert().success();
}

#[test]
fn test_unknown_flag_is_usage_error() {
    let dir = TempDir::new().unwrap();
    login_agent(&dir)
        .arg("--no-such-flag")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--no-such-flag"));
}

#[test]
fn test_missing_flag_value_is_usage_error() {
    let dir = TempDir::new().unwrap();
    login_agent(&dir).arg("--url").assert().failure().code(2);
}

#[test]
fn test_empty_environment_reports_every_required_variable() {
    let dir = TempDir::new().unwrap();
    login_agent(&dir)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("OPENAI_API_KEY"))
        .stderr(predicate::str::contains("BASE_URL"))
        .stderr(predicate::str::contains("AUTH_USERNAME"))
        .stderr(predicate::str::contains("AUTH_PASSWORD"));
}

#[test]
fn test_invalid_base_url_is_config_error() {
    let dir = TempDir::new().unwrap();
    let mut cmd = login_agent(&dir);
    with_valid_env(&mut cmd)
        .env("BASE_URL", "example.com")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("BASE_URL"))
        .stderr(predicate::str::contains("example.com"));
}

#[test]
fn test_config_errors_never_print_secrets() {
    let dir = TempDir::new().unwrap();
    let mut cmd = login_agent(&dir);
    with_valid_env(&mut cmd)
        .env("BROWSER_USE_LOGGING_LEVEL", "verbose")
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("BROWSER_USE_LOGGING_LEVEL"))
        .stdout(predicate::str::contains("Password123").not())
        .stderr(predicate::str::contains("Password123").not())
        .stderr(predicate::str::contains("sk-cli-test").not());
}

#[test]
fn test_env_file_in_working_directory_is_loaded() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "OPENAI_API_KEY=sk-from-file\nAUTH_USERNAME=student\nAUTH_PASSWORD=Password123\n",
    )
    .unwrap();

    // Only BASE_URL is missing once the file is read.
    login_agent(&dir)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("BASE_URL"))
        .stderr(predicate::str::contains("OPENAI_API_KEY").not());
}

#[test]
fn test_missing_browser_binary_is_driver_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("no-such-chromium");
    let mut cmd = login_agent(&dir);
    with_valid_env(&mut cmd)
        .env("CHROMIUM_PATH", &missing)
        .arg("--headless")
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("CHROMIUM_PATH"))
        .stdout(predicate::str::contains("Password123").not());
}
