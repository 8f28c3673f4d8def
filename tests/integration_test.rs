//! Integration tests for the branchbooks CLI.
//!
//! These tests run the actual binary against the CSV files in `tests/data`.
//! Each test gets its own config and session file in a temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// A temp directory holding a config that points the session file inside it
fn sandbox() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let config = format!(
        r#"{{"session_file": {}}}"#,
        serde_json::to_string(&dir.path().join("session.json")).unwrap()
    );
    fs::write(dir.path().join("config.json"), config).unwrap();
    dir
}

/// The binary, configured to use the sandbox
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("branchbooks").unwrap();
    cmd.arg("--config").arg(dir.path().join("config.json"));
    cmd
}

fn login(dir: &TempDir) {
    cli(dir)
        .args(["login", "FirstDev", "--password", "A123456789+"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as FirstDev (DevUser)"));
}

/// Normalize CSV for comparison (trim whitespace, drop blank lines)
fn normalize_csv(csv: &str) -> Vec<String> {
    csv.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// ==================== ACCOUNT IMPORT ====================

#[test]
fn test_import_accounts_appends_to_seeded_chart() {
    let dir = sandbox();
    login(&dir);

    let assert = cli(&dir)
        .args(["import-accounts", &test_data_path("accounts_new.csv")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Imported 2 record(s)"));

    let expected = fs::read_to_string(test_data_path("expected_accounts.csv")).unwrap();
    assert_eq!(normalize_csv(&stdout_of(&assert)), normalize_csv(&expected));
}

#[test]
fn test_import_accounts_skips_existing_category() {
    let dir = sandbox();
    login(&dir);

    cli(&dir)
        .args(["import-accounts", &test_data_path("accounts_duplicate.csv")])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Skipped duplicate Row 1: Ofrenda Servicio Regular",
        ))
        .stderr(predicate::str::contains("Imported 0 record(s), skipped 1 duplicate(s)"));
}

#[test]
fn test_import_accounts_rejects_invalid_batch() {
    let dir = sandbox();
    login(&dir);

    cli(&dir)
        .args(["import-accounts", &test_data_path("accounts_invalid.csv")])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Row 2: Invalid AccountSubType - \"Gifts\"",
        ))
        .stderr(predicate::str::contains(
            "Row 2: Invalid InternalMovement - \"maybe\"",
        ))
        .stderr(predicate::str::contains("Import rejected: 2 invalid field(s)"));
}

#[test]
fn test_import_accounts_wrong_delimiter_is_header_error() {
    let dir = sandbox();
    login(&dir);

    cli(&dir)
        .args(["import-accounts", &test_data_path("accounts_bad_header.csv")])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Row 0: Invalid Headers - \"Invalid headers format\"",
        ))
        .stderr(predicate::str::contains("1 invalid field(s)"));
}

#[test]
fn test_import_missing_file() {
    let dir = sandbox();
    login(&dir);

    cli(&dir)
        .args(["import-accounts", "tests/data/does_not_exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn test_import_accounts_requires_login() {
    let dir = sandbox();
    cli(&dir)
        .args(["import-accounts", &test_data_path("accounts_new.csv")])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Not logged in"));
}

// ==================== TRANSACTION IMPORT ====================

#[test]
fn test_import_transactions_requires_login() {
    let dir = sandbox();
    cli(&dir)
        .args(["import-transactions", &test_data_path("transactions.csv")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_import_transactions_with_chart() {
    let dir = sandbox();
    login(&dir);

    let assert = cli(&dir)
        .args([
            "import-transactions",
            &test_data_path("transactions.csv"),
            "--accounts",
            &test_data_path("accounts_new.csv"),
        ])
        .assert()
        .success();

    let expected = fs::read_to_string(test_data_path("expected_transactions.csv")).unwrap();
    assert_eq!(normalize_csv(&stdout_of(&assert)), normalize_csv(&expected));
}

#[test]
fn test_import_transactions_unknown_account_category() {
    let dir = sandbox();
    login(&dir);

    // Without the extra chart, "Diezmo Regular" is not a known account
    cli(&dir)
        .args(["import-transactions", &test_data_path("transactions.csv")])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Row 2: Invalid AccountCategory - \"Diezmo Regular\"",
        ));
}

#[test]
fn test_import_transactions_malformed_date() {
    let dir = sandbox();
    login(&dir);

    cli(&dir)
        .args(["import-transactions", &test_data_path("transactions_bad_date.csv")])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Row 1: Invalid TransactionDate - \"2024-03-01\"",
        ))
        .stderr(predicate::str::contains("Import rejected: 1 invalid field(s)"));
}

// ==================== SESSION ====================

#[test]
fn test_login_wrong_password() {
    let dir = sandbox();
    cli(&dir)
        .args(["login", "FirstDev", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));
    assert!(!dir.path().join("session.json").exists());
}

#[test]
fn test_session_survives_between_runs() {
    let dir = sandbox();
    login(&dir);

    cli(&dir)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("FirstDev (Developer, level 6)"))
        .stdout(predicate::str::contains("DevUser, Developer"));

    cli(&dir).arg("logout").assert().success();

    cli(&dir)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_session_file_flag_overrides_config() {
    let dir = sandbox();
    let other = dir.path().join("elsewhere.json");

    cli(&dir)
        .arg("--session-file")
        .arg(&other)
        .args(["login", "FirstDev", "--password", "A123456789+"])
        .assert()
        .success();

    assert!(other.exists());
    assert!(!dir.path().join("session.json").exists());
}

// ==================== MENU & SUMMARY ====================

#[test]
fn test_menu_logged_out_is_empty() {
    let dir = sandbox();
    cli(&dir)
        .arg("menu")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_menu_for_developer() {
    let dir = sandbox();
    login(&dir);

    cli(&dir)
        .arg("menu")
        .assert()
        .success()
        .stdout(predicate::str::contains("General Setup (/setup)"))
        .stdout(predicate::str::contains("  Account Setup (/setup/accounts)"))
        .stdout(predicate::str::contains("General Reports (/reports)"));
}

#[test]
fn test_summary_over_seeded_journal() {
    let dir = sandbox();
    login(&dir);

    cli(&dir)
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total income: 1000"))
        .stdout(predicate::str::contains("Total expenses: 250"))
        .stdout(predicate::str::contains("Net: 750"))
        .stdout(predicate::str::contains("Mar 2024: income 1000, expenses 250"));
}

#[test]
fn test_summary_requires_login() {
    let dir = sandbox();
    cli(&dir).arg("summary").assert().failure();
}
