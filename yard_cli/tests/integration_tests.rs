//! Integration tests for the yard CLI binary.
//!
//! These tests verify end-to-end behavior including:
//! - The auto-flip workout workflow
//! - History listing and best-time lookup
//! - CSV rollup operations
//! - Tolerance of corrupted history lines

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("yard"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Card-deck bodyweight workout system",
        ));
}

#[test]
fn test_auto_flip_workout_completes() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--auto-flip")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout complete"));

    // The workout landed in the history log and the profile was bumped
    assert!(data_dir.join("history/workouts.jsonl").exists());
    assert!(data_dir.join("profile.json").exists());
}

#[test]
fn test_workout_logs_full_deck() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--auto-flip")
        .arg("--mode")
        .arg("og")
        .assert()
        .success();

    let log = fs::read_to_string(data_dir.join("history/workouts.jsonl")).unwrap();
    let record: serde_json::Value = serde_json::from_str(log.lines().next().unwrap()).unwrap();
    assert_eq!(record["cards_completed"], 52);
    assert_eq!(record["flip_mode"], "og");
    assert_eq!(record["official"], false);
}

#[test]
fn test_first_workout_is_a_personal_best() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--auto-flip")
        .assert()
        .success()
        .stdout(predicate::str::contains("New personal best"));
}

#[test]
fn test_history_lists_completed_workouts() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--auto-flip")
        .assert()
        .success();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Standard"));
}

#[test]
fn test_history_empty_without_workouts() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts"));
}

#[test]
fn test_best_reports_fastest_time() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--auto-flip")
        .assert()
        .success();

    cli()
        .arg("best")
        .arg("--rules")
        .arg("standard")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Best time for standard"));
}

#[test]
fn test_rollup_archives_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--auto-flip")
        .assert()
        .success();

    cli()
        .arg("rollup")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rolled up 1 workouts"));

    assert!(data_dir.join("workouts.csv").exists());
    assert!(!data_dir.join("history/workouts.jsonl").exists());

    // History still sees the archived workout through the CSV
    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Standard"));
}

#[test]
fn test_rollup_cleanup_removes_processed_logs() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--auto-flip")
        .assert()
        .success();

    cli()
        .arg("rollup")
        .arg("--cleanup")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    assert!(!data_dir
        .join("history/workouts.jsonl.processed")
        .exists());
}

#[test]
fn test_corrupted_history_line_is_tolerated() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--auto-flip")
        .assert()
        .success();

    // Corrupt the log by appending garbage
    let log_path = data_dir.join("history/workouts.jsonl");
    let mut contents = fs::read_to_string(&log_path).unwrap();
    contents.push_str("{ this is not json\n");
    fs::write(&log_path, contents).unwrap();

    // History still lists the valid record
    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Standard"));
}

#[test]
fn test_superset_workout_runs() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--auto-flip")
        .arg("--exercise")
        .arg("superset")
        .arg("--superset")
        .arg("split4")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout complete"));
}

#[test]
fn test_unknown_rule_set_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("workout")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--auto-flip")
        .arg("--rules")
        .arg("solitary")
        .assert()
        .failure();
}

#[test]
fn test_official_requires_rec_yard_config() {
    let temp_dir = setup_test_dir();

    // No Rec Yard credentials configured in a scratch HOME
    cli()
        .env("HOME", temp_dir.path())
        .env_remove("XDG_CONFIG_HOME")
        .arg("workout")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--auto-flip")
        .arg("--official")
        .assert()
        .failure();
}
