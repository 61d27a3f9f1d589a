//! Integration tests for the brasa binary.
//!
//! These tests verify end-to-end behavior including:
//! - Check-in and streak counting across weekends and holidays
//! - Gem rewards and block protection
//! - Calendar edit mode (toggle)
//! - Exercise tracking workflow
//! - Data persistence across runs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("brasa"))
}

/// Helper to check in on a fixed day and assert success
fn checkin(data_dir: &Path, day: &str) {
    cli()
        .arg("checkin")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--today")
        .arg(day)
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily habit streak tracker"));
}

#[test]
fn test_checkin_creates_data_files() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("checkin")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-08")
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked in! Streak: 1 day"));

    // Verify the log landed on disk as ISO dates
    let checked = fs::read_to_string(data_dir.join("checkedDays.json"))
        .expect("Failed to read checkedDays.json");
    assert!(checked.contains("2024-01-08"));
    assert!(data_dir.join("gems.json").exists());
}

#[test]
fn test_checkin_twice_reports_already_done() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    checkin(&data_dir, "2024-01-08");

    cli()
        .arg("checkin")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-08")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already checked in today"));
}

#[test]
fn test_streak_counts_consecutive_weekdays() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Monday, then Tuesday
    checkin(&data_dir, "2024-01-08");

    cli()
        .arg("checkin")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-09")
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak: 2 days"));
}

#[test]
fn test_weekend_does_not_break_streak() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Friday, then the following Monday
    checkin(&data_dir, "2024-01-12");

    cli()
        .arg("checkin")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-15")
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak: 2 days"));
}

#[test]
fn test_missed_weekday_resets_streak() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Monday checked, Tuesday missed, status on Wednesday
    checkin(&data_dir, "2024-01-08");

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-10")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 days"));
}

#[test]
fn test_status_is_the_default_command() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    checkin(&data_dir, "2024-01-08");

    cli()
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-08")
        .assert()
        .success()
        .stdout(predicate::str::contains("BRASA"))
        .stdout(predicate::str::contains("1 day"))
        .stdout(predicate::str::contains("(since 2024-01-08)"))
        .stdout(predicate::str::contains("1 check-in in January"))
        .stdout(predicate::str::contains("✓ Checked in today"));
}

#[test]
fn test_status_on_rest_day() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Saturday with nothing logged
    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-13")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rest day - no check-in needed"));
}

#[test]
fn test_block_denied_without_gems() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    checkin(&data_dir, "2024-01-08");

    cli()
        .arg("block")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-09")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Block not placed: no gems available",
        ));
}

#[test]
fn test_block_denied_without_active_streak() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("block")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-09")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "there is no active streak to protect",
        ));
}

/// Fifteen consecutive run days earn a gem; the gem can then protect a
/// missed Monday without breaking the streak.
#[test]
fn test_gem_earned_and_spent_on_block() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Three full work weeks of January 2024
    let days = [
        "2024-01-08",
        "2024-01-09",
        "2024-01-10",
        "2024-01-11",
        "2024-01-12",
        "2024-01-15",
        "2024-01-16",
        "2024-01-17",
        "2024-01-18",
        "2024-01-19",
        "2024-01-22",
        "2024-01-23",
        "2024-01-24",
        "2024-01-25",
    ];
    for day in days {
        checkin(&data_dir, day);
    }

    // The 15th run day crosses the milestone
    cli()
        .arg("checkin")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-26")
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak: 15 days"))
        .stdout(predicate::str::contains("you earned a gem"));

    let gems = fs::read_to_string(data_dir.join("gems.json")).expect("Failed to read gems.json");
    assert_eq!(gems, "1");

    // Spend the gem on the following Monday
    cli()
        .arg("block")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-29")
        .assert()
        .success()
        .stdout(predicate::str::contains("Block placed"))
        .stdout(predicate::str::contains("Gems left: 0"));

    // The blocked day keeps the chain alive but adds nothing to the count
    cli()
        .arg("checkin")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-30")
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak: 16 days"));
}

#[test]
fn test_block_refused_twice_on_same_day() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let days = [
        "2024-01-08",
        "2024-01-09",
        "2024-01-10",
        "2024-01-11",
        "2024-01-12",
        "2024-01-15",
        "2024-01-16",
        "2024-01-17",
        "2024-01-18",
        "2024-01-19",
        "2024-01-22",
        "2024-01-23",
        "2024-01-24",
        "2024-01-25",
        "2024-01-26",
    ];
    for day in days {
        checkin(&data_dir, day);
    }

    cli()
        .arg("block")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-29")
        .assert()
        .success()
        .stdout(predicate::str::contains("Block placed"));

    cli()
        .arg("block")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-29")
        .assert()
        .success()
        .stdout(predicate::str::contains("a block is already placed today"));
}

#[test]
fn test_toggle_refuses_future_dates() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("toggle")
        .arg("2024-02-01")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-08")
        .assert()
        .success()
        .stdout(predicate::str::contains("is in the future"));

    assert!(!data_dir.join("checkedDays.json").exists());
}

#[test]
fn test_toggle_backfills_a_missed_day() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    // Tuesday checked, Monday missed
    checkin(&data_dir, "2024-01-09");

    cli()
        .arg("toggle")
        .arg("2024-01-08")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-09")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-08 marked as checked in"));

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-09")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 days"))
        .stdout(predicate::str::contains("(since 2024-01-08)"));
}

#[test]
fn test_toggle_removes_a_checkin() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    checkin(&data_dir, "2024-01-08");

    cli()
        .arg("toggle")
        .arg("2024-01-08")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-08")
        .assert()
        .success()
        .stdout(predicate::str::contains("Check-in removed from 2024-01-08"));

    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-08")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 days"));
}

#[test]
fn test_reset_requires_confirmation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    checkin(&data_dir, "2024-01-08");

    cli()
        .arg("reset")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));

    assert!(data_dir.join("checkedDays.json").exists());
}

#[test]
fn test_reset_clears_streak_but_keeps_exercises() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    checkin(&data_dir, "2024-01-08");

    cli()
        .arg("exercise")
        .arg("add")
        .arg("Supino")
        .arg("--section")
        .arg("Peito")
        .arg("--weight")
        .arg("40")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("reset")
        .arg("--yes")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Streak data cleared"));

    assert!(!data_dir.join("checkedDays.json").exists());
    assert!(!data_dir.join("gems.json").exists());
    assert!(data_dir.join("exercises.json").exists());
}

#[test]
fn test_theme_round_trip() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("theme")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Current theme: light"));

    cli()
        .arg("theme")
        .arg("dark")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme set to dark"));

    cli()
        .arg("theme")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Current theme: dark"));

    let raw = fs::read_to_string(data_dir.join("darkMode.json"))
        .expect("Failed to read darkMode.json");
    assert_eq!(raw, "true");
}

#[test]
fn test_calendar_renders_month() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    checkin(&data_dir, "2024-01-08");

    cli()
        .arg("calendar")
        .arg("--month")
        .arg("2024-01")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-08")
        .assert()
        .success()
        .stdout(predicate::str::contains("January 2024"))
        .stdout(predicate::str::contains("Su Mo Tu We Th Fr Sa"))
        .stdout(predicate::str::contains("31"))
        .stdout(predicate::str::contains("current streak"));
}

#[test]
fn test_calendar_rejects_invalid_month() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("calendar")
        .arg("--month")
        .arg("first-of-never")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid month"));
}

#[test]
fn test_exercise_add_and_list() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("exercise")
        .arg("add")
        .arg("Supino")
        .arg("--section")
        .arg("Peito")
        .arg("--weight")
        .arg("40")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'Supino' to Peito at 40 kg"));

    cli()
        .arg("exercise")
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Peito"))
        .stdout(predicate::str::contains("Supino - 40 kg"));
}

#[test]
fn test_exercise_add_rejects_bad_weight() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("exercise")
        .arg("add")
        .arg("Supino")
        .arg("--section")
        .arg("Peito")
        .arg("--weight")
        .arg("NaN")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing added"));

    cli()
        .arg("exercise")
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No exercises tracked yet"));
}

#[test]
fn test_exercise_log_shows_change() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("exercise")
        .arg("add")
        .arg("Supino")
        .arg("--section")
        .arg("Peito")
        .arg("--weight")
        .arg("40")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("exercise")
        .arg("log")
        .arg("supino")
        .arg("42.5")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 42.5 kg (+2.5 kg)"));
}

#[test]
fn test_exercise_history_lists_entries() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("exercise")
        .arg("add")
        .arg("Remada")
        .arg("--section")
        .arg("Costas")
        .arg("--weight")
        .arg("30")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("exercise")
        .arg("log")
        .arg("Remada")
        .arg("32.5")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("exercise")
        .arg("history")
        .arg("Remada")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Remada (Costas)"))
        .stdout(predicate::str::contains("[0]"))
        .stdout(predicate::str::contains("[1]"))
        .stdout(predicate::str::contains("(+2.5 kg)"));
}

#[test]
fn test_exercise_edit_moves_section() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("exercise")
        .arg("add")
        .arg("Supino")
        .arg("--section")
        .arg("Peito")
        .arg("--weight")
        .arg("40")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("exercise")
        .arg("edit")
        .arg("Supino")
        .arg("--section")
        .arg("Empurrar")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise updated"));

    cli()
        .arg("exercise")
        .arg("sections")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Empurrar"))
        .stdout(predicate::str::contains("Peito").not());
}

#[test]
fn test_exercise_edit_without_changes_is_a_noop() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("exercise")
        .arg("edit")
        .arg("Supino")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to change"));
}

#[test]
fn test_exercise_sections_filter() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    for (name, section) in [("Supino", "Peito"), ("Remada", "Costas"), ("Agacho", "Perna")] {
        cli()
            .arg("exercise")
            .arg("add")
            .arg(name)
            .arg("--section")
            .arg(section)
            .arg("--weight")
            .arg("40")
            .arg("--data-dir")
            .arg(&data_dir)
            .assert()
            .success();
    }

    cli()
        .arg("exercise")
        .arg("sections")
        .arg("per")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Perna"))
        .stdout(predicate::str::contains("Peito").not());
}

#[test]
fn test_exercise_remove() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("exercise")
        .arg("add")
        .arg("Supino")
        .arg("--section")
        .arg("Peito")
        .arg("--weight")
        .arg("40")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("exercise")
        .arg("remove")
        .arg("Supino")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercise removed"));

    cli()
        .arg("exercise")
        .arg("list")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No exercises tracked yet"));
}

#[test]
fn test_exercise_drop_entry() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("exercise")
        .arg("add")
        .arg("Supino")
        .arg("--section")
        .arg("Peito")
        .arg("--weight")
        .arg("40")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("exercise")
        .arg("log")
        .arg("Supino")
        .arg("42.5")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("exercise")
        .arg("drop-entry")
        .arg("Supino")
        .arg("0")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry [0] removed"));

    cli()
        .arg("exercise")
        .arg("drop-entry")
        .arg("Supino")
        .arg("5")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No entry [5] to remove"));
}

#[test]
fn test_exercise_export_writes_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();
    let out = data_dir.join("supino.csv");

    cli()
        .arg("exercise")
        .arg("add")
        .arg("Supino")
        .arg("--section")
        .arg("Peito")
        .arg("--weight")
        .arg("40")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("exercise")
        .arg("log")
        .arg("Supino")
        .arg("42.5")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();

    cli()
        .arg("exercise")
        .arg("export")
        .arg("Supino")
        .arg("--out")
        .arg(&out)
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 rows"));

    let csv = fs::read_to_string(&out).expect("Failed to read CSV");
    assert!(csv.starts_with("date,weight,change"));
    assert!(csv.contains("42.5"));
}

#[test]
fn test_exercise_unknown_name_reported() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("exercise")
        .arg("log")
        .arg("Nope")
        .arg("40")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("No exercise found matching 'Nope'"));
}

#[test]
fn test_data_persists_across_runs() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    checkin(&data_dir, "2024-01-08");
    checkin(&data_dir, "2024-01-09");

    // A fresh process sees the same log
    cli()
        .arg("status")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--today")
        .arg("2024-01-09")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 days"));
}
