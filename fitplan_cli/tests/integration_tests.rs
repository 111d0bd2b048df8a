//! Integration tests for the fitplan binary.
//!
//! These tests verify end-to-end behavior including:
//! - Plan generation and persistence
//! - Completion tracking
//! - Guided sessions driven from stdin
//! - Per-user data isolation and reset

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Config with a 1 ms session tick so sessions finish quickly
fn write_fast_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(
        &path,
        "[session]\nready_seconds = 3\nwork_seconds = 30\nrest_seconds = 10\ntick_millis = 1\nsound = false\n",
    )
    .expect("Failed to write config");
    path
}

/// Helper to get the path to the CLI binary
fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fitplan"));
    cmd.arg("--data-dir")
        .arg(dir.join("data"))
        .arg("--config")
        .arg(write_fast_config(dir));
    cmd
}

fn create_plan(dir: &Path) {
    cli(dir)
        .args([
            "plan", "--age", "30", "--height", "175", "--weight", "70", "--goal", "gain",
            "--days", "4",
        ])
        .assert()
        .success();
}

fn user_file(dir: &Path, user: &str, key: &str) -> PathBuf {
    dir.join("data/users").join(user).join(format!("{}.json", key))
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("fitplan"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Personal workout planner and guided session timer",
        ));
}

#[test]
fn test_plan_prints_dashboard_and_persists() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["plan", "--age", "30", "--height", "175", "--weight", "70", "--goal", "gain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BMI:           22.9 (Healthy weight)"))
        .stdout(predicate::str::contains("Day 1 - Upper (Strength)"))
        .stdout(predicate::str::contains("Day 4 - Lower (Volume) + Cardio"))
        .stdout(predicate::str::contains("[bench_press]"));

    assert!(user_file(temp_dir.path(), "local", "profile").exists());
    assert!(user_file(temp_dir.path(), "local", "plan").exists());

    let plan: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(user_file(temp_dir.path(), "local", "plan")).unwrap())
            .unwrap();
    assert_eq!(plan["days"].as_array().unwrap().len(), 4);
    assert_eq!(plan["days"][0]["exercise_ids"][0], "bench_press");
}

#[test]
fn test_invalid_profile_rejected() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["plan", "--age", "5", "--height", "175", "--weight", "70", "--days", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("age"))
        .stderr(predicate::str::contains("days"));

    assert!(!user_file(temp_dir.path(), "local", "plan").exists());
}

#[test]
fn test_show_without_plan() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan yet"));
}

#[test]
fn test_show_single_day_includes_routines() {
    let temp_dir = setup_test_dir();
    create_plan(temp_dir.path());

    cli(temp_dir.path())
        .args(["show", "--day", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Day 2 - Lower (Strength)"))
        .stdout(predicate::str::contains("Warm-up (7 min)"))
        .stdout(predicate::str::contains("Cool-down (7 min)"));

    cli(temp_dir.path())
        .env_remove("RUST_LOG")
        .args(["show", "--day", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Day 9 requested from a 4-day plan"));
}

#[test]
fn test_done_toggles_completion() {
    let temp_dir = setup_test_dir();
    create_plan(temp_dir.path());

    cli(temp_dir.path())
        .args(["done", "1", "bench_press"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked bench_press done"))
        .stdout(predicate::str::contains("Progress: 1/8"));

    let completed = fs::read_to_string(user_file(temp_dir.path(), "local", "completed")).unwrap();
    assert!(completed.contains("0_bench_press"));

    cli(temp_dir.path())
        .args(["show", "--day", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1/8 done)"));

    cli(temp_dir.path())
        .args(["done", "1", "bench_press"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unmarked bench_press"));
}

#[test]
fn test_done_rejects_exercise_from_other_day() {
    let temp_dir = setup_test_dir();
    create_plan(temp_dir.path());

    cli(temp_dir.path())
        .args(["done", "1", "squat"])
        .assert()
        .failure();
}

#[test]
fn test_new_plan_clears_completion() {
    let temp_dir = setup_test_dir();
    create_plan(temp_dir.path());

    cli(temp_dir.path())
        .args(["done", "1", "bench_press"])
        .assert()
        .success();
    create_plan(temp_dir.path());

    cli(temp_dir.path())
        .args(["show", "--day", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(0/8 done)"));
}

#[test]
fn test_session_quit_immediately() {
    let temp_dir = setup_test_dir();
    create_plan(temp_dir.path());

    cli(temp_dir.path())
        .args(["session", "1", "--no-sound"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Get ready - exercise 1/8: Barbell Bench Press"));
}

#[test]
fn test_session_skip_to_finish() {
    let temp_dir = setup_test_dir();
    create_plan(temp_dir.path());

    cli(temp_dir.path())
        .args(["session", "1", "--no-sound"])
        .write_stdin("s\n".repeat(8))
        .assert()
        .success()
        .stdout(predicate::str::contains("exercise 8/8"))
        .stdout(predicate::str::contains("Session complete"));
}

#[test]
fn test_session_without_plan_fails() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["session", "1"])
        .write_stdin("q\n")
        .assert()
        .failure();
}

#[test]
fn test_catalog_filter() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args(["catalog", "--split", "cardio"])
        .assert()
        .success()
        .stdout(predicate::str::contains("treadmill_run"))
        .stdout(predicate::str::contains("bench_press").not());
}

#[test]
fn test_custom_catalog_file() {
    let temp_dir = setup_test_dir();
    let csv = temp_dir.path().join("exercises.csv");
    fs::write(
        &csv,
        "id,name,instructions,category,target_muscle,equipment,level,excluded_injuries\n\
         wall_sit,Wall Sit,Hold a seated position against a wall.,strength,legs,bodyweight,beginner,knee\n\
         wall_push_up,Wall Push-up,Push away from a wall.,strength,chest,bodyweight,beginner,shoulder\n\
         towel_row,Towel Row,Row against a towel anchored in a door.,strength,back,bodyweight,beginner,\n",
    )
    .unwrap();

    cli(temp_dir.path())
        .arg("--catalog")
        .arg(&csv)
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("wall_sit"))
        .stdout(predicate::str::contains("3 exercises"));
}

#[test]
fn test_users_are_isolated_and_reset() {
    let temp_dir = setup_test_dir();
    create_plan(temp_dir.path());

    cli(temp_dir.path())
        .args(["--user", "alice@example.com", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan yet"));

    cli(temp_dir.path())
        .arg("reset")
        .assert()
        .success();
    assert!(!user_file(temp_dir.path(), "local", "plan").exists());
    assert!(!user_file(temp_dir.path(), "local", "profile").exists());
}

#[test]
fn test_onboarded_identity_gets_plan_from_cached_profile() {
    let temp_dir = setup_test_dir();
    let identity = temp_dir.path().join("identity.json");
    fs::write(
        &identity,
        r#"{
            "user_id": "bob@example.com",
            "onboarding_complete": true,
            "cached_profile": {
                "name": "Bob",
                "gender": "male",
                "age": 30,
                "height_cm": 175.0,
                "weight_kg": 70.0,
                "activity_level": "active",
                "goal": "gain",
                "location": "gym",
                "injury": "None",
                "training_days_per_week": 4
            }
        }"#,
    )
    .unwrap();

    cli(temp_dir.path())
        .arg("--identity")
        .arg(&identity)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("FITPLAN for Bob"))
        .stdout(predicate::str::contains("Day 1 - Upper (Strength)"));

    assert!(user_file(temp_dir.path(), "bob_example_com", "plan").exists());
    assert!(user_file(temp_dir.path(), "bob_example_com", "profile").exists());
}

#[test]
fn test_identity_without_onboarding_has_no_plan() {
    let temp_dir = setup_test_dir();
    let identity = temp_dir.path().join("identity.json");
    fs::write(&identity, r#"{"user_id": "carol"}"#).unwrap();

    cli(temp_dir.path())
        .arg("--identity")
        .arg(&identity)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No plan yet"));

    assert!(!user_file(temp_dir.path(), "carol", "plan").exists());
}
