//! End-to-end tests for the shift-planner binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const TODAY: &str = "10/16/2026";

fn planner(file: &Path) -> Command {
    let mut cmd = Command::cargo_bin("shift-planner").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--file")
        .arg(file)
        .args(["--today", TODAY]);
    cmd
}

fn read_json(file: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(file).unwrap()).unwrap()
}

// ── init / show ─────────────────────────────────────────────────────────

#[test]
fn test_init_creates_schedule_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");

    planner(&file)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("ready for the week of 10/11/2026"));

    let json = read_json(&file);
    let days = json.as_object().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days.keys().next().unwrap(), "10/11/2026");
    assert_eq!(json["10/17/2026"][0]["type"], "WORK");
    assert_eq!(json["10/17/2026"][0]["start_time"], "03:00 AM");
    assert_eq!(json["10/16/2026"], serde_json::json!([]));
}

#[test]
fn test_show_prints_week() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");

    planner(&file)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Weekly Schedule:\n"))
        .stdout(predicate::str::contains(
            "Saturday, 10/17/2026:\n  WORK: 03:00 AM - 11:30 AM\n",
        ))
        .stdout(predicate::str::contains(
            "Friday, 10/16/2026:\n  No shifts scheduled.\n",
        ));
}

// ── edits ───────────────────────────────────────────────────────────────

#[test]
fn test_vet_extends_saturday() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");

    planner(&file)
        .args(["vet", "--date", "10/17/2026", "--start", "09:00 AM", "--end", "01:00 PM"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VET added on 10/17/2026"));

    let json = read_json(&file);
    let work: Vec<_> = json["10/17/2026"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["type"] == "WORK")
        .collect();
    assert_eq!(work.len(), 1);
    assert_eq!(work[0]["start_time"], "03:00 AM");
    assert_eq!(work[0]["end_time"], "01:00 PM");
}

#[test]
fn test_partial_vto_splits_shift() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");

    planner(&file)
        .args(["vto", "--date", "10/17/2026", "--start", "05:00 AM", "--end", "06:00 AM"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VTO taken on 10/17/2026"));

    let json = read_json(&file);
    let work: Vec<(String, String)> = json["10/17/2026"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["type"] == "WORK")
        .map(|s| {
            (
                s["start_time"].as_str().unwrap().to_string(),
                s["end_time"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(
        work,
        vec![
            ("03:00 AM".to_string(), "05:00 AM".to_string()),
            ("06:00 AM".to_string(), "11:30 AM".to_string()),
        ]
    );
}

#[test]
fn test_vto_in_the_past_fails_and_keeps_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");
    planner(&file).arg("init").assert().success();
    let before = fs::read_to_string(&file).unwrap();

    planner(&file)
        .args(["vto", "--date", "10/12/2026", "--full"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Date is in the past"));

    assert_eq!(fs::read_to_string(&file).unwrap(), before);
}

#[test]
fn test_vto_needs_full_or_range() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");

    planner(&file)
        .args(["vto", "--date", "10/17/2026"])
        .assert()
        .failure();
    planner(&file)
        .args(["vto", "--date", "10/17/2026", "--full", "--start", "05:00 AM"])
        .assert()
        .failure();
}

#[test]
fn test_bad_time_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");

    planner(&file)
        .args(["vet", "--date", "10/17/2026", "--start", "9am", "--end", "01:00 PM"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time"));
}

// ── optimize / hours ────────────────────────────────────────────────────

#[test]
fn test_optimize_then_hours() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");

    planner(&file)
        .arg("optimize")
        .assert()
        .success()
        .stdout(predicate::str::contains("SLEEP:"))
        .stdout(predicate::str::contains("JOB_SEARCH:"));

    planner(&file)
        .arg("hours")
        .assert()
        .success()
        .stdout(predicate::str::contains("Friday (10/16/2026):"))
        .stdout(predicate::str::contains("Total weekly job search time (hr):"));

    let output = planner(&file).args(["hours", "--json"]).output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["days"].as_array().unwrap().len(), 7);
    assert!(report["total_minutes"].as_u64().unwrap() > 0);
    assert!(report["total_minutes"].as_u64().unwrap() <= 2400);
}

// ── configuration ───────────────────────────────────────────────────────

#[test]
fn test_config_changes_default_shift() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");
    let config = dir.path().join("planner.toml");
    fs::write(
        &config,
        "work_days = [\"Fri\"]\n\n[default_shift]\nstart = \"08:00 AM\"\nend = \"04:00 PM\"\n",
    )
    .unwrap();

    planner(&file)
        .arg("--config")
        .arg(&config)
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Friday, 10/16/2026:\n  WORK: 08:00 AM - 04:00 PM\n",
        ))
        .stdout(predicate::str::contains(
            "Saturday, 10/17/2026:\n  No shifts scheduled.\n",
        ));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");
    let config = dir.path().join("planner.toml");
    fs::write(&config, "[job_search]\nblock_minutes = 0\n").unwrap();

    planner(&file)
        .arg("--config")
        .arg(&config)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
    assert!(!file.exists());
}

// ── logging ─────────────────────────────────────────────────────────────

#[test]
fn test_logs_go_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");

    planner(&file)
        .env("RUST_LOG", "info")
        .arg("init")
        .assert()
        .success()
        .stderr(predicate::str::contains("schedule loaded"))
        .stdout(predicate::str::contains("schedule loaded").not());
}

#[test]
fn test_rejected_edit_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("schedule.json");

    planner(&file)
        .env("RUST_LOG", "warn")
        .args(["vto", "--date", "10/12/2026", "--full"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("VTO rejected"));
}
