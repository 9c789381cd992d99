//! Integration tests for the `edrouter` binary.
//!
//! Only offline commands are exercised; planner requests need the network.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
}

fn journal() -> PathBuf {
    fixture("Journal.2024-05-01T100000.01.log")
}

fn edrouter() -> Command {
    let mut cmd = Command::cargo_bin("edrouter").expect("binary exists");
    for var in [
        "EDROUTER_JOURNAL",
        "EDROUTER_API_BASE",
        "EDROUTER_POLL_MS",
        "EDROUTER_CARGO_MASS",
        "EDROUTER_SHIP_EXPORT",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn range_from_journal_loadout() {
    edrouter()
        .args(["--journal"])
        .arg(journal())
        .arg("range")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ship: Wanderer"))
        .stdout(predicate::str::contains("Drive: 5A"))
        .stdout(predicate::str::contains("empty: 56.39 ly"));
}

#[test]
fn range_json_matches_export() {
    let output = edrouter()
        .args(["--format", "json", "--cargo", "16", "--ship-export"])
        .arg(fixture("ship_export.json"))
        .arg("range")
        .output()
        .expect("run edrouter");
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).expect("json output");
    let max = report["max_range"].as_f64().unwrap();
    let current = report["current_range"].as_f64().unwrap();
    assert!((max - 56.3922).abs() < 1e-3);
    assert_eq!(current, report["laden_range"].as_f64().unwrap());
    assert_eq!(report["cargo_mass"].as_f64(), Some(16.0));
}

#[test]
fn range_without_loadout_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Journal.2024-05-02T080000.01.log");
    fs::write(&path, "{ \"event\":\"Location\", \"StarSystem\":\"Sol\" }\n").unwrap();

    edrouter()
        .arg("--journal")
        .arg(&path)
        .arg("range")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no usable loadout"));
}

#[test]
fn journal_directory_resolves_to_newest_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("Journal.2024-04-01T080000.01.log"),
        "{ \"event\":\"Location\", \"StarSystem\":\"Sol\" }\n",
    )
    .unwrap();
    fs::copy(journal(), dir.path().join("Journal.2024-05-01T100000.01.log")).unwrap();

    edrouter()
        .arg("--journal")
        .arg(dir.path())
        .arg("range")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ship: Wanderer"));
}

#[test]
fn route_show_marks_the_requested_system() {
    edrouter()
        .arg("--journal")
        .arg(journal())
        .args(["route", "show"])
        .arg(fixture("exact_route.csv"))
        .args(["--at", "wolf 359"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "exact route: waypoint 3/4 (Wolf 359), 2 of 4 jumps remaining",
        ))
        .stdout(predicate::str::contains("refuel"));
}

#[test]
fn route_show_follows_the_journal_location() {
    edrouter()
        .arg("--journal")
        .arg(journal())
        .args(["--format", "json", "route", "show"])
        .arg(fixture("exact_route.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"index\":1"));
}

#[test]
fn route_show_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    edrouter()
        .arg("--journal")
        .arg(journal())
        .args(["route", "show"])
        .arg(dir.path().join("missing.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("route file not found"));
}

#[test]
fn route_show_rejects_unknown_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd.csv");
    fs::write(&path, "Name,Jumps\nSol,1\n").unwrap();

    edrouter()
        .arg("--journal")
        .arg(journal())
        .args(["route", "show"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown route format"));
}

#[test]
fn invalid_api_base_is_a_configuration_error() {
    edrouter()
        .args(["--api-base", "ftp://planner.invalid"])
        .arg("--journal")
        .arg(journal())
        .args(["plan", "neutron", "--to", "Colonia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn nearest_requires_all_coordinates() {
    edrouter()
        .args(["nearest", "--x", "1.0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--y"));
}
