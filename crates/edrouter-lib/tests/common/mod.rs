//! Shared fixtures for integration tests.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use edrouter_lib::route::{Route, RouteKind, Waypoint};
use tempfile::TempDir;

/// Path to the fixtures directory shared with the CLI tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

#[allow(dead_code)]
pub fn journal_fixture() -> PathBuf {
    fixture("Journal.2024-05-01T100000.01.log")
}

/// Copy the sample journal into a fresh temp dir so tests can append to it.
#[allow(dead_code)]
pub fn scratch_journal() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("Journal.2024-05-01T100000.01.log");
    fs::copy(journal_fixture(), &path).expect("copy journal fixture");
    (dir, path)
}

#[allow(dead_code)]
pub fn append(path: &Path, text: &str) {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .expect("open journal for append");
    file.write_all(text.as_bytes()).expect("append to journal");
    file.flush().expect("flush journal");
}

#[allow(dead_code)]
pub fn jump_line(system: &str) -> String {
    format!(
        "{{ \"timestamp\":\"2024-05-01T11:00:00Z\", \"event\":\"FSDJump\", \"StarSystem\":\"{system}\", \"StarPos\":[1.0,2.0,3.0], \"JumpDist\":8.5 }}\n"
    )
}

#[allow(dead_code)]
pub fn exact_route(names: &[&str]) -> Route {
    let waypoints = names
        .iter()
        .map(|name| Waypoint::exact(*name, 1.0, 1.0, false, false))
        .collect();
    Route::new(RouteKind::Exact, waypoints).expect("homogeneous route")
}
