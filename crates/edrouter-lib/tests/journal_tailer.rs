mod common;

use std::fs;

use edrouter_lib::journal::{latest_journal, open_with_replay, replay, JournalEvent, JournalTailer};
use edrouter_lib::{Error, ShipState};

#[test]
fn replay_keeps_the_last_of_each_event() {
    let replayed = replay(&common::journal_fixture()).expect("replay fixture");

    let location = replayed.location.expect("fixture has a location");
    assert_eq!(location.name, "Ross 128");
    assert_eq!((location.x, location.y, location.z), (-5.625, 10.125, -0.625));
    assert_eq!(replayed.cargo, Some(2));
    assert_eq!(
        replayed.loadout.and_then(|loadout| loadout.ship_name),
        Some("Wanderer".to_string())
    );
    assert!(!replayed.shut_down);
}

#[test]
fn replay_keeps_the_last_loadout() {
    let (_dir, path) = common::scratch_journal();
    common::append(
        &path,
        "{ \"timestamp\":\"2024-05-01T11:30:00Z\", \"event\":\"Loadout\", \"Ship\":\"asp\", \"ShipName\":\"Scout\", \"UnladenMass\":400.0, \"CargoCapacity\":0, \"FuelCapacity\":{ \"Main\":32.0, \"Reserve\":0.63 }, \"Modules\":[ { \"Slot\":\"FrameShiftDrive\", \"Item\":\"int_hyperdrive_size5_class5\", \"On\":true } ] }\n",
    );

    let replayed = replay(&path).unwrap();
    let loadout = replayed.loadout.expect("journal has loadouts");
    assert_eq!(loadout.ship_name.as_deref(), Some("Scout"));

    let ship = ShipState::from_loadout(&loadout).unwrap();
    assert_eq!(ship.name.as_deref(), Some("Scout"));
    assert_eq!(ship.jump_range_boost, 0.0);
    assert!((ship.fsd.optimal_mass - 1050.0).abs() < 1e-9);
    assert_eq!(format!("{:.2}", ship.max_range().unwrap()), "28.47");
}

#[test]
fn replay_sees_shutdown() {
    let (_dir, path) = common::scratch_journal();
    common::append(&path, "{ \"timestamp\":\"2024-05-01T12:00:00Z\", \"event\":\"Shutdown\" }\n");
    assert!(replay(&path).unwrap().shut_down);
}

#[test]
fn replay_clears_shutdown_on_load_game() {
    let (_dir, path) = common::scratch_journal();
    common::append(&path, "{ \"timestamp\":\"2024-05-01T12:00:00Z\", \"event\":\"Shutdown\" }\n");
    common::append(&path, "{ \"timestamp\":\"2024-05-01T12:05:00Z\", \"event\":\"LoadGame\", \"Ship\":\"asp\" }\n");
    common::append(&path, "{ \"timestamp\":\"2024-05-01T12:09:00Z\", \"event\":\"CarrierJump\", \"StarSystem\":\"Colonia\", \"StarPos\":[-9530.5,-910.28125,19808.125] }\n");

    let replayed = replay(&path).unwrap();
    assert!(!replayed.shut_down);
    assert_eq!(replayed.location.map(|location| location.name), Some("Colonia".to_string()));
}

#[test]
fn tailer_only_yields_appended_events() {
    let (_dir, path) = common::scratch_journal();
    let mut tailer = JournalTailer::open(&path).expect("open journal");
    assert!(tailer.poll().unwrap().is_empty(), "existing content is skipped");

    common::append(&path, &common::jump_line("Wolf 359"));
    common::append(&path, "{ \"event\":\"Cargo\", \"Vessel\":\"Ship\", \"Count\":7 }\n");
    let events = tailer.poll().unwrap();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], JournalEvent::FsdJump(arrival) if arrival.star_system == "Wolf 359"));
    assert!(matches!(&events[1], JournalEvent::Cargo(cargo) if cargo.count == 7));

    assert!(tailer.poll().unwrap().is_empty());
}

#[test]
fn malformed_lines_are_skipped_and_counted() {
    let (_dir, path) = common::scratch_journal();
    let (_, mut tailer) = open_with_replay(&path).unwrap();

    common::append(&path, "{ not json\n");
    common::append(&path, "{ \"event\":\"FSDJump\" }\n");
    common::append(&path, &common::jump_line("Sirius"));
    let events = tailer.poll().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(tailer.malformed_lines(), 2);
}

#[test]
fn vanished_journal_is_fatal_for_the_tailer() {
    let (_dir, path) = common::scratch_journal();
    let mut tailer = JournalTailer::open(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(matches!(tailer.poll(), Err(Error::FileUnavailable { .. })));
}

#[test]
fn truncated_journal_is_fatal_for_the_tailer() {
    let (_dir, path) = common::scratch_journal();
    let mut tailer = JournalTailer::open(&path).unwrap();
    fs::write(&path, "{}\n").unwrap();

    assert!(matches!(tailer.poll(), Err(Error::FileUnavailable { .. })));
}

#[test]
fn missing_file_cannot_be_opened() {
    let dir = tempfile::tempdir().unwrap();
    let err = JournalTailer::open(&dir.path().join("Journal.missing.log")).expect_err("missing");
    assert!(matches!(err, Error::FileUnavailable { .. }));
}

#[test]
fn newest_journal_wins_by_name() {
    let dir = tempfile::tempdir().unwrap();
    for name in [
        "Journal.2024-04-30T090000.01.log",
        "Journal.2024-05-01T100000.01.log",
        "Journal.2024-05-01T100000.02.log",
        "Status.json",
    ] {
        fs::write(dir.path().join(name), "").unwrap();
    }

    let latest = latest_journal(dir.path()).unwrap();
    assert_eq!(
        latest.file_name().and_then(|name| name.to_str()),
        Some("Journal.2024-05-01T100000.02.log")
    );

    let empty = tempfile::tempdir().unwrap();
    assert!(matches!(
        latest_journal(empty.path()),
        Err(Error::JournalDirEmpty { .. })
    ));
}
