mod common;

use edrouter_lib::journal::{parse_line, replay, JournalEvent};
use edrouter_lib::GameState;

fn event(line: &str) -> JournalEvent {
    parse_line(1, line).expect("valid line").expect("non-blank line")
}

#[test]
fn replay_seeds_location_and_ship() {
    let state = GameState::from_replay(&replay(&common::journal_fixture()).unwrap());
    assert_eq!(state.location.as_ref().map(|l| l.name.as_str()), Some("Ross 128"));
    let ship = state.ship.expect("ship resolved from loadout");
    assert_eq!(ship.fsd.size, 5);
    assert_eq!(ship.fsd.class, 5);
    assert!((ship.fsd.optimal_mass - 1692.6).abs() < 1e-9);
    assert!(!state.shut_down);
}

#[test]
fn only_real_moves_are_reported() {
    let mut state = GameState::new();
    let jump = event(&common::jump_line("Sirius"));

    assert!(state.apply(&jump).location);
    assert!(state.apply(&jump).is_empty(), "same system twice is not a change");
    assert!(state
        .apply(&event(r#"{"event":"FSDTarget","Name":"Procyon"}"#))
        .is_empty());
    assert!(state
        .apply(&event(r#"{"event":"Cargo","Count":3}"#))
        .is_empty());
}

#[test]
fn loadout_without_drive_keeps_the_previous_ship() {
    let mut state = GameState::from_replay(&replay(&common::journal_fixture()).unwrap());
    let before = state.ship.clone();

    let change = state.apply(&event(
        r#"{"event":"Loadout","UnladenMass":50,"FuelCapacity":{"Main":2,"Reserve":0.1},"Modules":[{"Slot":"PowerPlant","Item":"int_powerplant_size2_class1"}]}"#,
    ));
    assert!(!change.ship);
    assert_eq!(state.ship, before);
}

#[test]
fn shutdown_freezes_the_state() {
    let mut state = GameState::new();
    state.apply(&event(&common::jump_line("Sol")));

    let change = state.apply(&JournalEvent::Shutdown);
    assert!(change.shut_down);

    assert!(state.apply(&event(&common::jump_line("Achenar"))).is_empty());
    assert_eq!(state.location.as_ref().map(|l| l.name.as_str()), Some("Sol"));

    state.reset();
    assert_eq!(state, GameState::new());
}

#[test]
fn carrier_jump_moves_the_player() {
    let mut state = GameState::new();
    state.apply(&event(&common::jump_line("Sol")));

    let change = state.apply(&event(
        r#"{"event":"CarrierJump","Docked":true,"StarSystem":"Colonia","StarPos":[-9530.5,-910.28125,19808.125]}"#,
    ));
    assert!(change.location);
    let location = state.location.expect("carrier jump sets a location");
    assert_eq!(location.name, "Colonia");
    assert_eq!((location.x, location.z), (-9530.5, 19808.125));
}

#[test]
fn load_game_resumes_after_shutdown() {
    let mut state = GameState::new();
    state.apply(&JournalEvent::Shutdown);
    assert!(state.shut_down);

    assert!(state.apply(&JournalEvent::LoadGame).is_empty());
    assert!(!state.shut_down);

    assert!(state.apply(&event(&common::jump_line("Achenar"))).location);
    assert_eq!(state.location.as_ref().map(|l| l.name.as_str()), Some("Achenar"));
}
