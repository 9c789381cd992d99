//! Live game snapshot derived from journal events.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::journal::{JournalEvent, ReplayedState, SystemArrival};
use crate::ship::ShipState;

/// Current star system and its galactic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn from_arrival(arrival: &SystemArrival) -> Self {
        let [x, y, z] = arrival.star_pos.unwrap_or([0.0, 0.0, 0.0]);
        Self {
            name: arrival.star_system.clone(),
            x,
            y,
            z,
        }
    }
}

/// Which parts of the [`GameState`] an event changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateChange {
    pub location: bool,
    pub ship: bool,
    pub shut_down: bool,
}

impl StateChange {
    pub fn is_empty(&self) -> bool {
        !(self.location || self.ship || self.shut_down)
    }
}

/// Snapshot of the player's situation as read from the journal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameState {
    pub location: Option<Location>,
    pub ship: Option<ShipState>,
    pub shut_down: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the state from a replay of an already-populated journal.
    pub fn from_replay(replayed: &ReplayedState) -> Self {
        let mut state = Self::new();
        if let Some(loadout) = &replayed.loadout {
            state.apply(&JournalEvent::Loadout(loadout.clone()));
        }
        state.location = replayed.location.clone();
        state.shut_down = replayed.shut_down;
        state
    }

    /// Forget everything, as when switching to a different journal.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold one event into the snapshot.
    ///
    /// Once a `Shutdown` has been seen the state is frozen until the next
    /// `LoadGame`.
    pub fn apply(&mut self, event: &JournalEvent) -> StateChange {
        let mut change = StateChange::default();
        if self.shut_down {
            if *event == JournalEvent::LoadGame {
                info!("game reloaded after shutdown");
                self.shut_down = false;
            }
            return change;
        }

        match event {
            JournalEvent::FsdJump(arrival)
            | JournalEvent::CarrierJump(arrival)
            | JournalEvent::Location(arrival) => {
                let location = Location::from_arrival(arrival);
                if self.location.as_ref() != Some(&location) {
                    info!(system = %location.name, "location changed");
                    self.location = Some(location);
                    change.location = true;
                }
            }
            JournalEvent::Loadout(loadout) => match ShipState::from_loadout(loadout) {
                Ok(ship) => {
                    if self.ship.as_ref() != Some(&ship) {
                        self.ship = Some(ship);
                        change.ship = true;
                    }
                }
                Err(err) => warn!(error = %err, "ignoring unusable loadout"),
            },
            JournalEvent::Shutdown => {
                info!("game shut down");
                self.shut_down = true;
                change.shut_down = true;
            }
            JournalEvent::Cargo(_)
            | JournalEvent::Target(_)
            | JournalEvent::LoadGame
            | JournalEvent::Other(_) => {}
        }

        change
    }
}
