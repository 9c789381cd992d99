//! Journal reading: event decoding, live tailing and one-shot replay.
//!
//! - [`events`] - typed journal events and the line parser
//! - [`tailer`] - end-of-file tailer, replay and journal discovery

pub mod events;
pub mod tailer;

pub use events::{
    parse_line, CargoUpdate, Engineering, FuelCapacity, JournalEvent, JumpTarget, Loadout,
    LoadoutModule, Modifier, SystemArrival,
};
pub use tailer::{latest_journal, open_with_replay, replay, JournalTailer, ReplayedState};
