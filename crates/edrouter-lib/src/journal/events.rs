//! Typed journal events.
//!
//! The game writes one JSON object per line, discriminated by its `event`
//! field. Only the handful of events the companion reacts to are decoded;
//! everything else is surfaced as [`JournalEvent::Other`] and ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Arrival in a star system, shared by `FSDJump`, `CarrierJump` and `Location` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SystemArrival {
    pub star_system: String,
    #[serde(default)]
    pub star_pos: Option<[f64; 3]>,
}

/// Main and reserve fuel tank sizes reported by a `Loadout` event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FuelCapacity {
    pub main: f64,
    #[serde(default)]
    pub reserve: f64,
}

/// One engineering modifier on a module, e.g. `FSDOptimalMass`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Modifier {
    pub label: String,
    // String-valued modifiers carry `ValueStr` instead.
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Engineering {
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub experimental_effect: Option<String>,
}

/// A fitted module as listed in a `Loadout` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadoutModule {
    pub slot: String,
    pub item: String,
    #[serde(default)]
    pub engineering: Option<Engineering>,
}

impl LoadoutModule {
    /// Value of the engineering modifier with the given label, if present.
    pub fn modifier(&self, label: &str) -> Option<f64> {
        self.engineering
            .as_ref()?
            .modifiers
            .iter()
            .find(|modifier| modifier.label.eq_ignore_ascii_case(label))
            .and_then(|modifier| modifier.value)
    }
}

/// Full ship description written whenever the player boards or refits a ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Loadout {
    #[serde(default)]
    pub ship: Option<String>,
    #[serde(default)]
    pub ship_name: Option<String>,
    pub modules: Vec<LoadoutModule>,
    pub unladen_mass: f64,
    pub fuel_capacity: FuelCapacity,
    #[serde(default)]
    pub cargo_capacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CargoUpdate {
    pub count: u32,
}

/// The system currently selected as the next jump target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct JumpTarget {
    pub name: String,
    #[serde(default)]
    pub remaining_jumps_in_route: Option<u32>,
}

/// A journal event the companion understands.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalEvent {
    FsdJump(SystemArrival),
    /// The player's fleet carrier jumped with them aboard.
    CarrierJump(SystemArrival),
    Location(SystemArrival),
    Loadout(Loadout),
    Cargo(CargoUpdate),
    Target(JumpTarget),
    Shutdown,
    /// Game (re)loaded into a ship; ends any earlier shutdown.
    LoadGame,
    /// Any other event kind, identified by its discriminator.
    Other(String),
}

impl JournalEvent {
    /// Short name of the event kind, as written by the game.
    pub fn kind(&self) -> &str {
        match self {
            JournalEvent::FsdJump(_) => "FSDJump",
            JournalEvent::CarrierJump(_) => "CarrierJump",
            JournalEvent::Location(_) => "Location",
            JournalEvent::Loadout(_) => "Loadout",
            JournalEvent::Cargo(_) => "Cargo",
            JournalEvent::Target(_) => "FSDTarget",
            JournalEvent::Shutdown => "Shutdown",
            JournalEvent::LoadGame => "LoadGame",
            JournalEvent::Other(kind) => kind,
        }
    }
}

/// Parse one journal line.
///
/// Blank lines yield `Ok(None)`. Lines that are not JSON objects with a string
/// `event` field, or whose known event lacks required fields, are reported as
/// [`Error::MalformedLine`] tagged with `line_no`.
pub fn parse_line(line_no: u64, text: &str) -> Result<Option<JournalEvent>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let malformed = |message: String| Error::MalformedLine {
        line: line_no,
        message,
    };

    let value: Value = serde_json::from_str(text).map_err(|err| malformed(err.to_string()))?;
    let kind = value
        .get("event")
        .and_then(Value::as_str)
        .ok_or_else(|| malformed("missing string `event` field".to_string()))?
        .to_string();

    let decode = |value: Value| -> Result<JournalEvent> {
        let event = match kind.as_str() {
            "FSDJump" => JournalEvent::FsdJump(serde_json::from_value(value)?),
            "CarrierJump" => JournalEvent::CarrierJump(serde_json::from_value(value)?),
            "Location" => JournalEvent::Location(serde_json::from_value(value)?),
            "Loadout" => JournalEvent::Loadout(serde_json::from_value(value)?),
            "Cargo" => JournalEvent::Cargo(serde_json::from_value(value)?),
            "FSDTarget" => JournalEvent::Target(serde_json::from_value(value)?),
            "Shutdown" => JournalEvent::Shutdown,
            "LoadGame" => JournalEvent::LoadGame,
            _ => JournalEvent::Other(kind.clone()),
        };
        Ok(event)
    };

    decode(value)
        .map(Some)
        .map_err(|err| malformed(format!("{kind}: {err}")))
}
