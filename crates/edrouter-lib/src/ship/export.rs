//! Ship-builder export support.
//!
//! Ship-builder tools describe the drive by size and rating letter, with
//! engineering as a percentage change plus an optional experimental effect.
//! This module resolves that into the same absolute [`ShipState`] a journal
//! loadout produces.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

use super::constants::{
    booster_range, FUEL_CAPACITY_MULTIPLIER, HEAVY_DRIVE_MULTIPLIER, SPECIAL_FSD_FUEL_CAPACITY,
    SPECIAL_FSD_HEAVY,
};
use super::drive::{class_from_rating, FrameShiftDrive};
use super::stats::ShipState;

const BOOSTER_GROUP: &str = "frame shift drive booster";

#[derive(Debug, Clone, Deserialize)]
pub struct ShipExport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ship: Option<String>,
    pub stats: ExportStats,
    pub components: ExportComponents,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStats {
    pub unladen_mass: f64,
    pub fuel_capacity: f64,
    #[serde(default)]
    pub reserve_fuel_capacity: f64,
    #[serde(default)]
    pub cargo_capacity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportComponents {
    pub standard: ExportStandard,
    #[serde(default)]
    pub internal: Vec<Option<ExportModule>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStandard {
    pub frame_shift_drive: ExportModule,
}

/// One module slot in an export. `class` is the module size.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportModule {
    pub class: u8,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub overcharged: bool,
    #[serde(default)]
    pub modifications: Option<ExportModifications>,
    #[serde(default)]
    pub blueprint: Option<ExportBlueprint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportModifications {
    /// Optimal mass change in percent, e.g. `55.0` for +55%.
    #[serde(default)]
    pub optmass: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportBlueprint {
    #[serde(default)]
    pub special: Option<ExportSpecial>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSpecial {
    pub edname: String,
}

impl ExportModule {
    fn experimental_effect(&self) -> Option<&str> {
        self.blueprint
            .as_ref()?
            .special
            .as_ref()
            .map(|special| special.edname.as_str())
    }

    fn is_booster(&self) -> bool {
        self.group
            .as_deref()
            .map(|group| group.to_ascii_lowercase().contains(BOOSTER_GROUP))
            .unwrap_or(false)
    }
}

impl ShipState {
    /// Build ship stats from a parsed ship-builder export.
    pub fn from_export(export: &ShipExport) -> Result<Self> {
        let module = &export.components.standard.frame_shift_drive;
        let rating = module.rating.as_deref().unwrap_or_default();
        let class = class_from_rating(rating).ok_or_else(|| Error::ShipDataValidation {
            message: format!("unknown drive rating '{rating}'"),
        })?;

        let mut fsd = FrameShiftDrive::new(module.class, class, module.overcharged)?;
        if let Some(percent) = module.modifications.as_ref().and_then(|mods| mods.optmass) {
            fsd.optimal_mass *= 1.0 + percent / 100.0;
        }
        match module.experimental_effect() {
            Some(effect) if effect.eq_ignore_ascii_case(SPECIAL_FSD_HEAVY) => {
                fsd.optimal_mass *= HEAVY_DRIVE_MULTIPLIER;
            }
            Some(effect) if effect.eq_ignore_ascii_case(SPECIAL_FSD_FUEL_CAPACITY) => {
                fsd.max_fuel_usage *= FUEL_CAPACITY_MULTIPLIER;
            }
            _ => {}
        }

        let jump_range_boost = export
            .components
            .internal
            .iter()
            .flatten()
            .filter(|module| module.is_booster())
            .find_map(|module| booster_range(module.class))
            .unwrap_or(0.0);

        let ship = Self {
            name: export.name.clone().or_else(|| export.ship.clone()),
            fsd,
            jump_range_boost,
            unladen_mass: export.stats.unladen_mass,
            tank_size: export.stats.fuel_capacity,
            reserve_size: export.stats.reserve_fuel_capacity,
            max_cargo: export.stats.cargo_capacity,
        };
        ship.validate()?;

        debug!(
            ship = ship.name.as_deref().unwrap_or("<unnamed>"),
            optimal_mass = ship.fsd.optimal_mass,
            max_fuel = ship.fsd.max_fuel_usage,
            "resolved ship from export"
        );
        Ok(ship)
    }

    /// Parse and resolve a ship-builder export from JSON text.
    pub fn from_export_json(text: &str) -> Result<Self> {
        let export: ShipExport = serde_json::from_str(text)?;
        Self::from_export(&export)
    }

    /// Load a ship-builder export from disk.
    pub fn from_export_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_export_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_with(drive: &str) -> String {
        format!(
            r#"{{"name":"Test","stats":{{"unladenMass":400.0,"fuelCapacity":32.0,"reserveFuelCapacity":0.63,"cargoCapacity":0}},
               "components":{{"standard":{{"frameShiftDrive":{drive}}},"internal":[null]}}}}"#
        )
    }

    #[test]
    fn percentage_modifier_scales_base_optimal_mass() {
        let ship = ShipState::from_export_json(&export_with(
            r#"{"class":5,"rating":"A","modifications":{"optmass":55.0}}"#,
        ))
        .unwrap();
        assert!((ship.fsd.optimal_mass - 1627.5).abs() < 1e-9);
        assert_eq!(ship.fsd.max_fuel_usage, 5.0);
        assert_eq!(ship.jump_range_boost, 0.0);
    }

    #[test]
    fn experimental_effects_apply_their_multipliers() {
        let heavy = ShipState::from_export_json(&export_with(
            r#"{"class":5,"rating":"A","blueprint":{"special":{"edname":"special_fsd_heavy"}}}"#,
        ))
        .unwrap();
        assert!((heavy.fsd.optimal_mass - 1092.0).abs() < 1e-9);

        let deep = ShipState::from_export_json(&export_with(
            r#"{"class":5,"rating":"A","blueprint":{"special":{"edname":"special_fsd_fuelcapacity"}}}"#,
        ))
        .unwrap();
        assert!((deep.fsd.max_fuel_usage - 5.5).abs() < 1e-9);
        assert_eq!(deep.fsd.optimal_mass, 1050.0);
    }

    #[test]
    fn unknown_rating_is_rejected() {
        let err = ShipState::from_export_json(&export_with(r#"{"class":5,"rating":"Z"}"#))
            .expect_err("bad rating");
        assert!(matches!(err, Error::ShipDataValidation { .. }));
    }
}
