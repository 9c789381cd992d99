//! Ship stats relevant to jump planning.
//!
//! A [`ShipState`] is always built in one piece from a single authoritative
//! source: a journal `Loadout` event or a ship-builder export. Both sources
//! resolve engineering into absolute drive values, so everything downstream
//! (range display, planner parameters) sees the same model.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::journal::Loadout;

use super::constants::{MODIFIER_MAX_FUEL, MODIFIER_OPTIMAL_MASS};
use super::drive::{booster_bonus, FrameShiftDrive};
use super::range::jump_range;

const FSD_SLOT: &str = "FrameShiftDrive";

/// Jump-relevant ship stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fsd: FrameShiftDrive,
    pub jump_range_boost: f64,
    pub unladen_mass: f64,
    pub tank_size: f64,
    pub reserve_size: f64,
    pub max_cargo: f64,
}

impl ShipState {
    /// Build ship stats from a journal `Loadout` event.
    ///
    /// `FSDOptimalMass` and `MaxFuelPerJump` modifiers on the drive replace the
    /// base values outright; the journal reports them already engineered.
    pub fn from_loadout(loadout: &Loadout) -> Result<Self> {
        let module = loadout
            .modules
            .iter()
            .find(|module| {
                module.slot.eq_ignore_ascii_case(FSD_SLOT)
                    || FrameShiftDrive::is_drive_item(&module.item)
            })
            .ok_or_else(|| Error::ShipDataValidation {
                message: "loadout has no frame shift drive".to_string(),
            })?;

        let mut fsd = FrameShiftDrive::from_item(&module.item)?;
        if let Some(optimal_mass) = module.modifier(MODIFIER_OPTIMAL_MASS) {
            fsd.optimal_mass = optimal_mass;
        }
        if let Some(max_fuel) = module.modifier(MODIFIER_MAX_FUEL) {
            fsd.max_fuel_usage = max_fuel;
        }

        let jump_range_boost = loadout
            .modules
            .iter()
            .find_map(|module| booster_bonus(&module.item))
            .unwrap_or(0.0);

        let ship = Self {
            name: loadout.ship_name.clone().or_else(|| loadout.ship.clone()),
            fsd,
            jump_range_boost,
            unladen_mass: loadout.unladen_mass,
            tank_size: loadout.fuel_capacity.main,
            reserve_size: loadout.fuel_capacity.reserve,
            max_cargo: loadout.cargo_capacity,
        };
        ship.validate()?;

        debug!(
            ship = ship.name.as_deref().unwrap_or("<unnamed>"),
            optimal_mass = ship.fsd.optimal_mass,
            max_fuel = ship.fsd.max_fuel_usage,
            boost = ship.jump_range_boost,
            "resolved ship from loadout"
        );
        Ok(ship)
    }

    /// Validate that every mass and capacity is usable in the range formula.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            (self.unladen_mass, "unladen_mass"),
            (self.fsd.optimal_mass, "optimal_mass"),
            (self.fsd.max_fuel_usage, "max_fuel_usage"),
            (self.fsd.rating_const, "rating_const"),
            (self.fsd.size_const, "size_const"),
        ];
        for (value, field) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::ShipDataValidation {
                    message: format!("{field} must be a finite positive number"),
                });
            }
        }

        let non_negative = [
            (self.tank_size, "tank_size"),
            (self.reserve_size, "reserve_size"),
            (self.max_cargo, "max_cargo"),
            (self.jump_range_boost, "jump_range_boost"),
        ];
        for (value, field) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::ShipDataValidation {
                    message: format!("{field} must be finite and non-negative"),
                });
            }
        }

        Ok(())
    }

    /// Mass used by the range formula: hull, both fuel tanks and cargo.
    pub fn total_mass(&self, cargo_mass: f64) -> f64 {
        self.unladen_mass + self.tank_size + self.reserve_size + cargo_mass
    }

    /// Jump range carrying `cargo_mass` tonnes.
    pub fn range(&self, cargo_mass: f64) -> Result<f64> {
        jump_range(self, cargo_mass)
    }

    /// Jump range with an empty hold.
    pub fn max_range(&self) -> Result<f64> {
        jump_range(self, 0.0)
    }

    /// Jump range with a full hold.
    pub fn laden_range(&self) -> Result<f64> {
        jump_range(self, self.max_cargo)
    }
}
