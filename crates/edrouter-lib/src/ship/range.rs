//! Jump range calculation.

use crate::error::{Error, Result};

use super::drive::FrameShiftDrive;
use super::stats::ShipState;

/// Maximum distance in light years the ship can cover in one jump.
///
/// Formula:
/// `optimal_mass * (1000 * max_fuel_usage / rating_const) ^ (1 / size_const) / total_mass + boost`
/// where `total_mass` is unladen mass plus main and reserve tanks plus `cargo_mass`.
///
/// # Examples
/// ```
/// use edrouter_lib::ship::{jump_range, FrameShiftDrive, ShipState};
///
/// let ship = ShipState {
///     name: None,
///     fsd: FrameShiftDrive::new(6, 3, false).unwrap(),
///     jump_range_boost: 0.0,
///     unladen_mass: 1200.0,
///     tank_size: 64.0,
///     reserve_size: 32.0,
///     max_cargo: 0.0,
/// };
/// let range = jump_range(&ship, 0.0).unwrap();
/// assert_eq!(format!("{range:.2}"), "11.26");
/// ```
pub fn jump_range(ship: &ShipState, cargo_mass: f64) -> Result<f64> {
    if !cargo_mass.is_finite() || cargo_mass < 0.0 {
        return Err(Error::ShipDataValidation {
            message: format!("cargo_mass must be finite and non-negative, got {cargo_mass}"),
        });
    }

    let total_mass = ship.total_mass(cargo_mass);
    if !total_mass.is_finite() || total_mass <= 0.0 {
        return Err(Error::ShipDataValidation {
            message: format!("total mass must be finite and positive, got {total_mass}"),
        });
    }

    Ok(unboosted_range(&ship.fsd, total_mass) + ship.jump_range_boost)
}

fn unboosted_range(fsd: &FrameShiftDrive, total_mass: f64) -> f64 {
    let fuel_term = 1000.0 * fsd.max_fuel_usage / fsd.rating_const;
    fsd.optimal_mass * fuel_term.powf(1.0 / fsd.size_const) / total_mass
}
