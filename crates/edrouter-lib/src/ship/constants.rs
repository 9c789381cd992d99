//! Drive and booster lookup tables used by the jump range calculation.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Multiplier applied to optimal mass by the "Mass Manager" experimental effect.
pub const HEAVY_DRIVE_MULTIPLIER: f64 = 1.04;

/// Multiplier applied to max fuel per jump by the "Deep Charge" experimental effect.
pub const FUEL_CAPACITY_MULTIPLIER: f64 = 1.10;

/// Blueprint name of the optimal-mass experimental effect in ship-builder exports.
pub const SPECIAL_FSD_HEAVY: &str = "special_fsd_heavy";

/// Blueprint name of the max-fuel experimental effect in ship-builder exports.
pub const SPECIAL_FSD_FUEL_CAPACITY: &str = "special_fsd_fuelcapacity";

/// Journal modifier label that replaces a drive's optimal mass.
pub const MODIFIER_OPTIMAL_MASS: &str = "FSDOptimalMass";

/// Journal modifier label that replaces a drive's max fuel per jump.
pub const MODIFIER_MAX_FUEL: &str = "MaxFuelPerJump";

/// Drive size → fuel power exponent.
const SIZE_CONSTANTS: [(u8, f64); 7] = [
    (2, 2.00),
    (3, 2.15),
    (4, 2.30),
    (5, 2.45),
    (6, 2.60),
    (7, 2.75),
    (8, 2.90),
];

/// Drive class (1 = E .. 5 = A) → fuel multiplier constant for standard drives.
const RATING_CONSTANTS: [(u8, f64); 5] = [(1, 11.0), (2, 10.0), (3, 8.0), (4, 10.0), (5, 12.0)];

/// Drive class → fuel multiplier constant for overcharged (supercruise overcharge) drives.
const OVERCHARGE_RATING_CONSTANTS: [(u8, f64); 5] =
    [(1, 8.0), (2, 12.0), (3, 12.0), (4, 12.0), (5, 13.0)];

/// Guardian FSD booster size → flat jump range bonus in light years.
const BOOSTER_RANGES: [(u8, f64); 5] = [(1, 4.00), (2, 6.00), (3, 7.75), (4, 9.25), (5, 10.50)];

/// (size, class) → (optimal mass, max fuel per jump) for standard drives.
const STANDARD_DRIVES: [((u8, u8), (f64, f64)); 30] = [
    ((2, 1), (48.0, 0.6)),
    ((2, 2), (54.0, 0.6)),
    ((2, 3), (60.0, 0.6)),
    ((2, 4), (75.0, 0.8)),
    ((2, 5), (90.0, 0.9)),
    ((3, 1), (80.0, 1.2)),
    ((3, 2), (90.0, 1.2)),
    ((3, 3), (100.0, 1.2)),
    ((3, 4), (125.0, 1.5)),
    ((3, 5), (150.0, 1.8)),
    ((4, 1), (280.0, 2.0)),
    ((4, 2), (315.0, 2.0)),
    ((4, 3), (350.0, 2.0)),
    ((4, 4), (438.0, 2.5)),
    ((4, 5), (525.0, 3.0)),
    ((5, 1), (560.0, 3.3)),
    ((5, 2), (630.0, 3.3)),
    ((5, 3), (700.0, 3.3)),
    ((5, 4), (875.0, 4.1)),
    ((5, 5), (1050.0, 5.0)),
    ((6, 1), (960.0, 5.3)),
    ((6, 2), (1080.0, 5.3)),
    ((6, 3), (1200.0, 5.3)),
    ((6, 4), (1500.0, 6.6)),
    ((6, 5), (1800.0, 8.0)),
    ((7, 1), (1440.0, 8.5)),
    ((7, 2), (1620.0, 8.5)),
    ((7, 3), (1800.0, 8.5)),
    ((7, 4), (2250.0, 10.6)),
    ((7, 5), (2700.0, 12.8)),
];

/// (size, class) → (optimal mass, max fuel per jump) for overcharged drives.
const OVERCHARGE_DRIVES: [((u8, u8), (f64, f64)); 35] = [
    ((2, 1), (60.0, 0.6)),
    ((2, 2), (90.0, 0.6)),
    ((2, 3), (90.0, 0.6)),
    ((2, 4), (90.0, 0.8)),
    ((2, 5), (100.0, 0.9)),
    ((3, 1), (100.0, 1.2)),
    ((3, 2), (150.0, 1.2)),
    ((3, 3), (150.0, 1.2)),
    ((3, 4), (150.0, 1.5)),
    ((3, 5), (167.0, 1.8)),
    ((4, 1), (350.0, 2.0)),
    ((4, 2), (525.0, 2.0)),
    ((4, 3), (525.0, 2.0)),
    ((4, 4), (525.0, 2.5)),
    ((4, 5), (585.0, 3.0)),
    ((5, 1), (700.0, 3.3)),
    ((5, 2), (1050.0, 3.3)),
    ((5, 3), (1050.0, 3.3)),
    ((5, 4), (1050.0, 4.1)),
    ((5, 5), (1175.0, 5.2)),
    ((6, 1), (1200.0, 5.3)),
    ((6, 2), (1800.0, 5.3)),
    ((6, 3), (1800.0, 5.3)),
    ((6, 4), (1800.0, 6.6)),
    ((6, 5), (2000.0, 8.3)),
    ((7, 1), (1800.0, 8.5)),
    ((7, 2), (2700.0, 8.5)),
    ((7, 3), (2700.0, 8.5)),
    ((7, 4), (2700.0, 10.6)),
    ((7, 5), (3000.0, 13.1)),
    ((8, 1), (2500.0, 11.8)),
    ((8, 2), (3750.0, 11.8)),
    ((8, 3), (3750.0, 11.8)),
    ((8, 4), (3750.0, 14.8)),
    ((8, 5), (4170.0, 18.2)),
];

static STANDARD_DRIVE_TABLE: Lazy<HashMap<(u8, u8), (f64, f64)>> =
    Lazy::new(|| STANDARD_DRIVES.into_iter().collect());

static OVERCHARGE_DRIVE_TABLE: Lazy<HashMap<(u8, u8), (f64, f64)>> =
    Lazy::new(|| OVERCHARGE_DRIVES.into_iter().collect());

fn lookup(table: &[(u8, f64)], key: u8) -> Option<f64> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
}

/// Fuel power exponent for a drive size.
pub fn size_constant(size: u8) -> Option<f64> {
    lookup(&SIZE_CONSTANTS, size)
}

/// Fuel multiplier constant for a drive class.
pub fn rating_constant(class: u8, overcharged: bool) -> Option<f64> {
    if overcharged {
        lookup(&OVERCHARGE_RATING_CONSTANTS, class)
    } else {
        lookup(&RATING_CONSTANTS, class)
    }
}

/// Flat range bonus for a Guardian FSD booster of the given size.
pub fn booster_range(size: u8) -> Option<f64> {
    lookup(&BOOSTER_RANGES, size)
}

/// Unengineered optimal mass and max fuel per jump for a drive.
pub fn drive_base_stats(size: u8, class: u8, overcharged: bool) -> Option<(f64, f64)> {
    let table = if overcharged {
        &OVERCHARGE_DRIVE_TABLE
    } else {
        &STANDARD_DRIVE_TABLE
    };
    table.get(&(size, class)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overcharged_drives_use_their_own_rating_table() {
        assert_eq!(rating_constant(3, false), Some(8.0));
        assert_eq!(rating_constant(3, true), Some(12.0));
        assert_eq!(rating_constant(6, false), None);
    }

    #[test]
    fn size_eight_only_exists_for_overcharged_drives() {
        assert_eq!(size_constant(8), Some(2.90));
        assert!(drive_base_stats(8, 5, false).is_none());
        assert!(drive_base_stats(8, 5, true).is_some());
    }
}
