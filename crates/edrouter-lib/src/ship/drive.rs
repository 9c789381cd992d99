//! Frame shift drive and booster module identification.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::constants::{booster_range, drive_base_stats, rating_constant, size_constant};

const DRIVE_PREFIX: &str = "int_hyperdrive_";
const OVERCHARGE_PREFIX: &str = "overcharge_";
const BOOSTER_PREFIX: &str = "int_guardianfsdbooster_size";

/// Resolved frame shift drive stats, with any engineering already applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameShiftDrive {
    pub size: u8,
    /// Drive class, 1 (E) through 5 (A).
    pub class: u8,
    pub overcharged: bool,
    pub max_fuel_usage: f64,
    pub optimal_mass: f64,
    pub rating_const: f64,
    pub size_const: f64,
}

impl FrameShiftDrive {
    /// Unengineered drive of the given size and class.
    pub fn new(size: u8, class: u8, overcharged: bool) -> Result<Self> {
        let unknown = || Error::UnknownModule {
            item: drive_item(size, class, overcharged),
        };
        let (optimal_mass, max_fuel_usage) =
            drive_base_stats(size, class, overcharged).ok_or_else(unknown)?;
        let rating_const = rating_constant(class, overcharged).ok_or_else(unknown)?;
        let size_const = size_constant(size).ok_or_else(unknown)?;

        Ok(Self {
            size,
            class,
            overcharged,
            max_fuel_usage,
            optimal_mass,
            rating_const,
            size_const,
        })
    }

    /// Drive described by a journal module id such as `int_hyperdrive_size5_class5`.
    pub fn from_item(item: &str) -> Result<Self> {
        let (size, class, overcharged) =
            parse_drive_item(item).ok_or_else(|| Error::UnknownModule {
                item: item.to_string(),
            })?;
        Self::new(size, class, overcharged)
    }

    /// Whether `item` names a frame shift drive.
    pub fn is_drive_item(item: &str) -> bool {
        item.to_ascii_lowercase().starts_with(DRIVE_PREFIX)
    }

    /// Rating constant in the per-mille form the remote planner expects.
    pub fn fuel_multiplier(&self) -> f64 {
        self.rating_const / 1000.0
    }

    /// Class expressed as the in-game rating letter.
    pub fn rating_letter(&self) -> char {
        match self.class {
            1 => 'E',
            2 => 'D',
            3 => 'C',
            4 => 'B',
            _ => 'A',
        }
    }
}

/// Class number for a rating letter (`E` = 1 .. `A` = 5).
pub fn class_from_rating(rating: &str) -> Option<u8> {
    match rating.trim().to_ascii_uppercase().as_str() {
        "E" => Some(1),
        "D" => Some(2),
        "C" => Some(3),
        "B" => Some(4),
        "A" => Some(5),
        _ => None,
    }
}

/// Jump range bonus for a Guardian booster module id, if `item` is one.
pub fn booster_bonus(item: &str) -> Option<f64> {
    let size = item
        .to_ascii_lowercase()
        .strip_prefix(BOOSTER_PREFIX)?
        .parse::<u8>()
        .ok()?;
    booster_range(size)
}

fn parse_drive_item(item: &str) -> Option<(u8, u8, bool)> {
    let item = item.trim().to_ascii_lowercase();
    let rest = item.strip_prefix(DRIVE_PREFIX)?;
    let (overcharged, rest) = match rest.strip_prefix(OVERCHARGE_PREFIX) {
        Some(rest) => (true, rest),
        None => (false, rest),
    };
    let (size, class) = rest.split_once('_')?;
    let size = size.strip_prefix("size")?.parse().ok()?;
    let class = class.strip_prefix("class")?.parse().ok()?;
    Some((size, class, overcharged))
}

fn drive_item(size: u8, class: u8, overcharged: bool) -> String {
    if overcharged {
        format!("{DRIVE_PREFIX}{OVERCHARGE_PREFIX}size{size}_class{class}")
    } else {
        format!("{DRIVE_PREFIX}size{size}_class{class}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_and_overcharged_ids() {
        let standard = FrameShiftDrive::from_item("Int_HyperDrive_Size6_Class3").unwrap();
        assert_eq!((standard.size, standard.class), (6, 3));
        assert!(!standard.overcharged);
        assert_eq!(standard.optimal_mass, 1200.0);
        assert_eq!(standard.rating_const, 8.0);

        let overcharged = FrameShiftDrive::from_item("int_hyperdrive_overcharge_size5_class5").unwrap();
        assert!(overcharged.overcharged);
        assert_eq!(overcharged.rating_const, 13.0);
        assert_eq!(overcharged.size_const, 2.45);
    }

    #[test]
    fn rejects_unknown_ids() {
        assert!(matches!(
            FrameShiftDrive::from_item("int_shieldgenerator_size5_class5"),
            Err(Error::UnknownModule { .. })
        ));
        assert!(FrameShiftDrive::from_item("int_hyperdrive_size9_class5").is_err());
    }

    #[test]
    fn booster_bonus_by_size() {
        assert_eq!(booster_bonus("int_guardianfsdbooster_size5"), Some(10.5));
        assert_eq!(booster_bonus("int_guardianfsdbooster_size9"), None);
        assert_eq!(booster_bonus("int_fuelscoop_size5_class5"), None);
    }
}
