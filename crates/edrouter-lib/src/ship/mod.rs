//! Ship stats and jump range calculation.
//!
//! - [`constants`] - drive, rating and booster lookup tables
//! - [`drive`] - frame shift drive identification from module ids
//! - [`stats`] - [`ShipState`] built from a journal loadout
//! - [`export`] - [`ShipState`] built from a ship-builder export
//! - [`range`] - the jump range formula
//!
//! # Example
//!
//! ```no_run
//! use edrouter_lib::ship::ShipState;
//!
//! let ship = ShipState::from_export_path(std::path::Path::new("ship.json")).unwrap();
//! let range = ship.range(16.0).unwrap();
//! println!("{range:.2} ly");
//! ```

pub mod constants;
pub mod drive;
pub mod export;
pub mod range;
pub mod stats;

pub use drive::{booster_bonus, class_from_rating, FrameShiftDrive};
pub use export::ShipExport;
pub use range::jump_range;
pub use stats::ShipState;
