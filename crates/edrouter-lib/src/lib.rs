//! edrouter library entry points.
//!
//! This crate tails the game's journal, keeps a live picture of the player's
//! ship and location, tracks progress along a waypoint route and drives the
//! remote route planner. Front ends (the CLI today) should only depend on the
//! items exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod error;
pub mod journal;
pub mod planner;
pub mod route;
pub mod session;
pub mod ship;
pub mod state;

pub use config::CompanionConfig;
pub use error::{Error, Result};
pub use journal::{JournalEvent, JournalTailer, ReplayedState};
pub use planner::{
    nearest, CancelHandle, HttpPlanner, JobEvent, JobSlot, JobState, NearestSystem,
    PlannerTransport, RemoteRouteJob, RouteQuery,
};
pub use route::{Route, RouteKind, RouteProgress, Waypoint};
pub use session::{JournalSession, SessionEvent, SessionSnapshot};
pub use ship::{jump_range, ShipState};
pub use state::{GameState, Location, StateChange};
