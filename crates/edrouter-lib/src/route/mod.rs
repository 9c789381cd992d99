//! Route model and progress tracking.
//!
//! A [`Route`] is an ordered list of waypoints of a single [`RouteKind`] plus
//! the index of the waypoint the player is heading for. Jump counts are the
//! sum of per-row jump weights, not the row count.

mod csv_codec;
mod remote;
pub mod waypoint;

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use waypoint::{RouteKind, Waypoint, WaypointDetail};

const SUGGESTION_LIMIT: usize = 3;
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Progress summary handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteProgress {
    pub kind: RouteKind,
    pub index: usize,
    pub len: usize,
    pub jumps_total: u32,
    pub jumps_remaining: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<Waypoint>,
    pub complete: bool,
}

/// An indexed, homogeneous sequence of waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    kind: RouteKind,
    waypoints: Vec<Waypoint>,
    index: usize,
    lookup: HashMap<String, Vec<usize>>,
}

impl Route {
    /// Build a route, rejecting waypoints of a different kind.
    pub fn new(kind: RouteKind, waypoints: Vec<Waypoint>) -> Result<Self> {
        check_kind(kind, &waypoints)?;
        let mut route = Self {
            kind,
            waypoints,
            index: 0,
            lookup: HashMap::new(),
        };
        route.rebuild_lookup();
        Ok(route)
    }

    /// Parse a route from CSV text; the header row picks the kind.
    pub fn from_csv(text: &str) -> Result<Self> {
        let (kind, waypoints) = csv_codec::decode(text)?;
        Self::new(kind, waypoints)
    }

    /// Serialize the route to CSV in its kind's canonical column order.
    pub fn to_csv(&self) -> Result<String> {
        csv_codec::encode(self.kind, &self.waypoints)
    }

    /// Load a route previously saved as CSV.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                Error::RouteFileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io(err)
            }
        })?;
        let route = Self::from_csv(&text)?;
        info!(
            path = %path.display(),
            kind = %route.kind,
            waypoints = route.len(),
            "loaded route"
        );
        Ok(route)
    }

    /// Write the route as CSV, replacing `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_csv()?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(text.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|err| err.error)?;
        debug!(path = %path.display(), "saved route");
        Ok(())
    }

    /// Decode a planner `result` payload for the endpoint that produced it.
    pub fn from_remote_result(kind: RouteKind, payload: &Value) -> Result<Self> {
        let waypoints = remote::decode(kind, payload)?;
        Self::new(kind, waypoints)
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to `index`, clamped into `0..=len-1`. Returns the index applied.
    pub fn set_index(&mut self, index: usize) -> usize {
        self.index = index.min(self.waypoints.len().saturating_sub(1));
        self.index
    }

    /// Waypoint the player is currently heading for.
    pub fn current(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.index)
    }

    /// Waypoint after the current one.
    pub fn next(&self) -> Option<&Waypoint> {
        self.waypoints.get(self.index + 1)
    }

    /// Whether the tracked position has reached the final waypoint.
    pub fn is_complete(&self) -> bool {
        !self.waypoints.is_empty() && self.index == self.waypoints.len() - 1
    }

    pub fn jumps_total(&self) -> u32 {
        self.waypoints.iter().map(Waypoint::jumps).sum()
    }

    /// Jumps from the current waypoint (inclusive) to the end.
    pub fn jumps_remaining(&self) -> u32 {
        self.waypoints
            .iter()
            .skip(self.index)
            .map(Waypoint::jumps)
            .sum()
    }

    /// Sorted positions at which `system` appears.
    pub fn positions_of(&self, system: &str) -> &[usize] {
        self.lookup
            .get(&normalize_name(system))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Track the player's arrival in `system`.
    ///
    /// Prefers the first occurrence strictly after the current index and falls
    /// back to the first occurrence anywhere, so revisiting an earlier part of
    /// a looping route still resolves.
    pub fn advance_to(&mut self, system: &str) -> Result<usize> {
        let positions = self.positions_of(system);
        let Some(&first) = positions.first() else {
            return Err(Error::SystemNotInRoute {
                name: system.to_string(),
                suggestions: self.suggestions(system),
            });
        };

        let after = positions.partition_point(|&position| position <= self.index);
        let target = positions.get(after).copied().unwrap_or(first);
        self.index = target;
        debug!(system, index = target, "advanced route");
        Ok(target)
    }

    /// Correct the system name of one waypoint.
    pub fn rename_system(&mut self, position: usize, system: impl Into<String>) -> Result<()> {
        let len = self.waypoints.len();
        let waypoint = self
            .waypoints
            .get_mut(position)
            .ok_or(Error::WaypointOutOfRange { position, len })?;
        waypoint.system = system.into();
        self.rebuild_lookup();
        Ok(())
    }

    /// Swap in a new set of waypoints of the same kind, keeping the index in range.
    pub fn replace_waypoints(&mut self, waypoints: Vec<Waypoint>) -> Result<()> {
        check_kind(self.kind, &waypoints)?;
        self.waypoints = waypoints;
        self.set_index(self.index);
        self.rebuild_lookup();
        Ok(())
    }

    pub fn progress(&self) -> RouteProgress {
        RouteProgress {
            kind: self.kind,
            index: self.index,
            len: self.len(),
            jumps_total: self.jumps_total(),
            jumps_remaining: self.jumps_remaining(),
            current: self.current().cloned(),
            complete: self.is_complete(),
        }
    }

    fn rebuild_lookup(&mut self) {
        self.lookup.clear();
        for (position, waypoint) in self.waypoints.iter().enumerate() {
            self.lookup
                .entry(normalize_name(&waypoint.system))
                .or_default()
                .push(position);
        }
    }

    fn suggestions(&self, system: &str) -> Vec<String> {
        let wanted = normalize_name(system);
        let mut scored: Vec<(f64, &str)> = self
            .waypoints
            .iter()
            .map(|waypoint| {
                let score = strsim::jaro_winkler(&wanted, &normalize_name(&waypoint.system));
                (score, waypoint.system.as_str())
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let mut suggestions: Vec<String> = Vec::new();
        for (_, name) in scored {
            if !suggestions.iter().any(|known| known == name) {
                suggestions.push(name.to_string());
            }
            if suggestions.len() == SUGGESTION_LIMIT {
                break;
            }
        }
        suggestions
    }
}

fn check_kind(kind: RouteKind, waypoints: &[Waypoint]) -> Result<()> {
    match waypoints.iter().find(|waypoint| waypoint.kind() != kind) {
        Some(mismatch) => Err(Error::MixedWaypoints {
            expected: kind.label(),
            found: mismatch.kind().label(),
        }),
        None => Ok(()),
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
