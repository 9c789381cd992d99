//! Waypoint rows and the closed set of route kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a route came from, which fixes its row layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteKind {
    /// Neutron-boosted plotter route; one row may bundle several jumps.
    Neutron,
    /// Exact ("generic") plotter route with refuel and neutron flags.
    Exact,
    /// Road to riches exploration route.
    RoadToRiches,
}

const NEUTRON_HEADERS: &[&str] = &[
    "System Name",
    "Distance To Arrival",
    "Distance Remaining",
    "Neutron Star",
    "Jumps",
];

const EXACT_HEADERS: &[&str] = &[
    "System Name",
    "Distance",
    "Distance Remaining",
    "Fuel Left",
    "Fuel Used",
    "Refuel",
    "Neutron Star",
];

const RICHES_HEADERS: &[&str] = &[
    "System Name",
    "Distance",
    "Distance Remaining",
    "Bodies",
    "Scan Value",
    "Mapping Value",
];

impl RouteKind {
    pub const ALL: [RouteKind; 3] = [RouteKind::Neutron, RouteKind::Exact, RouteKind::RoadToRiches];

    /// CSV header row, in wire order.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            RouteKind::Neutron => NEUTRON_HEADERS,
            RouteKind::Exact => EXACT_HEADERS,
            RouteKind::RoadToRiches => RICHES_HEADERS,
        }
    }

    /// Planner endpoint path that produces this kind of route.
    pub fn endpoint(self) -> &'static str {
        match self {
            RouteKind::Neutron => "route",
            RouteKind::Exact => "generic/route",
            RouteKind::RoadToRiches => "riches/route",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RouteKind::Neutron => "neutron",
            RouteKind::Exact => "exact",
            RouteKind::RoadToRiches => "road to riches",
        }
    }

    /// Identify a route kind from a CSV header row.
    ///
    /// Headers are compared as a set, ignoring case and surrounding whitespace.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Option<RouteKind> {
        let mut found: Vec<String> = headers
            .iter()
            .map(|header| normalize_header(header.as_ref()))
            .collect();
        found.sort();

        RouteKind::ALL.into_iter().find(|kind| {
            let mut expected: Vec<String> =
                kind.headers().iter().map(|h| normalize_header(h)).collect();
            expected.sort();
            expected == found
        })
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn normalize_header(header: &str) -> String {
    header.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

/// Per-kind waypoint columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WaypointDetail {
    Neutron {
        jumps: u32,
        has_neutron_star: bool,
    },
    Exact {
        must_refuel: bool,
        has_neutron_star: bool,
    },
    RoadToRiches {
        body_count: u32,
        scan_value: f64,
        mapping_value: f64,
    },
}

/// One row of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub system: String,
    pub distance_from_previous: f64,
    pub distance_remaining: f64,
    #[serde(flatten)]
    pub detail: WaypointDetail,
}

impl Waypoint {
    pub fn neutron(
        system: impl Into<String>,
        distance_from_previous: f64,
        distance_remaining: f64,
        jumps: u32,
        has_neutron_star: bool,
    ) -> Self {
        Self {
            system: system.into(),
            distance_from_previous,
            distance_remaining,
            detail: WaypointDetail::Neutron {
                jumps,
                has_neutron_star,
            },
        }
    }

    pub fn exact(
        system: impl Into<String>,
        distance_from_previous: f64,
        distance_remaining: f64,
        must_refuel: bool,
        has_neutron_star: bool,
    ) -> Self {
        Self {
            system: system.into(),
            distance_from_previous,
            distance_remaining,
            detail: WaypointDetail::Exact {
                must_refuel,
                has_neutron_star,
            },
        }
    }

    pub fn road_to_riches(
        system: impl Into<String>,
        distance_from_previous: f64,
        distance_remaining: f64,
        body_count: u32,
        scan_value: f64,
        mapping_value: f64,
    ) -> Self {
        Self {
            system: system.into(),
            distance_from_previous,
            distance_remaining,
            detail: WaypointDetail::RoadToRiches {
                body_count,
                scan_value,
                mapping_value,
            },
        }
    }

    pub fn kind(&self) -> RouteKind {
        match self.detail {
            WaypointDetail::Neutron { .. } => RouteKind::Neutron,
            WaypointDetail::Exact { .. } => RouteKind::Exact,
            WaypointDetail::RoadToRiches { .. } => RouteKind::RoadToRiches,
        }
    }

    /// Number of in-game jumps this row accounts for.
    ///
    /// Neutron rows bundle every jump between two plotted systems; all other
    /// rows are a single jump.
    pub fn jumps(&self) -> u32 {
        match self.detail {
            WaypointDetail::Neutron { jumps, .. } => jumps,
            WaypointDetail::Exact { .. } | WaypointDetail::RoadToRiches { .. } => 1,
        }
    }

    pub fn has_neutron_star(&self) -> bool {
        match self.detail {
            WaypointDetail::Neutron {
                has_neutron_star, ..
            }
            | WaypointDetail::Exact {
                has_neutron_star, ..
            } => has_neutron_star,
            WaypointDetail::RoadToRiches { .. } => false,
        }
    }

    pub fn must_refuel(&self) -> bool {
        matches!(
            self.detail,
            WaypointDetail::Exact {
                must_refuel: true,
                ..
            }
        )
    }
}
