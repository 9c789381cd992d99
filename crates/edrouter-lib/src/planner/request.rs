//! Typed submission parameters for each planner endpoint.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::route::RouteKind;
use crate::ship::{jump_range, ShipState};

const SUPERCHARGE_STANDARD: u8 = 4;
const SUPERCHARGE_OVERCHARGED: u8 = 6;

/// Default neutron plotter efficiency, in percent.
pub const DEFAULT_EFFICIENCY: u8 = 60;

/// Neutron plotter request (`route`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeutronQuery {
    pub from: String,
    pub to: String,
    pub range: f64,
    pub efficiency: u8,
    pub supercharge_multiplier: u8,
}

impl NeutronQuery {
    /// Build a request with the range the ship reaches while carrying `cargo_mass`.
    pub fn for_ship(
        from: impl Into<String>,
        to: impl Into<String>,
        ship: &ShipState,
        cargo_mass: f64,
    ) -> Result<Self> {
        Ok(Self {
            from: from.into(),
            to: to.into(),
            range: round2(jump_range(ship, cargo_mass)?),
            efficiency: DEFAULT_EFFICIENCY,
            supercharge_multiplier: if ship.fsd.overcharged {
                SUPERCHARGE_OVERCHARGED
            } else {
                SUPERCHARGE_STANDARD
            },
        })
    }

    pub fn with_efficiency(mut self, efficiency: u8) -> Self {
        self.efficiency = efficiency;
        self
    }
}

/// Exact plotter request (`generic/route`).
///
/// Carries the full drive model so the planner can simulate fuel use per jump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactQuery {
    pub source: String,
    pub destination: String,
    pub is_supercharged: bool,
    pub use_supercharge: bool,
    pub use_injections: bool,
    pub exclude_secondary: bool,
    pub refuel_every_scoopable: bool,
    pub fuel_power: f64,
    pub fuel_multiplier: f64,
    pub optimal_mass: f64,
    pub base_mass: f64,
    pub tank_size: f64,
    pub internal_tank_size: f64,
    pub max_fuel_per_jump: f64,
    pub range_boost: f64,
    pub cargo: f64,
    pub max_time: u32,
    pub algorithm: String,
}

impl ExactQuery {
    pub fn for_ship(
        source: impl Into<String>,
        destination: impl Into<String>,
        ship: &ShipState,
        cargo_mass: f64,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            is_supercharged: false,
            use_supercharge: true,
            use_injections: false,
            exclude_secondary: false,
            refuel_every_scoopable: true,
            fuel_power: ship.fsd.size_const,
            fuel_multiplier: ship.fsd.fuel_multiplier(),
            optimal_mass: ship.fsd.optimal_mass,
            base_mass: ship.unladen_mass,
            tank_size: ship.tank_size,
            internal_tank_size: ship.reserve_size,
            max_fuel_per_jump: ship.fsd.max_fuel_usage,
            range_boost: ship.jump_range_boost,
            cargo: cargo_mass,
            max_time: 60,
            algorithm: "optimistic".to_string(),
        }
    }
}

/// Road to riches request (`riches/route`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichesQuery {
    pub from: String,
    pub to: Option<String>,
    pub range: f64,
    pub radius: f64,
    pub max_results: u32,
    pub max_distance: f64,
    pub min_value: u64,
    pub use_mapping_value: bool,
    pub loop_route: bool,
}

impl RichesQuery {
    pub fn for_ship(
        from: impl Into<String>,
        to: Option<String>,
        ship: &ShipState,
        cargo_mass: f64,
    ) -> Result<Self> {
        Ok(Self {
            from: from.into(),
            to,
            range: round2(jump_range(ship, cargo_mass)?),
            radius: 25.0,
            max_results: 100,
            max_distance: 50_000.0,
            min_value: 100_000,
            use_mapping_value: false,
            loop_route: false,
        })
    }
}

/// A submission for one of the planner endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteQuery {
    Neutron(NeutronQuery),
    Exact(ExactQuery),
    RoadToRiches(RichesQuery),
}

impl RouteQuery {
    /// Route kind the endpoint produces, which also selects the result decoder.
    pub fn kind(&self) -> RouteKind {
        match self {
            RouteQuery::Neutron(_) => RouteKind::Neutron,
            RouteQuery::Exact(_) => RouteKind::Exact,
            RouteQuery::RoadToRiches(_) => RouteKind::RoadToRiches,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.kind().endpoint()
    }

    /// Reject requests the planner would refuse anyway.
    pub fn validate(&self) -> Result<()> {
        let (origin, field, value) = match self {
            RouteQuery::Neutron(query) => {
                if query.efficiency > 100 {
                    return Err(invalid(format!(
                        "efficiency must be between 0 and 100, got {}",
                        query.efficiency
                    )));
                }
                require_name("destination", &query.to)?;
                (&query.from, "range", query.range)
            }
            RouteQuery::Exact(query) => {
                require_name("destination", &query.destination)?;
                (&query.source, "optimal_mass", query.optimal_mass)
            }
            RouteQuery::RoadToRiches(query) => {
                if query.max_results == 0 {
                    return Err(invalid("max_results must be at least 1".to_string()));
                }
                (&query.from, "range", query.range)
            }
        };
        require_name("origin", origin)?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(format!("{field} must be positive, got {value}")));
        }
        Ok(())
    }

    /// Query-string pairs in the order the planner documents them.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = QueryPairs::default();
        match self {
            RouteQuery::Neutron(query) => {
                pairs
                    .push("from", &query.from)
                    .push("to", &query.to)
                    .push("range", query.range)
                    .push("efficiency", query.efficiency)
                    .push("supercharge_multiplier", query.supercharge_multiplier);
            }
            RouteQuery::Exact(query) => {
                pairs
                    .push("source", &query.source)
                    .push("destination", &query.destination)
                    .flag("is_supercharged", query.is_supercharged)
                    .flag("use_supercharge", query.use_supercharge)
                    .flag("use_injections", query.use_injections)
                    .flag("exclude_secondary", query.exclude_secondary)
                    .flag("refuel_every_scoopable", query.refuel_every_scoopable)
                    .push("fuel_power", query.fuel_power)
                    .push("fuel_multiplier", query.fuel_multiplier)
                    .push("optimal_mass", query.optimal_mass)
                    .push("base_mass", query.base_mass)
                    .push("tank_size", query.tank_size)
                    .push("internal_tank_size", query.internal_tank_size)
                    .push("max_fuel_per_jump", query.max_fuel_per_jump)
                    .push("range_boost", query.range_boost)
                    .push("cargo", query.cargo)
                    .push("max_time", query.max_time)
                    .push("algorithm", &query.algorithm);
            }
            RouteQuery::RoadToRiches(query) => {
                pairs.push("from", &query.from);
                if let Some(to) = &query.to {
                    pairs.push("to", to);
                }
                pairs
                    .push("range", query.range)
                    .push("radius", query.radius)
                    .push("max_results", query.max_results)
                    .push("max_distance", query.max_distance)
                    .push("min_value", query.min_value)
                    .flag("use_mapping_value", query.use_mapping_value)
                    .flag("loop", query.loop_route);
            }
        }
        pairs.0
    }
}

#[derive(Default)]
struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    fn flag(&mut self, key: &str, value: bool) -> &mut Self {
        self.push(key, u8::from(value))
    }
}

fn require_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} system name is empty")));
    }
    Ok(())
}

fn invalid(message: String) -> Error {
    Error::Planner { message }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
