//! Decoders for planner result payloads.
//!
//! Each endpoint returns its own shape. Decoding is all-or-nothing: any
//! missing or mistyped field fails the whole result instead of producing a
//! partial route.

use serde::de::{DeserializeOwned, Error as DeError};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Error, Result};

use super::waypoint::{RouteKind, Waypoint};

#[derive(Debug, Deserialize)]
struct NeutronResult {
    system_jumps: Vec<NeutronHop>,
}

#[derive(Debug, Deserialize)]
struct NeutronHop {
    system: String,
    distance_jumped: f64,
    distance_left: f64,
    jumps: u32,
    #[serde(default, deserialize_with = "flag")]
    neutron_star: bool,
}

#[derive(Debug, Deserialize)]
struct ExactResult {
    jumps: Vec<ExactHop>,
}

#[derive(Debug, Deserialize)]
struct ExactHop {
    #[serde(alias = "system")]
    name: String,
    distance: f64,
    distance_to_destination: f64,
    #[serde(default, deserialize_with = "flag", alias = "refuel")]
    must_refuel: bool,
    #[serde(default, deserialize_with = "flag", alias = "neutron_star")]
    has_neutron: bool,
}

#[derive(Debug, Deserialize)]
struct RichesSystem {
    name: String,
    distance: f64,
    distance_to_destination: f64,
    #[serde(default)]
    bodies: Vec<RichesBody>,
}

#[derive(Debug, Deserialize)]
struct RichesBody {
    #[serde(default)]
    estimated_scan_value: f64,
    #[serde(default)]
    estimated_mapping_value: f64,
}

/// Accept `true`/`false`, `0`/`1` or `null` for boolean flags.
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(value) => Ok(value),
        Value::Number(number) => Ok(number.as_f64().map(|n| n != 0.0).unwrap_or(false)),
        Value::Null => Ok(false),
        other => Err(D::Error::custom(format!(
            "expected boolean flag, found {other}"
        ))),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn parse<T: DeserializeOwned>(kind: RouteKind, payload: &Value) -> Result<T> {
    T::deserialize(payload).map_err(|err| Error::MalformedResult {
        message: format!("{kind} result: {err}"),
    })
}

/// Convert a planner `result` payload into waypoint rows.
pub(crate) fn decode(kind: RouteKind, payload: &Value) -> Result<Vec<Waypoint>> {
    let waypoints: Vec<Waypoint> = match kind {
        RouteKind::Neutron => parse::<NeutronResult>(kind, payload)?
            .system_jumps
            .into_iter()
            .map(|hop| {
                Waypoint::neutron(
                    hop.system,
                    round2(hop.distance_jumped),
                    round2(hop.distance_left),
                    hop.jumps,
                    hop.neutron_star,
                )
            })
            .collect(),
        RouteKind::Exact => parse::<ExactResult>(kind, payload)?
            .jumps
            .into_iter()
            .map(|hop| {
                Waypoint::exact(
                    hop.name,
                    round2(hop.distance),
                    round2(hop.distance_to_destination),
                    hop.must_refuel,
                    hop.has_neutron,
                )
            })
            .collect(),
        RouteKind::RoadToRiches => parse::<Vec<RichesSystem>>(kind, payload)?
            .into_iter()
            .map(|system| {
                let scan_value = system
                    .bodies
                    .iter()
                    .map(|body| body.estimated_scan_value)
                    .sum::<f64>();
                let mapping_value = system
                    .bodies
                    .iter()
                    .map(|body| body.estimated_mapping_value)
                    .sum::<f64>();
                Waypoint::road_to_riches(
                    system.name,
                    round2(system.distance),
                    round2(system.distance_to_destination),
                    system.bodies.len() as u32,
                    round2(scan_value),
                    round2(mapping_value),
                )
            })
            .collect(),
    };

    if waypoints.is_empty() {
        return Err(Error::MalformedResult {
            message: format!("{kind} result contained no systems"),
        });
    }
    Ok(waypoints)
}
