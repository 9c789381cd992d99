//! CSV encoding and decoding for saved routes.
//!
//! The header row decides the decoder. Columns are located by name, so a file
//! with the right header set in another order still loads; writing always
//! uses the canonical order from [`RouteKind::headers`].

use std::io;

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::error::{Error, Result};

use super::waypoint::{normalize_header, RouteKind, Waypoint, WaypointDetail};

/// Decode waypoint rows from CSV text.
pub(crate) fn decode(text: &str) -> Result<(RouteKind, Vec<Waypoint>)> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let kind = RouteKind::from_headers(&headers.iter().collect::<Vec<_>>()).ok_or_else(|| {
        Error::UnknownRouteFormat {
            columns: headers.iter().map(str::to_string).collect(),
        }
    })?;
    let columns = ColumnMap::new(kind, &headers);

    let mut waypoints = Vec::new();
    let mut row: u64 = 1; // header is line 1
    for record in reader.records() {
        row += 1;
        let record = record?;
        if record.len() < headers.len() {
            return Err(Error::TruncatedRow {
                row,
                expected: headers.len(),
                found: record.len(),
            });
        }
        let fields = RowFields {
            row,
            record: &record,
            columns: &columns,
        };
        waypoints.push(fields.waypoint(kind)?);
    }

    Ok((kind, waypoints))
}

/// Encode waypoints as CSV text with every field quoted.
pub(crate) fn encode(kind: RouteKind, waypoints: &[Waypoint]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(kind.headers())?;

    for waypoint in waypoints {
        let system = waypoint.system.clone();
        let distance = waypoint.distance_from_previous.to_string();
        let remaining = waypoint.distance_remaining.to_string();
        let record: Vec<String> = match &waypoint.detail {
            WaypointDetail::Neutron { jumps, .. } => {
                vec![system, distance, remaining, String::new(), jumps.to_string()]
            }
            WaypointDetail::Exact {
                must_refuel,
                has_neutron_star,
            } => vec![
                system,
                distance,
                remaining,
                String::new(),
                String::new(),
                yes_no(*must_refuel).to_string(),
                yes_no(*has_neutron_star).to_string(),
            ],
            WaypointDetail::RoadToRiches {
                body_count,
                scan_value,
                mapping_value,
            } => vec![
                system,
                distance,
                remaining,
                body_count.to_string(),
                scan_value.to_string(),
                mapping_value.to_string(),
            ],
        };
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|err| Error::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Header name → record index for one decoded file.
struct ColumnMap {
    names: &'static [&'static str],
    positions: Vec<usize>,
}

impl ColumnMap {
    fn new(kind: RouteKind, headers: &StringRecord) -> Self {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let names = kind.headers();
        let positions = names
            .iter()
            .map(|name| {
                let wanted = normalize_header(name);
                normalized
                    .iter()
                    .position(|header| *header == wanted)
                    .unwrap_or_default()
            })
            .collect();
        Self { names, positions }
    }

    fn index_of(&self, column: &str) -> usize {
        self.names
            .iter()
            .position(|name| *name == column)
            .map(|slot| self.positions[slot])
            .unwrap_or_default()
    }
}

struct RowFields<'a> {
    row: u64,
    record: &'a StringRecord,
    columns: &'a ColumnMap,
}

impl RowFields<'_> {
    fn text(&self, column: &str) -> &str {
        self.record
            .get(self.columns.index_of(column))
            .unwrap_or_default()
    }

    fn invalid(&self, column: &str) -> Error {
        Error::InvalidField {
            row: self.row,
            column: column.to_string(),
            value: self.text(column).to_string(),
        }
    }

    fn number(&self, column: &str) -> Result<f64> {
        self.text(column)
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| self.invalid(column))
    }

    fn count(&self, column: &str) -> Result<u32> {
        self.text(column)
            .parse::<u32>()
            .map_err(|_| self.invalid(column))
    }

    fn flag(&self, column: &str) -> Result<bool> {
        match self.text(column).to_ascii_lowercase().as_str() {
            "yes" | "true" | "1" => Ok(true),
            "no" | "false" | "0" | "" => Ok(false),
            _ => Err(self.invalid(column)),
        }
    }

    fn waypoint(&self, kind: RouteKind) -> Result<Waypoint> {
        let system = self.text("System Name");
        if system.is_empty() {
            return Err(self.invalid("System Name"));
        }

        let waypoint = match kind {
            RouteKind::Neutron => Waypoint::neutron(
                system,
                self.number("Distance To Arrival")?,
                self.number("Distance Remaining")?,
                self.count("Jumps")?,
                self.flag("Neutron Star")?,
            ),
            RouteKind::Exact => Waypoint::exact(
                system,
                self.number("Distance")?,
                self.number("Distance Remaining")?,
                self.flag("Refuel")?,
                self.flag("Neutron Star")?,
            ),
            RouteKind::RoadToRiches => Waypoint::road_to_riches(
                system,
                self.number("Distance")?,
                self.number("Distance Remaining")?,
                self.count("Bodies")?,
                self.number("Scan Value")?,
                self.number("Mapping Value")?,
            ),
        };
        Ok(waypoint)
    }
}
