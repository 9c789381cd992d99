//! Rendering of command results as text or JSON.

use std::io::{self, Write};

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use edrouter_lib::planner::JobEvent;
use edrouter_lib::route::{Route, RouteProgress, Waypoint, WaypointDetail};
use edrouter_lib::ship::ShipState;
use edrouter_lib::{NearestSystem, SessionEvent};

/// How command results are printed on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Jump range figures for one ship.
#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
    pub ship: ShipState,
    pub cargo_mass: f64,
    pub current_range: f64,
    pub max_range: f64,
    pub laden_range: f64,
}

/// Print `value` as a single line of JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

pub fn print_range(report: &RangeReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(report);
    }

    let fsd = &report.ship.fsd;
    println!(
        "Ship: {}",
        report.ship.name.as_deref().unwrap_or("<unnamed>")
    );
    println!(
        "Drive: {}{}{} (optimal mass {:.2} t, max fuel {:.2} t)",
        fsd.size,
        fsd.rating_letter(),
        if fsd.overcharged { " overcharged" } else { "" },
        fsd.optimal_mass,
        fsd.max_fuel_usage
    );
    if report.ship.jump_range_boost > 0.0 {
        println!("Booster: +{:.2} ly", report.ship.jump_range_boost);
    }
    println!(
        "Jump range: {:.2} ly with {:.0} t cargo",
        report.current_range, report.cargo_mass
    );
    println!("  empty: {:.2} ly", report.max_range);
    println!(
        "  full ({:.0} t): {:.2} ly",
        report.ship.max_cargo, report.laden_range
    );
    Ok(())
}

pub fn print_route(route: &Route, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        #[derive(Serialize)]
        struct RouteView<'a> {
            progress: RouteProgress,
            waypoints: &'a [Waypoint],
        }
        return print_json(&RouteView {
            progress: route.progress(),
            waypoints: route.waypoints(),
        });
    }

    println!("{}", progress_line(&route.progress()));
    for (position, waypoint) in route.waypoints().iter().enumerate() {
        let marker = if position == route.index() { ">" } else { " " };
        println!(
            "{marker} {:>3}. {:<32} {:>9.2} ly {:>10.2} ly left{}",
            position + 1,
            waypoint.system,
            waypoint.distance_from_previous,
            waypoint.distance_remaining,
            detail_suffix(waypoint)
        );
    }
    Ok(())
}

fn detail_suffix(waypoint: &Waypoint) -> String {
    match &waypoint.detail {
        WaypointDetail::Neutron {
            jumps,
            has_neutron_star,
        } => format!(
            "  {jumps} jump(s){}",
            if *has_neutron_star { "  neutron" } else { "" }
        ),
        WaypointDetail::Exact {
            must_refuel,
            has_neutron_star,
        } => {
            let mut flags = String::new();
            if *must_refuel {
                flags.push_str("  refuel");
            }
            if *has_neutron_star {
                flags.push_str("  neutron");
            }
            flags
        }
        WaypointDetail::RoadToRiches {
            body_count,
            scan_value,
            mapping_value,
        } => format!("  {body_count} bodies, {scan_value:.0} cr scan, {mapping_value:.0} cr map"),
    }
}

pub fn progress_line(progress: &RouteProgress) -> String {
    let position = if progress.len == 0 {
        0
    } else {
        progress.index + 1
    };
    let current = progress
        .current
        .as_ref()
        .map(|waypoint| waypoint.system.as_str())
        .unwrap_or("-");
    format!(
        "{} route: waypoint {position}/{} ({current}), {} of {} jumps remaining{}",
        progress.kind,
        progress.len,
        progress.jumps_remaining,
        progress.jumps_total,
        if progress.complete { ", complete" } else { "" }
    )
}

pub fn print_nearest(system: &NearestSystem, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(system);
    }
    println!(
        "{} ({:.2} ly away) at [{:.2}, {:.2}, {:.2}]",
        system.name, system.distance, system.x, system.y, system.z
    );
    Ok(())
}

pub fn print_session_event(event: &SessionEvent, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(event);
    }
    match event {
        SessionEvent::Attached { path } => println!("Watching {}", path.display()),
        SessionEvent::Location(location) => println!("Arrived in {}", location.name),
        SessionEvent::Ship(ship) => match ship.max_range() {
            Ok(range) => println!(
                "Loadout: {} ({range:.2} ly empty)",
                ship.name.as_deref().unwrap_or("<unnamed>")
            ),
            Err(_) => println!("Loadout: {}", ship.name.as_deref().unwrap_or("<unnamed>")),
        },
        SessionEvent::Target(target) => match target.remaining_jumps_in_route {
            Some(remaining) => println!("Target: {} ({remaining} jumps in route)", target.name),
            None => println!("Target: {}", target.name),
        },
        SessionEvent::Cargo { count } => println!("Cargo: {count} t"),
        SessionEvent::RouteProgress(progress) => println!("{}", progress_line(progress)),
        SessionEvent::OffRoute {
            system,
            suggestions,
        } => {
            if suggestions.is_empty() {
                println!("Off route: {system}");
            } else {
                println!("Off route: {system} (did you mean {})", suggestions.join(", "));
            }
        }
        SessionEvent::Shutdown => println!("Game shut down"),
        SessionEvent::JournalLost { path, reason } => {
            println!("Lost journal {}: {reason}", path.display())
        }
    }
    Ok(())
}

/// Job progress goes to stderr so the route itself can be piped.
pub fn print_job_event(event: &JobEvent) {
    match event {
        JobEvent::Submitted { kind } => eprintln!("Submitted {kind} route request"),
        JobEvent::Queued { job_id, retry_in } => {
            eprintln!("Job {job_id} queued; checking again in {}s", retry_in.as_secs())
        }
        JobEvent::Done(route) => eprintln!(
            "Route ready: {} waypoints, {} jumps",
            route.len(),
            route.jumps_total()
        ),
        JobEvent::Failed(message) => eprintln!("Route request failed: {message}"),
        JobEvent::Cancelled => eprintln!("Route request cancelled"),
    }
}
