//! `plan`: compute a route with the remote planner.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Subcommand};
use tokio::sync::mpsc;
use tracing::info;

use edrouter_lib::planner::{
    ExactQuery, JobState, NeutronQuery, RemoteRouteJob, RichesQuery, RouteQuery,
};
use edrouter_lib::Route;

use edrouter_cli::output::{print_job_event, print_route};

use super::CommandContext;

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// Neutron-boosted route between two systems.
    Neutron {
        #[command(flatten)]
        endpoints: Endpoints,
        /// How strictly to stay on the direct line, 0-100.
        #[arg(long, default_value_t = edrouter_lib::planner::DEFAULT_EFFICIENCY)]
        efficiency: u8,
    },
    /// Jump-by-jump route with fuel simulation.
    Exact {
        #[command(flatten)]
        endpoints: Endpoints,
        /// Do not route through neutron stars.
        #[arg(long)]
        no_supercharge: bool,
        /// Allow synthesised FSD injections.
        #[arg(long)]
        injections: bool,
        /// Skip secondary stars when looking for fuel.
        #[arg(long)]
        exclude_secondary: bool,
    },
    /// Exploration route visiting high value bodies.
    Riches {
        /// Starting system (defaults to the current system).
        #[arg(long)]
        from: Option<String>,
        /// Optional destination system.
        #[arg(long)]
        to: Option<String>,
        /// Search radius around the direct line, in light years.
        #[arg(long, default_value_t = 25.0)]
        radius: f64,
        #[arg(long, default_value_t = 100)]
        max_results: u32,
        /// Minimum body value, in credits.
        #[arg(long, default_value_t = 100_000)]
        min_value: u64,
        /// Rank bodies by mapping value instead of scan value.
        #[arg(long)]
        mapping: bool,
        /// Return to the starting system.
        #[arg(long = "loop")]
        loop_route: bool,
        /// Save the finished route as CSV.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct Endpoints {
    /// Starting system (defaults to the current system).
    #[arg(long)]
    from: Option<String>,
    /// Destination system.
    #[arg(long)]
    to: String,
    /// Save the finished route as CSV.
    #[arg(long)]
    out: Option<PathBuf>,
}

pub async fn handle_plan(ctx: &CommandContext, command: PlanCommand) -> Result<()> {
    let ship = ctx.ship()?;
    let cargo = ctx.config.cargo_mass;
    let origin = |from: Option<String>| match from {
        Some(from) => Ok(from),
        None => ctx.current_system(),
    };

    let (query, out) = match command {
        PlanCommand::Neutron {
            endpoints,
            efficiency,
        } => {
            let query = NeutronQuery::for_ship(origin(endpoints.from)?, endpoints.to, &ship, cargo)?
                .with_efficiency(efficiency);
            (RouteQuery::Neutron(query), endpoints.out)
        }
        PlanCommand::Exact {
            endpoints,
            no_supercharge,
            injections,
            exclude_secondary,
        } => {
            let mut query = ExactQuery::for_ship(origin(endpoints.from)?, endpoints.to, &ship, cargo);
            query.use_supercharge = !no_supercharge;
            query.use_injections = injections;
            query.exclude_secondary = exclude_secondary;
            (RouteQuery::Exact(query), endpoints.out)
        }
        PlanCommand::Riches {
            from,
            to,
            radius,
            max_results,
            min_value,
            mapping,
            loop_route,
            out,
        } => {
            let mut query = RichesQuery::for_ship(origin(from)?, to, &ship, cargo)?;
            query.radius = radius;
            query.max_results = max_results;
            query.min_value = min_value;
            query.use_mapping_value = mapping;
            query.loop_route = loop_route;
            (RouteQuery::RoadToRiches(query), out)
        }
    };
    query.validate().context("invalid route request")?;

    let route = run_job(ctx, query).await?;
    if let Some(path) = out {
        route
            .save(&path)
            .with_context(|| format!("failed to save route to {}", path.display()))?;
        info!(path = %path.display(), "saved route");
    }
    print_route(&route, ctx.format)
}

/// Run one job to completion, cancelling it on Ctrl+C.
async fn run_job(ctx: &CommandContext, query: RouteQuery) -> Result<Route> {
    let (tx, mut events) = mpsc::unbounded_channel();
    let job = RemoteRouteJob::new(ctx.planner()?, query).with_events(tx);
    let cancel = job.cancel_handle();
    let mut task = tokio::spawn(job.run());

    let state = loop {
        tokio::select! {
            Some(event) = events.recv() => print_job_event(&event),
            _ = tokio::signal::ctrl_c() => cancel.cancel(),
            state = &mut task => break state.context("route job task failed")?,
        }
    };
    while let Ok(event) = events.try_recv() {
        print_job_event(&event);
    }

    match state {
        JobState::Done(route) => Ok(route),
        JobState::Error(message) => bail!("route planner failed: {message}"),
        JobState::Cancelled => Err(anyhow!("route request cancelled")),
        JobState::Submitted | JobState::Queued => bail!("route job stopped before finishing"),
    }
}
