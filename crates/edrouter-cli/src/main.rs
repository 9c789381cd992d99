use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use edrouter_cli::logging::{init_tracing, LogFormat};
use edrouter_cli::output::OutputFormat;
use edrouter_lib::CompanionConfig;

mod commands;

use commands::plan::PlanCommand;
use commands::CommandContext;

#[derive(Parser, Debug)]
#[command(author, version, about = "Journal-driven route companion")]
struct Cli {
    /// Journal file, or the directory holding the game's journals.
    #[arg(long, global = true)]
    journal: Option<PathBuf>,

    /// Ship-builder export to use instead of the journal loadout.
    #[arg(long, global = true)]
    ship_export: Option<PathBuf>,

    /// Cargo carried, in tonnes.
    #[arg(long, global = true)]
    cargo: Option<f64>,

    /// Route planner API base URL.
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Journal poll interval in milliseconds.
    #[arg(long, global = true)]
    poll_ms: Option<u64>,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Follow the live journal and report location, ship and route progress.
    Watch {
        /// Route CSV to track while watching.
        #[arg(long)]
        route: Option<PathBuf>,
    },
    /// Show the current ship's jump range.
    Range,
    /// Compute a route with the remote planner.
    #[command(subcommand)]
    Plan(PlanCommand),
    /// Find the catalogued system nearest to a point (defaults to the current location).
    Nearest {
        #[arg(long, requires_all = ["y", "z"])]
        x: Option<f64>,
        #[arg(long, requires_all = ["x", "z"])]
        y: Option<f64>,
        #[arg(long, requires_all = ["x", "y"])]
        z: Option<f64>,
    },
    /// Inspect saved routes.
    #[command(subcommand)]
    Route(RouteCommand),
}

#[derive(Subcommand, Debug)]
enum RouteCommand {
    /// Print a route CSV with the current position marked.
    Show {
        /// Route CSV file.
        path: PathBuf,
        /// Position the route at this system instead of the journal location.
        #[arg(long)]
        at: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing(LogFormat::from_env());
    let cli = Cli::parse();
    let ctx = CommandContext {
        config: build_config(&cli)?,
        format: cli.format,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    match cli.command {
        Command::Watch { route } => {
            runtime.block_on(commands::watch::handle_watch(&ctx, route.as_deref()))
        }
        Command::Range => commands::range::handle_range(&ctx),
        Command::Plan(plan) => runtime.block_on(commands::plan::handle_plan(&ctx, plan)),
        Command::Nearest { x, y, z } => {
            let coords = match (x, y, z) {
                (Some(x), Some(y), Some(z)) => Some([x, y, z]),
                _ => None,
            };
            runtime.block_on(commands::nearest::handle_nearest(&ctx, coords))
        }
        Command::Route(RouteCommand::Show { path, at }) => {
            commands::route::handle_route_show(&ctx, &path, at.as_deref())
        }
    }
}

/// Environment configuration with command-line flags applied on top.
fn build_config(cli: &Cli) -> Result<CompanionConfig> {
    let mut config = CompanionConfig::from_env().context("invalid EDROUTER_* environment")?;
    if let Some(journal) = &cli.journal {
        config.journal = Some(journal.clone());
    }
    if let Some(export) = &cli.ship_export {
        config.ship_export = Some(export.clone());
    }
    if let Some(cargo) = cli.cargo {
        config.cargo_mass = cargo;
    }
    if let Some(api_base) = &cli.api_base {
        config.api_base = api_base.clone();
    }
    if let Some(poll_ms) = cli.poll_ms {
        config.poll_interval = Duration::from_millis(poll_ms);
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}
