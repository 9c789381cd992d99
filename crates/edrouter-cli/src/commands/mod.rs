//! Subcommand handlers.
//!
//! `main.rs` parses arguments and builds a [`CommandContext`]; each module
//! here handles one subcommand.

pub mod nearest;
pub mod plan;
pub mod range;
pub mod route;
pub mod watch;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use edrouter_lib::journal::{replay, ReplayedState};
use edrouter_lib::ship::ShipState;
use edrouter_lib::{CompanionConfig, GameState, HttpPlanner};

use edrouter_cli::output::OutputFormat;

/// Resolved configuration plus the requested output format.
pub struct CommandContext {
    pub config: CompanionConfig,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn journal_path(&self) -> Result<PathBuf> {
        self.config
            .resolve_journal()
            .context("failed to locate the game journal")
    }

    /// Replay the configured journal from the start.
    pub fn replay(&self) -> Result<ReplayedState> {
        let path = self.journal_path()?;
        replay(&path).with_context(|| format!("failed to read journal {}", path.display()))
    }

    /// Ship stats from the configured export, else the journal's last loadout.
    pub fn ship(&self) -> Result<ShipState> {
        if let Some(export) = &self.config.ship_export {
            debug!(path = %export.display(), "using ship export");
            return ShipState::from_export_path(export)
                .with_context(|| format!("failed to load ship export {}", export.display()));
        }

        let state = GameState::from_replay(&self.replay()?);
        state
            .ship
            .ok_or_else(|| anyhow!("no usable loadout in the journal; pass --ship-export"))
    }

    /// Current system name from the journal.
    pub fn current_system(&self) -> Result<String> {
        self.replay()?
            .location
            .map(|location| location.name)
            .ok_or_else(|| anyhow!("journal has no location yet; pass --from"))
    }

    pub fn planner(&self) -> Result<HttpPlanner> {
        HttpPlanner::new(self.config.api_base.clone()).context("failed to build planner client")
    }
}
