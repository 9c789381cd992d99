//! Runtime configuration for the companion.
//!
//! Values start from built-in defaults, are overridden by `EDROUTER_*`
//! environment variables, and may be overridden again by the caller (the CLI
//! applies its flags on top).

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::planner::DEFAULT_API_BASE;

pub const JOURNAL_ENV: &str = "EDROUTER_JOURNAL";
pub const API_BASE_ENV: &str = "EDROUTER_API_BASE";
pub const POLL_MS_ENV: &str = "EDROUTER_POLL_MS";
pub const CARGO_MASS_ENV: &str = "EDROUTER_CARGO_MASS";
pub const SHIP_EXPORT_ENV: &str = "EDROUTER_SHIP_EXPORT";

const DEFAULT_POLL_MS: u64 = 1000;
const MIN_POLL_MS: u64 = 50;
const JOURNAL_SUBDIR: &str = "Saved Games/Frontier Developments/Elite Dangerous";

/// Settings shared by the session, the planner client and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanionConfig {
    /// A journal file, or a directory whose newest `Journal.*.log` is used.
    pub journal: Option<PathBuf>,
    pub api_base: String,
    pub poll_interval: Duration,
    pub cargo_mass: f64,
    /// Ship-builder export used instead of the journal loadout when set.
    pub ship_export: Option<PathBuf>,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            journal: default_journal_dir(),
            api_base: DEFAULT_API_BASE.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            cargo_mass: 0.0,
            ship_export: None,
        }
    }
}

impl CompanionConfig {
    /// Defaults with any `EDROUTER_*` environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(journal) = env::var_os(JOURNAL_ENV) {
            config.journal = Some(PathBuf::from(journal));
        }
        if let Some(api_base) = non_empty_var(API_BASE_ENV) {
            config.api_base = api_base;
        }
        if let Some(poll_ms) = non_empty_var(POLL_MS_ENV) {
            let millis: u64 = poll_ms
                .parse()
                .map_err(|_| config_error(format!("{POLL_MS_ENV} must be an integer, got '{poll_ms}'")))?;
            config.poll_interval = Duration::from_millis(millis);
        }
        if let Some(cargo) = non_empty_var(CARGO_MASS_ENV) {
            config.cargo_mass = cargo.parse().map_err(|_| {
                config_error(format!("{CARGO_MASS_ENV} must be a number, got '{cargo}'"))
            })?;
        }
        if let Some(export) = env::var_os(SHIP_EXPORT_ENV) {
            config.ship_export = Some(PathBuf::from(export));
        }

        config.validate()?;
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval < Duration::from_millis(MIN_POLL_MS) {
            return Err(config_error(format!(
                "poll interval must be at least {MIN_POLL_MS} ms, got {} ms",
                self.poll_interval.as_millis()
            )));
        }
        if !self.cargo_mass.is_finite() || self.cargo_mass < 0.0 {
            return Err(config_error(format!(
                "cargo mass must be a non-negative number, got {}",
                self.cargo_mass
            )));
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(config_error(format!(
                "planner base URL must be http(s), got '{}'",
                self.api_base
            )));
        }
        Ok(())
    }

    /// Journal file to tail, resolving a directory to its newest journal.
    pub fn resolve_journal(&self) -> Result<PathBuf> {
        let journal = self.journal.as_deref().ok_or_else(|| {
            config_error(format!(
                "no journal location configured; set {JOURNAL_ENV} or pass --journal"
            ))
        })?;
        resolve_journal_path(journal)
    }
}

/// Resolve `path` to a journal file, picking the newest one in a directory.
pub fn resolve_journal_path(path: &Path) -> Result<PathBuf> {
    if path.is_dir() {
        crate::journal::latest_journal(path)
    } else {
        Ok(path.to_path_buf())
    }
}

/// Where the game writes its journals for the current user.
pub fn default_journal_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(JOURNAL_SUBDIR))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn config_error(message: String) -> Error {
    Error::Config { message }
}
