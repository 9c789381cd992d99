//! `route show`: inspect a saved route file.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use edrouter_lib::Route;

use edrouter_cli::output::print_route;

use super::CommandContext;

/// Load `path` and print it, positioned at `at` when given.
pub fn handle_route_show(ctx: &CommandContext, path: &Path, at: Option<&str>) -> Result<()> {
    let mut route =
        Route::load(path).with_context(|| format!("failed to load route {}", path.display()))?;

    if let Some(system) = at {
        route
            .advance_to(system)
            .with_context(|| format!("cannot position route at {system}"))?;
    } else if let Ok(system) = ctx.current_system() {
        if let Err(err) = route.advance_to(&system) {
            warn!(error = %err, "current system is not on the route");
        }
    }

    print_route(&route, ctx.format)
}
