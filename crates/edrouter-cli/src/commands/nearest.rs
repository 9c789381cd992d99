//! `nearest`: closest catalogued system to a point.

use anyhow::{anyhow, Context, Result};

use edrouter_lib::nearest;

use edrouter_cli::output::print_nearest;

use super::CommandContext;

/// Look up the system nearest to `coords`, or to the journal location.
pub async fn handle_nearest(ctx: &CommandContext, coords: Option<[f64; 3]>) -> Result<()> {
    let [x, y, z] = match coords {
        Some(coords) => coords,
        None => {
            let location = ctx
                .replay()?
                .location
                .ok_or_else(|| anyhow!("journal has no location yet; pass --x --y --z"))?;
            [location.x, location.y, location.z]
        }
    };

    let planner = ctx.planner()?;
    let system = nearest(&planner, x, y, z)
        .await
        .context("nearest system lookup failed")?;
    print_nearest(&system, ctx.format)
}
