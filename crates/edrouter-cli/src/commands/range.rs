//! `range`: jump range of the current ship.

use anyhow::Result;

use edrouter_cli::output::{print_range, RangeReport};

use super::CommandContext;

pub fn handle_range(ctx: &CommandContext) -> Result<()> {
    let ship = ctx.ship()?;
    let report = RangeReport {
        current_range: ship.range(ctx.config.cargo_mass)?,
        max_range: ship.max_range()?,
        laden_range: ship.laden_range()?,
        cargo_mass: ctx.config.cargo_mass,
        ship,
    };
    print_range(&report, ctx.format)
}
