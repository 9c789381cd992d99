//! `watch`: follow the live journal and report progress along a route.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use edrouter_lib::{JournalSession, Route, SessionEvent, ShipState};

use edrouter_cli::output::print_session_event;

use super::CommandContext;

/// How often a watched journal directory is checked for a newer journal.
const JOURNAL_SCAN_INTERVAL: Duration = Duration::from_secs(5);

/// Watch until Ctrl+C, or until the journal is lost with nothing to fall back to.
///
/// When the configured journal is a directory, the newest journal in it is
/// followed across game restarts.
pub async fn handle_watch(ctx: &CommandContext, route: Option<&Path>) -> Result<()> {
    let (tx, mut events) = mpsc::unbounded_channel();
    let mut session = JournalSession::new(ctx.config.poll_interval, tx);

    if let Some(export) = &ctx.config.ship_export {
        let ship = ShipState::from_export_path(export)
            .with_context(|| format!("failed to load ship export {}", export.display()))?;
        session.set_ship_override(Some(ship));
    }

    let journal = ctx.journal_path()?;
    session
        .attach(&journal)
        .await
        .with_context(|| format!("failed to attach to journal {}", journal.display()))?;

    if let Some(path) = route {
        let route =
            Route::load(path).with_context(|| format!("failed to load route {}", path.display()))?;
        session.set_route(route);
    }

    let mut scan = tokio::time::interval(JOURNAL_SCAN_INTERVAL);
    scan.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                print_session_event(&event, ctx.format)?;
                match &event {
                    SessionEvent::JournalLost { path, .. } => {
                        if !reattach(ctx, &mut session, path).await? {
                            break;
                        }
                    }
                    SessionEvent::Shutdown => follow_newest(ctx, &mut session).await,
                    _ => {}
                }
            }
            _ = scan.tick() => follow_newest(ctx, &mut session).await,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted; stopping");
                break;
            }
        }
    }

    session.detach().await;
    Ok(())
}

/// Directory to scan for newer journals, when one was configured.
fn journal_dir(ctx: &CommandContext) -> Option<&Path> {
    ctx.config.journal.as_deref().filter(|path| path.is_dir())
}

/// Pick up a journal the game started since the last check.
async fn follow_newest(ctx: &CommandContext, session: &mut JournalSession) {
    let Some(dir) = journal_dir(ctx) else {
        return;
    };
    if let Err(err) = session.follow_newest(dir).await {
        warn!(dir = %dir.display(), error = %err, "could not switch to a newer journal");
    }
}

/// After the journal vanished, switch to a newer one when watching a directory.
async fn reattach(ctx: &CommandContext, session: &mut JournalSession, lost: &Path) -> Result<bool> {
    let Some(dir) = journal_dir(ctx) else {
        warn!(path = %lost.display(), "journal file lost; nothing to fall back to");
        return Ok(false);
    };

    match session
        .follow_newest(dir)
        .await
        .context("failed to switch to a newer journal")?
    {
        Some(_) => Ok(true),
        None => {
            warn!(path = %lost.display(), "no newer journal available");
            Ok(false)
        }
    }
}
