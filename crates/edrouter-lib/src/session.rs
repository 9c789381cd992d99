//! Live attachment of a journal to the game state and the active route.
//!
//! A [`JournalSession`] owns at most one tailer task at a time. The task polls
//! the journal on a fixed interval, folds every event into the shared
//! [`GameState`] in file order, advances the active [`Route`] on arrivals and
//! reports what happened as [`SessionEvent`]s on an mpsc channel.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::journal::{latest_journal, open_with_replay, JournalEvent, JournalTailer, JumpTarget};
use crate::route::{Route, RouteProgress};
use crate::ship::ShipState;
use crate::state::{GameState, Location};

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Attached { path: PathBuf },
    Location(Location),
    Ship(ShipState),
    Target(JumpTarget),
    Cargo { count: u32 },
    RouteProgress(RouteProgress),
    OffRoute { system: String, suggestions: Vec<String> },
    Shutdown,
    JournalLost { path: PathBuf, reason: String },
}

/// Point-in-time copy of everything the session tracks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub game: GameState,
    pub cargo: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<RouteProgress>,
}

#[derive(Debug, Default)]
struct Tracked {
    game: GameState,
    cargo: u32,
    route: Option<Route>,
    ship_override: Option<ShipState>,
    tailing: bool,
}

type Shared = Arc<Mutex<Tracked>>;

fn lock(shared: &Shared) -> MutexGuard<'_, Tracked> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct JournalSession {
    shared: Shared,
    events: mpsc::UnboundedSender<SessionEvent>,
    poll_interval: Duration,
    attached: Option<PathBuf>,
    task: Option<JoinHandle<()>>,
}

impl JournalSession {
    pub fn new(poll_interval: Duration, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            shared: Arc::default(),
            events,
            poll_interval,
            attached: None,
            task: None,
        }
    }

    /// Switch to `path`, replaying what it already holds before tailing it.
    ///
    /// Any previous tailer is stopped and awaited first, and the game state is
    /// rebuilt from the new journal alone.
    pub async fn attach(&mut self, path: &Path) -> Result<()> {
        self.detach().await;

        let (replayed, tailer) = open_with_replay(path)?;
        let location = {
            let mut tracked = lock(&self.shared);
            tracked.game = GameState::from_replay(&replayed);
            tracked.cargo = replayed.cargo.unwrap_or(0);
            tracked.tailing = true;
            tracked.game.location.clone()
        };

        info!(path = %path.display(), "attached journal session");
        self.emit(SessionEvent::Attached {
            path: path.to_path_buf(),
        });
        if let Some(location) = location {
            let mut tracked = lock(&self.shared);
            if let Some(event) = track_route(&mut tracked, &location.name) {
                let _ = self.events.send(event);
            }
        }

        self.attached = Some(path.to_path_buf());
        self.task = Some(tokio::spawn(tail(
            tailer,
            Arc::clone(&self.shared),
            self.events.clone(),
            self.poll_interval,
        )));
        Ok(())
    }

    /// Stop the tailer task, if any, and wait for it to exit.
    pub async fn detach(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(err) = task.await {
                if !err.is_cancelled() {
                    warn!(error = %err, "journal tailer task failed");
                }
            }
            debug!("detached journal session");
        }
        self.attached = None;
        let mut tracked = lock(&self.shared);
        tracked.game.reset();
        tracked.tailing = false;
    }

    /// Switch to the newest journal in `dir` if it is not the one attached.
    ///
    /// Returns the new path when a switch happened. The game starts a fresh
    /// journal on every launch and leaves the old one in place, so this is the
    /// only way to notice a restart.
    pub async fn follow_newest(&mut self, dir: &Path) -> Result<Option<PathBuf>> {
        let newest = latest_journal(dir)?;
        if self.attached.as_deref() == Some(newest.as_path()) {
            return Ok(None);
        }
        info!(
            from = ?self.attached.as_deref().map(Path::display),
            to = %newest.display(),
            "newer journal found"
        );
        self.attach(&newest).await?;
        Ok(Some(newest))
    }

    /// Journal currently being tailed. `None` once the tailer has stopped.
    pub fn attached(&self) -> Option<&Path> {
        let tailing = lock(&self.shared).tailing;
        self.attached.as_deref().filter(|_| tailing)
    }

    /// Whether the tailer task is still polling.
    pub fn is_tailing(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Make `route` the active route and position it at the current system.
    pub fn set_route(&self, route: Route) {
        let mut tracked = lock(&self.shared);
        tracked.route = Some(route);
        let event = match tracked.game.location.clone() {
            Some(location) => track_route(&mut tracked, &location.name),
            None => tracked
                .route
                .as_ref()
                .map(|route| SessionEvent::RouteProgress(route.progress())),
        };
        if let Some(event) = event {
            let _ = self.events.send(event);
        }
    }

    pub fn clear_route(&self) -> Option<Route> {
        lock(&self.shared).route.take()
    }

    pub fn route(&self) -> Option<Route> {
        lock(&self.shared).route.clone()
    }

    /// Use these stats in place of whatever the journal loadout says.
    pub fn set_ship_override(&self, ship: Option<ShipState>) {
        lock(&self.shared).ship_override = ship;
    }

    /// Ship stats to plan with: the override when set, else the journal's.
    pub fn ship(&self) -> Result<ShipState> {
        let tracked = lock(&self.shared);
        tracked
            .ship_override
            .clone()
            .or_else(|| tracked.game.ship.clone())
            .ok_or(Error::NoShipLoaded)
    }

    pub fn cargo(&self) -> u32 {
        lock(&self.shared).cargo
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let tracked = lock(&self.shared);
        SessionSnapshot {
            game: tracked.game.clone(),
            cargo: tracked.cargo,
            route: tracked.route.as_ref().map(Route::progress),
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}

impl Drop for JournalSession {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn tail(
    mut tailer: JournalTailer,
    shared: Shared,
    events: mpsc::UnboundedSender<SessionEvent>,
    poll_interval: Duration,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let batch = match tailer.poll() {
            Ok(batch) => batch,
            Err(err) => {
                warn!(path = %tailer.path().display(), error = %err, "journal lost; tailer stopped");
                lock(&shared).tailing = false;
                let _ = events.send(SessionEvent::JournalLost {
                    path: tailer.path().to_path_buf(),
                    reason: err.to_string(),
                });
                return;
            }
        };

        if !batch.is_empty() && !apply_batch(&shared, &events, &batch) {
            debug!("session listener gone; stopping tailer");
            return;
        }
    }
}

/// Apply a polled batch in file order. Returns `false` once nobody listens.
fn apply_batch(
    shared: &Shared,
    events: &mpsc::UnboundedSender<SessionEvent>,
    batch: &[JournalEvent],
) -> bool {
    let mut tracked = lock(shared);
    for event in batch {
        for update in dispatch(&mut tracked, event) {
            if events.send(update).is_err() {
                return false;
            }
        }
    }
    true
}

/// Fold one journal event into the tracked state.
fn dispatch(tracked: &mut Tracked, event: &JournalEvent) -> Vec<SessionEvent> {
    if tracked.game.shut_down {
        tracked.game.apply(event);
        return Vec::new();
    }

    let change = tracked.game.apply(event);
    let mut updates = Vec::new();

    if change.location {
        if let Some(location) = tracked.game.location.clone() {
            let system = location.name.clone();
            updates.push(SessionEvent::Location(location));
            updates.extend(track_route(tracked, &system));
        }
    }
    if change.ship {
        updates.extend(tracked.game.ship.clone().map(SessionEvent::Ship));
    }
    if change.shut_down {
        updates.push(SessionEvent::Shutdown);
    }

    match event {
        JournalEvent::Cargo(cargo) => {
            tracked.cargo = cargo.count;
            updates.push(SessionEvent::Cargo { count: cargo.count });
        }
        JournalEvent::Target(target) => updates.push(SessionEvent::Target(target.clone())),
        _ => {}
    }
    updates
}

fn track_route(tracked: &mut Tracked, system: &str) -> Option<SessionEvent> {
    let route = tracked.route.as_mut()?;
    match route.advance_to(system) {
        Ok(_) => Some(SessionEvent::RouteProgress(route.progress())),
        Err(Error::SystemNotInRoute { name, suggestions }) => {
            debug!(system = %name, "arrived off route");
            Some(SessionEvent::OffRoute {
                system: name,
                suggestions,
            })
        }
        Err(err) => {
            warn!(error = %err, "could not track route progress");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{CargoUpdate, SystemArrival};
    use crate::route::{RouteKind, Waypoint};

    fn arrival(name: &str) -> JournalEvent {
        JournalEvent::FsdJump(SystemArrival {
            star_system: name.to_string(),
            star_pos: Some([1.0, 2.0, 3.0]),
        })
    }

    #[test]
    fn arrivals_advance_the_route() {
        let waypoints = ["Sol", "Ross 128", "Wolf 359"]
            .iter()
            .map(|name| Waypoint::exact(*name, 1.0, 1.0, false, false))
            .collect();
        let mut tracked = Tracked {
            route: Some(Route::new(RouteKind::Exact, waypoints).unwrap()),
            ..Tracked::default()
        };

        let updates = dispatch(&mut tracked, &arrival("Ross 128"));
        assert!(matches!(updates[0], SessionEvent::Location(_)));
        match &updates[1] {
            SessionEvent::RouteProgress(progress) => assert_eq!(progress.index, 1),
            other => panic!("unexpected {other:?}"),
        }

        let updates = dispatch(&mut tracked, &arrival("Barnard's Star"));
        assert!(matches!(updates[1], SessionEvent::OffRoute { .. }));
    }

    #[test]
    fn nothing_is_reported_after_shutdown() {
        let mut tracked = Tracked::default();
        let updates = dispatch(&mut tracked, &JournalEvent::Shutdown);
        assert_eq!(updates, vec![SessionEvent::Shutdown]);

        let updates = dispatch(&mut tracked, &JournalEvent::Cargo(CargoUpdate { count: 4 }));
        assert!(updates.is_empty());
        assert_eq!(tracked.cargo, 0);
    }
}
