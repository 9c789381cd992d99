mod common;

use std::fs;
use std::time::Duration;

use edrouter_lib::session::{JournalSession, SessionEvent};
use edrouter_lib::Error;
use tokio::sync::mpsc;
use tokio::time::timeout;

const POLL: Duration = Duration::from_millis(100);

async fn next_event(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> SessionEvent {
    timeout(Duration::from_secs(30), rx.recv())
        .await
        .expect("session event before timeout")
        .expect("session channel open")
}

#[tokio::test(start_paused = true)]
async fn attach_replays_then_tails() {
    let (_dir, path) = common::scratch_journal();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = JournalSession::new(POLL, tx);

    session.attach(&path).await.expect("attach journal");
    assert!(matches!(next_event(&mut rx).await, SessionEvent::Attached { .. }));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.cargo, 2);
    assert_eq!(
        snapshot.game.location.map(|location| location.name),
        Some("Ross 128".to_string())
    );
    assert!(session.ship().is_ok());

    common::append(&path, &common::jump_line("Wolf 359"));
    match next_event(&mut rx).await {
        SessionEvent::Location(location) => assert_eq!(location.name, "Wolf 359"),
        other => panic!("unexpected {other:?}"),
    }

    common::append(&path, "{ \"event\":\"Cargo\", \"Vessel\":\"Ship\", \"Count\":9 }\n");
    assert_eq!(next_event(&mut rx).await, SessionEvent::Cargo { count: 9 });
    assert_eq!(session.cargo(), 9);

    session.detach().await;
}

#[tokio::test(start_paused = true)]
async fn arrivals_drive_route_progress() {
    let (_dir, path) = common::scratch_journal();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = JournalSession::new(POLL, tx);
    session.attach(&path).await.unwrap();
    next_event(&mut rx).await;

    session.set_route(common::exact_route(&["Ross 128", "Wolf 359", "Lalande 21185"]));
    match next_event(&mut rx).await {
        SessionEvent::RouteProgress(progress) => assert_eq!(progress.index, 0),
        other => panic!("unexpected {other:?}"),
    }

    common::append(&path, &common::jump_line("Wolf 359"));
    assert!(matches!(next_event(&mut rx).await, SessionEvent::Location(_)));
    match next_event(&mut rx).await {
        SessionEvent::RouteProgress(progress) => {
            assert_eq!(progress.index, 1);
            assert_eq!(progress.jumps_remaining, 2);
        }
        other => panic!("unexpected {other:?}"),
    }

    common::append(&path, &common::jump_line("Barnard's Star"));
    assert!(matches!(next_event(&mut rx).await, SessionEvent::Location(_)));
    assert!(matches!(
        next_event(&mut rx).await,
        SessionEvent::OffRoute { ref system, .. } if system == "Barnard's Star"
    ));
    assert_eq!(session.route().map(|route| route.index()), Some(1));
}

#[tokio::test(start_paused = true)]
async fn lost_journal_stops_the_tailer() {
    let (_dir, path) = common::scratch_journal();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = JournalSession::new(POLL, tx);
    session.attach(&path).await.unwrap();
    next_event(&mut rx).await;

    fs::remove_file(&path).unwrap();
    assert!(matches!(
        next_event(&mut rx).await,
        SessionEvent::JournalLost { .. }
    ));
    assert!(session.attached().is_none());
    tokio::task::yield_now().await;
    assert!(!session.is_tailing());
}

#[tokio::test(start_paused = true)]
async fn newer_journal_is_followed_after_shutdown() {
    let (dir, first) = common::scratch_journal();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = JournalSession::new(POLL, tx);
    session.attach(&first).await.unwrap();
    next_event(&mut rx).await;

    assert_eq!(session.follow_newest(dir.path()).await.unwrap(), None);

    common::append(&first, "{ \"timestamp\":\"2024-05-01T12:00:00Z\", \"event\":\"Shutdown\" }\n");
    assert_eq!(next_event(&mut rx).await, SessionEvent::Shutdown);
    assert!(session.snapshot().game.shut_down);

    // The old journal stays on disk when the game starts a new one.
    let second = dir.path().join("Journal.2024-05-02T080000.01.log");
    fs::write(&second, common::jump_line("Achenar")).unwrap();

    let followed = session.follow_newest(dir.path()).await.unwrap();
    assert_eq!(followed.as_deref(), Some(second.as_path()));
    assert_eq!(
        next_event(&mut rx).await,
        SessionEvent::Attached { path: second.clone() }
    );
    assert_eq!(session.attached(), Some(second.as_path()));

    let snapshot = session.snapshot();
    assert!(!snapshot.game.shut_down);
    assert_eq!(
        snapshot.game.location.map(|location| location.name),
        Some("Achenar".to_string())
    );

    common::append(&second, &common::jump_line("Maia"));
    match next_event(&mut rx).await {
        SessionEvent::Location(location) => assert_eq!(location.name, "Maia"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn reattaching_starts_from_the_new_journal_only() {
    let (_dir, first) = common::scratch_journal();
    let second_dir = tempfile::tempdir().unwrap();
    let second = second_dir.path().join("Journal.2024-05-02T080000.01.log");
    fs::write(&second, common::jump_line("Achenar")).unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = JournalSession::new(POLL, tx);
    session.attach(&first).await.unwrap();
    next_event(&mut rx).await;

    session.attach(&second).await.unwrap();
    assert!(matches!(next_event(&mut rx).await, SessionEvent::Attached { .. }));
    let snapshot = session.snapshot();
    assert_eq!(
        snapshot.game.location.map(|location| location.name),
        Some("Achenar".to_string())
    );
    assert!(snapshot.game.ship.is_none());
    assert!(matches!(session.ship(), Err(Error::NoShipLoaded)));

    // The old tailer is gone: writes to the first journal are not seen.
    common::append(&first, &common::jump_line("Sirius"));
    common::append(&second, &common::jump_line("Maia"));
    match next_event(&mut rx).await {
        SessionEvent::Location(location) => assert_eq!(location.name, "Maia"),
        other => panic!("unexpected {other:?}"),
    }
}
