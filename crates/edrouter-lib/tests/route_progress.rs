mod common;

use edrouter_lib::route::{Route, RouteKind, Waypoint};
use edrouter_lib::Error;

#[test]
fn revisited_system_prefers_the_next_occurrence() {
    let mut route = common::exact_route(&["A", "B", "A", "C"]);

    route.set_index(0);
    assert_eq!(route.advance_to("A").unwrap(), 2);

    route.set_index(3);
    assert_eq!(route.advance_to("A").unwrap(), 0);

    route.set_index(1);
    assert_eq!(route.advance_to("a ").unwrap(), 2);
}

#[test]
fn absent_system_fails_from_every_index() {
    let mut route = common::exact_route(&["A", "B", "A", "C"]);
    for index in 0..route.len() {
        route.set_index(index);
        let err = route.advance_to("Z").expect_err("Z is not on the route");
        assert!(matches!(err, Error::SystemNotInRoute { ref name, .. } if name == "Z"));
        assert_eq!(route.index(), index, "a miss must not move the route");
    }
}

#[test]
fn jumps_remaining_sums_neutron_weights() {
    let waypoints = vec![
        Waypoint::neutron("Sol", 0.0, 300.0, 0, false),
        Waypoint::neutron("HD 1", 120.0, 180.0, 3, true),
        Waypoint::neutron("HD 2", 100.0, 80.0, 2, true),
        Waypoint::neutron("Colonia", 80.0, 0.0, 4, false),
    ];
    let mut route = Route::new(RouteKind::Neutron, waypoints).unwrap();

    assert_eq!(route.jumps_total(), 9);
    assert_eq!(route.jumps_remaining(), route.jumps_total());

    route.set_index(route.len() - 1);
    assert_eq!(route.jumps_remaining(), 4);
    assert!(route.is_complete());
    assert!(route.next().is_none());
}

#[test]
fn exact_and_riches_rows_weigh_one_jump_each() {
    let exact = common::exact_route(&["Sol", "Ross 128", "Wolf 359"]);
    assert_eq!(exact.jumps_total(), 3);

    let riches = Route::new(
        RouteKind::RoadToRiches,
        vec![
            Waypoint::road_to_riches("Sol", 0.0, 50.0, 0, 0.0, 0.0),
            Waypoint::road_to_riches("HIP 100", 50.0, 0.0, 7, 1.0e6, 4.0e6),
        ],
    )
    .unwrap();
    assert_eq!(riches.jumps_total(), 2);
}

#[test]
fn progress_reports_the_current_waypoint() {
    let mut route = common::exact_route(&["Sol", "Ross 128", "Wolf 359"]);
    route.advance_to("Ross 128").unwrap();

    let progress = route.progress();
    assert_eq!(progress.index, 1);
    assert_eq!(progress.len, 3);
    assert_eq!(progress.jumps_remaining, 2);
    assert_eq!(progress.current.map(|w| w.system), Some("Ross 128".to_string()));
    assert!(!progress.complete);
    assert_eq!(route.next().map(|w| w.system.as_str()), Some("Wolf 359"));
}

#[test]
fn replacing_waypoints_keeps_the_index_in_range() {
    let mut route = common::exact_route(&["A", "B", "C", "D"]);
    route.set_index(3);
    route
        .replace_waypoints(vec![Waypoint::exact("E", 0.0, 1.0, false, false)])
        .unwrap();
    assert_eq!(route.index(), 0);
    assert_eq!(route.positions_of("e"), &[0]);
    assert!(route.positions_of("A").is_empty());
}
