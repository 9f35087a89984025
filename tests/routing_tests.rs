use omnibus::catalogue::Catalogue;
use omnibus::routing::{ItineraryItem, RoutingSettings, TransportRouter};
use omnibus::shared::geo::Coordinate;

fn coord(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate {
        latitude,
        longitude,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn settings() -> RoutingSettings {
    RoutingSettings {
        bus_wait_time: 6,
        bus_velocity: 40.0,
    }
}

fn two_stop_network() -> Catalogue {
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("A", coord(55.6, 37.6), [("B", 1000)]);
    catalogue.add_stop("B", coord(55.6, 37.7), [("A", 1000)]);
    catalogue.add_bus("1", ["A", "B"], false);
    catalogue
}

#[test]
fn single_hop_pays_the_wait_once() {
    let catalogue = two_stop_network();
    let router = TransportRouter::build(&catalogue, settings());

    // 1000 m at 40 km/h is 1.5 minutes on top of the 6 minute wait.
    let itinerary = router.find_route("A", "B").unwrap();
    assert!(close(itinerary.total_time, 7.5));
    assert_eq!(itinerary.items.len(), 2);
    match &itinerary.items[0] {
        ItineraryItem::Wait { stop_name, time } => {
            assert_eq!(stop_name.as_ref(), "A");
            assert!(close(*time, 6.0));
        }
        other => panic!("expected a wait first, got {other:?}"),
    }
    match &itinerary.items[1] {
        ItineraryItem::Ride {
            bus,
            span_count,
            time,
        } => {
            assert_eq!(bus.as_ref(), "1");
            assert_eq!(*span_count, 1);
            assert!(close(*time, 1.5));
        }
        other => panic!("expected a ride second, got {other:?}"),
    }
}

#[test]
fn same_stop_route_is_empty() {
    let catalogue = two_stop_network();
    let router = TransportRouter::build(&catalogue, settings());
    let itinerary = router.find_route("A", "A").unwrap();
    assert_eq!(itinerary.total_time, 0.0);
    assert!(itinerary.items.is_empty());
}

#[test]
fn unknown_stop_is_not_found() {
    let catalogue = two_stop_network();
    let router = TransportRouter::build(&catalogue, settings());
    assert!(router.find_route("X", "B").is_none());
    assert!(router.find_route("A", "Y").is_none());
}

#[test]
fn unreachable_pair_is_not_found() {
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("A", coord(55.6, 37.6), [("B", 1000)]);
    catalogue.add_stop("B", coord(55.6, 37.7), []);
    catalogue.add_stop("C", coord(55.7, 37.6), [("D", 800)]);
    catalogue.add_stop("D", coord(55.7, 37.7), []);
    catalogue.add_bus("east", ["A", "B"], false);
    catalogue.add_bus("west", ["C", "D"], false);

    let router = TransportRouter::build(&catalogue, settings());
    assert!(router.find_route("A", "C").is_none());
}

#[test]
fn total_time_equals_the_item_sum() {
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("A", coord(55.574_371, 37.651_700), [("B", 2600)]);
    catalogue.add_stop("B", coord(55.587_655, 37.645_687), [("C", 1380), ("A", 2500)]);
    catalogue.add_stop("C", coord(55.592_028, 37.653_656), [("B", 1380), ("A", 4650)]);
    catalogue.add_bus("297", ["A", "B", "C", "A"], true);
    catalogue.add_bus("635", ["B", "C"], false);

    let router = TransportRouter::build(&catalogue, settings());
    for (from, to) in [("A", "C"), ("C", "A"), ("B", "A"), ("A", "B")] {
        let itinerary = router.find_route(from, to).unwrap();
        let sum: f64 = itinerary.items.iter().map(ItineraryItem::time).sum();
        assert!(
            close(itinerary.total_time, sum),
            "{from}->{to}: {} vs {sum}",
            itinerary.total_time
        );
    }
}

#[test]
fn riding_past_stops_beats_reboarding() {
    // One bus covers A -> B -> C; staying aboard must cost one wait, not
    // two, even though the (A, B) and (B, C) edges exist as well.
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("A", coord(55.6, 37.6), [("B", 1000)]);
    catalogue.add_stop("B", coord(55.61, 37.62), [("C", 1000)]);
    catalogue.add_stop("C", coord(55.62, 37.64), []);
    catalogue.add_bus("thru", ["A", "B", "C"], false);

    let router = TransportRouter::build(&catalogue, settings());
    let itinerary = router.find_route("A", "C").unwrap();
    assert!(close(itinerary.total_time, 9.0));
    assert_eq!(itinerary.items.len(), 2);
    match &itinerary.items[1] {
        ItineraryItem::Ride { span_count, .. } => assert_eq!(*span_count, 2),
        other => panic!("expected one ride spanning two stops, got {other:?}"),
    }
}

#[test]
fn transfer_is_taken_when_it_wins() {
    // Express covers A -> D directly but slowly via a long detour; the
    // two-bus alternative through M is faster despite the second wait.
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("A", coord(55.6, 37.6), [("M", 1000), ("D", 20000)]);
    catalogue.add_stop("M", coord(55.61, 37.62), [("D", 1000)]);
    catalogue.add_stop("D", coord(55.62, 37.64), []);
    catalogue.add_bus("slow", ["A", "D"], false);
    catalogue.add_bus("feeder", ["A", "M"], false);
    catalogue.add_bus("relay", ["M", "D"], false);

    let router = TransportRouter::build(&catalogue, settings());
    let itinerary = router.find_route("A", "D").unwrap();
    // feeder: 6 + 1.5, relay: 6 + 1.5 = 15 < slow: 6 + 30.
    assert!(close(itinerary.total_time, 15.0));
    assert_eq!(itinerary.items.len(), 4);
    let buses: Vec<&str> = itinerary
        .items
        .iter()
        .filter_map(|item| match item {
            ItineraryItem::Ride { bus, .. } => Some(bus.as_ref()),
            ItineraryItem::Wait { .. } => None,
        })
        .collect();
    assert_eq!(buses, ["feeder", "relay"]);
}

#[test]
fn route_table_covers_exactly_the_reachable_pairs() {
    let catalogue = two_stop_network();
    let router = TransportRouter::build(&catalogue, settings());

    let table = router.route_table();
    assert_eq!(table.len(), 2);
    for (from, targets) in table.iter().enumerate() {
        assert_eq!(targets.len(), 1, "source {from}");
        let (to, route) = &targets[0];
        assert_ne!(*to as usize, from);
        assert!(close(route.weight, 7.5));
        assert_eq!(route.edges.len(), 1);
    }
}

#[test]
fn lazy_router_answers_like_the_live_one() {
    let catalogue = two_stop_network();
    let live = TransportRouter::build(&catalogue, settings());

    let vertex_lookup = live
        .vertices()
        .map(|(name, vertex)| (name.clone(), vertex))
        .collect();
    let edges = live.edge_records().to_vec();
    let routes = live
        .route_table()
        .into_iter()
        .map(|targets| targets.into_iter().collect())
        .collect();
    let lazy = TransportRouter::from_parts(settings(), vertex_lookup, edges, routes);

    for (from, to) in [("A", "B"), ("B", "A"), ("A", "A"), ("A", "X")] {
        assert_eq!(live.find_route(from, to), lazy.find_route(from, to));
    }
}
