use criterion::{Criterion, criterion_group, criterion_main};
use omnibus::prelude::{Catalogue, Coordinate, RoutingSettings, TransportRouter};
use std::hint::black_box;

/// A synthetic grid network: `side` x `side` stops, one bus per row and one
/// per column, 900 m between neighbours.
fn grid_catalogue(side: usize) -> Catalogue {
    let mut catalogue = Catalogue::new();
    let name = |x: usize, y: usize| format!("stop-{x}-{y}");

    for x in 0..side {
        for y in 0..side {
            let mut neighbours = Vec::new();
            let east = name(x + 1, y);
            let north = name(x, y + 1);
            if x + 1 < side {
                neighbours.push((east.as_str(), 900));
            }
            if y + 1 < side {
                neighbours.push((north.as_str(), 900));
            }
            let coordinate = Coordinate {
                latitude: 55.0 + y as f64 * 0.008,
                longitude: 37.0 + x as f64 * 0.008,
            };
            catalogue.add_stop(&name(x, y), coordinate, neighbours);
        }
    }
    for y in 0..side {
        let stops: Vec<String> = (0..side).map(|x| name(x, y)).collect();
        catalogue.add_bus(
            &format!("row-{y}"),
            stops.iter().map(String::as_str),
            false,
        );
    }
    for x in 0..side {
        let stops: Vec<String> = (0..side).map(|y| name(x, y)).collect();
        catalogue.add_bus(
            &format!("col-{x}"),
            stops.iter().map(String::as_str),
            false,
        );
    }
    catalogue
}

fn settings() -> RoutingSettings {
    RoutingSettings {
        bus_wait_time: 6,
        bus_velocity: 40.0,
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    let catalogue = grid_catalogue(12);
    let router = TransportRouter::build(&catalogue, settings());

    c.bench_function("build_router_12x12", |b| {
        b.iter(|| black_box(TransportRouter::build(&catalogue, settings())))
    });

    c.bench_function("find_route_corner_to_corner", |b| {
        b.iter(|| black_box(router.find_route("stop-0-0", "stop-11-11")))
    });

    c.bench_function("precompute_route_table", |b| {
        b.iter(|| black_box(router.route_table()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
