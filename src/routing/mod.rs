mod dijkstra;
mod graph;
mod itinerary;

pub use dijkstra::{RouteInfo, Router};
pub use graph::*;
pub use itinerary::*;

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};
use tracing::info;

use crate::catalogue::Catalogue;

/// The `routing_settings` document section.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Flat penalty in minutes paid on boarding any bus.
    pub bus_wait_time: u32,
    /// Constant bus speed in km/h; must be positive.
    pub bus_velocity: f64,
}

/// Ride payload of one graph edge, under the same id as the edge itself.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub bus: Arc<str>,
    pub from_stop: Arc<str>,
    /// Full edge weight in minutes, wait included.
    pub weight: f64,
    pub span_count: u32,
}

/// One precomputed shortest path as stored in the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRoute {
    pub weight: f64,
    pub edges: Vec<EdgeId>,
}

/// Where answers come from: a live Dijkstra router in the build phase, or
/// the deserialized all-pairs table afterwards. The lazy side never touches
/// a graph.
#[derive(Debug)]
enum RouteSource {
    Live(Router),
    Stored(Vec<HashMap<VertexId, StoredRoute>>),
}

/// The time-optimal router over the bus network.
///
/// Vertices are the used stops, numbered in `stops_used()` order. Every
/// `(bus, i, j)` pair with `i < j` over a stored sequence becomes one edge
/// whose weight folds the boarding wait into the ride time, so plain
/// shortest paths already model transfer penalties.
#[derive(Debug)]
pub struct TransportRouter {
    settings: RoutingSettings,
    vertex_lookup: HashMap<Arc<str>, VertexId>,
    edges: Vec<EdgeRecord>,
    source: RouteSource,
}

impl TransportRouter {
    /// Builds the graph from the catalogue and runs the all-pairs search.
    pub fn build(catalogue: &Catalogue, settings: RoutingSettings) -> Self {
        let stops_used = catalogue.stops_used();
        let mut vertex_lookup = HashMap::with_capacity(stops_used.len());
        for (vertex, (name, _)) in stops_used.iter().enumerate() {
            vertex_lookup.insert(name.clone(), vertex as VertexId);
        }

        let mut graph = DirectedGraph::new(stops_used.len());
        let mut edges = Vec::new();
        let meters_per_minute = settings.bus_velocity * 1000.0 / 60.0;
        let wait_time = f64::from(settings.bus_wait_time);

        for bus in catalogue.buses_for_render() {
            // Prefix sums of road meters along the stored sequence; the
            // (i, j) weight is then one subtraction away.
            let mut cumulative = vec![0u64; bus.stops.len()];
            for i in 1..bus.stops.len() {
                cumulative[i] = cumulative[i - 1]
                    + u64::from(catalogue.distance(&bus.stops[i - 1], &bus.stops[i]));
            }

            for i in 0..bus.stops.len() {
                for j in (i + 1)..bus.stops.len() {
                    let meters = (cumulative[j] - cumulative[i]) as f64;
                    let weight = wait_time + meters / meters_per_minute;
                    let from = vertex_lookup[&bus.stops[i]];
                    let to = vertex_lookup[&bus.stops[j]];
                    graph.add_edge(from, to, weight);
                    edges.push(EdgeRecord {
                        bus: bus.name.clone(),
                        from_stop: bus.stops[i].clone(),
                        weight,
                        span_count: (j - i) as u32,
                    });
                }
            }
        }

        info!(
            vertices = stops_used.len(),
            edges = edges.len(),
            "transport graph built"
        );

        Self {
            settings,
            vertex_lookup,
            edges,
            source: RouteSource::Live(Router::new(graph)),
        }
    }

    /// Reassembles a router around the precomputed table from a snapshot.
    pub fn from_parts(
        settings: RoutingSettings,
        vertex_lookup: HashMap<Arc<str>, VertexId>,
        edges: Vec<EdgeRecord>,
        routes: Vec<HashMap<VertexId, StoredRoute>>,
    ) -> Self {
        Self {
            settings,
            vertex_lookup,
            edges,
            source: RouteSource::Stored(routes),
        }
    }

    /// The fastest itinerary between two stops known by name.
    ///
    /// Equal names answer an empty zero-minute itinerary; an unknown name or
    /// an unreachable pair answers `None` ("not found").
    pub fn find_route(&self, from: &str, to: &str) -> Option<Itinerary> {
        if from == to {
            return Some(Itinerary::default());
        }
        let from_vertex = *self.vertex_lookup.get(from)?;
        let to_vertex = *self.vertex_lookup.get(to)?;

        let (total_time, edge_ids) = match &self.source {
            RouteSource::Live(router) => {
                let route = router.build_route(from_vertex, to_vertex)?;
                (route.weight, route.edges)
            }
            RouteSource::Stored(routes) => {
                let route = routes.get(from_vertex as usize)?.get(&to_vertex)?;
                (route.weight, route.edges.clone())
            }
        };

        let wait_time = f64::from(self.settings.bus_wait_time);
        let mut items = Vec::with_capacity(edge_ids.len() * 2);
        for edge_id in edge_ids {
            let edge = &self.edges[edge_id as usize];
            items.push(ItineraryItem::Wait {
                stop_name: edge.from_stop.clone(),
                time: wait_time,
            });
            items.push(ItineraryItem::Ride {
                bus: edge.bus.clone(),
                span_count: edge.span_count,
                time: edge.weight - wait_time,
            });
        }

        Some(Itinerary { total_time, items })
    }

    /// The all-pairs route table: for every source vertex, the reachable
    /// distinct targets in ascending order. This is what the snapshot
    /// serializes and the lazy router answers from.
    pub fn route_table(&self) -> Vec<Vec<(VertexId, StoredRoute)>> {
        let vertex_count = self.vertex_lookup.len() as VertexId;
        match &self.source {
            RouteSource::Live(router) => (0..vertex_count)
                .map(|from| {
                    (0..vertex_count)
                        .filter(|&to| to != from)
                        .filter_map(|to| {
                            router.build_route(from, to).map(|route| {
                                (
                                    to,
                                    StoredRoute {
                                        weight: route.weight,
                                        edges: route.edges,
                                    },
                                )
                            })
                        })
                        .collect()
                })
                .collect(),
            RouteSource::Stored(routes) => routes
                .iter()
                .map(|targets| {
                    let mut sorted: Vec<(VertexId, StoredRoute)> = targets
                        .iter()
                        .map(|(&to, route)| (to, route.clone()))
                        .collect();
                    sorted.sort_by_key(|&(to, _)| to);
                    sorted
                })
                .collect(),
        }
    }

    pub fn settings(&self) -> RoutingSettings {
        self.settings
    }

    /// `(stop name, vertex id)` pairs in unspecified order; the snapshot
    /// codec sorts them by stop id before writing.
    pub fn vertices(&self) -> impl Iterator<Item = (&Arc<str>, VertexId)> {
        self.vertex_lookup.iter().map(|(name, &vertex)| (name, vertex))
    }

    pub fn edge_records(&self) -> &[EdgeRecord] {
        &self.edges
    }
}
