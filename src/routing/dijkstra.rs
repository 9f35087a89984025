use rayon::prelude::*;
use std::{cmp::Ordering, collections::BinaryHeap};

use crate::routing::graph::{DirectedGraph, EdgeId, VertexId};

/// A shortest path: total weight plus the edge ids that realize it, in
/// traversal order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteInfo {
    pub weight: f64,
    pub edges: Vec<EdgeId>,
}

/// What the search learned about one vertex from one source.
#[derive(Debug, Clone, Copy)]
struct Reached {
    distance: f64,
    /// Edge that enters this vertex on the shortest path; `None` at the
    /// source itself.
    prev_edge: Option<EdgeId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct QueueEntry {
    distance: f64,
    vertex: VertexId,
}

impl Eq for QueueEntry {}

// BinaryHeap is a max-heap; reverse the comparison to pop the smallest
// distance first, ties broken by vertex id.
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// All-pairs shortest paths over a [`DirectedGraph`].
///
/// Construction runs Dijkstra from every vertex (the per-source runs are
/// independent, so they fan out over rayon and collect back in source
/// order). Afterwards `build_route` only walks the memoized predecessor
/// chain, O(path length).
#[derive(Debug)]
pub struct Router {
    graph: DirectedGraph,
    reached: Vec<Vec<Option<Reached>>>,
}

impl Router {
    pub fn new(graph: DirectedGraph) -> Self {
        let reached = (0..graph.vertex_count() as VertexId)
            .into_par_iter()
            .map(|source| shortest_paths(&graph, source))
            .collect();
        Self { graph, reached }
    }

    /// The shortest path between two vertices, or `None` when unreachable.
    pub fn build_route(&self, from: VertexId, to: VertexId) -> Option<RouteInfo> {
        let from_source = &self.reached[from as usize];
        let target = from_source[to as usize]?;

        let mut edges = Vec::new();
        let mut cursor = to;
        while cursor != from {
            let entry = from_source[cursor as usize].unwrap_or_else(|| {
                panic!("predecessor chain broke at vertex {cursor} on the way back to {from}")
            });
            let edge_id = entry.prev_edge.unwrap_or_else(|| {
                panic!("vertex {cursor} reached from {from} without an entering edge")
            });
            edges.push(edge_id);
            cursor = self.graph.edge(edge_id).from;
        }
        edges.reverse();

        Some(RouteInfo {
            weight: target.distance,
            edges,
        })
    }
}

/// Single-source Dijkstra with a monotone priority queue.
///
/// Relaxation is strict and edges are scanned in insertion order, so among
/// equal-weight alternatives the earliest-inserted edge wins and identical
/// inputs decompose identically.
fn shortest_paths(graph: &DirectedGraph, source: VertexId) -> Vec<Option<Reached>> {
    let mut reached: Vec<Option<Reached>> = vec![None; graph.vertex_count()];
    reached[source as usize] = Some(Reached {
        distance: 0.0,
        prev_edge: None,
    });

    let mut queue = BinaryHeap::new();
    queue.push(QueueEntry {
        distance: 0.0,
        vertex: source,
    });

    while let Some(QueueEntry { distance, vertex }) = queue.pop() {
        let settled = reached[vertex as usize]
            .map(|entry| entry.distance)
            .unwrap_or(f64::INFINITY);
        if distance > settled {
            continue;
        }

        for &edge_id in graph.incident_edges(vertex) {
            let edge = graph.edge(edge_id);
            let candidate = distance + edge.weight;
            let known = reached[edge.to as usize]
                .map(|entry| entry.distance)
                .unwrap_or(f64::INFINITY);
            if candidate < known {
                reached[edge.to as usize] = Some(Reached {
                    distance: candidate,
                    prev_edge: Some(edge_id),
                });
                queue.push(QueueEntry {
                    distance: candidate,
                    vertex: edge.to,
                });
            }
        }
    }

    reached
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> DirectedGraph {
        // 0 -> 1 -> 3 and 0 -> 2 -> 3, the upper path cheaper.
        let mut graph = DirectedGraph::new(4);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(0, 2, 2.0);
        graph.add_edge(1, 3, 1.0);
        graph.add_edge(2, 3, 0.5);
        graph
    }

    #[test]
    fn picks_the_cheaper_path() {
        let router = Router::new(diamond());
        let route = router.build_route(0, 3).unwrap();
        assert_eq!(route.weight, 2.0);
        assert_eq!(route.edges, vec![0, 2]);
    }

    #[test]
    fn unreachable_is_none() {
        let router = Router::new(diamond());
        assert!(router.build_route(3, 0).is_none());
    }

    #[test]
    fn source_to_itself_is_empty() {
        let router = Router::new(diamond());
        let route = router.build_route(1, 1).unwrap();
        assert_eq!(route.weight, 0.0);
        assert!(route.edges.is_empty());
    }

    #[test]
    fn equal_weights_prefer_earlier_edges() {
        let mut graph = DirectedGraph::new(3);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(1, 2, 1.0);
        graph.add_edge(0, 2, 2.0);
        let router = Router::new(graph);
        // Both decompositions weigh 2.0; the direct edge assigned the
        // distance first and strict relaxation keeps it.
        let route = router.build_route(0, 2).unwrap();
        assert_eq!(route.edges, vec![2]);
    }

    #[test]
    fn self_loops_never_enter_a_path() {
        let mut graph = DirectedGraph::new(2);
        graph.add_edge(0, 0, 5.0);
        graph.add_edge(0, 1, 1.0);
        let router = Router::new(graph);
        assert_eq!(router.build_route(0, 1).unwrap().edges, vec![1]);
        assert_eq!(router.build_route(0, 0).unwrap().weight, 0.0);
    }
}
