use std::sync::Arc;

use crate::shared::geo::Coordinate;

/// A named point of the network where buses call.
///
/// Stops are interned on first reference; a stop mentioned by a bus or as a
/// road-distance neighbour exists without coordinates until its own
/// declaration arrives.
#[derive(Debug, Clone)]
pub struct Stop {
    /// The global internal index used for O(1) array lookups in the catalogue.
    pub index: u32,
    /// Unique non-empty display name. Doubles as the lookup key.
    pub name: Arc<str>,
    /// `None` while the stop is only a placeholder.
    pub coordinate: Option<Coordinate>,
}

/// A named ordered traversal of stops.
///
/// `stops` is the *stored sequence*: a roundtrip is kept verbatim (last stop
/// equals the first), an out-and-back input of length k is expanded to
/// 2k-1 entries by appending the reverse of the first k-1.
#[derive(Debug, Clone)]
pub struct Bus {
    pub index: u32,
    pub name: Arc<str>,
    pub is_roundtrip: bool,
    /// Stop indices of the stored sequence.
    pub stops: Vec<u32>,
    /// Cardinality of the stop set of the stored sequence.
    pub unique_stops: u32,
}

/// Lazily computed length data of one bus.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteLength {
    /// Sum of great-circle distances over consecutive stored stops, meters.
    pub geo_length: f64,
    /// Sum of road distances over consecutive stored stops, meters.
    pub real_length: f64,
    /// `real_length / geo_length`.
    pub curvature: f64,
}

/// Aggregated answer to a bus stat query.
#[derive(Debug, Clone, Copy)]
pub struct BusInfo {
    pub stop_count: usize,
    pub unique_stops: usize,
    pub real_length: f64,
    pub curvature: f64,
}

/// The render- and routing-facing view of one non-empty bus: resolved stop
/// names of the stored sequence.
#[derive(Debug, Clone)]
pub struct BusForRender {
    pub name: Arc<str>,
    pub is_roundtrip: bool,
    pub stops: Vec<Arc<str>>,
}
