use std::sync::Arc;

/// One human-readable step of an itinerary. Every graph edge decomposes into
/// a `Wait` at its boarding stop followed by a `Ride` on its bus.
#[derive(Debug, Clone, PartialEq)]
pub enum ItineraryItem {
    Wait {
        stop_name: Arc<str>,
        /// Minutes; always the flat boarding penalty.
        time: f64,
    },
    Ride {
        bus: Arc<str>,
        /// Stops traveled past on this ride.
        span_count: u32,
        /// Minutes on the move: the edge weight minus the wait penalty.
        time: f64,
    },
}

impl ItineraryItem {
    pub fn time(&self) -> f64 {
        match self {
            ItineraryItem::Wait { time, .. } => *time,
            ItineraryItem::Ride { time, .. } => *time,
        }
    }
}

/// A full answer to a route query. The item times sum to `total_time`,
/// which equals the weight of the underlying shortest path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Itinerary {
    pub total_time: f64,
    pub items: Vec<ItineraryItem>,
}
