mod entities;

pub use entities::*;

use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap, HashSet},
    sync::Arc,
};

use crate::shared::geo::Coordinate;

/// The owning store of the bus-network model.
///
/// Stops and buses live in vector-backed arenas addressed by `u32` indices;
/// every other component of the engine holds indices or `Arc<str>` name
/// handles into this store, never back-pointers. Lookups by unknown names
/// answer `None` ("not found"); a missing road distance is a corrupt feed
/// and aborts.
#[derive(Debug, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_lookup: HashMap<Arc<str>, u32>,
    bus_lookup: HashMap<Arc<str>, u32>,
    /// Directed road distances in meters.
    road_distances: HashMap<(u32, u32), u32>,
    /// Per stop, the names of the buses that traverse it, kept sorted.
    stop_to_buses: HashMap<u32, BTreeSet<Arc<str>>>,
    /// Stops in first-use order; a stop enters once the first non-empty bus
    /// references it.
    used_stops: Vec<u32>,
    /// Length data cache. A recompute yields the same value, so the interior
    /// mutability stays observationally pure.
    lengths: RefCell<HashMap<u32, RouteLength>>,
}

impl Catalogue {
    pub fn new() -> Self {
        Default::default()
    }

    /// Declares a stop: fixes its coordinates (overwriting a placeholder or
    /// an earlier declaration) and merges its directed neighbour distances.
    /// Neighbours are interned as placeholders.
    pub fn add_stop<'a>(
        &mut self,
        name: &str,
        coordinate: Coordinate,
        neighbour_distances: impl IntoIterator<Item = (&'a str, u32)>,
    ) {
        let stop_index = self.intern_stop(name);
        self.stops[stop_index as usize].coordinate = Some(coordinate);
        for (neighbour, meters) in neighbour_distances {
            let neighbour_index = self.intern_stop(neighbour);
            self.road_distances
                .insert((stop_index, neighbour_index), meters);
        }
    }

    /// Registers a bus and expands its input sequence to the stored one.
    ///
    /// An empty input stays an empty bus: registered by name but invisible
    /// to rendering, routing and the stop index.
    pub fn add_bus<'a>(
        &mut self,
        name: &str,
        stops: impl IntoIterator<Item = &'a str>,
        is_roundtrip: bool,
    ) {
        let mut stored: Vec<u32> = stops.into_iter().map(|stop| self.intern_stop(stop)).collect();
        if !is_roundtrip && !stored.is_empty() {
            let tail: Vec<u32> = stored[..stored.len() - 1].iter().rev().copied().collect();
            stored.extend(tail);
        }
        self.install_bus(Arc::from(name), is_roundtrip, stored);
    }

    /// Aggregated stats of one bus, or `None` when the name is unknown or
    /// the bus has an empty stop list.
    pub fn bus_info(&self, name: &str) -> Option<BusInfo> {
        let bus = self.bus_by_name(name)?;
        if bus.stops.is_empty() {
            return None;
        }
        let length = self.route_length(bus);
        Some(BusInfo {
            stop_count: bus.stops.len(),
            unique_stops: bus.unique_stops as usize,
            real_length: length.real_length,
            curvature: length.curvature,
        })
    }

    /// Sorted names of the buses serving a stop. `Some(vec![])` is a known
    /// stop no bus touches; `None` is an unknown name.
    pub fn stop_info(&self, name: &str) -> Option<Vec<Arc<str>>> {
        let stop_index = *self.stop_lookup.get(name)?;
        let buses = self
            .stop_to_buses
            .get(&stop_index)
            .map(|buses| buses.iter().cloned().collect())
            .unwrap_or_default();
        Some(buses)
    }

    /// Road distance in meters between two stops known by name.
    ///
    /// The lookup is asymmetric-then-symmetric: the stored `(from, to)`
    /// value wins, the reverse direction is the fallback. Both missing means
    /// the data feed broke its contract and the process aborts.
    pub fn distance(&self, from: &str, to: &str) -> u32 {
        let from_index = self.stop_lookup.get(from).copied();
        let to_index = self.stop_lookup.get(to).copied();
        match (from_index, to_index) {
            (Some(a), Some(b)) => self.distance_by_index(a, b),
            _ => panic!("road distance requested between unknown stops {from:?} and {to:?}"),
        }
    }

    pub(crate) fn distance_by_index(&self, from: u32, to: u32) -> u32 {
        self.road_distances
            .get(&(from, to))
            .or_else(|| self.road_distances.get(&(to, from)))
            .copied()
            .unwrap_or_else(|| {
                let from = &self.stops[from as usize].name;
                let to = &self.stops[to as usize].name;
                panic!("no road distance recorded between {from:?} and {to:?} in either direction")
            })
    }

    /// Used stops with their coordinates, in first-use order. The order is
    /// stable within a process and seeds the router's vertex numbering.
    pub fn stops_used(&self) -> Vec<(Arc<str>, Coordinate)> {
        self.used_stops
            .iter()
            .map(|&stop_index| {
                let stop = &self.stops[stop_index as usize];
                let coordinate = stop.coordinate.unwrap_or_else(|| {
                    panic!("used stop {:?} was never declared with coordinates", stop.name)
                });
                (stop.name.clone(), coordinate)
            })
            .collect()
    }

    /// Non-empty buses sorted by name, with their stored sequences resolved
    /// to stop names. This is the single render/routing view of the network.
    pub fn buses_for_render(&self) -> Vec<BusForRender> {
        let mut buses: Vec<&Bus> = self.buses.iter().filter(|bus| !bus.stops.is_empty()).collect();
        buses.sort_by(|a, b| a.name.cmp(&b.name));
        buses
            .into_iter()
            .map(|bus| BusForRender {
                name: bus.name.clone(),
                is_roundtrip: bus.is_roundtrip,
                stops: bus
                    .stops
                    .iter()
                    .map(|&stop_index| self.stops[stop_index as usize].name.clone())
                    .collect(),
            })
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    pub fn bus_count(&self) -> usize {
        self.buses.len()
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn stop_index(&self, name: &str) -> Option<u32> {
        self.stop_lookup.get(name).copied()
    }

    pub fn bus_index(&self, name: &str) -> Option<u32> {
        self.bus_lookup.get(name).copied()
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// Directed distance records `(from, to, meters)` in unspecified order;
    /// the snapshot codec sorts before writing.
    pub fn road_distance_entries(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.road_distances
            .iter()
            .map(|(&(from, to), &meters)| (from, to, meters))
    }

    fn bus_by_name(&self, name: &str) -> Option<&Bus> {
        let index = *self.bus_lookup.get(name)?;
        Some(&self.buses[index as usize])
    }

    fn intern_stop(&mut self, name: &str) -> u32 {
        if let Some(&index) = self.stop_lookup.get(name) {
            return index;
        }
        let index = self.stops.len() as u32;
        let name: Arc<str> = Arc::from(name);
        self.stop_lookup.insert(name.clone(), index);
        self.stops.push(Stop {
            index,
            name,
            coordinate: None,
        });
        index
    }

    fn route_length(&self, bus: &Bus) -> RouteLength {
        if let Some(&cached) = self.lengths.borrow().get(&bus.index) {
            return cached;
        }

        let mut length = RouteLength::default();
        for pair in bus.stops.windows(2) {
            let prev = &self.stops[pair[0] as usize];
            let cur = &self.stops[pair[1] as usize];
            let (prev_coord, cur_coord) = match (prev.coordinate, cur.coordinate) {
                (Some(a), Some(b)) => (a, b),
                _ => panic!(
                    "bus {:?} traverses a stop without coordinates ({:?} -> {:?})",
                    bus.name, prev.name, cur.name
                ),
            };
            length.geo_length += prev_coord.great_circle_distance(&cur_coord);
            length.real_length += f64::from(self.distance_by_index(pair[0], pair[1]));
        }
        // A single-stop sequence, or one whose stops share coordinates, has
        // zero great-circle extent; curvature must still be a finite number
        // on the wire.
        length.curvature = if length.geo_length == 0.0 {
            1.0
        } else {
            length.real_length / length.geo_length
        };

        self.lengths.borrow_mut().insert(bus.index, length);
        length
    }

    // --- Snapshot restore path ---
    //
    // Decode rebuilds the store record by record: stops first (ids must come
    // back in index order), then buses with their already-stored sequences
    // (no re-expansion), then raw distance records.

    pub(crate) fn restore_stop(&mut self, name: Arc<str>, coordinate: Option<Coordinate>) -> u32 {
        let index = self.stops.len() as u32;
        self.stop_lookup.insert(name.clone(), index);
        self.stops.push(Stop {
            index,
            name,
            coordinate,
        });
        index
    }

    pub(crate) fn restore_bus(&mut self, name: Arc<str>, is_roundtrip: bool, stored: Vec<u32>) {
        self.install_bus(name, is_roundtrip, stored);
    }

    pub(crate) fn restore_distance(&mut self, from: u32, to: u32, meters: u32) {
        self.road_distances.insert((from, to), meters);
    }

    fn install_bus(&mut self, name: Arc<str>, is_roundtrip: bool, stored: Vec<u32>) {
        let index = self.buses.len() as u32;
        self.bus_lookup.insert(name.clone(), index);
        let unique_stops = stored.iter().collect::<HashSet<_>>().len() as u32;

        for &stop_index in &stored {
            let buses = self.stop_to_buses.entry(stop_index).or_default();
            if buses.is_empty() {
                self.used_stops.push(stop_index);
            }
            buses.insert(name.clone());
        }

        self.buses.push(Bus {
            index,
            name,
            is_roundtrip,
            stops: stored,
            unique_stops,
        });
    }
}
