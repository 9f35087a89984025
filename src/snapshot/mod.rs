use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
    sync::Arc,
};
use thiserror::Error;
use tracing::info;

use crate::{
    catalogue::Catalogue,
    render::{MapRenderer, settings::RenderSettings, svg::Point},
    routing::{EdgeRecord, RoutingSettings, StoredRoute, TransportRouter, VertexId},
    shared::geo::Coordinate,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("snapshot encode error: {0}")]
    Encode(#[from] ciborium::ser::Error<io::Error>),
    #[error("snapshot decode error: {0}")]
    Decode(#[from] ciborium::de::Error<io::Error>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub id: u32,
    pub name: String,
    /// `None` for a stop that stayed a placeholder.
    pub coordinate: Option<Coordinate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusRecord {
    pub id: u32,
    pub name: String,
    pub is_roundtrip: bool,
    /// The *stored* sequence; decode installs it verbatim, no re-expansion.
    pub stops: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistanceRecord {
    pub from: u32,
    pub to: u32,
    pub meters: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapRecord {
    pub settings: RenderSettings,
    /// Projected position per used stop, sorted by stop id. Stored rather
    /// than recomputed so the post-decode map is pixel-identical.
    pub stop_points: Vec<(u32, Point)>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub from_stop: u32,
    pub bus: u32,
    pub weight: f64,
    pub span_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    pub to: VertexId,
    pub weight: f64,
    pub edges: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRoutes {
    pub from: VertexId,
    pub routes: Vec<RouteEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterRecord {
    /// `(stop id, vertex id)`, sorted by stop id.
    pub vertices: Vec<(u32, VertexId)>,
    /// Indexed by edge id.
    pub edges: Vec<EdgeEntry>,
    /// Per-source route sets, sources ascending, targets ascending.
    pub routes: Vec<SourceRoutes>,
    pub settings: RoutingSettings,
}

/// The on-disk model: one self-describing CBOR container holding the whole
/// catalogue, the projected map and the precomputed route table.
///
/// Every table is an id-sorted vector, so the same model always encodes to
/// the same bytes. Decoding a truncated or structurally different file
/// fails with [`enum@Error`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub stops: Vec<StopRecord>,
    pub buses: Vec<BusRecord>,
    pub distances: Vec<DistanceRecord>,
    pub map: MapRecord,
    pub router: RouterRecord,
}

impl Snapshot {
    /// Collects the serializable state of the three engines. Ids are the
    /// catalogue arena indices, which are already insertion-ordered.
    pub fn capture(
        catalogue: &Catalogue,
        renderer: &MapRenderer,
        router: &TransportRouter,
    ) -> Self {
        let stops = catalogue
            .stops()
            .iter()
            .map(|stop| StopRecord {
                id: stop.index,
                name: stop.name.to_string(),
                coordinate: stop.coordinate,
            })
            .collect();

        let buses = catalogue
            .buses()
            .iter()
            .map(|bus| BusRecord {
                id: bus.index,
                name: bus.name.to_string(),
                is_roundtrip: bus.is_roundtrip,
                stops: bus.stops.clone(),
            })
            .collect();

        let mut distances: Vec<DistanceRecord> = catalogue
            .road_distance_entries()
            .map(|(from, to, meters)| DistanceRecord { from, to, meters })
            .collect();
        distances.sort_by_key(|record| (record.from, record.to));

        let stop_points = renderer
            .stop_points()
            .iter()
            .map(|(name, &point)| {
                let id = resolve(catalogue.stop_index(name), "stop", name);
                (id, point)
            })
            .collect::<BTreeMap<u32, Point>>()
            .into_iter()
            .collect();

        let mut vertices: Vec<(u32, VertexId)> = router
            .vertices()
            .map(|(name, vertex)| (resolve(catalogue.stop_index(name), "stop", name), vertex))
            .collect();
        vertices.sort_by_key(|&(stop_id, _)| stop_id);

        let edges = router
            .edge_records()
            .iter()
            .map(|edge| EdgeEntry {
                from_stop: resolve(catalogue.stop_index(&edge.from_stop), "stop", &edge.from_stop),
                bus: resolve(catalogue.bus_index(&edge.bus), "bus", &edge.bus),
                weight: edge.weight,
                span_count: edge.span_count,
            })
            .collect();

        let routes = router
            .route_table()
            .into_iter()
            .enumerate()
            .map(|(from, targets)| SourceRoutes {
                from: from as VertexId,
                routes: targets
                    .into_iter()
                    .map(|(to, route)| RouteEntry {
                        to,
                        weight: route.weight,
                        edges: route.edges,
                    })
                    .collect(),
            })
            .collect();

        Self {
            stops,
            buses,
            distances,
            map: MapRecord {
                settings: renderer.settings().clone(),
                stop_points,
            },
            router: RouterRecord {
                vertices,
                edges,
                routes,
                settings: router.settings(),
            },
        }
    }

    /// Rebuilds the three engines: stop/bus/distance stores first, then the
    /// projected points and the lazy router get their ids wired back.
    pub fn restore(self) -> (Catalogue, MapRenderer, TransportRouter) {
        let mut catalogue = Catalogue::new();
        for record in self.stops {
            let index = catalogue.restore_stop(Arc::from(record.name), record.coordinate);
            if index != record.id {
                panic!("snapshot stop ids are not contiguous: expected {index}, found {}", record.id);
            }
        }
        for record in self.buses {
            catalogue.restore_bus(Arc::from(record.name), record.is_roundtrip, record.stops);
        }
        for record in self.distances {
            catalogue.restore_distance(record.from, record.to, record.meters);
        }

        let stop_name = |id: u32| -> Arc<str> {
            catalogue
                .stops()
                .get(id as usize)
                .map(|stop| stop.name.clone())
                .unwrap_or_else(|| panic!("snapshot references unknown stop id {id}"))
        };
        let bus_name = |id: u32| -> Arc<str> {
            catalogue
                .buses()
                .get(id as usize)
                .map(|bus| bus.name.clone())
                .unwrap_or_else(|| panic!("snapshot references unknown bus id {id}"))
        };

        let mut renderer = MapRenderer::new(self.map.settings);
        renderer.set_stop_points(
            self.map
                .stop_points
                .into_iter()
                .map(|(id, point)| (stop_name(id), point))
                .collect(),
        );

        let vertex_lookup: HashMap<Arc<str>, VertexId> = self
            .router
            .vertices
            .iter()
            .map(|&(stop_id, vertex)| (stop_name(stop_id), vertex))
            .collect();

        let edges: Vec<EdgeRecord> = self
            .router
            .edges
            .into_iter()
            .map(|entry| EdgeRecord {
                bus: bus_name(entry.bus),
                from_stop: stop_name(entry.from_stop),
                weight: entry.weight,
                span_count: entry.span_count,
            })
            .collect();

        let mut routes: Vec<HashMap<VertexId, StoredRoute>> =
            vec![HashMap::new(); vertex_lookup.len()];
        for source in self.router.routes {
            let targets = routes.get_mut(source.from as usize).unwrap_or_else(|| {
                panic!("snapshot route table references unknown vertex {}", source.from)
            });
            for entry in source.routes {
                targets.insert(
                    entry.to,
                    StoredRoute {
                        weight: entry.weight,
                        edges: entry.edges,
                    },
                );
            }
        }

        let router =
            TransportRouter::from_parts(self.router.settings, vertex_lookup, edges, routes);
        (catalogue, renderer, router)
    }

    /// Encodes into any writer; `write` is the whole-file wrapper.
    pub fn encode<W: Write>(&self, writer: W) -> Result<(), Error> {
        ciborium::ser::into_writer(self, writer)?;
        Ok(())
    }

    pub fn decode<R: Read>(reader: R) -> Result<Self, Error> {
        Ok(ciborium::de::from_reader(reader)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.encode(&mut writer)?;
        writer.flush()?;
        info!(
            path = %path.display(),
            stops = self.stops.len(),
            buses = self.buses.len(),
            "snapshot written"
        );
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        let snapshot = Self::decode(BufReader::new(file))?;
        info!(
            path = %path.display(),
            stops = snapshot.stops.len(),
            buses = snapshot.buses.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}

fn resolve(index: Option<u32>, kind: &str, name: &str) -> u32 {
    index.unwrap_or_else(|| panic!("{kind} {name:?} is missing from the catalogue arena"))
}
